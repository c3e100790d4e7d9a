//! Channel Scorer Data Models

use insight_core::error::{check_non_negative, check_unit_interval};
use insight_core::InsightError;
use serde::{Deserialize, Serialize};

/// Demand/presence quadrant of a retailer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelQuadrant {
    /// High demand, low brand presence
    #[serde(rename = "Opportunity")]
    Opportunity,
    /// High demand, brand already present
    #[serde(rename = "Performing")]
    Performing,
    /// Low demand, brand present anyway
    #[serde(rename = "Over-indexed")]
    OverIndexed,
    /// Low demand, low presence
    #[serde(rename = "Low priority")]
    LowPriority,
}

impl ChannelQuadrant {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelQuadrant::Opportunity => "Opportunity",
            ChannelQuadrant::Performing => "Performing",
            ChannelQuadrant::OverIndexed => "Over-indexed",
            ChannelQuadrant::LowPriority => "Low priority",
        }
    }

    /// Classify a point against the demand threshold and the presence cutoff.
    pub fn classify(demand: f64, presence: f64, x_threshold: f64, low_presence_threshold: f64) -> Self {
        let high_demand = demand >= x_threshold;
        let present = presence >= low_presence_threshold;
        match (high_demand, present) {
            (true, false) => ChannelQuadrant::Opportunity,
            (true, true) => ChannelQuadrant::Performing,
            (false, true) => ChannelQuadrant::OverIndexed,
            (false, false) => ChannelQuadrant::LowPriority,
        }
    }
}

/// Raw per-retailer input: weekly category demand and the brand's share of it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandPoint {
    /// Retailer name
    pub name: String,
    /// Weekly category demand (views)
    pub demand: f64,
    /// Brand share of that demand (0-1)
    pub presence: f64,
    /// Bubble size for charts, not used for classification
    #[serde(default)]
    pub size: f64,
}

impl DemandPoint {
    pub fn new(name: impl Into<String>, demand: f64, presence: f64) -> Self {
        Self {
            name: name.into(),
            demand,
            presence,
            size: 0.0,
        }
    }
}

/// A retailer after scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPoint {
    pub name: String,
    /// Demand clamped to >= 0
    pub demand: f64,
    /// Presence clamped into [0, 1]
    pub presence: f64,
    pub size: f64,
    /// `demand * (1 - min(presence, cap))`
    pub score: f64,
    /// Views gained by reaching the peer median presence; `None` when no
    /// retailer has positive presence
    pub potential: Option<f64>,
    pub quadrant: ChannelQuadrant,
    /// Whether the point passed the demand floor (or the floor was waived)
    pub in_pool: bool,
}

/// Configuration for quadrant scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Demand percentile that separates high from low demand
    pub high_demand_percentile: f64,
    /// Presence below this counts as "absent"
    pub low_presence_threshold: f64,
    /// Presence above this stops reducing the score
    pub presence_cap_for_score: f64,
    /// Retailers below this weekly demand are left out of thresholds
    pub min_demand_floor: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            high_demand_percentile: 0.70,
            low_presence_threshold: 0.05,
            presence_cap_for_score: 0.30,
            min_demand_floor: 1000.0,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), InsightError> {
        check_unit_interval("high_demand_percentile", self.high_demand_percentile)?;
        check_unit_interval("low_presence_threshold", self.low_presence_threshold)?;
        check_unit_interval("presence_cap_for_score", self.presence_cap_for_score)?;
        check_non_negative("min_demand_floor", self.min_demand_floor)
    }
}

/// Output of the scorer: every input point plus the thresholds used
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSet {
    pub points: Vec<ScoredPoint>,
    pub x_threshold: f64,
    pub low_presence_threshold: f64,
    pub target_presence: Option<f64>,
    /// True when no point cleared the demand floor and all were pooled
    pub floor_waived: bool,
}

impl ScoredSet {
    /// Points that take part in thresholds and headline selection
    pub fn pool(&self) -> Vec<ScoredPoint> {
        self.points.iter().filter(|p| p.in_pool).cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(ChannelQuadrant::classify(100.0, 0.0, 100.0, 0.05), ChannelQuadrant::Opportunity);
        assert_eq!(ChannelQuadrant::classify(100.0, 0.05, 100.0, 0.05), ChannelQuadrant::Performing);
        assert_eq!(ChannelQuadrant::classify(99.0, 0.05, 100.0, 0.05), ChannelQuadrant::OverIndexed);
        assert_eq!(ChannelQuadrant::classify(99.0, 0.01, 100.0, 0.05), ChannelQuadrant::LowPriority);
    }

    #[test]
    fn test_quadrant_serializes_as_label() {
        let json = serde_json::to_string(&ChannelQuadrant::OverIndexed).unwrap();
        assert_eq!(json, "\"Over-indexed\"");
    }

    #[test]
    fn test_config_validation() {
        assert!(ScoringConfig::default().validate().is_ok());
        let bad = ScoringConfig {
            high_demand_percentile: 70.0,
            ..ScoringConfig::default()
        };
        assert!(bad.validate().is_err());
    }
}
