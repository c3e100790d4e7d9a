//! Competitor Landscape
//!
//! Compares the brand with one competitor across retailers. The x-axis is the
//! category views both brands compete for at a retailer; the y-axis is the
//! competitor's head-to-head lead (competitor share minus your share).

use serde::{Deserialize, Serialize};

use insight_core::error::{check_non_negative, check_unit_interval};
use insight_core::format::{abbr, strong, whole_pp};
use insight_core::stats::{clamp_share, desc, non_negative, percentile};
use insight_core::{Explained, FloorMask, Insight, InsightError, InsightSelector, PriorityTiers, TierHit};

const NAME: &str = "competitor_landscape";

/// Head-to-head quadrant at a retailer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompetitorQuadrant {
    #[serde(rename = "Strong rival")]
    StrongRival,
    #[serde(rename = "Your stronghold")]
    Stronghold,
    #[serde(rename = "Niche rival")]
    NicheRival,
    #[serde(rename = "Low overlap")]
    LowOverlap,
}

impl CompetitorQuadrant {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompetitorQuadrant::StrongRival => "Strong rival",
            CompetitorQuadrant::Stronghold => "Your stronghold",
            CompetitorQuadrant::NicheRival => "Niche rival",
            CompetitorQuadrant::LowOverlap => "Low overlap",
        }
    }

    /// High overlap means `overlap >= threshold`; the competitor leads when
    /// `lead > 0`.
    pub fn classify(overlap: f64, lead: f64, threshold: f64) -> Self {
        match (overlap >= threshold, lead > 0.0) {
            (true, true) => CompetitorQuadrant::StrongRival,
            (true, false) => CompetitorQuadrant::Stronghold,
            (false, true) => CompetitorQuadrant::NicheRival,
            (false, false) => CompetitorQuadrant::LowOverlap,
        }
    }
}

/// One retailer's head-to-head numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorRow {
    pub retailer: String,
    /// Category views where both brands are listed
    pub overlap_views: f64,
    /// Competitor share minus your share, as a decimal in [-1, 1]
    pub competitor_lead: f64,
    #[serde(default)]
    pub size: f64,
}

impl CompetitorRow {
    pub fn new(retailer: impl Into<String>, overlap_views: f64, competitor_lead: f64) -> Self {
        Self {
            retailer: retailer.into(),
            overlap_views,
            competitor_lead,
            size: 0.0,
        }
    }
}

/// A classified retailer, as plotted by the landscape chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorPoint {
    pub retailer: String,
    pub overlap_views: f64,
    pub competitor_lead: f64,
    pub size: f64,
    pub quadrant: CompetitorQuadrant,
    pub in_pool: bool,
}

/// Configuration for the competitor landscape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorConfig {
    /// Overlap percentile that separates the high-overlap zone
    pub high_overlap_percentile: f64,
    /// Minimum lead (decimal) for a clear win or loss
    pub lead_margin: f64,
    /// Retailers below this overlap are not headlined
    pub min_overlap_views: f64,
}

impl Default for CompetitorConfig {
    fn default() -> Self {
        Self {
            high_overlap_percentile: 0.70,
            lead_margin: 0.10,
            min_overlap_views: 1000.0,
        }
    }
}

impl CompetitorConfig {
    pub fn validate(&self) -> Result<(), InsightError> {
        check_unit_interval("high_overlap_percentile", self.high_overlap_percentile)?;
        check_unit_interval("lead_margin", self.lead_margin)?;
        check_non_negative("min_overlap_views", self.min_overlap_views)
    }
}

/// Landscape result: the headline plus every classified retailer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorInsight {
    pub insight: Insight,
    /// Quadrant of the headlined retailer; `None` for empty input
    pub quadrant: Option<CompetitorQuadrant>,
    pub from_fallback: bool,
    pub x_threshold: f64,
    pub points: Vec<CompetitorPoint>,
}

impl Explained for CompetitorInsight {
    fn insight(&self) -> &Insight {
        &self.insight
    }
}

/// Picks the most notable head-to-head retailer
#[derive(Debug, Clone)]
pub struct CompetitorLandscape {
    config: CompetitorConfig,
    competitor: String,
}

impl CompetitorLandscape {
    pub fn new(competitor: impl Into<String>) -> Self {
        Self::with_config(competitor, CompetitorConfig::default())
    }

    pub fn with_config(competitor: impl Into<String>, config: CompetitorConfig) -> Self {
        let competitor = competitor.into();
        let competitor = if competitor.trim().is_empty() {
            "Competitor".to_string()
        } else {
            competitor
        };
        Self { config, competitor }
    }

    pub fn competitor(&self) -> &str {
        &self.competitor
    }

    fn render(&self, point: &CompetitorPoint, quadrant: CompetitorQuadrant, fallback: bool) -> Insight {
        let competitor = strong(&self.competitor);
        let retailer = strong(&point.retailer);
        let gap = strong(whole_pp(point.competitor_lead));
        let overlap = strong(abbr(point.overlap_views));

        if fallback {
            let overlap_text = format!(
                "{} is where you overlap most with {} ({} category views)",
                retailer, competitor, overlap
            );
            let mut tags = vec![quadrant.as_str().to_string(), "Largest overlap".to_string()];
            // A zero lead classifies as a stronghold but is headlined as a tie.
            if point.competitor_lead == 0.0 {
                tags.push("Level".to_string());
                return Insight::new(
                    &point.retailer,
                    "Level overlap",
                    format!("{}; the two of you are level.", overlap_text),
                    tags,
                );
            }
            let standing = if point.competitor_lead > 0.0 { "they lead by" } else { "you lead by" };
            return Insight::new(
                &point.retailer,
                quadrant.as_str(),
                format!("{}; {} {}.", overlap_text, standing, gap),
                tags,
            );
        }

        let (text, tags) = match quadrant {
            CompetitorQuadrant::StrongRival => (
                format!(
                    "{} leads you by {} at {}, across {} overlapping category views.",
                    competitor, gap, retailer, overlap
                ),
                ["High overlap", "Competitor leads"],
            ),
            CompetitorQuadrant::Stronghold => (
                format!(
                    "You lead {} by {} at {}, your biggest high-overlap win with {} shared category views.",
                    competitor, gap, retailer, overlap
                ),
                ["High overlap", "You lead"],
            ),
            CompetitorQuadrant::NicheRival => (
                format!(
                    "{} is ahead by {} at {}, a smaller overlap of {} category views worth watching.",
                    competitor, gap, retailer, overlap
                ),
                ["Low overlap", "Competitor leads"],
            ),
            CompetitorQuadrant::LowOverlap => (
                format!("{} overlaps little with {} at {}.", competitor, retailer, overlap),
                ["Low overlap", "No clear lead"],
            ),
        };
        let mut all_tags = vec![quadrant.as_str().to_string()];
        all_tags.extend(tags.iter().map(|t| t.to_string()));
        Insight::new(&point.retailer, quadrant.as_str(), text, all_tags)
    }
}

impl InsightSelector for CompetitorLandscape {
    type Row = CompetitorRow;
    type Output = CompetitorInsight;

    fn name(&self) -> &'static str {
        NAME
    }

    fn select(&self, rows: &[CompetitorRow]) -> CompetitorInsight {
        if rows.is_empty() {
            return CompetitorInsight {
                insight: Insight::no_data("retailer overlap"),
                quadrant: None,
                from_fallback: false,
                x_threshold: 0.0,
                points: Vec::new(),
            };
        }
        let cfg = &self.config;

        let overlaps: Vec<f64> = rows.iter().map(|r| non_negative(r.overlap_views)).collect();
        let mask = FloorMask::new(&overlaps, cfg.min_overlap_views, NAME);
        let x_threshold = percentile(&mask.select(&overlaps), cfg.high_overlap_percentile);
        tracing::trace!(x_threshold, competitor = %self.competitor, "competitor thresholds");

        let points: Vec<CompetitorPoint> = rows
            .iter()
            .zip(overlaps.iter())
            .enumerate()
            .map(|(i, (row, &overlap))| {
                let lead = if row.competitor_lead.is_nan() {
                    0.0
                } else {
                    row.competitor_lead.clamp(-1.0, 1.0)
                };
                CompetitorPoint {
                    retailer: row.retailer.clone(),
                    overlap_views: overlap,
                    competitor_lead: lead,
                    size: non_negative(row.size),
                    quadrant: CompetitorQuadrant::classify(overlap, lead, x_threshold),
                    in_pool: mask.contains(i),
                }
            })
            .collect();
        let pool = mask.select(&points);

        let margin = cfg.lead_margin;
        let high = move |p: &CompetitorPoint| p.overlap_views >= x_threshold;
        let tiers = PriorityTiers::new(NAME)
            .tier(
                CompetitorQuadrant::StrongRival,
                move |p: &CompetitorPoint| high(p) && p.competitor_lead >= margin,
                |a: &CompetitorPoint, b: &CompetitorPoint| {
                    desc(
                        a.overlap_views * a.competitor_lead.max(0.0),
                        b.overlap_views * b.competitor_lead.max(0.0),
                    )
                },
                |p: &CompetitorPoint| self.render(p, CompetitorQuadrant::StrongRival, false),
            )
            .tier(
                CompetitorQuadrant::Stronghold,
                move |p: &CompetitorPoint| high(p) && p.competitor_lead <= -margin,
                |a: &CompetitorPoint, b: &CompetitorPoint| desc(a.overlap_views, b.overlap_views),
                |p: &CompetitorPoint| self.render(p, CompetitorQuadrant::Stronghold, false),
            )
            .tier(
                CompetitorQuadrant::NicheRival,
                move |p: &CompetitorPoint| !high(p) && p.competitor_lead > 0.0,
                |a: &CompetitorPoint, b: &CompetitorPoint| desc(a.overlap_views, b.overlap_views),
                |p: &CompetitorPoint| self.render(p, CompetitorQuadrant::NicheRival, false),
            )
            .fallback(
                |a: &CompetitorPoint, b: &CompetitorPoint| desc(a.overlap_views, b.overlap_views),
                |p: &CompetitorPoint| self.render(p, p.quadrant, true),
            );

        let (insight, quadrant, from_fallback) = match tiers.resolve(&pool) {
            Some(resolved) => {
                let quadrant = match resolved.hit {
                    TierHit::Tier(q) => q,
                    TierHit::Fallback => resolved.entity.quadrant,
                };
                (resolved.insight, Some(quadrant), resolved.hit.is_fallback())
            }
            None => (Insight::no_data("retailer overlap"), None, false),
        };

        CompetitorInsight {
            insight,
            quadrant,
            from_fallback,
            x_threshold,
            points,
        }
    }
}

/// Competitor lead from the two brands' shares at a retailer.
pub fn lead_from_shares(competitor_share: f64, your_share: f64) -> f64 {
    clamp_share(competitor_share, 1.0) - clamp_share(your_share, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select(rows: &[CompetitorRow]) -> CompetitorInsight {
        CompetitorLandscape::new("Rivalco").select(rows)
    }

    #[test]
    fn test_strong_rival_ranked_by_weighted_lead() {
        let rows = vec![
            CompetitorRow::new("Target", 80_000.0, 0.12),
            CompetitorRow::new("Walmart", 100_000.0, 0.25),
            CompetitorRow::new("Kroger", 90_000.0, 0.40),
            CompetitorRow::new("Costco", 5_000.0, 0.30),
            CompetitorRow::new("Aldi", 3_000.0, -0.05),
        ];
        let result = select(&rows);
        // threshold = 88k; Kroger 90k*0.40 beats Walmart 100k*0.25
        assert_eq!(result.quadrant, Some(CompetitorQuadrant::StrongRival));
        assert_eq!(result.insight.entity_name, "Kroger");
        assert_eq!(result.insight.title, "Strong rival");
        assert_eq!(
            result.insight.text,
            "<strong>Rivalco</strong> leads you by <strong>40pp</strong> at <strong>Kroger</strong>, across <strong>90.0K</strong> overlapping category views."
        );
        assert_eq!(result.insight.tags, vec!["Strong rival", "High overlap", "Competitor leads"]);
    }

    #[test]
    fn test_stronghold_when_no_rival_leads_in_high_zone() {
        let rows = vec![
            CompetitorRow::new("Target", 80_000.0, -0.15),
            CompetitorRow::new("Walmart", 100_000.0, -0.20),
            CompetitorRow::new("Kroger", 10_000.0, 0.30),
        ];
        let result = select(&rows);
        assert_eq!(result.quadrant, Some(CompetitorQuadrant::Stronghold));
        assert_eq!(result.insight.entity_name, "Walmart");
        assert!(result.insight.text.starts_with("You lead <strong>Rivalco</strong> by <strong>20pp</strong>"));
    }

    #[test]
    fn test_stronghold_ranked_by_overlap_not_lead() {
        let rows = vec![
            CompetitorRow::new("Walmart", 95_000.0, -0.40),
            CompetitorRow::new("Target", 100_000.0, -0.12),
            CompetitorRow::new("Kroger", 10_000.0, -0.05),
            CompetitorRow::new("Costco", 8_000.0, -0.02),
            CompetitorRow::new("Aldi", 6_000.0, -0.01),
            CompetitorRow::new("Meijer", 4_000.0, -0.03),
        ];
        let result = select(&rows);
        // both Walmart and Target clear the threshold; Target has more overlap
        approx::assert_relative_eq!(result.x_threshold, 52_500.0, epsilon = 1e-6);
        assert_eq!(result.quadrant, Some(CompetitorQuadrant::Stronghold));
        assert_eq!(result.insight.entity_name, "Target");
        assert!(result.insight.text.starts_with("You lead <strong>Rivalco</strong> by <strong>12pp</strong>"));
    }

    #[test]
    fn test_niche_rival_in_low_overlap_zone() {
        let rows = vec![
            CompetitorRow::new("Target", 80_000.0, -0.05),
            CompetitorRow::new("Walmart", 100_000.0, 0.02),
            CompetitorRow::new("Kroger", 10_000.0, 0.30),
            CompetitorRow::new("Meijer", 20_000.0, 0.01),
        ];
        let result = select(&rows);
        assert_eq!(result.quadrant, Some(CompetitorQuadrant::NicheRival));
        assert_eq!(result.insight.entity_name, "Meijer");
        assert_eq!(result.insight.title, "Niche rival");
    }

    #[test]
    fn test_fallback_uses_largest_overlap_and_post_hoc_quadrant() {
        let rows = vec![
            CompetitorRow::new("Target", 80_000.0, 0.0),
            CompetitorRow::new("Walmart", 100_000.0, 0.05),
            CompetitorRow::new("Kroger", 10_000.0, -0.30),
        ];
        let result = select(&rows);
        assert!(result.from_fallback);
        assert_eq!(result.insight.entity_name, "Walmart");
        assert_eq!(result.quadrant, Some(CompetitorQuadrant::StrongRival));
        assert_eq!(result.insight.title, "Strong rival");
        assert!(result.insight.text.ends_with("they lead by <strong>5pp</strong>."));
        assert_eq!(result.insight.tags, vec!["Strong rival", "Largest overlap"]);
    }

    #[test]
    fn test_fallback_with_zero_lead_is_headlined_as_level() {
        let rows = vec![
            CompetitorRow::new("Walmart", 100_000.0, 0.0),
            CompetitorRow::new("Target", 80_000.0, -0.05),
            CompetitorRow::new("Kroger", 10_000.0, -0.30),
        ];
        let result = select(&rows);
        assert!(result.from_fallback);
        assert_eq!(result.insight.entity_name, "Walmart");
        assert_eq!(result.quadrant, Some(CompetitorQuadrant::Stronghold));
        assert_eq!(result.insight.title, "Level overlap");
        assert_eq!(
            result.insight.text,
            "<strong>Walmart</strong> is where you overlap most with <strong>Rivalco</strong> (<strong>100.0K</strong> category views); the two of you are level."
        );
        assert_eq!(result.insight.tags, vec!["Your stronghold", "Largest overlap", "Level"]);
    }

    #[test]
    fn test_empty_rows() {
        let result = select(&[]);
        assert_eq!(result.insight.title, "No data");
        assert_eq!(result.insight.text, "Not enough retailer overlap to compare.");
        assert!(result.quadrant.is_none());
    }

    #[test]
    fn test_small_retailers_not_headlined() {
        let rows = vec![
            CompetitorRow::new("Corner", 400.0, 0.9),
            CompetitorRow::new("Target", 20_000.0, 0.0),
        ];
        let result = select(&rows);
        assert_eq!(result.insight.entity_name, "Target");
        assert!(!result.points[0].in_pool);
    }

    #[test]
    fn test_lead_is_clamped() {
        let result = select(&[CompetitorRow::new("Target", 20_000.0, 3.0)]);
        assert_eq!(result.points[0].competitor_lead, 1.0);
        assert!(result.insight.text.contains("<strong>100pp</strong>"));
    }

    #[test]
    fn test_blank_competitor_name_defaults() {
        assert_eq!(CompetitorLandscape::new("  ").competitor(), "Competitor");
    }

    #[test]
    fn test_lead_from_shares() {
        assert!((lead_from_shares(0.35, 0.20) - 0.15).abs() < 1e-9);
        assert!((lead_from_shares(1.4, 0.0) - 1.0).abs() < 1e-9);
    }
}
