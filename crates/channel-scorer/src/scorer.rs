//! Quadrant Scoring
//!
//! Places each retailer in a demand/presence quadrant. The demand threshold
//! is a percentile of the pooled demand, and the presence benchmark is the
//! peer median among pooled retailers where the brand is present at all.

use insight_core::stats::{clamp_share, median, non_negative, percentile};
use insight_core::FloorMask;

use crate::models::{ChannelQuadrant, DemandPoint, ScoredPoint, ScoredSet, ScoringConfig};

/// Scores and classifies demand points
#[derive(Debug, Clone, Default)]
pub struct QuadrantScorer {
    config: ScoringConfig,
}

impl QuadrantScorer {
    /// Create a scorer with default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scorer with custom thresholds
    pub fn with_config(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score every point. Points below the demand floor are kept in the
    /// output but left out of the thresholds, unless none clear the floor.
    pub fn score(&self, points: &[DemandPoint]) -> ScoredSet {
        let cfg = &self.config;

        let clamped: Vec<(f64, f64)> = points
            .iter()
            .map(|p| (non_negative(p.demand), clamp_share(p.presence, 1.0)))
            .collect();

        let demands: Vec<f64> = clamped.iter().map(|(d, _)| *d).collect();
        let mask = FloorMask::new(&demands, cfg.min_demand_floor, "channel_scorer");
        let in_pool = |i: usize| mask.contains(i);

        let pooled_demand: Vec<f64> = clamped
            .iter()
            .enumerate()
            .filter(|(i, _)| in_pool(*i))
            .map(|(_, (d, _))| *d)
            .collect();
        let x_threshold = percentile(&pooled_demand, cfg.high_demand_percentile);

        let present: Vec<f64> = clamped
            .iter()
            .enumerate()
            .filter(|(i, (_, s))| in_pool(*i) && *s > 0.0)
            .map(|(_, (_, s))| *s)
            .collect();
        let target_presence = if present.is_empty() {
            None
        } else {
            Some(median(&present))
        };

        tracing::trace!(x_threshold, ?target_presence, "channel thresholds");

        let scored = points
            .iter()
            .zip(clamped.iter())
            .enumerate()
            .map(|(i, (point, &(demand, presence)))| {
                let score = demand * (1.0 - presence.min(cfg.presence_cap_for_score));
                let potential = target_presence.map(|target| (demand * (target - presence)).max(0.0));
                ScoredPoint {
                    name: point.name.clone(),
                    demand,
                    presence,
                    size: non_negative(point.size),
                    score,
                    potential,
                    quadrant: ChannelQuadrant::classify(
                        demand,
                        presence,
                        x_threshold,
                        cfg.low_presence_threshold,
                    ),
                    in_pool: in_pool(i),
                }
            })
            .collect();

        ScoredSet {
            points: scored,
            x_threshold,
            low_presence_threshold: cfg.low_presence_threshold,
            target_presence,
            floor_waived: mask.waived,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_opportunity_and_over_indexed() {
        let set = QuadrantScorer::new().score(&[
            DemandPoint::new("A", 100_000.0, 0.0),
            DemandPoint::new("B", 50_000.0, 0.2),
        ]);

        assert_relative_eq!(set.x_threshold, 85_000.0, epsilon = 1e-6);
        assert_eq!(set.target_presence, Some(0.2));
        assert_eq!(set.points[0].quadrant, ChannelQuadrant::Opportunity);
        assert_eq!(set.points[1].quadrant, ChannelQuadrant::OverIndexed);
        assert_relative_eq!(set.points[0].potential.unwrap(), 20_000.0, epsilon = 1e-6);
        assert_relative_eq!(set.points[1].potential.unwrap(), 0.0);
        assert_relative_eq!(set.points[0].score, 100_000.0);
        assert_relative_eq!(set.points[1].score, 40_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_score_caps_presence() {
        let set = QuadrantScorer::new().score(&[DemandPoint::new("Big", 10_000.0, 0.9)]);
        assert_relative_eq!(set.points[0].score, 7_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_floor_excludes_noise_from_threshold() {
        let set = QuadrantScorer::new().score(&[
            DemandPoint::new("Tiny", 10.0, 0.0),
            DemandPoint::new("Mid", 20_000.0, 0.1),
            DemandPoint::new("Big", 40_000.0, 0.0),
        ]);
        assert!(!set.floor_waived);
        assert!(!set.points[0].in_pool);
        assert_relative_eq!(set.x_threshold, 34_000.0, epsilon = 1e-6);
        assert_eq!(set.pool().len(), 2);
    }

    #[test]
    fn test_floor_waived_when_everything_is_small() {
        let set = QuadrantScorer::new().score(&[
            DemandPoint::new("A", 300.0, 0.0),
            DemandPoint::new("B", 100.0, 0.2),
        ]);
        assert!(set.floor_waived);
        assert!(set.points.iter().all(|p| p.in_pool));
        assert_eq!(set.points[0].quadrant, ChannelQuadrant::Opportunity);
    }

    #[test]
    fn test_no_presence_leaves_target_undefined() {
        let set = QuadrantScorer::new().score(&[
            DemandPoint::new("A", 5_000.0, 0.0),
            DemandPoint::new("B", 8_000.0, 0.0),
        ]);
        assert_eq!(set.target_presence, None);
        assert!(set.points.iter().all(|p| p.potential.is_none()));
    }

    #[test]
    fn test_negative_inputs_are_clamped() {
        let set = QuadrantScorer::new().score(&[
            DemandPoint::new("Neg", -500.0, -0.3),
            DemandPoint::new("Pos", 2_000.0, 1.4),
        ]);
        assert_eq!(set.points[0].demand, 0.0);
        assert_eq!(set.points[0].presence, 0.0);
        assert_eq!(set.points[1].presence, 1.0);
    }

    #[test]
    fn test_quadrants_consistent_with_thresholds() {
        let points: Vec<DemandPoint> = (0..20)
            .map(|i| DemandPoint::new(format!("R{}", i), 1_000.0 * (i as f64 + 1.0), (i % 7) as f64 * 0.02))
            .collect();
        let set = QuadrantScorer::new().score(&points);
        for p in &set.points {
            let expected = ChannelQuadrant::classify(p.demand, p.presence, set.x_threshold, set.low_presence_threshold);
            assert_eq!(p.quadrant, expected, "{}", p.name);
        }
    }

    #[test]
    fn test_empty_input() {
        let set = QuadrantScorer::new().score(&[]);
        assert!(set.is_empty());
        assert_eq!(set.x_threshold, 0.0);
        assert!(!set.floor_waived);
    }
}
