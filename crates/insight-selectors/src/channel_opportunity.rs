//! Channel Opportunity
//!
//! Headlines the retailer with the most addressable demand where the brand is
//! under-represented, using the quadrant scorer and opportunity ranker.

use serde::{Deserialize, Serialize};

use channel_scorer::{
    opportunity_order, rank_opportunities, ChannelQuadrant, DemandPoint, QuadrantScorer, ScoredPoint,
    ScoredSet, ScoringConfig,
};
use insight_core::format::{abbr, share_pct, strong};
use insight_core::stats::desc;
use insight_core::{Explained, Insight, InsightSelector, PriorityTiers, TierHit};

const NAME: &str = "channel_opportunity";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelInsight {
    pub insight: Insight,
    pub quadrant: Option<ChannelQuadrant>,
    pub from_fallback: bool,
    /// All points with thresholds, for the quadrant chart
    pub scored: ScoredSet,
    /// Pooled opportunities, best first
    pub ranked: Vec<ScoredPoint>,
}

impl Explained for ChannelInsight {
    fn insight(&self) -> &Insight {
        &self.insight
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChannelOpportunity {
    scorer: QuadrantScorer,
}

impl ChannelOpportunity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ScoringConfig) -> Self {
        Self {
            scorer: QuadrantScorer::with_config(config),
        }
    }

    fn render(point: &ScoredPoint, target_presence: Option<f64>, fallback: bool) -> Insight {
        let retailer = strong(&point.name);
        let demand = strong(abbr(point.demand));
        let share = strong(share_pct(point.presence));
        let label = point.quadrant.as_str();

        match point.quadrant {
            ChannelQuadrant::Opportunity => {
                let mut text = format!(
                    "{} has {} weekly category demand but your share is only {}.",
                    retailer, demand, share
                );
                let mut tags = vec![label.to_string(), "High demand".to_string(), "Low share".to_string()];
                if let (Some(potential), Some(target)) = (point.potential, target_presence) {
                    text.push_str(&format!(
                        " Matching the peer median of {} would add about {} views a week.",
                        strong(share_pct(target)),
                        strong(abbr(potential))
                    ));
                    tags.push("Peer gap".to_string());
                }
                Insight::new(&point.name, label, text, tags)
            }
            ChannelQuadrant::Performing => Insight::new(
                &point.name,
                label,
                format!(
                    "{} is already performing: {} share of {} weekly category demand.",
                    retailer, share, demand
                ),
                vec![label.to_string(), "Highest score".to_string()],
            ),
            ChannelQuadrant::OverIndexed => Insight::new(
                &point.name,
                label,
                format!(
                    "{} gives you {} share of a smaller {} weekly category demand.",
                    retailer, share, demand
                ),
                vec![label.to_string(), "Highest score".to_string()],
            ),
            ChannelQuadrant::LowPriority => {
                let mut tags = vec![label.to_string()];
                if fallback {
                    tags.push("Highest score".to_string());
                }
                Insight::new(
                    &point.name,
                    label,
                    format!(
                        "{} has the highest opportunity score, with {} weekly category demand and {} share.",
                        retailer, demand, share
                    ),
                    tags,
                )
            }
        }
    }
}

impl InsightSelector for ChannelOpportunity {
    type Row = DemandPoint;
    type Output = ChannelInsight;

    fn name(&self) -> &'static str {
        NAME
    }

    fn select(&self, rows: &[DemandPoint]) -> ChannelInsight {
        let scored = self.scorer.score(rows);
        if scored.is_empty() {
            return ChannelInsight {
                insight: Insight::no_data("channel demand"),
                quadrant: None,
                from_fallback: false,
                scored,
                ranked: Vec::new(),
            };
        }

        let pool = scored.pool();
        let ranked = rank_opportunities(&pool);
        let target = scored.target_presence;

        let tiers = PriorityTiers::new(NAME)
            .tier(
                ChannelQuadrant::Opportunity,
                |p: &ScoredPoint| p.quadrant == ChannelQuadrant::Opportunity,
                opportunity_order,
                move |p: &ScoredPoint| Self::render(p, target, false),
            )
            .fallback(
                |a: &ScoredPoint, b: &ScoredPoint| desc(a.score, b.score),
                move |p: &ScoredPoint| Self::render(p, target, true),
            );

        let (insight, quadrant, from_fallback) = match tiers.resolve(&pool) {
            Some(resolved) => {
                let quadrant = match resolved.hit {
                    TierHit::Tier(q) => q,
                    TierHit::Fallback => resolved.entity.quadrant,
                };
                (resolved.insight, Some(quadrant), resolved.hit.is_fallback())
            }
            None => (Insight::no_data("channel demand"), None, false),
        };

        ChannelInsight {
            insight,
            quadrant,
            from_fallback,
            scored,
            ranked,
        }
    }
}
