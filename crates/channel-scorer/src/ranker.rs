//! Opportunity Ranking
//!
//! Orders the opportunity quadrant by addressable volume.

use std::cmp::Ordering;

use insight_core::stats::desc;

use crate::models::{ChannelQuadrant, ScoredPoint};

/// Best-first order: potential (missing counts as -1), then score, then demand.
pub fn opportunity_order(a: &ScoredPoint, b: &ScoredPoint) -> Ordering {
    desc(a.potential.unwrap_or(-1.0), b.potential.unwrap_or(-1.0))
        .then_with(|| desc(a.score, b.score))
        .then_with(|| desc(a.demand, b.demand))
}

/// Opportunity-quadrant points, best first. Other quadrants are dropped.
pub fn rank_opportunities(scored: &[ScoredPoint]) -> Vec<ScoredPoint> {
    let mut ranked: Vec<ScoredPoint> = scored
        .iter()
        .filter(|p| p.quadrant == ChannelQuadrant::Opportunity)
        .cloned()
        .collect();

    // Stable, so exact ties keep input order
    ranked.sort_by(opportunity_order);
    ranked
}
