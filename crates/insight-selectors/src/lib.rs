//! Insight Selectors
//!
//! Five selectors, one per dashboard panel. Each takes a batch of
//! already-aggregated rows and picks exactly one entity to headline, walking
//! a priority-ordered list of rules and ending in an unconditional fallback.

pub mod channel_opportunity;
pub mod competitor_landscape;
pub mod retailer_growth;
pub mod retailer_mix;
pub mod retailer_performance;

#[cfg(test)]
mod tests;

pub use channel_opportunity::{ChannelInsight, ChannelOpportunity};
pub use competitor_landscape::{
    CompetitorConfig, CompetitorInsight, CompetitorLandscape, CompetitorPoint, CompetitorQuadrant,
    CompetitorRow, lead_from_shares,
};
pub use retailer_growth::{GrowthConfig, GrowthInsight, GrowthKind, RetailerGrowth, RetailerTrend, TrendSummary};
pub use retailer_mix::{MixConfig, MixInsight, MixKind, MixRow, MixShare, RetailerMix};
pub use retailer_performance::{
    PerformanceConfig, PerformanceInsight, PerformancePoint, PerformanceQuadrant, PerformanceRow,
    RetailerPerformance,
};
