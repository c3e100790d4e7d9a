//! Channel Scorer
//!
//! Classifies retailers into demand/presence quadrants and ranks the
//! opportunity quadrant by addressable volume.

pub mod models;
pub mod ranker;
pub mod scorer;

pub use models::{ChannelQuadrant, DemandPoint, ScoredPoint, ScoredSet, ScoringConfig};
pub use ranker::{opportunity_order, rank_opportunities};
pub use scorer::QuadrantScorer;
