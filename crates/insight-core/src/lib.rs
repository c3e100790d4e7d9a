//! Insight Core
//!
//! Shared building blocks for the insight-selection engine: the `Insight`
//! record, statistics primitives, display formatters and the priority-tier
//! resolver every selector is built on.

pub mod error;
pub mod format;
pub mod pool;
pub mod stats;
pub mod tiers;
pub mod traits;
pub mod types;

pub use error::*;
pub use pool::FloorMask;
pub use tiers::{PriorityTiers, Resolved, TierHit};
pub use traits::*;
pub use types::*;
