//! Demo Data
//!
//! Seeded synthetic inputs for every selector, used by the report binary and
//! by the property sweeps in this crate's tests.

pub mod rng;
pub mod scenario;


pub use rng::{scenario_id, ScenarioRng};
pub use scenario::{Scenario, RETAILERS};
