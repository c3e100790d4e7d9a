//! Hash-based deterministic stream.
//!
//! Each draw hashes `seed:stream:counter` with SHA-256 and reads the first
//! eight bytes, so a named stream yields the same values on every platform
//! and adding draws to one stream never shifts another.

use sha2::{Digest, Sha256};

#[derive(Debug, Clone)]
pub struct ScenarioRng {
    seed: u64,
    stream: String,
    counter: u64,
}

impl ScenarioRng {
    pub fn new(seed: u64, stream: impl Into<String>) -> Self {
        Self {
            seed,
            stream: stream.into(),
            counter: 0,
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let digest = Sha256::digest(format!("{}:{}:{}", self.seed, self.stream, self.counter).as_bytes());
        self.counter += 1;
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        u64::from_be_bytes(bytes)
    }

    /// Uniform in [0, 1)
    pub fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in [lo, hi)
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.unit()
    }

    /// Log-uniform between 10^lo_exp and 10^hi_exp
    pub fn log_range(&mut self, lo_exp: f64, hi_exp: f64) -> f64 {
        10f64.powf(self.range(lo_exp, hi_exp))
    }

    pub fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }
}

/// Short hex id for a seed, printed next to reports.
pub fn scenario_id(seed: u64) -> String {
    let digest = Sha256::digest(seed.to_be_bytes());
    hex::encode(&digest[..6])
}
