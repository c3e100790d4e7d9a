use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

use insight_core::error::{check_non_negative, check_unit_interval};
use insight_core::ComparisonMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    // Scenario
    pub seed: u64,            // INSIGHT_SEED
    pub retailers: usize,     // INSIGHT_RETAILERS
    pub weeks: usize,         // INSIGHT_WEEKS

    // Selectors
    pub mode: ComparisonMode, // INSIGHT_MODE, pop | yoy
    pub competitor: String,   // INSIGHT_COMPETITOR
    pub high_percentile: f64, // INSIGHT_HIGH_PERCENTILE, shared by the quadrant selectors
    pub min_volume: Option<f64>, // INSIGHT_MIN_VOLUME, overrides every selector's floor

    // Output
    pub json: bool,
}

impl ReportConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let config = Self {
            seed: var("INSIGHT_SEED", "42")
                .parse()
                .context("INSIGHT_SEED must be an unsigned integer")?,
            retailers: var("INSIGHT_RETAILERS", "12")
                .parse()
                .context("INSIGHT_RETAILERS must be an unsigned integer")?,
            weeks: var("INSIGHT_WEEKS", "8")
                .parse()
                .context("INSIGHT_WEEKS must be an unsigned integer")?,

            mode: var("INSIGHT_MODE", "pop").parse()?,
            competitor: var("INSIGHT_COMPETITOR", "Rival Co"),
            high_percentile: var("INSIGHT_HIGH_PERCENTILE", "0.70")
                .parse()
                .context("INSIGHT_HIGH_PERCENTILE must be a number")?,
            min_volume: get("INSIGHT_MIN_VOLUME")
                .map(|v| v.parse::<f64>())
                .transpose()
                .context("INSIGHT_MIN_VOLUME must be a number")?,

            json: false,
        };

        config.validate()?;
        Ok(config)
    }

    /// Command-line flags win over the environment.
    pub fn apply_args(&mut self, args: &[String]) -> Result<()> {
        if let Some(v) = flag_value(args, "--seed") {
            self.seed = v.parse().with_context(|| format!("invalid --seed '{}'", v))?;
        }
        if let Some(v) = flag_value(args, "--mode") {
            self.mode = v.parse()?;
        }
        if let Some(v) = flag_value(args, "--competitor") {
            self.competitor = v.to_string();
        }
        if args.iter().any(|a| a == "--json") {
            self.json = true;
        }
        self.validate()
    }

    fn validate(&self) -> Result<()> {
        if self.retailers == 0 {
            bail!("INSIGHT_RETAILERS must be at least 1");
        }
        if self.weeks < 2 {
            bail!("INSIGHT_WEEKS must be at least 2, got {}", self.weeks);
        }
        check_unit_interval("INSIGHT_HIGH_PERCENTILE", self.high_percentile)?;
        if let Some(v) = self.min_volume {
            check_non_negative("INSIGHT_MIN_VOLUME", v)?;
        }
        Ok(())
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}
