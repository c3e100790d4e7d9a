use serde::{Deserialize, Serialize};

use channel_scorer::DemandPoint;
use insight_selectors::{CompetitorRow, MixRow, PerformanceRow, RetailerTrend, lead_from_shares};

use crate::rng::{scenario_id, ScenarioRng};

pub const RETAILERS: &[&str] = &[
    "Amazon", "Walmart", "Target", "Best Buy", "Costco", "Kroger", "Home Depot", "Walgreens",
    "CVS", "Lowe's", "Kohl's", "Macy's", "Wayfair", "Chewy", "Ulta", "Sephora",
];

/// Parameters of one synthetic batch. Every generator draws from its own
/// named stream, so the batches are independent of each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub seed: u64,
    pub retailers: usize,
    pub weeks: usize,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            seed: 42,
            retailers: 12,
            weeks: 8,
        }
    }
}

impl Scenario {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn with_retailers(mut self, retailers: usize) -> Self {
        self.retailers = retailers;
        self
    }

    pub fn with_weeks(mut self, weeks: usize) -> Self {
        self.weeks = weeks;
        self
    }

    pub fn id(&self) -> String {
        scenario_id(self.seed)
    }

    fn rng(&self, stream: &str) -> ScenarioRng {
        ScenarioRng::new(self.seed, stream)
    }

    /// Retailer names; past the built-in list they are numbered.
    pub fn retailer_names(&self) -> Vec<String> {
        (0..self.retailers)
            .map(|i| match RETAILERS.get(i) {
                Some(name) => name.to_string(),
                None => format!("Retailer {}", i + 1),
            })
            .collect()
    }

    pub fn channel_points(&self) -> Vec<DemandPoint> {
        let mut rng = self.rng("channel");
        self.retailer_names()
            .into_iter()
            .map(|name| {
                let demand = rng.log_range(2.5, 5.5).round();
                let presence = if rng.chance(0.25) { 0.0 } else { rng.range(0.0, 0.35) };
                let mut point = DemandPoint::new(name, demand, presence);
                point.size = demand;
                point
            })
            .collect()
    }

    pub fn competitor_rows(&self) -> Vec<CompetitorRow> {
        let mut rng = self.rng("competitor");
        self.retailer_names()
            .into_iter()
            .map(|name| {
                let overlap = rng.log_range(2.5, 5.5).round();
                let competitor_share = rng.range(0.05, 0.35);
                let your_share = rng.range(0.05, 0.35);
                CompetitorRow::new(name, overlap, lead_from_shares(competitor_share, your_share))
            })
            .collect()
    }

    pub fn performance_rows(&self) -> Vec<PerformanceRow> {
        let mut rng = self.rng("performance");
        self.retailer_names()
            .into_iter()
            .map(|name| {
                let views = rng.log_range(2.5, 6.0).round();
                let growth = (rng.range(-15.0, 15.0) * 10.0).round() / 10.0;
                PerformanceRow::new(name, views, growth)
            })
            .collect()
    }

    pub fn retailer_trends(&self) -> Vec<RetailerTrend> {
        let mut rng = self.rng("growth");
        self.retailer_names()
            .into_iter()
            .map(|name| {
                let level = rng.log_range(1.5, 4.0);
                let current = series(&mut rng, level, self.weeks);
                let prev_level = level * rng.range(0.8, 1.2);
                let previous_period = series(&mut rng, prev_level, self.weeks);
                let year_level = level * rng.range(0.7, 1.3);
                let previous_year = series(&mut rng, year_level, self.weeks);
                RetailerTrend::new(name, current, previous_period, previous_year)
            })
            .collect()
    }

    pub fn mix_rows(&self) -> Vec<MixRow> {
        let mut rng = self.rng("mix");
        self.retailer_names()
            .into_iter()
            .map(|name| {
                let mut now = rng.log_range(1.5, 4.5).round();
                let mut prev = (now * rng.range(0.7, 1.3)).round();
                let year = (now * rng.range(0.6, 1.4)).round();
                if rng.chance(0.08) {
                    prev = 0.0;
                } else if rng.chance(0.08) {
                    now = 0.0;
                }
                MixRow::new(name, now, prev, year)
            })
            .collect()
    }
}

/// Noisy linear series starting at `level`
fn series(rng: &mut ScenarioRng, level: f64, weeks: usize) -> Vec<f64> {
    let slope = rng.range(-0.08, 0.08);
    (0..weeks)
        .map(|w| {
            let trend = level * (1.0 + slope * w as f64);
            (trend * rng.range(0.95, 1.05)).max(0.0).round()
        })
        .collect()
}
