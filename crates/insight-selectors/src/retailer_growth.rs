//! Retailer Growth
//!
//! Compares each retailer's current view series with a baseline series
//! (previous period or same period last year) and headlines a reversal,
//! the strongest gainer, or the steepest decline.

use serde::{Deserialize, Serialize};

use insight_core::error::{check_non_negative, check_unit_interval};
use insight_core::format::{abbr, growth_pct, share_pct, strong};
use insight_core::stats::{asc, desc, direction, non_negative, safe_ratio};
use insight_core::{
    ComparisonMode, Explained, FloorMask, Insight, InsightError, InsightSelector, PriorityTiers, TierHit,
};

const NAME: &str = "retailer_growth";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrowthKind {
    Reversal,
    Momentum,
    Decline,
}

impl GrowthKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrowthKind::Reversal => "REVERSAL",
            GrowthKind::Momentum => "MOMENTUM",
            GrowthKind::Decline => "DECLINE",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            GrowthKind::Reversal => "Trend reversal",
            GrowthKind::Momentum => "Momentum",
            GrowthKind::Decline => "Decline",
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            GrowthKind::Reversal => "Reversal",
            GrowthKind::Momentum => "Momentum",
            GrowthKind::Decline => "Decline",
        }
    }
}

/// Weekly (or daily) views for one retailer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetailerTrend {
    pub retailer: String,
    pub current: Vec<f64>,
    #[serde(default)]
    pub previous_period: Vec<f64>,
    #[serde(default)]
    pub previous_year: Vec<f64>,
}

impl RetailerTrend {
    pub fn new(retailer: impl Into<String>, current: Vec<f64>, previous_period: Vec<f64>, previous_year: Vec<f64>) -> Self {
        Self {
            retailer: retailer.into(),
            current,
            previous_period,
            previous_year,
        }
    }

    pub fn baseline(&self, mode: ComparisonMode) -> &[f64] {
        match mode {
            ComparisonMode::Pop => &self.previous_period,
            ComparisonMode::Yoy => &self.previous_year,
        }
    }
}

/// Per-retailer comparison, as drawn by the trend chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub retailer: String,
    pub current_total: f64,
    pub previous_total: f64,
    /// Decimal growth of the totals; 0 without a positive baseline
    pub growth: f64,
    /// Sign of last-minus-first in the current series
    pub current_direction: i8,
    /// Sign of last-minus-first in the baseline series
    pub previous_direction: i8,
    pub reversed: bool,
    pub in_pool: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthConfig {
    /// Decimal growth that counts as a move, period over period
    pub pop_threshold: f64,
    /// Decimal growth that counts as a move, year over year
    pub yoy_threshold: f64,
    /// Retailers below this total (current or baseline) are not headlined
    pub min_volume: f64,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            pop_threshold: 0.02,
            yoy_threshold: 0.03,
            min_volume: 100.0,
        }
    }
}

impl GrowthConfig {
    pub fn threshold(&self, mode: ComparisonMode) -> f64 {
        match mode {
            ComparisonMode::Pop => self.pop_threshold,
            ComparisonMode::Yoy => self.yoy_threshold,
        }
    }

    pub fn validate(&self) -> Result<(), InsightError> {
        check_unit_interval("pop_threshold", self.pop_threshold)?;
        check_unit_interval("yoy_threshold", self.yoy_threshold)?;
        check_non_negative("min_volume", self.min_volume)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthInsight {
    pub insight: Insight,
    #[serde(rename = "type")]
    pub kind: Option<GrowthKind>,
    /// Headlined retailer; empty for empty input
    pub retailer: String,
    pub growth: f64,
    pub mode: ComparisonMode,
    pub from_fallback: bool,
    pub trends: Vec<TrendSummary>,
}

impl Explained for GrowthInsight {
    fn insight(&self) -> &Insight {
        &self.insight
    }
}

#[derive(Debug, Clone, Default)]
pub struct RetailerGrowth {
    config: GrowthConfig,
    mode: ComparisonMode,
}

impl RetailerGrowth {
    pub fn new(mode: ComparisonMode) -> Self {
        Self::with_config(mode, GrowthConfig::default())
    }

    pub fn with_config(mode: ComparisonMode, config: GrowthConfig) -> Self {
        Self { config, mode }
    }

    pub fn mode(&self) -> ComparisonMode {
        self.mode
    }

    fn summarize(&self, trend: &RetailerTrend) -> TrendSummary {
        let current: Vec<f64> = trend.current.iter().map(|v| non_negative(*v)).collect();
        let previous: Vec<f64> = trend.baseline(self.mode).iter().map(|v| non_negative(*v)).collect();
        let current_total: f64 = current.iter().sum();
        let previous_total: f64 = previous.iter().sum();
        let current_direction = direction(&current);
        let previous_direction = direction(&previous);

        TrendSummary {
            retailer: trend.retailer.clone(),
            current_total,
            previous_total,
            growth: safe_ratio(current_total - previous_total, previous_total),
            current_direction,
            previous_direction,
            reversed: current_direction != 0 && previous_direction != 0 && current_direction != previous_direction,
            in_pool: false,
        }
    }

    fn render(&self, summary: &TrendSummary, kind: GrowthKind, fallback: bool) -> Insight {
        let retailer = strong(&summary.retailer);
        let growth = strong(growth_pct(summary.growth));
        let views = strong(abbr(summary.current_total));
        let phrase = self.mode.phrase();
        let mut tags = vec![kind.tag().to_string(), self.mode.tag().to_string()];

        let text = if fallback {
            tags.push("Below threshold".to_string());
            format!(
                "{} moved the most, {} {}, though below the {} alert level.",
                retailer,
                growth,
                phrase,
                strong(share_pct(self.config.threshold(self.mode)))
            )
        } else {
            match kind {
                GrowthKind::Reversal => {
                    let baseline = match self.mode {
                        ComparisonMode::Pop => "the previous period",
                        ComparisonMode::Yoy => "the same period last year",
                    };
                    let (was, now, turn) = if summary.current_direction > 0 {
                        ("falling", "rising", "Turned up")
                    } else {
                        ("rising", "falling", "Turned down")
                    };
                    tags.push(turn.to_string());
                    format!(
                        "{} reversed course: views were {} in {} and are now {} ({} {}).",
                        retailer, was, baseline, now, growth, phrase
                    )
                }
                GrowthKind::Momentum => format!(
                    "{} is gaining momentum with {} views, {} {}.",
                    retailer, views, growth, phrase
                ),
                GrowthKind::Decline => format!(
                    "{} is slipping: {} views, {} {}.",
                    retailer, views, growth, phrase
                ),
            }
        };

        Insight::new(&summary.retailer, kind.title(), text, tags)
    }
}

fn fallback_kind(summary: &TrendSummary) -> GrowthKind {
    if summary.growth >= 0.0 {
        GrowthKind::Momentum
    } else {
        GrowthKind::Decline
    }
}

impl InsightSelector for RetailerGrowth {
    type Row = RetailerTrend;
    type Output = GrowthInsight;

    fn name(&self) -> &'static str {
        NAME
    }

    fn select(&self, rows: &[RetailerTrend]) -> GrowthInsight {
        if rows.is_empty() {
            return GrowthInsight {
                insight: Insight::no_data("retailer trends"),
                kind: None,
                retailer: String::new(),
                growth: 0.0,
                mode: self.mode,
                from_fallback: false,
                trends: Vec::new(),
            };
        }

        let mut trends: Vec<TrendSummary> = rows.iter().map(|t| self.summarize(t)).collect();
        let volumes: Vec<f64> = trends.iter().map(|t| t.current_total.max(t.previous_total)).collect();
        let mask = FloorMask::new(&volumes, self.config.min_volume, NAME);
        for (i, t) in trends.iter_mut().enumerate() {
            t.in_pool = mask.contains(i);
        }
        let pool = mask.select(&trends);

        let threshold = self.config.threshold(self.mode);
        tracing::trace!(threshold, mode = %self.mode, pooled = pool.len(), "growth thresholds");
        let tiers = PriorityTiers::new(NAME)
            .tier(
                GrowthKind::Reversal,
                |t: &TrendSummary| t.reversed,
                |a: &TrendSummary, b: &TrendSummary| desc(a.growth.abs(), b.growth.abs()),
                |t: &TrendSummary| self.render(t, GrowthKind::Reversal, false),
            )
            .tier(
                GrowthKind::Momentum,
                move |t: &TrendSummary| t.growth >= threshold,
                |a: &TrendSummary, b: &TrendSummary| desc(a.growth, b.growth),
                |t: &TrendSummary| self.render(t, GrowthKind::Momentum, false),
            )
            .tier(
                GrowthKind::Decline,
                move |t: &TrendSummary| t.growth <= -threshold,
                |a: &TrendSummary, b: &TrendSummary| asc(a.growth, b.growth),
                |t: &TrendSummary| self.render(t, GrowthKind::Decline, false),
            )
            .fallback(
                |a: &TrendSummary, b: &TrendSummary| desc(a.growth.abs(), b.growth.abs()),
                |t: &TrendSummary| self.render(t, fallback_kind(t), true),
            );

        match tiers.resolve(&pool) {
            Some(resolved) => {
                let kind = match resolved.hit {
                    TierHit::Tier(k) => k,
                    TierHit::Fallback => fallback_kind(resolved.entity),
                };
                GrowthInsight {
                    retailer: resolved.entity.retailer.clone(),
                    growth: resolved.entity.growth,
                    insight: resolved.insight,
                    kind: Some(kind),
                    mode: self.mode,
                    from_fallback: resolved.hit.is_fallback(),
                    trends,
                }
            }
            None => GrowthInsight {
                insight: Insight::no_data("retailer trends"),
                kind: None,
                retailer: String::new(),
                growth: 0.0,
                mode: self.mode,
                from_fallback: false,
                trends,
            },
        }
    }
}
