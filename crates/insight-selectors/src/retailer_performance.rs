//! Retailer Performance
//!
//! Views vs. year-over-year growth per retailer. Growth is in percentage
//! points (`6.2` means +6.2% YoY).

use serde::{Deserialize, Serialize};

use insight_core::error::{check_non_negative, check_unit_interval};
use insight_core::format::{abbr, ordinal, signed_pp, strong};
use insight_core::stats::{desc, non_negative, percentile};
use insight_core::{Explained, FloorMask, Insight, InsightError, InsightSelector, PriorityTiers, TierHit};

const NAME: &str = "retailer_performance";

/// Views/growth quadrant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PerformanceQuadrant {
    #[serde(rename = "Growth engine")]
    GrowthEngine,
    #[serde(rename = "At risk")]
    AtRisk,
    #[serde(rename = "Rising")]
    Rising,
    #[serde(rename = "Lagging")]
    Lagging,
}

impl PerformanceQuadrant {
    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceQuadrant::GrowthEngine => "Growth engine",
            PerformanceQuadrant::AtRisk => "At risk",
            PerformanceQuadrant::Rising => "Rising",
            PerformanceQuadrant::Lagging => "Lagging",
        }
    }

    pub fn classify(views: f64, growth_pp: f64, threshold: f64) -> Self {
        match (views >= threshold, growth_pp >= 0.0) {
            (true, true) => PerformanceQuadrant::GrowthEngine,
            (true, false) => PerformanceQuadrant::AtRisk,
            (false, true) => PerformanceQuadrant::Rising,
            (false, false) => PerformanceQuadrant::Lagging,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRow {
    pub retailer: String,
    /// Total product views at the retailer
    pub views: f64,
    /// Year-over-year growth in percentage points
    pub yoy_growth_pp: f64,
    #[serde(default)]
    pub size: f64,
}

impl PerformanceRow {
    pub fn new(retailer: impl Into<String>, views: f64, yoy_growth_pp: f64) -> Self {
        Self {
            retailer: retailer.into(),
            views,
            yoy_growth_pp,
            size: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformancePoint {
    pub retailer: String,
    pub views: f64,
    pub yoy_growth_pp: f64,
    pub size: f64,
    /// 1-based rank by views within the pool; 0 when outside it
    pub views_rank: usize,
    pub quadrant: PerformanceQuadrant,
    pub in_pool: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceConfig {
    pub high_views_percentile: f64,
    /// Growth magnitude (pp) that counts as a real move
    pub growth_threshold_pp: f64,
    pub min_views: f64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            high_views_percentile: 0.70,
            growth_threshold_pp: 5.0,
            min_views: 1000.0,
        }
    }
}

impl PerformanceConfig {
    pub fn validate(&self) -> Result<(), InsightError> {
        check_unit_interval("high_views_percentile", self.high_views_percentile)?;
        check_non_negative("growth_threshold_pp", self.growth_threshold_pp)?;
        check_non_negative("min_views", self.min_views)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceInsight {
    pub insight: Insight,
    pub quadrant: Option<PerformanceQuadrant>,
    pub from_fallback: bool,
    pub x_threshold: f64,
    pub points: Vec<PerformancePoint>,
}

impl Explained for PerformanceInsight {
    fn insight(&self) -> &Insight {
        &self.insight
    }
}

#[derive(Debug, Clone, Default)]
pub struct RetailerPerformance {
    config: PerformanceConfig,
}

impl RetailerPerformance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PerformanceConfig) -> Self {
        Self { config }
    }
}

fn rank_phrase(rank: usize) -> String {
    if rank <= 1 {
        "largest".to_string()
    } else {
        format!("{}-largest", ordinal(rank))
    }
}

fn render(point: &PerformancePoint, quadrant: PerformanceQuadrant, fallback: bool) -> Insight {
    let retailer = strong(&point.retailer);
    let views = strong(abbr(point.views));
    let growth = strong(signed_pp(point.yoy_growth_pp));
    let label = quadrant.as_str();

    if fallback {
        return Insight::new(
            &point.retailer,
            label,
            format!(
                "{} is your {} retailer with {} views, {} YoY.",
                retailer,
                rank_phrase(point.views_rank),
                views,
                growth
            ),
            vec![label.to_string(), "Largest retailer".to_string()],
        );
    }

    let (text, tags) = match quadrant {
        PerformanceQuadrant::GrowthEngine => (
            format!("{} is driving growth: {} views, {} YoY.", retailer, views, growth),
            ["High views", "Growing"],
        ),
        PerformanceQuadrant::AtRisk => (
            format!(
                "{}, your {} retailer by views ({}), is down {} YoY.",
                retailer,
                rank_phrase(point.views_rank),
                views,
                strong(format!("{:.1}pp", point.yoy_growth_pp.abs()))
            ),
            ["High views", "Declining"],
        ),
        PerformanceQuadrant::Rising => (
            format!(
                "{} is small ({} views) but growing fast at {} YoY.",
                retailer, views, growth
            ),
            ["Low views", "Growing"],
        ),
        PerformanceQuadrant::Lagging => (
            format!("{} is small ({} views) and shrinking at {} YoY.", retailer, views, growth),
            ["Low views", "Declining"],
        ),
    };
    let mut all_tags = vec![label.to_string()];
    all_tags.extend(tags.iter().map(|t| t.to_string()));
    Insight::new(&point.retailer, label, text, all_tags)
}

impl InsightSelector for RetailerPerformance {
    type Row = PerformanceRow;
    type Output = PerformanceInsight;

    fn name(&self) -> &'static str {
        NAME
    }

    fn select(&self, rows: &[PerformanceRow]) -> PerformanceInsight {
        if rows.is_empty() {
            return PerformanceInsight {
                insight: Insight::no_data("retailer performance"),
                quadrant: None,
                from_fallback: false,
                x_threshold: 0.0,
                points: Vec::new(),
            };
        }
        let cfg = &self.config;

        let views: Vec<f64> = rows.iter().map(|r| non_negative(r.views)).collect();
        let mask = FloorMask::new(&views, cfg.min_views, NAME);
        let pooled_views = mask.select(&views);
        let x_threshold = percentile(&pooled_views, cfg.high_views_percentile);
        tracing::trace!(x_threshold, "performance thresholds");

        let points: Vec<PerformancePoint> = rows
            .iter()
            .zip(views.iter())
            .enumerate()
            .map(|(i, (row, &v))| {
                let growth = if row.yoy_growth_pp.is_finite() { row.yoy_growth_pp } else { 0.0 };
                let in_pool = mask.contains(i);
                let views_rank = if in_pool {
                    1 + pooled_views.iter().filter(|&&other| other > v).count()
                } else {
                    0
                };
                PerformancePoint {
                    retailer: row.retailer.clone(),
                    views: v,
                    yoy_growth_pp: growth,
                    size: non_negative(row.size),
                    views_rank,
                    quadrant: PerformanceQuadrant::classify(v, growth, x_threshold),
                    in_pool,
                }
            })
            .collect();
        let pool = mask.select(&points);

        let threshold = cfg.growth_threshold_pp;
        let high = move |p: &PerformancePoint| p.views >= x_threshold;
        let tiers = PriorityTiers::new(NAME)
            .tier(
                PerformanceQuadrant::GrowthEngine,
                move |p: &PerformancePoint| high(p) && p.yoy_growth_pp >= threshold,
                |a: &PerformancePoint, b: &PerformancePoint| {
                    desc(
                        a.views * (a.yoy_growth_pp / 100.0).max(0.0),
                        b.views * (b.yoy_growth_pp / 100.0).max(0.0),
                    )
                },
                |p: &PerformancePoint| render(p, PerformanceQuadrant::GrowthEngine, false),
            )
            .tier(
                PerformanceQuadrant::AtRisk,
                move |p: &PerformancePoint| high(p) && p.yoy_growth_pp <= -threshold,
                |a: &PerformancePoint, b: &PerformancePoint| desc(a.views, b.views),
                |p: &PerformancePoint| render(p, PerformanceQuadrant::AtRisk, false),
            )
            .tier(
                PerformanceQuadrant::Rising,
                move |p: &PerformancePoint| !high(p) && p.yoy_growth_pp >= threshold,
                |a: &PerformancePoint, b: &PerformancePoint| desc(a.yoy_growth_pp, b.yoy_growth_pp),
                |p: &PerformancePoint| render(p, PerformanceQuadrant::Rising, false),
            )
            .fallback(
                |a: &PerformancePoint, b: &PerformancePoint| desc(a.views, b.views),
                |p: &PerformancePoint| render(p, p.quadrant, true),
            );

        let (insight, quadrant, from_fallback) = match tiers.resolve(&pool) {
            Some(resolved) => {
                let quadrant = match resolved.hit {
                    TierHit::Tier(q) => q,
                    TierHit::Fallback => resolved.entity.quadrant,
                };
                (resolved.insight, Some(quadrant), resolved.hit.is_fallback())
            }
            None => (Insight::no_data("retailer performance"), None, false),
        };

        PerformanceInsight {
            insight,
            quadrant,
            from_fallback,
            x_threshold,
            points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<PerformanceRow> {
        vec![
            PerformanceRow::new("Amazon", 500_000.0, 8.0),
            PerformanceRow::new("Walmart", 400_000.0, 20.0),
            PerformanceRow::new("Target", 450_000.0, -9.0),
            PerformanceRow::new("Kroger", 50_000.0, 30.0),
            PerformanceRow::new("Costco", 60_000.0, 2.0),
        ]
    }

    #[test]
    fn test_growth_engine_weighted_by_views() {
        // threshold = 400k + 0.8 * 50k = 440k: Amazon and Target are high
        let result = RetailerPerformance::new().select(&rows());
        assert_eq!(result.quadrant, Some(PerformanceQuadrant::GrowthEngine));
        assert_eq!(result.insight.entity_name, "Amazon");
        assert_eq!(
            result.insight.text,
            "<strong>Amazon</strong> is driving growth: <strong>500.0K</strong> views, <strong>+8.0pp</strong> YoY."
        );
        assert_eq!(result.insight.tags, vec!["Growth engine", "High views", "Growing"]);
    }

    #[test]
    fn test_at_risk_reports_drop_size_and_rank() {
        let cfg = PerformanceConfig {
            high_views_percentile: 0.5,
            ..PerformanceConfig::default()
        };
        let mut rows = rows();
        rows[0].yoy_growth_pp = 1.0;
        rows[1].yoy_growth_pp = -6.0;
        let result = RetailerPerformance::with_config(cfg).select(&rows);
        // threshold = 400k: Amazon, Target, Walmart high; Target is the larger decliner
        assert_eq!(result.quadrant, Some(PerformanceQuadrant::AtRisk));
        assert_eq!(result.insight.entity_name, "Target");
        assert_eq!(
            result.insight.text,
            "<strong>Target</strong>, your 2nd-largest retailer by views (<strong>450.0K</strong>), is down <strong>9.0pp</strong> YoY."
        );
    }

    #[test]
    fn test_rising_ranked_by_growth() {
        let mut rows = rows();
        rows[0].yoy_growth_pp = 0.0;
        rows[2].yoy_growth_pp = -2.0;
        let result = RetailerPerformance::new().select(&rows);
        assert_eq!(result.quadrant, Some(PerformanceQuadrant::Rising));
        assert_eq!(result.insight.entity_name, "Kroger");
        assert_eq!(result.insight.title, "Rising");
    }

    #[test]
    fn test_flat_growth_reaches_fallback() {
        let rows: Vec<PerformanceRow> = ["A", "B", "C"]
            .iter()
            .enumerate()
            .map(|(i, name)| PerformanceRow::new(*name, 10_000.0 * (i as f64 + 1.0), 0.0))
            .collect();
        let result = RetailerPerformance::new().select(&rows);
        assert!(result.from_fallback);
        assert_eq!(result.insight.entity_name, "C");
        assert_eq!(result.quadrant, Some(PerformanceQuadrant::GrowthEngine));
        assert_eq!(
            result.insight.text,
            "<strong>C</strong> is your largest retailer with <strong>30.0K</strong> views, <strong>0pp</strong> YoY."
        );
    }

    #[test]
    fn test_views_rank_counts_pool_only() {
        let rows = vec![
            PerformanceRow::new("Tiny", 10.0, 50.0),
            PerformanceRow::new("A", 20_000.0, 0.0),
            PerformanceRow::new("B", 30_000.0, 0.0),
        ];
        let result = RetailerPerformance::new().select(&rows);
        let ranks: Vec<usize> = result.points.iter().map(|p| p.views_rank).collect();
        assert_eq!(ranks, vec![0, 2, 1]);
        assert_ne!(result.insight.entity_name, "Tiny");
    }

    #[test]
    fn test_empty_rows() {
        let result = RetailerPerformance::new().select(&[]);
        assert_eq!(result.insight.text, "Not enough retailer performance to compare.");
    }
}
