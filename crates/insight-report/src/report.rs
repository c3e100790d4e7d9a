use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use channel_scorer::ScoringConfig;
use demo_data::Scenario;
use insight_core::{ComparisonMode, Explained, Insight, InsightSelector};
use insight_selectors::{
    ChannelOpportunity, CompetitorConfig, CompetitorLandscape, GrowthConfig, MixConfig, PerformanceConfig,
    RetailerGrowth, RetailerMix, RetailerPerformance,
};

use crate::config::ReportConfig;

/// One panel of the report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub selector: &'static str,
    pub insight: Insight,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub scenario_id: String,
    pub seed: u64,
    pub mode: ComparisonMode,
    pub competitor: String,
    pub generated_at: DateTime<Utc>,
    /// SHA-256 of the serialized sections; identical input gives an identical digest
    pub fingerprint: String,
    pub sections: Vec<Section>,
}

fn section<S: InsightSelector>(selector: &S, rows: &[S::Row]) -> Section {
    let output = selector.select(rows);
    let insight = output.insight().clone();
    tracing::info!(
        selector = selector.name(),
        entity = %insight.entity_name,
        title = %insight.title,
        "insight selected"
    );
    Section {
        selector: selector.name(),
        insight,
    }
}

pub fn fingerprint(sections: &[Section]) -> Result<String> {
    let bytes = serde_json::to_vec(sections).context("failed to serialize sections")?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

impl Report {
    pub fn build(config: &ReportConfig) -> Result<Self> {
        let scenario = Scenario::new(config.seed)
            .with_retailers(config.retailers)
            .with_weeks(config.weeks);

        let scoring = ScoringConfig::default();
        let scoring = ScoringConfig {
            high_demand_percentile: config.high_percentile,
            min_demand_floor: config.min_volume.unwrap_or(scoring.min_demand_floor),
            ..scoring
        };
        scoring.validate().context("invalid channel scoring config")?;

        let competitor = CompetitorConfig::default();
        let competitor = CompetitorConfig {
            high_overlap_percentile: config.high_percentile,
            min_overlap_views: config.min_volume.unwrap_or(competitor.min_overlap_views),
            ..competitor
        };
        competitor.validate().context("invalid competitor config")?;

        let performance = PerformanceConfig::default();
        let performance = PerformanceConfig {
            high_views_percentile: config.high_percentile,
            min_views: config.min_volume.unwrap_or(performance.min_views),
            ..performance
        };
        performance.validate().context("invalid performance config")?;

        let growth = GrowthConfig::default();
        let growth = GrowthConfig {
            min_volume: config.min_volume.unwrap_or(growth.min_volume),
            ..growth
        };
        growth.validate().context("invalid growth config")?;

        let mix = MixConfig::default();
        let mix = MixConfig {
            min_volume: config.min_volume.unwrap_or(mix.min_volume),
            ..mix
        };
        mix.validate().context("invalid mix config")?;

        let sections = vec![
            section(
                &CompetitorLandscape::with_config(config.competitor.as_str(), competitor),
                &scenario.competitor_rows(),
            ),
            section(&RetailerPerformance::with_config(performance), &scenario.performance_rows()),
            section(&ChannelOpportunity::with_config(scoring), &scenario.channel_points()),
            section(
                &RetailerGrowth::with_config(config.mode, growth),
                &scenario.retailer_trends(),
            ),
            section(&RetailerMix::with_config(mix), &scenario.mix_rows()),
        ];

        Ok(Self {
            scenario_id: scenario.id(),
            seed: config.seed,
            mode: config.mode,
            competitor: config.competitor.clone(),
            generated_at: Utc::now(),
            fingerprint: fingerprint(&sections)?,
            sections,
        })
    }

    /// Plain-text rendering with emphasis markup removed.
    pub fn render_text(&self) -> String {
        let mut out = format!(
            "Insight report  seed {} (scenario {})  mode {}  competitor {}\n",
            self.seed, self.scenario_id, self.mode, self.competitor
        );
        out.push_str(&format!("generated   {}\n", self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")));
        out.push_str(&format!("fingerprint {}\n", self.fingerprint));

        for section in &self.sections {
            let insight = &section.insight;
            out.push_str(&format!("\n[{}] {}: {}\n", section.selector, insight.title, insight.entity_name));
            out.push_str(&format!("  {}\n", plain(&insight.text)));
            out.push_str(&format!("  tags: {}\n", insight.tags.join(", ")));
        }
        out
    }
}

fn plain(text: &str) -> String {
    text.replace("<strong>", "").replace("</strong>", "")
}
