//! Retailer Mix
//!
//! Share of total brand views by retailer, compared with the previous period
//! and the same period last year.

use serde::{Deserialize, Serialize};

use insight_core::error::{check_non_negative, check_unit_interval};
use insight_core::format::{ordinal, share_delta_pp, share_pct, strong};
use insight_core::stats::{desc, non_negative, safe_ratio};
use insight_core::{Explained, FloorMask, Insight, InsightError, InsightSelector, PriorityTiers, TierHit};

const NAME: &str = "retailer_mix";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MixKind {
    New,
    Dropped,
    Mover,
    Stable,
}

impl MixKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MixKind::New => "New",
            MixKind::Dropped => "Dropped",
            MixKind::Mover => "Mover",
            MixKind::Stable => "Stable",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            MixKind::New => "New in the mix",
            MixKind::Dropped => "Dropped out",
            MixKind::Mover => "Share mover",
            MixKind::Stable => "Stable mix",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixRow {
    pub retailer: String,
    pub views_now: f64,
    #[serde(default)]
    pub views_prev_period: f64,
    #[serde(default)]
    pub views_prev_year: f64,
}

impl MixRow {
    pub fn new(retailer: impl Into<String>, views_now: f64, views_prev_period: f64, views_prev_year: f64) -> Self {
        Self {
            retailer: retailer.into(),
            views_now,
            views_prev_period,
            views_prev_year,
        }
    }
}

/// One row of the share table. Shares are decimals, deltas are points.
///
/// Previous shares and deltas are `None` when that period has no views at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixShare {
    pub retailer: String,
    pub views_now: f64,
    pub views_prev_period: f64,
    pub share_now: f64,
    pub share_prev_period: Option<f64>,
    pub share_prev_year: Option<f64>,
    pub delta_pop_pp: Option<f64>,
    pub delta_yoy_pp: Option<f64>,
    /// Larger of the two absolute deltas
    pub max_move_pp: f64,
    /// 1-based rank by current share across all rows
    pub share_rank: usize,
    pub in_pool: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixConfig {
    /// Share at or below which a retailer counts as absent
    pub absent_share: f64,
    /// Share at or above which a retailer counts as present
    pub present_share: f64,
    /// Share move in points that counts as material
    pub material_move_pp: f64,
    pub min_volume: f64,
}

impl Default for MixConfig {
    fn default() -> Self {
        Self {
            absent_share: 0.005,
            present_share: 0.02,
            material_move_pp: 1.0,
            min_volume: 100.0,
        }
    }
}

impl MixConfig {
    pub fn validate(&self) -> Result<(), InsightError> {
        check_unit_interval("absent_share", self.absent_share)?;
        check_unit_interval("present_share", self.present_share)?;
        if self.absent_share >= self.present_share {
            return Err(InsightError::InvalidConfig(format!(
                "absent_share ({}) must be below present_share ({})",
                self.absent_share, self.present_share
            )));
        }
        check_non_negative("material_move_pp", self.material_move_pp)?;
        check_non_negative("min_volume", self.min_volume)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixInsight {
    pub insight: Insight,
    pub kind: Option<MixKind>,
    pub from_fallback: bool,
    pub shares: Vec<MixShare>,
}

impl Explained for MixInsight {
    fn insight(&self) -> &Insight {
        &self.insight
    }
}

#[derive(Debug, Clone, Default)]
pub struct RetailerMix {
    config: MixConfig,
}

impl RetailerMix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MixConfig) -> Self {
        Self { config }
    }

    /// Build the share table for a batch of rows.
    pub fn shares(rows: &[MixRow]) -> Vec<MixShare> {
        let now: Vec<f64> = rows.iter().map(|r| non_negative(r.views_now)).collect();
        let prev: Vec<f64> = rows.iter().map(|r| non_negative(r.views_prev_period)).collect();
        let year: Vec<f64> = rows.iter().map(|r| non_negative(r.views_prev_year)).collect();
        let total_now: f64 = now.iter().sum();
        let total_prev: f64 = prev.iter().sum();
        let total_year: f64 = year.iter().sum();

        let baseline = |v: f64, total: f64| (total > 0.0).then(|| v / total);

        let mut table: Vec<MixShare> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let share_now = safe_ratio(now[i], total_now);
                let share_prev_period = baseline(prev[i], total_prev);
                let share_prev_year = baseline(year[i], total_year);
                let delta_pop_pp = share_prev_period.map(|p| (share_now - p) * 100.0);
                let delta_yoy_pp = share_prev_year.map(|p| (share_now - p) * 100.0);
                let max_move_pp = delta_pop_pp
                    .unwrap_or(0.0)
                    .abs()
                    .max(delta_yoy_pp.unwrap_or(0.0).abs());
                MixShare {
                    retailer: row.retailer.clone(),
                    views_now: now[i],
                    views_prev_period: prev[i],
                    share_now,
                    share_prev_period,
                    share_prev_year,
                    delta_pop_pp,
                    delta_yoy_pp,
                    max_move_pp,
                    share_rank: 0,
                    in_pool: false,
                }
            })
            .collect();

        let mut order: Vec<usize> = (0..table.len()).collect();
        order.sort_by(|&a, &b| desc(table[a].share_now, table[b].share_now));
        for (rank, idx) in order.into_iter().enumerate() {
            table[idx].share_rank = rank + 1;
        }
        table
    }

    /// `quiet_everywhere` is false when a retailer below the volume floor
    /// moved by a material amount; the stable copy then speaks only for the pool.
    fn render(&self, share: &MixShare, kind: MixKind, quiet_everywhere: bool) -> Insight {
        let retailer = strong(&share.retailer);
        let now = strong(share_pct(share.share_now));
        let prev = strong(share_pct(share.share_prev_period.unwrap_or(0.0)));
        let mut tags = vec![kind.as_str().to_string()];

        let text = match kind {
            MixKind::New => {
                tags.push("PoP".to_string());
                format!(
                    "{} is new in your mix at {} of brand views, up from {} last period.",
                    retailer, now, prev
                )
            }
            MixKind::Dropped => {
                tags.push("PoP".to_string());
                format!(
                    "{} fell out of your mix: {} of brand views, down from {} last period.",
                    retailer, now, prev
                )
            }
            MixKind::Mover => {
                let pop = share.delta_pop_pp.unwrap_or(0.0);
                let yoy = share.delta_yoy_pp.unwrap_or(0.0);
                let (lead, lead_phrase, other, other_phrase, lead_tag) = if pop.abs() >= yoy.abs() {
                    (pop, "vs last period", share.delta_yoy_pp, "vs last year", "PoP")
                } else {
                    (yoy, "vs last year", share.delta_pop_pp, "vs last period", "YoY")
                };
                tags.push(lead_tag.to_string());
                tags.push(if lead > 0.0 { "Gaining" } else { "Losing" }.to_string());

                let mut text = format!(
                    "{} moved {} {} to {} of brand views",
                    retailer,
                    strong(share_delta_pp(lead)),
                    lead_phrase,
                    now
                );
                if let Some(other) = other {
                    text.push_str(&format!(" ({} {})", strong(share_delta_pp(other)), other_phrase));
                }
                text.push_str(&format!(" and is now your {} retailer.", rank_phrase(share.share_rank)));
                text
            }
            MixKind::Stable => {
                tags.push("Largest share".to_string());
                let scope = if quiet_everywhere { "no retailer" } else { "none of your main retailers" };
                format!(
                    "{} leads your mix at {} of brand views; {} moved more than {}.",
                    retailer,
                    now,
                    scope,
                    strong(format!("{:.1}pp", self.config.material_move_pp))
                )
            }
        };

        Insight::new(&share.retailer, kind.title(), text, tags)
    }
}

fn rank_phrase(rank: usize) -> String {
    if rank <= 1 {
        "largest".to_string()
    } else {
        format!("{}-largest", ordinal(rank))
    }
}

impl InsightSelector for RetailerMix {
    type Row = MixRow;
    type Output = MixInsight;

    fn name(&self) -> &'static str {
        NAME
    }

    fn select(&self, rows: &[MixRow]) -> MixInsight {
        if rows.is_empty() {
            return MixInsight {
                insight: Insight::no_data("retailer share"),
                kind: None,
                from_fallback: false,
                shares: Vec::new(),
            };
        }

        let mut shares = Self::shares(rows);
        let volumes: Vec<f64> = shares.iter().map(|s| s.views_now.max(s.views_prev_period)).collect();
        let mask = FloorMask::new(&volumes, self.config.min_volume, NAME);
        for (i, s) in shares.iter_mut().enumerate() {
            s.in_pool = mask.contains(i);
        }
        let pool = mask.select(&shares);
        tracing::trace!(pooled = pool.len(), waived = mask.waived, "mix pool");

        let cfg = &self.config;
        let quiet = shares.iter().all(|s| s.max_move_pp < cfg.material_move_pp);
        let tiers = PriorityTiers::new(NAME)
            .tier(
                MixKind::New,
                |s: &MixShare| {
                    s.share_prev_period.is_some_and(|p| p <= cfg.absent_share) && s.share_now >= cfg.present_share
                },
                |a: &MixShare, b: &MixShare| {
                    desc(a.share_now, b.share_now).then_with(|| desc(a.views_now, b.views_now))
                },
                |s: &MixShare| self.render(s, MixKind::New, quiet),
            )
            .tier(
                MixKind::Dropped,
                |s: &MixShare| {
                    s.share_prev_period.is_some_and(|p| p >= cfg.present_share) && s.share_now <= cfg.absent_share
                },
                |a: &MixShare, b: &MixShare| {
                    desc(a.share_prev_period.unwrap_or(0.0), b.share_prev_period.unwrap_or(0.0))
                        .then_with(|| desc(a.views_prev_period, b.views_prev_period))
                },
                |s: &MixShare| self.render(s, MixKind::Dropped, quiet),
            )
            .tier(
                MixKind::Mover,
                |s: &MixShare| s.max_move_pp >= cfg.material_move_pp,
                |a: &MixShare, b: &MixShare| {
                    desc(a.max_move_pp, b.max_move_pp).then_with(|| desc(a.share_now, b.share_now))
                },
                |s: &MixShare| self.render(s, MixKind::Mover, quiet),
            )
            .fallback(
                |a: &MixShare, b: &MixShare| {
                    desc(a.share_now, b.share_now).then_with(|| desc(a.views_now, b.views_now))
                },
                |s: &MixShare| self.render(s, MixKind::Stable, quiet),
            );

        match tiers.resolve(&pool) {
            Some(resolved) => {
                let kind = match resolved.hit {
                    TierHit::Tier(k) => k,
                    TierHit::Fallback => MixKind::Stable,
                };
                MixInsight {
                    insight: resolved.insight,
                    kind: Some(kind),
                    from_fallback: resolved.hit.is_fallback(),
                    shares,
                }
            }
            None => MixInsight {
                insight: Insight::no_data("retailer share"),
                kind: None,
                from_fallback: false,
                shares,
            },
        }
    }
}
