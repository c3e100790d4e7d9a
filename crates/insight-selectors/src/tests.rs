use std::fmt::Debug;

use channel_scorer::DemandPoint;
use insight_core::{ComparisonMode, Explained, InsightSelector};

use crate::*;

/// Helper: run a selector twice and check the shared contract.
fn run<S>(selector: &S, rows: &[S::Row]) -> S::Output
where
    S: InsightSelector,
    S::Output: PartialEq + Debug,
{
    let first = selector.select(rows);
    let second = selector.select(rows);
    assert_eq!(first, second, "{} is not deterministic", selector.name());

    let insight = first.insight();
    assert!(!insight.title.is_empty(), "{}: empty title", selector.name());
    assert!(!insight.text.is_empty(), "{}: empty text", selector.name());
    if rows.is_empty() {
        assert!(insight.is_no_data(), "{}: expected no-data copy", selector.name());
    } else {
        assert!(!insight.is_no_data(), "{}: no-data copy with rows present", selector.name());
        assert!(!insight.entity_name.is_empty());
        assert!(!insight.tags.is_empty());
    }
    first
}

fn competitor_batch() -> Vec<CompetitorRow> {
    vec![
        CompetitorRow::new("Big", 50_000.0, 0.20),
        CompetitorRow::new("Mid", 20_000.0, -0.15),
        CompetitorRow::new("Tiny", 10.0, 0.90),
    ]
}

fn performance_batch() -> Vec<PerformanceRow> {
    vec![
        PerformanceRow::new("Tiny", 10.0, 50.0),
        PerformanceRow::new("Big", 100_000.0, 8.0),
        PerformanceRow::new("Mid", 40_000.0, -1.0),
    ]
}

fn channel_batch() -> Vec<DemandPoint> {
    vec![
        DemandPoint::new("Tiny", 500.0, 0.0),
        DemandPoint::new("Big", 50_000.0, 0.01),
        DemandPoint::new("Mid", 20_000.0, 0.20),
    ]
}

fn growth_batch() -> Vec<RetailerTrend> {
    vec![
        RetailerTrend::new("Tiny", vec![1.0, 50.0], vec![40.0, 1.0], vec![]),
        RetailerTrend::new("Big", vec![500.0, 600.0], vec![500.0, 500.0], vec![]),
    ]
}

fn mix_batch() -> Vec<MixRow> {
    vec![
        MixRow::new("Big", 2_000.0, 2_000.0, 0.0),
        MixRow::new("Tiny", 90.0, 0.0, 0.0),
    ]
}

#[test]
fn test_empty_input_gives_no_data_everywhere() {
    run(&CompetitorLandscape::new("Rival"), &[]);
    run(&RetailerPerformance::new(), &[]);
    run(&ChannelOpportunity::new(), &[]);
    run(&RetailerGrowth::new(ComparisonMode::Pop), &[]);
    run(&RetailerMix::new(), &[]);
}

#[test]
fn test_single_small_row_is_still_headlined() {
    let out = run(&CompetitorLandscape::new("Rival"), &[CompetitorRow::new("Solo", 50.0, 0.2)]);
    assert_eq!(out.insight.entity_name, "Solo");

    let out = run(&RetailerPerformance::new(), &[PerformanceRow::new("Solo", 50.0, 0.0)]);
    assert_eq!(out.insight.entity_name, "Solo");

    let out = run(&ChannelOpportunity::new(), &[DemandPoint::new("Solo", 50.0, 0.0)]);
    assert_eq!(out.insight.entity_name, "Solo");
    assert!(out.scored.floor_waived);

    let out = run(
        &RetailerGrowth::new(ComparisonMode::Pop),
        &[RetailerTrend::new("Solo", vec![5.0, 5.0], vec![5.0, 5.0], vec![])],
    );
    assert_eq!(out.retailer, "Solo");
    assert!(out.from_fallback);

    let out = run(&RetailerMix::new(), &[MixRow::new("Solo", 50.0, 50.0, 0.0)]);
    assert_eq!(out.insight.entity_name, "Solo");
    assert_eq!(out.kind, Some(MixKind::Stable));
}

#[test]
fn test_below_floor_rows_are_never_headlined() {
    let out = run(&CompetitorLandscape::new("Rival"), &competitor_batch());
    assert_eq!(out.insight.entity_name, "Big");
    assert!(!out.points[2].in_pool);

    let out = run(&RetailerPerformance::new(), &performance_batch());
    assert_eq!(out.insight.entity_name, "Big");
    assert!(!out.points[0].in_pool);

    let out = run(&ChannelOpportunity::new(), &channel_batch());
    assert_eq!(out.insight.entity_name, "Big");
    assert!(!out.scored.points[0].in_pool);

    let out = run(&RetailerGrowth::new(ComparisonMode::Pop), &growth_batch());
    assert_eq!(out.retailer, "Big");
    assert_eq!(out.kind, Some(GrowthKind::Momentum));
    assert!(out.trends[0].reversed);
    assert!(!out.trends[0].in_pool);

    let out = run(&RetailerMix::new(), &mix_batch());
    assert_eq!(out.insight.entity_name, "Big");
    assert_eq!(out.kind, Some(MixKind::Mover));
}

#[test]
fn test_below_floor_rows_are_still_classified() {
    let out = CompetitorLandscape::new("Rival").select(&competitor_batch());
    assert_eq!(out.points.len(), 3);
    assert_eq!(out.points[2].quadrant, CompetitorQuadrant::NicheRival);

    let out = ChannelOpportunity::new().select(&channel_batch());
    assert_eq!(out.scored.points.len(), 3);
}

#[test]
fn test_fallback_reachable_for_every_selector() {
    let out = run(
        &CompetitorLandscape::new("Rival"),
        &[CompetitorRow::new("A", 5_000.0, 0.0), CompetitorRow::new("B", 3_000.0, 0.0)],
    );
    assert!(out.from_fallback);

    let out = run(
        &RetailerPerformance::new(),
        &[PerformanceRow::new("A", 5_000.0, 1.0), PerformanceRow::new("B", 3_000.0, -1.0)],
    );
    assert!(out.from_fallback);

    let out = run(
        &ChannelOpportunity::new(),
        &[DemandPoint::new("A", 5_000.0, 0.5), DemandPoint::new("B", 3_000.0, 0.5)],
    );
    assert!(out.from_fallback);

    let out = run(
        &RetailerGrowth::new(ComparisonMode::Yoy),
        &[RetailerTrend::new("A", vec![100.0, 100.0], vec![], vec![100.0, 100.0])],
    );
    assert!(out.from_fallback);

    let out = run(&RetailerMix::new(), &[MixRow::new("A", 500.0, 500.0, 500.0)]);
    assert!(out.from_fallback);
}

#[test]
fn test_selector_names_are_distinct() {
    let mut names = vec![
        CompetitorLandscape::new("Rival").name(),
        RetailerPerformance::new().name(),
        ChannelOpportunity::new().name(),
        RetailerGrowth::new(ComparisonMode::Pop).name(),
        RetailerMix::new().name(),
    ];
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), 5);
}

#[test]
fn test_outputs_serialize_with_camel_case_insight() {
    let out = RetailerPerformance::new().select(&performance_batch());
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["insight"]["entityName"], "Big");
    assert_eq!(json["quadrant"], "Growth engine");

    let out = RetailerGrowth::new(ComparisonMode::Pop).select(&growth_batch());
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["type"], "MOMENTUM");
    assert_eq!(json["mode"], "pop");
}
