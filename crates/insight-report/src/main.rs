//! insight-report: run every insight selector over a seeded demo scenario.
//!
//! Usage:
//!   cargo run -p insight-report
//!   cargo run -p insight-report -- --seed 7 --mode yoy
//!   cargo run -p insight-report -- --competitor "Acme" --json
//!
//! Environment (or .env): INSIGHT_SEED, INSIGHT_MODE, INSIGHT_COMPETITOR,
//! INSIGHT_RETAILERS, INSIGHT_WEEKS, INSIGHT_HIGH_PERCENTILE, INSIGHT_MIN_VOLUME.
//! Set LOG_FORMAT=json for JSON logs.

mod config;
mod report;

use anyhow::{Context, Result};

use config::ReportConfig;
use report::Report;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let json_logging = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "insight_report=info,insight_selectors=warn".into());
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!("Usage:");
        eprintln!("  insight-report [--seed N] [--mode pop|yoy] [--competitor NAME] [--json]");
        eprintln!();
        eprintln!("Options:");
        eprintln!("  --seed N           Scenario seed (default: INSIGHT_SEED or 42)");
        eprintln!("  --mode pop|yoy     Comparison baseline for retailer growth");
        eprintln!("  --competitor NAME  Competitor named in the landscape copy");
        eprintln!("  --json             Print the report as JSON");
        return Ok(());
    }

    let mut config = ReportConfig::from_env().context("failed to load report config")?;
    config.apply_args(&args)?;

    tracing::info!(
        seed = config.seed,
        mode = %config.mode,
        retailers = config.retailers,
        weeks = config.weeks,
        "building insight report"
    );

    let report = Report::build(&config)?;
    tracing::info!(fingerprint = %report.fingerprint, "report ready");

    if config.json {
        println!("{}", serde_json::to_string_pretty(&report).context("failed to serialize report")?);
    } else {
        print!("{}", report.render_text());
    }

    Ok(())
}
