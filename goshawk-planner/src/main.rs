//! goshawk-planner - Workflow planning CLI
//!
//! Consults the processing-state catalog and emits a per-track plan for an
//! AOI and date range, avoiding redundant download and processing stages.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use goshawk_common::config::GoshawkConfig;
use goshawk_common::db::init_catalog_pool;
use goshawk_common::{ExecutionMode, OrbitDirection, Subswath, TrackKey};
use goshawk_planner::plan::{summarize, PlanEntry};
use goshawk_planner::{aoi, decide, CoverageAnalyzer, CoverageReport};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "goshawk-planner",
    about = "Plan the minimal pipeline stages per track for an AOI and date range"
)]
struct Args {
    /// Path to the AOI GeoJSON file
    #[arg(long)]
    aoi: PathBuf,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    start_date: String,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    end_date: String,

    /// Orbit directions to plan (ascending/descending)
    #[arg(long = "orbit", default_values = ["descending"])]
    orbits: Vec<String>,

    /// Subswaths to plan
    #[arg(long = "subswaths", num_args = 1.., default_values = ["iw1", "iw2"])]
    subswaths: Vec<String>,

    /// Track numbers to analyze
    #[arg(long = "tracks", num_args = 1.., required = true)]
    tracks: Vec<u16>,

    /// Data root (catalog + repository); falls back to env/config/default
    #[arg(long)]
    data_root: Option<PathBuf>,

    /// Plan without executing anything downstream
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let mode = ExecutionMode::from_dry_run_flag(args.dry_run);

    let start_date = parse_date(&args.start_date).context("invalid --start-date")?;
    let end_date = parse_date(&args.end_date).context("invalid --end-date")?;
    if end_date < start_date {
        anyhow::bail!("end date {} before start date {}", end_date, start_date);
    }

    let orbits = args
        .orbits
        .iter()
        .map(|s| s.parse::<OrbitDirection>())
        .collect::<goshawk_common::Result<Vec<_>>>()?;
    let subswaths = args
        .subswaths
        .iter()
        .map(|s| s.parse::<Subswath>())
        .collect::<goshawk_common::Result<Vec<_>>>()?;

    let bbox = aoi::load_bounding_box(&args.aoi)
        .with_context(|| format!("loading AOI {}", args.aoi.display()))?;
    info!(
        "AOI bounding box: lon {:.4}..{:.4}, lat {:.4}..{:.4}",
        bbox.min_lon, bbox.max_lon, bbox.min_lat, bbox.max_lat
    );
    info!("Date range: {} to {}", start_date, end_date);
    if mode.is_dry_run() {
        info!("Dry-run plan: nothing will be executed");
    }

    // A missing catalog is a planning signal, not a failure: every track
    // falls back to the full workflow.
    let config = GoshawkConfig::resolve(args.data_root.as_deref());
    let pool = match init_catalog_pool(&config.catalog_path()).await {
        Ok(pool) => Some(pool),
        Err(e) => {
            warn!("Catalog unavailable ({}), assuming full workflow", e);
            None
        }
    };

    let mut entries = Vec::new();
    for orbit in &orbits {
        for subswath in &subswaths {
            for &track in &args.tracks {
                let key = TrackKey::new(*orbit, *subswath, track)?;
                let report = match &pool {
                    Some(pool) => {
                        CoverageAnalyzer::new(pool)
                            .analyze(&key, start_date, end_date)
                            .await
                    }
                    None => CoverageReport::Unavailable {
                        detail: "catalog not opened".to_string(),
                    },
                };
                let decision = decide(&report);
                println!("{}  {:12}  {}", key.track_id(), decision.strategy, decision.reason);
                entries.push(PlanEntry { key, decision });
            }
        }
    }

    let summary = summarize(&entries);
    println!();
    println!("SUMMARY ({} tracks)", summary.total());
    println!("  crop only:     {}", summary.crop_only);
    println!("  process only:  {}", summary.process_only);
    println!("  full workflow: {}", summary.full);

    Ok(())
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("expected YYYY-MM-DD, got '{}'", s))
}
