//! goshawk-migrate - Workspace-to-repository migration CLI
//!
//! Migrates a project workspace's derived products into the shared
//! repository, replacing local copies with symlinks, and optionally cleans
//! up intermediate workspace directories afterwards.

use anyhow::{Context, Result};
use clap::Parser;
use goshawk_common::config::GoshawkConfig;
use goshawk_common::ExecutionMode;
use goshawk_migrate::cleanup::WorkspaceCleaner;
use goshawk_migrate::workspace::infer_track_key;
use goshawk_migrate::{MigrationEngine, ProductRepository};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "goshawk-migrate",
    about = "Migrate workspace products into the shared repository and symlink them back"
)]
struct Args {
    /// Workspace to migrate (e.g. processing/project/insar_desc_iw1)
    workspace: PathBuf,

    /// Simulate without making any changes
    #[arg(long)]
    dry_run: bool,

    /// Repository root; defaults to <data-root>/processed_products
    #[arg(long)]
    repository: Option<PathBuf>,

    /// Data root; falls back to env/config/default
    #[arg(long)]
    data_root: Option<PathBuf>,

    /// Workspace entries to clean up after a successful migration
    #[arg(long = "cleanup", num_args = 1..)]
    cleanup: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let mode = ExecutionMode::from_dry_run_flag(args.dry_run);

    let workspace = args
        .workspace
        .canonicalize()
        .with_context(|| format!("workspace not found: {}", args.workspace.display()))?;

    // Track key resolution failing is structural: abort the whole run
    let key = infer_track_key(&workspace).context("resolving workspace track key")?;
    info!("Workspace: {}", workspace.display());
    info!("Track key: {}", key.track_id());
    if mode.is_dry_run() {
        info!("Dry-run: no changes will be made");
    }

    let repository_root = args.repository.unwrap_or_else(|| {
        GoshawkConfig::resolve(args.data_root.as_deref()).repository_root()
    });
    info!("Repository: {}", repository_root.display());

    let engine = MigrationEngine::new(ProductRepository::new(repository_root), mode);
    let stats = engine.migrate_workspace(&workspace, &key)?;

    println!();
    println!("MIGRATION SUMMARY ({} artifacts)", stats.total());
    println!("  copied and linked:   {}", stats.migrated);
    println!("  would migrate:       {}", stats.would_migrate);
    println!("  already symlinks:    {}", stats.already_linked);
    println!("  verification failed: {}", stats.verification_failed);
    println!("  failed:              {}", stats.failed);

    if !args.cleanup.is_empty() {
        if stats.is_clean() {
            let entries: Vec<&str> = args.cleanup.iter().map(String::as_str).collect();
            let cleaner = WorkspaceCleaner::new(mode);
            let cleanup_stats = cleaner.clean(&workspace, &entries)?;
            println!(
                "CLEANUP: {} links, {} directories, {} files removed ({} missing)",
                cleanup_stats.links_removed,
                cleanup_stats.dirs_removed,
                cleanup_stats.files_removed,
                cleanup_stats.missing
            );
        } else {
            println!("CLEANUP skipped: migration had failures");
        }
    }

    // The run continues past per-item failures but must not exit clean
    if !stats.is_clean() {
        std::process::exit(1);
    }
    Ok(())
}
