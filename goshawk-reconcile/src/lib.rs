//! goshawk-reconcile - Path-derived subswath repair
//!
//! Derived products created by older tooling inherited the generic `IW`
//! subswath from their source acquisition. The specific subswath is encoded
//! in the canonical storage path (`desc_iw1/t088/...`), so it can be
//! recovered by pattern matching. This is a bounded migration-era repair
//! tool, not a permanent source of truth: new products store the specific
//! subswath at creation time.
//!
//! Defaults to dry-run; persistence requires explicit confirmation.

use goshawk_common::db::catalog;
use goshawk_common::{ExecutionMode, Result, Subswath};
use once_cell::sync::Lazy;
use regex::Regex;
use sqlx::SqlitePool;
use std::str::FromStr;

static UNDERSCORE_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_(iw[123])").expect("valid regex"));
static SEGMENT_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/(iw[123])/").expect("valid regex"));

/// Infer the specific subswath from a canonical storage path
///
/// Matches `_iw1`-style tokens first (`desc_iw1/t088/...`), then bare path
/// segments (`/iw2/`), case-insensitive. None if the path carries no token.
pub fn infer_subswath_from_path(path: &str) -> Option<Subswath> {
    let path_lower = path.to_lowercase();

    let token = UNDERSCORE_TOKEN_RE
        .captures(&path_lower)
        .or_else(|| SEGMENT_TOKEN_RE.captures(&path_lower))?;

    Subswath::from_str(&token[1]).ok()
}

/// Per-outcome counts for a reconcile pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Products with the generic subswath that were examined
    pub examined: usize,
    /// Records repaired (or that would be repaired, in dry-run)
    pub repaired: usize,
    /// Paths carrying no subswath token; left unchanged
    pub ambiguous: usize,
    /// Products with no storage location at all
    pub missing_location: usize,
}

impl ReconcileStats {
    pub fn is_clean(&self) -> bool {
        self.ambiguous == 0 && self.missing_location == 0
    }
}

/// Repairs derived products stuck with the generic subswath
pub struct Reconciler<'a> {
    pool: &'a SqlitePool,
    mode: ExecutionMode,
}

impl<'a> Reconciler<'a> {
    pub fn new(pool: &'a SqlitePool, mode: ExecutionMode) -> Self {
        Self { pool, mode }
    }

    /// Run one repair pass over the catalog
    ///
    /// Per-item problems (no storage row, no inferable token) are counted
    /// and reported; they never abort the pass.
    pub async fn run(&self) -> Result<ReconcileStats> {
        let products = catalog::find_generic_subswath_products(self.pool).await?;
        let mut stats = ReconcileStats {
            examined: products.len(),
            ..Default::default()
        };

        tracing::info!("Products with generic subswath: {}", products.len());

        for product in &products {
            let Some(path) = &product.file_path else {
                tracing::warn!("{}: no storage location", product.scene_id);
                stats.missing_location += 1;
                continue;
            };

            let Some(subswath) = infer_subswath_from_path(path) else {
                tracing::warn!(
                    "{}: cannot infer subswath from {}",
                    product.scene_id,
                    path
                );
                stats.ambiguous += 1;
                continue;
            };

            if self.mode.is_dry_run() {
                tracing::info!(
                    "[dry-run] {} ({} t{:03}): IW -> {}",
                    product.scene_id,
                    product.product_type,
                    product.track_number,
                    subswath
                );
            } else {
                catalog::update_product_subswath(self.pool, product.id, subswath).await?;
                tracing::info!(
                    "{} ({} t{:03}): IW -> {}",
                    product.scene_id,
                    product.product_type,
                    product.track_number,
                    subswath
                );
            }
            stats.repaired += 1;
        }

        Ok(stats)
    }
}
