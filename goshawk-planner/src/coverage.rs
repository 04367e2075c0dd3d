//! Coverage analyzer
//!
//! Turns catalog queries into a per-track snapshot of acquisition counts by
//! status and derived-product counts by type. Two failure modes are kept
//! apart: a catalog that cannot be reached yields
//! [`CoverageReport::Unavailable`], while a reachable catalog with nothing in
//! the range yields a snapshot with zero counts.

use chrono::NaiveDate;
use goshawk_common::db::catalog;
use goshawk_common::{AcquisitionStatus, ProductType, Subswath, TrackKey};
use sqlx::SqlitePool;

/// Point-in-time coverage counts for one track key and date range
///
/// May be stale if another run is concurrently writing to the same track;
/// callers serialize per track key externally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageSnapshot {
    /// Acquisition counts by status
    pub discovered: usize,
    pub downloaded: usize,
    pub processed: usize,
    /// Derived-product counts by type
    pub insar_short: usize,
    pub insar_long: usize,
    pub polarimetry: usize,
}

impl CoverageSnapshot {
    pub fn total_acquisitions(&self) -> usize {
        self.discovered + self.downloaded + self.processed
    }

    /// Every acquisition in range has been fully processed
    pub fn all_processed(&self) -> bool {
        self.total_acquisitions() > 0 && self.discovered == 0 && self.downloaded == 0
    }

    /// No acquisition is still waiting for download
    pub fn none_discovered(&self) -> bool {
        self.total_acquisitions() > 0 && self.discovered == 0
    }

    /// All three derived-product types have at least one product in range
    pub fn has_all_derived_types(&self) -> bool {
        self.insar_short > 0 && self.insar_long > 0 && self.polarimetry > 0
    }
}

/// Analyzer output: a snapshot, or a marker that the catalog was unreachable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverageReport {
    /// Catalog unreachable; planning must fall back conservatively
    Unavailable { detail: String },
    Snapshot(CoverageSnapshot),
}

/// Read-only coverage analyzer over the catalog pool
pub struct CoverageAnalyzer<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CoverageAnalyzer<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Analyze coverage for one track key and date range
    ///
    /// Acquisitions are always queried with the generic subswath regardless
    /// of the requested specific subswath, because one raw capture serves
    /// all three subswaths. Derived products are queried with the specific
    /// subswath.
    pub async fn analyze(
        &self,
        key: &TrackKey,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> CoverageReport {
        match self.query_snapshot(key, start_date, end_date).await {
            Ok(snapshot) => CoverageReport::Snapshot(snapshot),
            Err(e) => {
                tracing::warn!("Catalog query failed for {}: {}", key.track_id(), e);
                CoverageReport::Unavailable {
                    detail: e.to_string(),
                }
            }
        }
    }

    async fn query_snapshot(
        &self,
        key: &TrackKey,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> goshawk_common::Result<CoverageSnapshot> {
        let mut snapshot = CoverageSnapshot::default();

        let generic_key = key.with_subswath(Subswath::Iw);
        let acquisitions = catalog::find_products(
            self.pool,
            ProductType::Slc,
            &generic_key,
            start_date,
            end_date,
        )
        .await?;

        for acquisition in &acquisitions {
            match acquisition.status {
                AcquisitionStatus::Discovered => snapshot.discovered += 1,
                AcquisitionStatus::Downloaded => snapshot.downloaded += 1,
                AcquisitionStatus::Processed => snapshot.processed += 1,
            }
        }

        for product_type in ProductType::derived() {
            let products =
                catalog::find_products(self.pool, product_type, key, start_date, end_date).await?;
            match product_type {
                ProductType::InsarShort => snapshot.insar_short = products.len(),
                ProductType::InsarLong => snapshot.insar_long = products.len(),
                ProductType::Polarimetry => snapshot.polarimetry = products.len(),
                ProductType::Slc => unreachable!("derived() never yields SLC"),
            }
        }

        tracing::debug!(
            "Coverage {}: {} acquisitions ({} discovered, {} downloaded, {} processed), \
             {} short / {} long / {} polarimetry",
            key.track_id(),
            snapshot.total_acquisitions(),
            snapshot.discovered,
            snapshot.downloaded,
            snapshot.processed,
            snapshot.insar_short,
            snapshot.insar_long,
            snapshot.polarimetry,
        );

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_processed_requires_at_least_one_acquisition() {
        let snapshot = CoverageSnapshot::default();
        assert!(!snapshot.all_processed());

        let snapshot = CoverageSnapshot {
            processed: 3,
            ..Default::default()
        };
        assert!(snapshot.all_processed());

        let snapshot = CoverageSnapshot {
            processed: 3,
            downloaded: 1,
            ..Default::default()
        };
        assert!(!snapshot.all_processed());
        assert!(snapshot.none_discovered());
    }

    #[test]
    fn has_all_derived_types_needs_every_type() {
        let snapshot = CoverageSnapshot {
            insar_short: 2,
            insar_long: 1,
            polarimetry: 0,
            ..Default::default()
        };
        assert!(!snapshot.has_all_derived_types());

        let snapshot = CoverageSnapshot {
            insar_short: 2,
            insar_long: 1,
            polarimetry: 1,
            ..Default::default()
        };
        assert!(snapshot.has_all_derived_types());
    }
}
