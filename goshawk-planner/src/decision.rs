//! Workflow decision engine
//!
//! Pure mapping from a coverage report to a workflow strategy. No I/O, no
//! mutation; deterministic and idempotent under repeated calls. Every
//! outcome carries a human-readable justification for audit and dry-run
//! display.

use crate::coverage::CoverageReport;
use std::fmt;

/// Minimal set of pipeline stages needed for a track/date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Download, process and crop
    Full,
    /// Acquisitions already downloaded; skip download, process and crop
    ProcessOnly,
    /// Everything already processed; crop to the AOI only
    CropOnly,
}

impl Strategy {
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Full => "FULL",
            Strategy::ProcessOnly => "PROCESS_ONLY",
            Strategy::CropOnly => "CROP_ONLY",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// A strategy with its justification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub strategy: Strategy,
    pub reason: String,
}

/// Decide the minimal workflow for a coverage report
///
/// Ordered rules:
/// 1. Catalog unavailable -> FULL
/// 2. Zero acquisitions in range -> FULL
/// 3. All three derived types present and every acquisition processed -> CROP_ONLY
/// 4. Acquisitions exist, none still DISCOVERED -> PROCESS_ONLY
/// 5. Otherwise -> FULL
pub fn decide(report: &CoverageReport) -> Decision {
    let snapshot = match report {
        CoverageReport::Unavailable { detail } => {
            return Decision {
                strategy: Strategy::Full,
                reason: format!("catalog unavailable ({}) - full workflow required", detail),
            };
        }
        CoverageReport::Snapshot(snapshot) => snapshot,
    };

    if snapshot.total_acquisitions() == 0 {
        return Decision {
            strategy: Strategy::Full,
            reason: "no products in date range - full workflow required".to_string(),
        };
    }

    // Known gap: this checks only that each derived type has a non-zero count
    // in range, not that product dates cover every acquisition date. Stale
    // leftovers from an earlier broader run can mask missing coverage.
    // Tightening to per-date coverage is an open question; keep as-is.
    if snapshot.has_all_derived_types() && snapshot.all_processed() {
        return Decision {
            strategy: Strategy::CropOnly,
            reason: format!(
                "all products processed ({} acquisitions, {} InSAR short, {} InSAR long, \
                 {} polarimetry) - crop only",
                snapshot.processed, snapshot.insar_short, snapshot.insar_long, snapshot.polarimetry
            ),
        };
    }

    if snapshot.none_discovered() {
        return Decision {
            strategy: Strategy::ProcessOnly,
            reason: format!(
                "{} acquisitions downloaded, derived products incomplete \
                 ({} short, {} long, {} polarimetry) - skip download, process only",
                snapshot.total_acquisitions(),
                snapshot.insar_short,
                snapshot.insar_long,
                snapshot.polarimetry
            ),
        };
    }

    Decision {
        strategy: Strategy::Full,
        reason: format!(
            "partial coverage ({} of {} acquisitions still awaiting download) - full workflow",
            snapshot.discovered,
            snapshot.total_acquisitions()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::CoverageSnapshot;

    fn snapshot(report: CoverageSnapshot) -> CoverageReport {
        CoverageReport::Snapshot(report)
    }

    #[test]
    fn unavailable_catalog_forces_full() {
        let decision = decide(&CoverageReport::Unavailable {
            detail: "connection refused".to_string(),
        });
        assert_eq!(decision.strategy, Strategy::Full);
        assert!(decision.reason.contains("unavailable"));
    }

    #[test]
    fn zero_acquisitions_forces_full_regardless_of_products() {
        // Derived products alone never mask an empty acquisition range
        let decision = decide(&snapshot(CoverageSnapshot {
            insar_short: 10,
            insar_long: 10,
            polarimetry: 10,
            ..Default::default()
        }));
        assert_eq!(decision.strategy, Strategy::Full);
        assert!(decision.reason.contains("no products in date range"));
    }

    #[test]
    fn fully_processed_track_is_crop_only() {
        let decision = decide(&snapshot(CoverageSnapshot {
            processed: 5,
            insar_short: 3,
            insar_long: 2,
            polarimetry: 1,
            ..Default::default()
        }));
        assert_eq!(decision.strategy, Strategy::CropOnly);
        // Reason must cite all four counts for audit display
        assert!(decision.reason.contains("5 acquisitions"));
        assert!(decision.reason.contains("3 InSAR short"));
        assert!(decision.reason.contains("2 InSAR long"));
        assert!(decision.reason.contains("1 polarimetry"));
    }

    #[test]
    fn missing_derived_type_downgrades_to_process_only() {
        let decision = decide(&snapshot(CoverageSnapshot {
            processed: 5,
            insar_short: 3,
            insar_long: 2,
            polarimetry: 0,
            ..Default::default()
        }));
        assert_eq!(decision.strategy, Strategy::ProcessOnly);
    }

    #[test]
    fn downloaded_but_unprocessed_is_process_only() {
        let decision = decide(&snapshot(CoverageSnapshot {
            downloaded: 3,
            processed: 2,
            insar_short: 3,
            insar_long: 2,
            polarimetry: 1,
            ..Default::default()
        }));
        // Rule 3 needs every acquisition processed; rule 4 still applies
        assert_eq!(decision.strategy, Strategy::ProcessOnly);
    }

    #[test]
    fn any_discovered_acquisition_forces_full() {
        let decision = decide(&snapshot(CoverageSnapshot {
            discovered: 1,
            downloaded: 2,
            processed: 2,
            insar_short: 3,
            insar_long: 2,
            polarimetry: 1,
            ..Default::default()
        }));
        assert_eq!(decision.strategy, Strategy::Full);
        assert!(decision.reason.contains("1 of 5"));
    }

    #[test]
    fn decision_is_deterministic() {
        let report = snapshot(CoverageSnapshot {
            processed: 2,
            insar_short: 1,
            insar_long: 1,
            polarimetry: 1,
            ..Default::default()
        });
        assert_eq!(decide(&report), decide(&report));
    }
}
