//! goshawk-planner - Incremental workflow planning
//!
//! Inspects the processing-state catalog for each requested track key and
//! decides the minimal pipeline stages needed for a date range: full
//! workflow, process-only, or crop-only.

pub mod aoi;
pub mod coverage;
pub mod decision;
pub mod plan;

pub use coverage::{CoverageAnalyzer, CoverageReport, CoverageSnapshot};
pub use decision::{decide, Decision, Strategy};
