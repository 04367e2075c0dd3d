//! # Goshawk Common Library
//!
//! Shared code for the goshawk pipeline tools including:
//! - Track key, subswath and product-type model
//! - Catalog access (SQLite via sqlx)
//! - Error taxonomy
//! - Data-root / configuration resolution

pub mod config;
pub mod db;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    AcquisitionStatus, ExecutionMode, OrbitDirection, PairType, ProductType, Subswath, TrackKey,
};
