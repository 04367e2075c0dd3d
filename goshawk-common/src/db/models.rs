//! Catalog row models

use crate::{AcquisitionStatus, OrbitDirection, ProductType, Subswath};
use chrono::NaiveDate;

/// A catalog product row: a raw acquisition (SLC) or a derived product
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub id: i64,
    pub scene_id: String,
    pub product_type: ProductType,
    pub acquisition_date: NaiveDate,
    pub satellite_id: Option<String>,
    pub orbit_direction: OrbitDirection,
    pub track_number: u16,
    pub subswath: Subswath,
    pub status: AcquisitionStatus,
}

/// Fields for registering a new catalog product
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub scene_id: String,
    pub product_type: ProductType,
    pub acquisition_date: NaiveDate,
    pub satellite_id: Option<String>,
    pub orbit_direction: OrbitDirection,
    pub track_number: u16,
    pub subswath: Subswath,
    pub status: AcquisitionStatus,
}

/// A derived product still carrying the generic subswath, joined with its
/// storage path (if any) for path-derived repair
#[derive(Debug, Clone)]
pub struct GenericSubswathProduct {
    pub id: i64,
    pub scene_id: String,
    pub product_type: ProductType,
    pub orbit_direction: OrbitDirection,
    pub track_number: u16,
    pub file_path: Option<String>,
}
