//! Catalog query contract
//!
//! Free async functions over `&SqlitePool`. The planner consumes
//! [`find_products`] and [`get_track_statistics`] read-only; the migration
//! and reconciler tools use the registration/update helpers.

use crate::db::models::{GenericSubswathProduct, NewProduct, ProductRecord};
use crate::{AcquisitionStatus, Error, OrbitDirection, ProductType, Result, Subswath, TrackKey};
use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use std::str::FromStr;

/// Find products of one type on a track within a date range, ordered by date
pub async fn find_products(
    pool: &SqlitePool,
    product_type: ProductType,
    key: &TrackKey,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Vec<ProductRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT id, scene_id, product_type, acquisition_date, satellite_id,
               orbit_direction, track_number, subswath, status
        FROM products
        WHERE product_type = ?
          AND orbit_direction = ?
          AND subswath = ?
          AND track_number = ?
          AND acquisition_date >= ?
          AND acquisition_date <= ?
        ORDER BY acquisition_date
        "#,
    )
    .bind(product_type.as_str())
    .bind(key.orbit_direction.as_str())
    .bind(key.subswath.as_str())
    .bind(key.track_number)
    .bind(start_date.format("%Y-%m-%d").to_string())
    .bind(end_date.format("%Y-%m-%d").to_string())
    .fetch_all(pool)
    .await?;

    rows.iter().map(product_from_row).collect()
}

/// Per-type product counts for one track key; empty if the track is unknown
///
/// Derived products are counted for the requested subswath only. Raw
/// acquisitions always carry the generic `IW` subswath and are counted
/// regardless of the subswath asked for.
pub async fn get_track_statistics(
    pool: &SqlitePool,
    orbit_direction: OrbitDirection,
    subswath: Subswath,
    track_number: u16,
) -> Result<HashMap<ProductType, i64>> {
    let rows = sqlx::query(
        r#"
        SELECT product_type, COUNT(*) AS n
        FROM products
        WHERE orbit_direction = ? AND track_number = ?
          AND (subswath = ? OR (product_type = 'SLC' AND subswath = 'IW'))
        GROUP BY product_type
        "#,
    )
    .bind(orbit_direction.as_str())
    .bind(track_number)
    .bind(subswath.as_str())
    .fetch_all(pool)
    .await?;

    let mut stats = HashMap::new();
    for row in rows {
        let type_str: String = row.get("product_type");
        let count: i64 = row.get("n");
        let product_type = ProductType::from_str(&type_str)?;
        stats.insert(product_type, count);
    }
    Ok(stats)
}

/// Register a product, returning its row id
///
/// Duplicate (scene_id, product_type, subswath) registrations update the
/// status and date in place instead of inserting a second row.
pub async fn register_product(pool: &SqlitePool, product: &NewProduct) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO products
            (scene_id, product_type, acquisition_date, satellite_id,
             orbit_direction, track_number, subswath, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(scene_id, product_type, subswath) DO UPDATE SET
            acquisition_date = excluded.acquisition_date,
            status = excluded.status,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(&product.scene_id)
    .bind(product.product_type.as_str())
    .bind(product.acquisition_date.format("%Y-%m-%d").to_string())
    .bind(&product.satellite_id)
    .bind(product.orbit_direction.as_str())
    .bind(product.track_number)
    .bind(product.subswath.as_str())
    .bind(product.status.as_str())
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Record (or replace) the single storage location of a product
pub async fn upsert_storage_location(
    pool: &SqlitePool,
    product_id: i64,
    file_path: &str,
    file_format: Option<&str>,
    size_bytes: Option<i64>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO storage_locations (product_id, file_path, file_format, size_bytes)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(product_id) DO UPDATE SET
            file_path = excluded.file_path,
            file_format = excluded.file_format,
            size_bytes = excluded.size_bytes
        "#,
    )
    .bind(product_id)
    .bind(file_path)
    .bind(file_format)
    .bind(size_bytes)
    .execute(pool)
    .await?;

    Ok(())
}

/// Derived products whose subswath is still the generic `IW` value,
/// left-joined with their storage path for path-derived repair
pub async fn find_generic_subswath_products(
    pool: &SqlitePool,
) -> Result<Vec<GenericSubswathProduct>> {
    let rows = sqlx::query(
        r#"
        SELECT p.id, p.scene_id, p.product_type, p.orbit_direction,
               p.track_number, s.file_path
        FROM products p
        LEFT JOIN storage_locations s ON s.product_id = p.id
        WHERE p.subswath = 'IW'
          AND p.product_type IN ('INSAR_SHORT', 'INSAR_LONG', 'POLARIMETRY')
        ORDER BY p.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut products = Vec::with_capacity(rows.len());
    for row in rows {
        let type_str: String = row.get("product_type");
        let orbit_str: String = row.get("orbit_direction");
        let track: i64 = row.get("track_number");
        products.push(GenericSubswathProduct {
            id: row.get("id"),
            scene_id: row.get("scene_id"),
            product_type: ProductType::from_str(&type_str)?,
            orbit_direction: OrbitDirection::from_str(&orbit_str)?,
            track_number: track as u16,
            file_path: row.get("file_path"),
        });
    }
    Ok(products)
}

/// Set the specific subswath of one product
pub async fn update_product_subswath(
    pool: &SqlitePool,
    product_id: i64,
    subswath: Subswath,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE products
        SET subswath = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(subswath.as_str())
    .bind(product_id)
    .execute(pool)
    .await?;

    Ok(())
}

fn product_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ProductRecord> {
    let type_str: String = row.get("product_type");
    let orbit_str: String = row.get("orbit_direction");
    let subswath_str: String = row.get("subswath");
    let status_str: String = row.get("status");
    let date_str: String = row.get("acquisition_date");
    let track: i64 = row.get("track_number");

    let acquisition_date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|e| Error::Internal(format!("bad acquisition_date '{}': {}", date_str, e)))?;

    Ok(ProductRecord {
        id: row.get("id"),
        scene_id: row.get("scene_id"),
        product_type: ProductType::from_str(&type_str)?,
        acquisition_date,
        satellite_id: row.get("satellite_id"),
        orbit_direction: OrbitDirection::from_str(&orbit_str)?,
        track_number: track as u16,
        subswath: Subswath::from_str(&subswath_str)?,
        status: AcquisitionStatus::from_str(&status_str)?,
    })
}
