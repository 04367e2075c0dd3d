//! Catalog database access
//!
//! The processing-state catalog is a shared SQLite database consumed through
//! the small query contract in [`catalog`]. The schema is bootstrapped here
//! so every tool can open the catalog independently.

pub mod catalog;
pub mod models;

use crate::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize the catalog connection pool
///
/// Opens (or creates) the SQLite catalog at `db_path` and ensures the schema
/// exists.
pub async fn init_catalog_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to catalog: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Create catalog tables if they don't exist
async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            scene_id TEXT NOT NULL,
            product_type TEXT NOT NULL,
            acquisition_date TEXT NOT NULL,
            satellite_id TEXT,
            orbit_direction TEXT NOT NULL,
            track_number INTEGER NOT NULL,
            subswath TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'DISCOVERED',
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(scene_id, product_type, subswath)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // At most one storage location per product (no replication)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS storage_locations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            product_id INTEGER NOT NULL UNIQUE REFERENCES products(id),
            file_path TEXT NOT NULL,
            file_format TEXT,
            size_bytes INTEGER
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_products_track
        ON products (orbit_direction, track_number, subswath, product_type)
        "#,
    )
    .execute(pool)
    .await?;

    tracing::debug!("Catalog tables initialized (products, storage_locations)");

    Ok(())
}
