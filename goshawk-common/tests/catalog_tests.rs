//! Integration tests for the catalog query contract

use chrono::NaiveDate;
use goshawk_common::db::models::NewProduct;
use goshawk_common::db::{catalog, init_catalog_pool};
use goshawk_common::{AcquisitionStatus, OrbitDirection, ProductType, Subswath, TrackKey};
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn test_pool() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_catalog_pool(&dir.path().join("catalog.db"))
        .await
        .unwrap();
    (dir, pool)
}

fn slc(scene_id: &str, date: &str, track: u16, status: AcquisitionStatus) -> NewProduct {
    NewProduct {
        scene_id: scene_id.to_string(),
        product_type: ProductType::Slc,
        acquisition_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        satellite_id: Some("S1A".to_string()),
        orbit_direction: OrbitDirection::Descending,
        track_number: track,
        subswath: Subswath::Iw,
        status,
    }
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[tokio::test]
async fn find_products_filters_date_range_and_orders() {
    let (_dir, pool) = test_pool().await;

    for (scene, day) in [
        ("scene_c", "2024-03-01"),
        ("scene_a", "2024-01-01"),
        ("scene_b", "2024-02-01"),
        ("scene_out", "2024-06-01"),
    ] {
        catalog::register_product(&pool, &slc(scene, day, 88, AcquisitionStatus::Downloaded))
            .await
            .unwrap();
    }

    let key = TrackKey::new(OrbitDirection::Descending, Subswath::Iw, 88).unwrap();
    let products = catalog::find_products(
        &pool,
        ProductType::Slc,
        &key,
        date("2024-01-01"),
        date("2024-03-31"),
    )
    .await
    .unwrap();

    let scenes: Vec<&str> = products.iter().map(|p| p.scene_id.as_str()).collect();
    assert_eq!(scenes, vec!["scene_a", "scene_b", "scene_c"]);
    assert_eq!(products[0].status, AcquisitionStatus::Downloaded);
}

#[tokio::test]
async fn register_product_is_idempotent_per_scene_and_type() {
    let (_dir, pool) = test_pool().await;

    catalog::register_product(&pool, &slc("scene_a", "2024-01-01", 88, AcquisitionStatus::Discovered))
        .await
        .unwrap();
    // Second registration advances status instead of duplicating the row
    catalog::register_product(&pool, &slc("scene_a", "2024-01-01", 88, AcquisitionStatus::Processed))
        .await
        .unwrap();

    let key = TrackKey::new(OrbitDirection::Descending, Subswath::Iw, 88).unwrap();
    let products = catalog::find_products(
        &pool,
        ProductType::Slc,
        &key,
        date("2024-01-01"),
        date("2024-12-31"),
    )
    .await
    .unwrap();

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].status, AcquisitionStatus::Processed);
}

#[tokio::test]
async fn track_statistics_empty_for_unknown_track() {
    let (_dir, pool) = test_pool().await;

    let stats = catalog::get_track_statistics(&pool, OrbitDirection::Descending, Subswath::Iw1, 42)
        .await
        .unwrap();
    assert!(stats.is_empty());
}

#[tokio::test]
async fn track_statistics_counts_per_type_and_subswath() {
    let (_dir, pool) = test_pool().await;

    catalog::register_product(&pool, &slc("s1", "2024-01-01", 88, AcquisitionStatus::Processed))
        .await
        .unwrap();
    catalog::register_product(&pool, &slc("s2", "2024-01-13", 88, AcquisitionStatus::Processed))
        .await
        .unwrap();

    let mut ifg = slc("ifg_1", "2024-01-01", 88, AcquisitionStatus::Processed);
    ifg.product_type = ProductType::InsarShort;
    ifg.subswath = Subswath::Iw1;
    catalog::register_product(&pool, &ifg).await.unwrap();

    let mut other = slc("ifg_2", "2024-01-01", 88, AcquisitionStatus::Processed);
    other.product_type = ProductType::InsarShort;
    other.subswath = Subswath::Iw2;
    catalog::register_product(&pool, &other).await.unwrap();

    // IW1 view: its own derived products plus the generic acquisitions
    let stats = catalog::get_track_statistics(&pool, OrbitDirection::Descending, Subswath::Iw1, 88)
        .await
        .unwrap();
    assert_eq!(stats.get(&ProductType::Slc), Some(&2));
    assert_eq!(stats.get(&ProductType::InsarShort), Some(&1));
    assert_eq!(stats.get(&ProductType::InsarLong), None);

    // The IW2 interferogram never leaks into the IW1 counts, and vice versa
    let stats = catalog::get_track_statistics(&pool, OrbitDirection::Descending, Subswath::Iw2, 88)
        .await
        .unwrap();
    assert_eq!(stats.get(&ProductType::Slc), Some(&2));
    assert_eq!(stats.get(&ProductType::InsarShort), Some(&1));
}

#[tokio::test]
async fn generic_subswath_query_joins_storage_path() {
    let (_dir, pool) = test_pool().await;

    // Derived product stuck with generic subswath, with storage location
    let mut stale = slc("ifg_stale", "2024-01-01", 88, AcquisitionStatus::Processed);
    stale.product_type = ProductType::InsarShort;
    stale.subswath = Subswath::Iw;
    let stale_id = catalog::register_product(&pool, &stale).await.unwrap();
    catalog::upsert_storage_location(
        &pool,
        stale_id,
        "/repo/desc_iw2/t088/insar/short/ifg_stale.dim",
        Some("BEAM-DIMAP"),
        Some(1024),
    )
    .await
    .unwrap();

    // Generic SLC must not be reported (acquisitions are legitimately generic)
    catalog::register_product(&pool, &slc("s1", "2024-01-01", 88, AcquisitionStatus::Processed))
        .await
        .unwrap();

    // Derived product with no storage row
    let mut orphan = slc("ifg_orphan", "2024-01-13", 88, AcquisitionStatus::Processed);
    orphan.product_type = ProductType::InsarLong;
    orphan.subswath = Subswath::Iw;
    catalog::register_product(&pool, &orphan).await.unwrap();

    let generics = catalog::find_generic_subswath_products(&pool).await.unwrap();
    assert_eq!(generics.len(), 2);
    let by_scene: Vec<(&str, bool)> = generics
        .iter()
        .map(|g| (g.scene_id.as_str(), g.file_path.is_some()))
        .collect();
    assert!(by_scene.contains(&("ifg_stale", true)));
    assert!(by_scene.contains(&("ifg_orphan", false)));
}

#[tokio::test]
async fn update_subswath_removes_product_from_generic_set() {
    let (_dir, pool) = test_pool().await;

    let mut stale = slc("ifg_stale", "2024-01-01", 88, AcquisitionStatus::Processed);
    stale.product_type = ProductType::InsarShort;
    stale.subswath = Subswath::Iw;
    let id = catalog::register_product(&pool, &stale).await.unwrap();

    catalog::update_product_subswath(&pool, id, Subswath::Iw2)
        .await
        .unwrap();

    let generics = catalog::find_generic_subswath_products(&pool).await.unwrap();
    assert!(generics.is_empty());
}
