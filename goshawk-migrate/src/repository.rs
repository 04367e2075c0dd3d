//! Shared product repository
//!
//! Canonical on-disk layout, one physical copy per derived product:
//!
//! ```text
//! <root>/<orbit_short>_<subswath>/t<NNN>/
//!     metadata.json
//!     insar/short/        contiguous pairs
//!     insar/long/         skipped pairs
//!     polarimetry/<date>/
//! ```
//!
//! Each track carries a `metadata.json` index of registered artifacts,
//! rewritten wholesale on each registration. Not safe for concurrent
//! writers; callers serialize per track key.

use goshawk_common::{Error, PairType, Result, Subswath, TrackKey};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Index entry for one registered artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredProduct {
    /// Artifact file name within the pair-type directory
    pub file: String,
    pub pair_type: PairType,
    /// Derivation dates (`YYYYMMDD`), when parseable from the name
    pub master_date: Option<String>,
    pub slave_date: Option<String>,
    pub size_bytes: u64,
}

/// Aggregate counts recomputed on every save
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackStatistics {
    pub total_insar_short: usize,
    pub total_insar_long: usize,
    pub total_size_bytes: u64,
}

/// Span of derivation dates covered by the registered artifacts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemporalRange {
    pub start: String,
    pub end: String,
    pub num_dates: usize,
}

/// Per-track metadata index document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub track_id: String,
    pub orbit_direction: goshawk_common::OrbitDirection,
    pub subswath: Subswath,
    pub insar_products: Vec<RegisteredProduct>,
    pub statistics: TrackStatistics,
    pub temporal_range: Option<TemporalRange>,
    pub created_at: String,
    pub updated_at: String,
}

impl TrackMetadata {
    fn new(key: &TrackKey) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            track_id: key.track_id(),
            orbit_direction: key.orbit_direction,
            subswath: key.subswath,
            insar_products: Vec::new(),
            statistics: TrackStatistics::default(),
            temporal_range: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// True if an artifact with this file name is already registered
    pub fn contains(&self, file_name: &str) -> bool {
        self.insar_products.iter().any(|p| p.file == file_name)
    }

    fn recompute(&mut self) {
        self.statistics = TrackStatistics {
            total_insar_short: self
                .insar_products
                .iter()
                .filter(|p| p.pair_type == PairType::Short)
                .count(),
            total_insar_long: self
                .insar_products
                .iter()
                .filter(|p| p.pair_type == PairType::Long)
                .count(),
            total_size_bytes: self.insar_products.iter().map(|p| p.size_bytes).sum(),
        };

        let dates: BTreeSet<&String> = self
            .insar_products
            .iter()
            .flat_map(|p| p.master_date.iter().chain(p.slave_date.iter()))
            .collect();
        self.temporal_range = match (dates.iter().next(), dates.iter().next_back()) {
            (Some(first), Some(last)) => Some(TemporalRange {
                start: (*first).clone(),
                end: (*last).clone(),
                num_dates: dates.len(),
            }),
            _ => None,
        };

        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

/// Canonical deduplicated storage for derived products
#[derive(Debug, Clone)]
pub struct ProductRepository {
    root: PathBuf,
}

impl ProductRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for one track key, e.g. `<root>/desc_iw1/t088`
    pub fn track_dir(&self, key: &TrackKey) -> PathBuf {
        self.root
            .join(format!(
                "{}_{}",
                key.orbit_direction.short(),
                key.subswath.short()
            ))
            .join(format!("t{:03}", key.track_number))
    }

    /// Canonical destination directory for one pair type
    pub fn product_dir(&self, key: &TrackKey, pair_type: PairType) -> PathBuf {
        self.track_dir(key).join("insar").join(pair_type.dir_name())
    }

    /// Create the full directory structure for a track
    pub fn ensure_track_structure(&self, key: &TrackKey) -> Result<PathBuf> {
        let track_dir = self.track_dir(key);
        std::fs::create_dir_all(track_dir.join("insar").join("short"))?;
        std::fs::create_dir_all(track_dir.join("insar").join("long"))?;
        std::fs::create_dir_all(track_dir.join("polarimetry"))?;
        Ok(track_dir)
    }

    pub fn metadata_path(&self, key: &TrackKey) -> PathBuf {
        self.track_dir(key).join("metadata.json")
    }

    /// Load the track metadata index, or an empty one if absent
    pub fn load_metadata(&self, key: &TrackKey) -> Result<TrackMetadata> {
        let path = self.metadata_path(key);
        if !path.exists() {
            return Ok(TrackMetadata::new(key));
        }
        let content = std::fs::read_to_string(&path)?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Internal(format!("corrupt metadata index {}: {}", path.display(), e)))
    }

    /// Rewrite the track metadata index, recomputing statistics and the
    /// temporal range first
    pub fn save_metadata(&self, key: &TrackKey, metadata: &mut TrackMetadata) -> Result<()> {
        metadata.recompute();
        let path = self.metadata_path(key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(metadata)
            .map_err(|e| Error::Internal(format!("serialize metadata index: {}", e)))?;
        std::fs::write(&path, content)?;
        tracing::debug!("Metadata index saved: {}", path.display());
        Ok(())
    }

    /// Append an index entry unless one already exists for that file name
    ///
    /// Returns false if the name was already registered (duplicate guard).
    pub fn register_product(&self, key: &TrackKey, product: RegisteredProduct) -> Result<bool> {
        let mut metadata = self.load_metadata(key)?;
        if metadata.contains(&product.file) {
            tracing::debug!("Already registered: {}", product.file);
            return Ok(false);
        }
        metadata.insar_products.push(product);
        self.save_metadata(key, &mut metadata)?;
        Ok(true)
    }

    /// Track keys present under the repository root
    pub fn list_tracks(&self) -> Result<Vec<TrackKey>> {
        let mut tracks = Vec::new();
        if !self.root.exists() {
            return Ok(tracks);
        }
        for group in std::fs::read_dir(&self.root)? {
            let group = group?;
            if !group.file_type()?.is_dir() {
                continue;
            }
            let name = group.file_name().to_string_lossy().to_string();
            let Some((orbit_part, subswath_part)) = name.split_once('_') else {
                continue;
            };
            let (Ok(orbit), Ok(subswath)) = (
                goshawk_common::OrbitDirection::from_str(orbit_part),
                Subswath::from_str(subswath_part),
            ) else {
                continue;
            };
            for entry in std::fs::read_dir(group.path())? {
                let entry = entry?;
                let track_name = entry.file_name().to_string_lossy().to_string();
                if let Some(number) = track_name
                    .strip_prefix('t')
                    .and_then(|n| n.parse::<u16>().ok())
                {
                    if let Ok(key) = TrackKey::new(orbit, subswath, number) {
                        tracks.push(key);
                    }
                }
            }
        }
        tracks.sort_by_key(|k| (k.orbit_direction.short(), k.subswath.short(), k.track_number));
        Ok(tracks)
    }
}

static PAIR_DATES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{8})_(\d{8})").expect("valid regex"));

/// Extract (master, slave) derivation dates from an interferogram file name,
/// e.g. `Ifg_20240101_20240113_IW1.dim`
pub fn derivation_dates_from_name(name: &str) -> Option<(String, String)> {
    let caps = PAIR_DATES_RE.captures(name)?;
    Some((caps[1].to_string(), caps[2].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use goshawk_common::OrbitDirection;

    fn key() -> TrackKey {
        TrackKey::new(OrbitDirection::Descending, Subswath::Iw1, 88).unwrap()
    }

    fn product(file: &str, pair_type: PairType, size: u64) -> RegisteredProduct {
        let dates = derivation_dates_from_name(file);
        RegisteredProduct {
            file: file.to_string(),
            pair_type,
            master_date: dates.as_ref().map(|(m, _)| m.clone()),
            slave_date: dates.as_ref().map(|(_, s)| s.clone()),
            size_bytes: size,
        }
    }

    #[test]
    fn layout_follows_track_key() {
        let repo = ProductRepository::new("/data/processed_products");
        let dir = repo.product_dir(&key(), PairType::Long);
        assert_eq!(
            dir,
            PathBuf::from("/data/processed_products/desc_iw1/t088/insar/long")
        );
    }

    #[test]
    fn track_structure_creates_all_layout_directories() {
        let dir = tempfile::tempdir().unwrap();
        let repo = ProductRepository::new(dir.path());

        let track_dir = repo.ensure_track_structure(&key()).unwrap();
        assert!(track_dir.join("insar").join("short").is_dir());
        assert!(track_dir.join("insar").join("long").is_dir());
        assert!(track_dir.join("polarimetry").is_dir());
    }

    #[test]
    fn duplicate_registration_is_guarded() {
        let dir = tempfile::tempdir().unwrap();
        let repo = ProductRepository::new(dir.path());

        let added = repo
            .register_product(&key(), product("Ifg_20240101_20240113.dim", PairType::Short, 100))
            .unwrap();
        assert!(added);

        let added = repo
            .register_product(&key(), product("Ifg_20240101_20240113.dim", PairType::Short, 100))
            .unwrap();
        assert!(!added);

        let metadata = repo.load_metadata(&key()).unwrap();
        assert_eq!(metadata.insar_products.len(), 1);
    }

    #[test]
    fn statistics_and_temporal_range_recomputed_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let repo = ProductRepository::new(dir.path());

        repo.register_product(&key(), product("Ifg_20240101_20240113.dim", PairType::Short, 100))
            .unwrap();
        repo.register_product(&key(), product("Ifg_20240101_20240125_LONG.dim", PairType::Long, 250))
            .unwrap();

        let metadata = repo.load_metadata(&key()).unwrap();
        assert_eq!(metadata.statistics.total_insar_short, 1);
        assert_eq!(metadata.statistics.total_insar_long, 1);
        assert_eq!(metadata.statistics.total_size_bytes, 350);

        let range = metadata.temporal_range.unwrap();
        assert_eq!(range.start, "20240101");
        assert_eq!(range.end, "20240125");
        assert_eq!(range.num_dates, 3);
    }

    #[test]
    fn list_tracks_scans_layout() {
        let dir = tempfile::tempdir().unwrap();
        let repo = ProductRepository::new(dir.path());
        repo.ensure_track_structure(&key()).unwrap();
        let other = TrackKey::new(OrbitDirection::Ascending, Subswath::Iw2, 15).unwrap();
        repo.ensure_track_structure(&other).unwrap();

        let tracks = repo.list_tracks().unwrap();
        assert_eq!(tracks, vec![other, key()]);
    }

    #[test]
    fn derivation_dates_parse_from_interferogram_names() {
        assert_eq!(
            derivation_dates_from_name("Ifg_20240101_20240113_IW1.dim"),
            Some(("20240101".to_string(), "20240113".to_string()))
        );
        assert_eq!(derivation_dates_from_name("no_dates_here.dim"), None);
    }
}
