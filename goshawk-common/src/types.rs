//! Core domain types: track keys, subswaths, product types and statuses
//!
//! A *track* is a fixed satellite ground swath identified by orbit direction
//! plus relative orbit number; recurring acquisitions share one footprint.
//! Raw acquisitions always carry the generic subswath (`IW`) because one
//! capture contains all three sub-strips; derived products must carry a
//! specific subswath (`IW1`..`IW3`).

use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Valid relative orbit numbers for Sentinel-1
pub const TRACK_MIN: u16 = 1;
pub const TRACK_MAX: u16 = 175;

/// Orbit direction of a satellite pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrbitDirection {
    Ascending,
    Descending,
}

impl OrbitDirection {
    /// Full uppercase form used in the catalog (`ASCENDING` / `DESCENDING`)
    pub fn as_str(&self) -> &'static str {
        match self {
            OrbitDirection::Ascending => "ASCENDING",
            OrbitDirection::Descending => "DESCENDING",
        }
    }

    /// Short form used in repository paths (`asce` / `desc`)
    pub fn short(&self) -> &'static str {
        match self {
            OrbitDirection::Ascending => "asce",
            OrbitDirection::Descending => "desc",
        }
    }
}

impl FromStr for OrbitDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ascending" | "asce" | "asc" => Ok(OrbitDirection::Ascending),
            "descending" | "desc" | "dsc" => Ok(OrbitDirection::Descending),
            other => Err(Error::InvalidInput(format!(
                "unknown orbit direction: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for OrbitDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subswath of an interferometric wide-swath capture
///
/// `Iw` is the generic value carried by raw acquisitions; `Iw1`..`Iw3` are
/// the specific sub-strips that derived products must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Subswath {
    Iw,
    Iw1,
    Iw2,
    Iw3,
}

impl Subswath {
    pub fn as_str(&self) -> &'static str {
        match self {
            Subswath::Iw => "IW",
            Subswath::Iw1 => "IW1",
            Subswath::Iw2 => "IW2",
            Subswath::Iw3 => "IW3",
        }
    }

    /// Lowercase form used in repository paths (`iw1`, `iw2`, `iw3`)
    pub fn short(&self) -> &'static str {
        match self {
            Subswath::Iw => "iw",
            Subswath::Iw1 => "iw1",
            Subswath::Iw2 => "iw2",
            Subswath::Iw3 => "iw3",
        }
    }

    /// True for the generic `IW` value inherited from raw acquisitions
    pub fn is_generic(&self) -> bool {
        matches!(self, Subswath::Iw)
    }
}

impl FromStr for Subswath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "iw" => Ok(Subswath::Iw),
            "iw1" => Ok(Subswath::Iw1),
            "iw2" => Ok(Subswath::Iw2),
            "iw3" => Ok(Subswath::Iw3),
            other => Err(Error::InvalidInput(format!("unknown subswath: {}", other))),
        }
    }
}

impl fmt::Display for Subswath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies a fixed ground footprint shared by all acquisitions on it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackKey {
    pub orbit_direction: OrbitDirection,
    pub subswath: Subswath,
    pub track_number: u16,
}

impl TrackKey {
    /// Create a track key, validating the relative orbit range (1-175)
    pub fn new(
        orbit_direction: OrbitDirection,
        subswath: Subswath,
        track_number: u16,
    ) -> Result<Self> {
        if !(TRACK_MIN..=TRACK_MAX).contains(&track_number) {
            return Err(Error::InvalidInput(format!(
                "track number {} outside valid range {}-{}",
                track_number, TRACK_MIN, TRACK_MAX
            )));
        }
        Ok(Self {
            orbit_direction,
            subswath,
            track_number,
        })
    }

    /// Same key with a different subswath (acquisition queries use the
    /// generic subswath regardless of the requested specific one)
    pub fn with_subswath(&self, subswath: Subswath) -> Self {
        Self { subswath, ..*self }
    }

    /// Human-readable track identifier, e.g. `desc_iw1_t088`
    pub fn track_id(&self) -> String {
        format!(
            "{}_{}_t{:03}",
            self.orbit_direction.short(),
            self.subswath.short(),
            self.track_number
        )
    }
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.track_id())
    }
}

/// Processing status of a raw acquisition; advanced externally as downstream
/// stages run and observed read-only by the planner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AcquisitionStatus {
    Discovered,
    Downloaded,
    Processed,
}

impl AcquisitionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcquisitionStatus::Discovered => "DISCOVERED",
            AcquisitionStatus::Downloaded => "DOWNLOADED",
            AcquisitionStatus::Processed => "PROCESSED",
        }
    }
}

impl FromStr for AcquisitionStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "DISCOVERED" => Ok(AcquisitionStatus::Discovered),
            "DOWNLOADED" => Ok(AcquisitionStatus::Downloaded),
            "PROCESSED" => Ok(AcquisitionStatus::Processed),
            other => Err(Error::InvalidInput(format!(
                "unknown acquisition status: {}",
                other
            ))),
        }
    }
}

/// Catalog product type: raw acquisitions (`Slc`) and derived products
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductType {
    Slc,
    InsarShort,
    InsarLong,
    Polarimetry,
}

impl ProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Slc => "SLC",
            ProductType::InsarShort => "INSAR_SHORT",
            ProductType::InsarLong => "INSAR_LONG",
            ProductType::Polarimetry => "POLARIMETRY",
        }
    }

    /// The three derived product types, in decision-rule order
    pub fn derived() -> [ProductType; 3] {
        [
            ProductType::InsarShort,
            ProductType::InsarLong,
            ProductType::Polarimetry,
        ]
    }
}

impl FromStr for ProductType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "SLC" => Ok(ProductType::Slc),
            "INSAR_SHORT" => Ok(ProductType::InsarShort),
            "INSAR_LONG" => Ok(ProductType::InsarLong),
            "POLARIMETRY" => Ok(ProductType::Polarimetry),
            other => Err(Error::InvalidInput(format!(
                "unknown product type: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Temporal-baseline category of an interferometric pair
///
/// Short pairs join adjacent acquisitions; long pairs span multiple cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairType {
    Short,
    Long,
}

impl PairType {
    /// Repository subdirectory name (`insar/short`, `insar/long`)
    pub fn dir_name(&self) -> &'static str {
        match self {
            PairType::Short => "short",
            PairType::Long => "long",
        }
    }

    pub fn product_type(&self) -> ProductType {
        match self {
            PairType::Short => ProductType::InsarShort,
            PairType::Long => ProductType::InsarLong,
        }
    }
}

impl FromStr for PairType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "short" => Ok(PairType::Short),
            "long" => Ok(PairType::Long),
            other => Err(Error::InvalidInput(format!("unknown pair type: {}", other))),
        }
    }
}

/// Execution mode fixed once per invocation and carried by each engine
///
/// Dry-run must short-circuit before any filesystem or catalog mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    DryRun,
    Apply,
}

impl ExecutionMode {
    pub fn is_dry_run(&self) -> bool {
        matches!(self, ExecutionMode::DryRun)
    }

    pub fn from_dry_run_flag(dry_run: bool) -> Self {
        if dry_run {
            ExecutionMode::DryRun
        } else {
            ExecutionMode::Apply
        }
    }
}

static SCENE_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"S1([ABC])_IW_SLC__1S\w+_(\d{8})T\d{6}_\d{8}T\d{6}_(\d{6})_").expect("valid regex")
});

/// Derive the relative orbit (track number) from a Sentinel-1 SLC scene name
///
/// The absolute orbit is encoded in the scene id; relative orbit is
/// `(abs - 73) % 175 + 1` for S1A/S1C and `(abs - 27) % 175 + 1` for S1B.
pub fn track_from_scene_id(scene_id: &str) -> Option<u16> {
    let caps = SCENE_ID_RE.captures(scene_id)?;
    let satellite = caps.get(1)?.as_str();
    let absolute_orbit: u32 = caps.get(3)?.as_str().parse().ok()?;

    let offset = match satellite {
        "A" | "C" => 73,
        "B" => 27,
        _ => return None,
    };
    // Absolute orbits below the offset wrap around the 175-orbit cycle
    let relative = (absolute_orbit + 175 - (offset % 175)) % 175 + 1;
    Some(relative as u16)
}

/// Extract the acquisition start date (`YYYYMMDD`) from an SLC scene name
pub fn date_from_scene_id(scene_id: &str) -> Option<&str> {
    SCENE_ID_RE
        .captures(scene_id)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
}
