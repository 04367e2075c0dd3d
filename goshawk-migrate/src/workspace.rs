//! Workspace metadata inference
//!
//! A project workspace knows which track it sits on, but records it in
//! different places depending on age. Resolution order:
//! 1. `config.txt` (`ORBIT_DIRECTION=`, `SUBSWATH=`, `TRACK=` lines)
//! 2. Workspace directory name tokens (`desc`/`asce`, `iw1`..`iw3`)
//! 3. Track number from the first SLC scene name under `slc/`
//!
//! A workspace whose track key cannot be resolved is a structural failure
//! and aborts the migration run.

use goshawk_common::types::track_from_scene_id;
use goshawk_common::{Error, OrbitDirection, Result, Subswath, TrackKey};
use std::path::Path;
use std::str::FromStr;

/// Infer the track key of a project workspace
pub fn infer_track_key(workspace: &Path) -> Result<TrackKey> {
    if let Some(key) = from_config_file(workspace)? {
        return Ok(key);
    }

    let name = workspace
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let orbit = if name.contains("desc") {
        OrbitDirection::Descending
    } else if name.contains("asce") {
        OrbitDirection::Ascending
    } else {
        return Err(Error::Config(format!(
            "cannot determine orbit direction from workspace name: {}",
            name
        )));
    };

    let subswath = [Subswath::Iw1, Subswath::Iw2, Subswath::Iw3]
        .into_iter()
        .find(|s| name.contains(s.short()))
        .ok_or_else(|| {
            Error::Config(format!(
                "cannot determine subswath from workspace name: {}",
                name
            ))
        })?;

    let track = track_from_slc_dir(workspace).ok_or_else(|| {
        Error::Config(format!(
            "cannot determine track number for workspace: {}",
            workspace.display()
        ))
    })?;

    TrackKey::new(orbit, subswath, track)
}

/// Parse `config.txt` if present; returns None when the file is missing or
/// does not carry all three fields
fn from_config_file(workspace: &Path) -> Result<Option<TrackKey>> {
    let config_path = workspace.join("config.txt");
    if !config_path.exists() {
        return Ok(None);
    }

    let mut orbit = None;
    let mut subswath = None;
    let mut track = None;
    let content = std::fs::read_to_string(&config_path)?;
    for line in content.lines() {
        let line = line.trim();
        if let Some(value) = line.strip_prefix("ORBIT_DIRECTION=") {
            orbit = OrbitDirection::from_str(value.trim()).ok();
        } else if let Some(value) = line.strip_prefix("SUBSWATH=") {
            subswath = Subswath::from_str(value.trim()).ok();
        } else if let Some(value) = line.strip_prefix("TRACK=") {
            track = value.trim().parse::<u16>().ok();
        }
    }

    match (orbit, subswath, track) {
        (Some(orbit), Some(subswath), Some(track)) => {
            Ok(Some(TrackKey::new(orbit, subswath, track)?))
        }
        _ => Ok(None),
    }
}

/// Derive the track number from the first parseable SLC scene under `slc/`
fn track_from_slc_dir(workspace: &Path) -> Option<u16> {
    let slc_dir = workspace.join("slc");
    let entries = std::fs::read_dir(&slc_dir).ok()?;
    let mut names: Vec<String> = entries
        .flatten()
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names.iter().find_map(|name| track_from_scene_id(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        // Directory name would say ascending iw2; config.txt wins
        let workspace = dir.path().join("insar_asce_iw2");
        std::fs::create_dir_all(&workspace).unwrap();
        std::fs::write(
            workspace.join("config.txt"),
            "ORBIT_DIRECTION=DESCENDING\nSUBSWATH=IW1\nTRACK=88\n",
        )
        .unwrap();

        let key = infer_track_key(&workspace).unwrap();
        assert_eq!(key.track_id(), "desc_iw1_t088");
    }

    #[test]
    fn directory_name_plus_slc_scene_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = dir.path().join("insar_desc_iw1");
        std::fs::create_dir_all(workspace.join("slc")).unwrap();
        // abs orbit 051936 on S1A -> track 64
        std::fs::create_dir_all(workspace.join("slc").join(
            "S1A_IW_SLC__1SDV_20240101T060000_20240101T060027_051936_064573_AB12.SAFE",
        ))
        .unwrap();

        let key = infer_track_key(&workspace).unwrap();
        assert_eq!(key.orbit_direction, OrbitDirection::Descending);
        assert_eq!(key.subswath, Subswath::Iw1);
        assert_eq!(key.track_number, 64);
    }

    #[test]
    fn unresolvable_workspace_is_a_structural_failure() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = dir.path().join("mystery_project");
        std::fs::create_dir_all(&workspace).unwrap();

        assert!(infer_track_key(&workspace).is_err());
    }
}
