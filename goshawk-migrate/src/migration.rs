//! Migration engine: copy -> verify -> delete -> link
//!
//! Moves a workspace artifact into the canonical repository and replaces it
//! with an absolute symlink. The ordering is the component's core contract:
//! the local artifact is never deleted until a verified replacement is in
//! place. Verification is size-based, not hash-based; truncated copies are
//! the dominant real failure mode and hashing multi-gigabyte artifacts is
//! costly.
//!
//! Concurrent migrations on the same track key are unsafe against each
//! other; callers serialize.

use crate::repository::{derivation_dates_from_name, ProductRepository, RegisteredProduct};
use goshawk_common::{Error, ExecutionMode, PairType, Result, TrackKey};
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Outcome of migrating one artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// Local artifact is already a symlink into the repository
    SkippedAlreadyLink,
    /// Copied to the canonical location, verified, local replaced by links
    CopiedAndLinked,
    /// Dry-run: states the mutation that would occur
    WouldCopyAndLink,
    /// Destination did not verify; local artifact left fully intact
    VerificationFailed(String),
    /// Artifact could not be migrated (missing sidecar, I/O error, ...)
    Failed(String),
}

impl fmt::Display for MigrationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationOutcome::SkippedAlreadyLink => write!(f, "already a symlink"),
            MigrationOutcome::CopiedAndLinked => write!(f, "copied and linked"),
            MigrationOutcome::WouldCopyAndLink => {
                write!(f, "would copy to repository and replace with symlink")
            }
            MigrationOutcome::VerificationFailed(detail) => {
                write!(f, "verification failed ({}), local kept", detail)
            }
            MigrationOutcome::Failed(detail) => write!(f, "failed: {}", detail),
        }
    }
}

/// Per-outcome counts for a migration batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationStats {
    pub already_linked: usize,
    pub migrated: usize,
    pub would_migrate: usize,
    pub verification_failed: usize,
    pub failed: usize,
}

impl MigrationStats {
    pub fn record(&mut self, outcome: &MigrationOutcome) {
        match outcome {
            MigrationOutcome::SkippedAlreadyLink => self.already_linked += 1,
            MigrationOutcome::CopiedAndLinked => self.migrated += 1,
            MigrationOutcome::WouldCopyAndLink => self.would_migrate += 1,
            MigrationOutcome::VerificationFailed(_) => self.verification_failed += 1,
            MigrationOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// True when no item failed (the batch may still exit non-zero overall)
    pub fn is_clean(&self) -> bool {
        self.verification_failed == 0 && self.failed == 0
    }

    pub fn total(&self) -> usize {
        self.already_linked + self.migrated + self.would_migrate + self.verification_failed + self.failed
    }
}

/// Migration engine bound to one repository and one execution mode
pub struct MigrationEngine {
    repository: ProductRepository,
    mode: ExecutionMode,
}

impl MigrationEngine {
    pub fn new(repository: ProductRepository, mode: ExecutionMode) -> Self {
        Self { repository, mode }
    }

    pub fn repository(&self) -> &ProductRepository {
        &self.repository
    }

    /// Migrate one artifact (primary file plus `.data` sidecar directory)
    ///
    /// Per-item failures are reported in the outcome, never propagated, so a
    /// batch continues past them.
    pub fn migrate(
        &self,
        local_artifact: &Path,
        key: &TrackKey,
        pair_type: PairType,
    ) -> MigrationOutcome {
        match self.try_migrate(local_artifact, key, pair_type) {
            Ok(outcome) => outcome,
            Err(Error::IntegrityMismatch(detail)) => MigrationOutcome::VerificationFailed(detail),
            Err(e) => MigrationOutcome::Failed(e.to_string()),
        }
    }

    fn try_migrate(
        &self,
        local: &Path,
        key: &TrackKey,
        pair_type: PairType,
    ) -> Result<MigrationOutcome> {
        // 1. Already migrated: the local path is a link into shared storage
        if local.is_symlink() {
            return Ok(MigrationOutcome::SkippedAlreadyLink);
        }

        if !local.exists() {
            return Err(Error::NotFound(format!(
                "local artifact missing: {}",
                local.display()
            )));
        }
        let local_sidecar = local.with_extension("data");
        if !local_sidecar.exists() {
            return Err(Error::NotFound(format!(
                "sidecar missing: {}",
                local_sidecar.display()
            )));
        }

        // 2. Canonical destination from key + pair type + name
        let file_name = local
            .file_name()
            .ok_or_else(|| Error::InvalidInput(format!("no file name: {}", local.display())))?
            .to_string_lossy()
            .to_string();
        let dest = self.repository.product_dir(key, pair_type).join(&file_name);
        let dest_sidecar = dest.with_extension("data");

        // 3. Dry-run short-circuits before any filesystem mutation
        if self.mode.is_dry_run() {
            tracing::info!(
                "[dry-run] would migrate {} -> {}",
                local.display(),
                dest.display()
            );
            return Ok(MigrationOutcome::WouldCopyAndLink);
        }

        self.repository.ensure_track_structure(key)?;

        // 4. Copy primary + sidecar if the destination is absent
        if !dest.exists() {
            tracing::info!("Copying {} -> {}", file_name, dest.display());
            std::fs::copy(local, &dest)?;
            if dest_sidecar.exists() {
                std::fs::remove_dir_all(&dest_sidecar)?;
            }
            copy_dir_recursive(&local_sidecar, &dest_sidecar)?;

            let dates = derivation_dates_from_name(&file_name);
            self.repository.register_product(
                key,
                RegisteredProduct {
                    file: file_name.clone(),
                    pair_type,
                    master_date: dates.as_ref().map(|(m, _)| m.clone()),
                    slave_date: dates.as_ref().map(|(_, s)| s.clone()),
                    size_bytes: std::fs::metadata(local)?.len(),
                },
            )?;
        } else {
            tracing::debug!("Already in repository: {}", file_name);
        }

        // 5. Verify before touching the local copy. A stale partial copy
        // from an interrupted earlier run surfaces here as a size mismatch
        // and is left in place for manual inspection, never auto-purged.
        self.verify_copy(local, &dest, &dest_sidecar)?;

        // 6. Verified: remove local artifact and link to the canonical copy
        std::fs::remove_file(local)?;
        std::fs::remove_dir_all(&local_sidecar)?;

        let dest_abs = dest.canonicalize()?;
        let dest_sidecar_abs = dest_sidecar.canonicalize()?;
        make_symlink(&dest_abs, local)?;
        make_symlink(&dest_sidecar_abs, &local_sidecar)?;
        tracing::info!("Linked {} -> {}", local.display(), dest_abs.display());

        Ok(MigrationOutcome::CopiedAndLinked)
    }

    fn verify_copy(&self, local: &Path, dest: &Path, dest_sidecar: &Path) -> Result<()> {
        if !dest.exists() {
            return Err(Error::IntegrityMismatch(format!(
                "destination missing: {}",
                dest.display()
            )));
        }
        if !dest_sidecar.exists() {
            return Err(Error::IntegrityMismatch(format!(
                "destination sidecar missing: {}",
                dest_sidecar.display()
            )));
        }
        let local_size = std::fs::metadata(local)?.len();
        let dest_size = std::fs::metadata(dest)?.len();
        if local_size != dest_size {
            return Err(Error::IntegrityMismatch(format!(
                "size mismatch: local {} vs destination {} bytes",
                local_size, dest_size
            )));
        }
        Ok(())
    }

    /// Migrate every `.dim` artifact under `insar/short` and `insar/long`
    pub fn migrate_workspace(&self, workspace: &Path, key: &TrackKey) -> Result<MigrationStats> {
        if !workspace.exists() {
            return Err(Error::NotFound(format!(
                "workspace missing: {}",
                workspace.display()
            )));
        }

        let mut stats = MigrationStats::default();
        for pair_type in [PairType::Short, PairType::Long] {
            let source_dir = workspace.join("insar").join(pair_type.dir_name());
            if !source_dir.exists() {
                continue;
            }
            for artifact in sorted_artifacts(&source_dir)? {
                let outcome = self.migrate(&artifact, key, pair_type);
                let name = artifact
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                match &outcome {
                    MigrationOutcome::VerificationFailed(_) | MigrationOutcome::Failed(_) => {
                        tracing::error!("{}: {}", name, outcome);
                    }
                    _ => tracing::info!("{}: {}", name, outcome),
                }
                stats.record(&outcome);
            }
        }
        Ok(stats)
    }
}

/// `.dim` artifacts in a directory, sorted by name for stable batch order
fn sorted_artifacts(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut artifacts = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().map(|e| e == "dim").unwrap_or(false) {
            artifacts.push(path);
        }
    }
    artifacts.sort();
    Ok(artifacts)
}

/// Recursively copy a sidecar directory
fn copy_dir_recursive(source: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| Error::Internal(e.to_string()))?;
        let target = dest.join(relative);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn make_symlink(original: &Path, link: &Path) -> Result<()> {
    std::os::unix::fs::symlink(original, link)?;
    Ok(())
}

#[cfg(windows)]
fn make_symlink(original: &Path, link: &Path) -> Result<()> {
    if original.is_dir() {
        std::os::windows::fs::symlink_dir(original, link)?;
    } else {
        std::os::windows::fs::symlink_file(original, link)?;
    }
    Ok(())
}
