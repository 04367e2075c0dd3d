//! Symlink-protected workspace cleanup
//!
//! After a crop completes, a workspace's intermediate directories can be
//! removed. A directory entry that is itself a symlink into shared storage
//! has only the link removed, never its target. The decision is made purely
//! from the filesystem link type, independent of naming convention.

use goshawk_common::{ExecutionMode, Result};
use std::path::Path;

/// Per-entry counts for a cleanup pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupStats {
    /// Symlinks removed (targets untouched)
    pub links_removed: usize,
    /// Real directories removed recursively
    pub dirs_removed: usize,
    /// Plain files removed
    pub files_removed: usize,
    /// Entries that did not exist
    pub missing: usize,
}

/// Workspace cleaner bound to one execution mode
pub struct WorkspaceCleaner {
    mode: ExecutionMode,
}

impl WorkspaceCleaner {
    pub fn new(mode: ExecutionMode) -> Self {
        Self { mode }
    }

    /// Remove the named entries under a workspace
    pub fn clean(&self, workspace: &Path, entries: &[&str]) -> Result<CleanupStats> {
        let mut stats = CleanupStats::default();

        for entry in entries {
            let path = workspace.join(entry);
            // symlink_metadata: never follow the link when classifying
            let metadata = match std::fs::symlink_metadata(&path) {
                Ok(metadata) => metadata,
                Err(_) => {
                    stats.missing += 1;
                    continue;
                }
            };

            if metadata.file_type().is_symlink() {
                if self.mode.is_dry_run() {
                    tracing::info!("[dry-run] would remove link only: {}", path.display());
                } else {
                    std::fs::remove_file(&path)?;
                    tracing::info!("Removed link (target kept): {}", path.display());
                }
                stats.links_removed += 1;
            } else if metadata.is_dir() {
                if self.mode.is_dry_run() {
                    tracing::info!("[dry-run] would remove directory: {}", path.display());
                } else {
                    std::fs::remove_dir_all(&path)?;
                    tracing::info!("Removed directory: {}", path.display());
                }
                stats.dirs_removed += 1;
            } else {
                if self.mode.is_dry_run() {
                    tracing::info!("[dry-run] would remove file: {}", path.display());
                } else {
                    std::fs::remove_file(&path)?;
                    tracing::info!("Removed file: {}", path.display());
                }
                stats.files_removed += 1;
            }
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_loses_only_the_link() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("shared_cache");
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(target.join("payload.bin"), b"keep me").unwrap();

        let workspace = dir.path().join("workspace");
        std::fs::create_dir_all(&workspace).unwrap();
        std::os::unix::fs::symlink(&target, workspace.join("preprocessed")).unwrap();

        let cleaner = WorkspaceCleaner::new(ExecutionMode::Apply);
        let stats = cleaner.clean(&workspace, &["preprocessed"]).unwrap();

        assert_eq!(stats.links_removed, 1);
        assert!(!workspace.join("preprocessed").exists());
        // Target and contents persist
        assert!(target.join("payload.bin").exists());
    }

    #[test]
    fn real_directory_is_removed_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = dir.path().join("workspace");
        std::fs::create_dir_all(workspace.join("slc").join("nested")).unwrap();
        std::fs::write(workspace.join("slc").join("nested").join("x"), b"x").unwrap();

        let cleaner = WorkspaceCleaner::new(ExecutionMode::Apply);
        let stats = cleaner.clean(&workspace, &["slc", "absent"]).unwrap();

        assert_eq!(stats.dirs_removed, 1);
        assert_eq!(stats.missing, 1);
        assert!(!workspace.join("slc").exists());
    }

    #[cfg(unix)]
    #[test]
    fn dry_run_removes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("shared");
        std::fs::create_dir_all(&target).unwrap();
        let workspace = dir.path().join("workspace");
        std::fs::create_dir_all(workspace.join("slc")).unwrap();
        std::os::unix::fs::symlink(&target, workspace.join("linked")).unwrap();

        let cleaner = WorkspaceCleaner::new(ExecutionMode::DryRun);
        let stats = cleaner.clean(&workspace, &["slc", "linked"]).unwrap();

        assert_eq!(stats.dirs_removed, 1);
        assert_eq!(stats.links_removed, 1);
        assert!(workspace.join("slc").exists());
        assert!(workspace.join("linked").exists());
    }
}
