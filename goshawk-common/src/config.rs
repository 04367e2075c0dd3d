//! Configuration loading and data-root resolution
//!
//! The data root holds the SQLite catalog (`catalog.db`) and the shared
//! product repository (`processed_products/`). Resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. `GOSHAWK_DATA_ROOT` environment variable
//! 3. TOML config file (`~/.config/goshawk/config.toml`)
//! 4. OS-dependent compiled default
//!
//! Missing config files degrade to defaults with a warning; they never abort
//! startup.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable overriding the data root
pub const DATA_ROOT_ENV: &str = "GOSHAWK_DATA_ROOT";

/// Optional TOML configuration file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Data root directory (catalog + repository)
    pub data_root: Option<String>,
}

/// Resolved per-invocation configuration
#[derive(Debug, Clone)]
pub struct GoshawkConfig {
    pub data_root: PathBuf,
}

impl GoshawkConfig {
    /// Resolve the data root from CLI argument, environment, TOML, default
    pub fn resolve(cli_arg: Option<&Path>) -> Self {
        let data_root = resolve_data_root(cli_arg);
        Self { data_root }
    }

    /// Path to the SQLite catalog database
    pub fn catalog_path(&self) -> PathBuf {
        self.data_root.join("catalog.db")
    }

    /// Root of the shared product repository
    pub fn repository_root(&self) -> PathBuf {
        self.data_root.join("processed_products")
    }

    /// Create the data root directory if missing
    pub fn ensure_data_root(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_root)?;
        Ok(())
    }
}

fn resolve_data_root(cli_arg: Option<&Path>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(DATA_ROOT_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(config_path) = default_config_path() {
        if config_path.exists() {
            match load_toml_config(&config_path) {
                Ok(config) => {
                    if let Some(root) = config.data_root {
                        return PathBuf::from(root);
                    }
                }
                Err(e) => {
                    warn!("Ignoring unreadable config {}: {}", config_path.display(), e);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_data_root()
}

/// Load and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| crate::Error::Config(format!("parse {} failed: {}", path.display(), e)))
}

/// Default configuration file path for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("goshawk").join("config.toml"))
}

/// OS-dependent default data root
pub fn default_data_root() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("goshawk"))
        .unwrap_or_else(|| PathBuf::from("/var/lib/goshawk"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_argument_wins() {
        let config = GoshawkConfig::resolve(Some(Path::new("/tmp/goshawk-test-root")));
        assert_eq!(config.data_root, PathBuf::from("/tmp/goshawk-test-root"));
        assert_eq!(
            config.catalog_path(),
            PathBuf::from("/tmp/goshawk-test-root/catalog.db")
        );
        assert_eq!(
            config.repository_root(),
            PathBuf::from("/tmp/goshawk-test-root/processed_products")
        );
    }

    #[test]
    fn default_root_is_nonempty() {
        assert!(!default_data_root().as_os_str().is_empty());
    }

    #[test]
    fn toml_config_parses_data_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "data_root = \"/srv/goshawk\"\n").unwrap();
        let config = load_toml_config(&path).unwrap();
        assert_eq!(config.data_root.as_deref(), Some("/srv/goshawk"));
    }
}
