//! Root manifest and installed-package configuration.
pub mod packages;
pub mod static_map;

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use static_map::StaticMap;

/// File name of the root manifest inside the project root.
pub const MANIFEST_FILE: &str = "composer.json";

/// Vendor directory used when the manifest does not set `config.vendor-dir`.
pub const DEFAULT_VENDOR_DIR: &str = "vendor";

/// Configuration read from the root manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootConfig {
    /// `extra.static-map`; `None` when the manifest defines no mapping.
    pub static_map: Option<StaticMap>,
    /// `extra.magento-root-dir`, relative to the project root.
    pub magento_root_dir: Option<PathBuf>,
    /// `config.vendor-dir`, as written in the manifest.
    pub vendor_dir: PathBuf,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            static_map: None,
            magento_root_dir: None,
            vendor_dir: PathBuf::from(DEFAULT_VENDOR_DIR),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Manifest {
    config: ManifestConfig,
    extra: ManifestExtra,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ManifestConfig {
    #[serde(rename = "vendor-dir")]
    vendor_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ManifestExtra {
    #[serde(rename = "static-map")]
    static_map: Option<StaticMap>,
    #[serde(rename = "magento-root-dir")]
    magento_root_dir: Option<String>,
}

impl RootConfig {
    /// Load the manifest at `manifest`, or `<project_root>/composer.json`
    /// when no explicit path is given.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::InvalidSyntax`] / [`ConfigError::InvalidTheme`] if its
    /// content is structurally invalid.
    pub fn load(project_root: &Path, manifest: Option<&Path>) -> Result<Self, ConfigError> {
        let path = manifest.map_or_else(
            || project_root.join(MANIFEST_FILE),
            |m| project_root.join(m),
        );
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content, &path.display().to_string())
    }

    /// Parse manifest content; `file` names the source in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSyntax`] for malformed JSON or invalid
    /// shapes, including an invalid theme identifier.
    pub fn from_json_str(content: &str, file: &str) -> Result<Self, ConfigError> {
        let manifest: Manifest =
            serde_json::from_str(content).map_err(|e| ConfigError::InvalidSyntax {
                file: file.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            static_map: manifest.extra.static_map,
            magento_root_dir: manifest.extra.magento_root_dir.map(PathBuf::from),
            vendor_dir: manifest
                .config
                .vendor_dir
                .map_or_else(|| PathBuf::from(DEFAULT_VENDOR_DIR), PathBuf::from),
        })
    }

    /// Absolute vendor directory for `project_root`.
    #[must_use]
    pub fn vendor_path(&self, project_root: &Path) -> PathBuf {
        crate::paths::normalize_lexical(&project_root.join(&self.vendor_dir))
    }
}
