//! Installed packages as seen by the link and cleanup passes.
//!
//! The package manager records what it installed in
//! `<vendor-dir>/composer/installed.json`.  This module reads both layouts of
//! that file, unwraps aliases and hands the rest of the crate a flat list of
//! [`Package`] records.
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::static_map::StaticMap;
use crate::error::ConfigError;
use crate::logging::Log;
use crate::paths::{join_relative, normalize_lexical, normalize_separators};

/// Package type that marks a package as a static-asset package.
pub const STATIC_PACKAGE_TYPE: &str = "static";

/// Type assumed for packages that do not declare one.
const DEFAULT_PACKAGE_TYPE: &str = "library";

/// An installed package.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    /// Vendor-qualified name, e.g. `acme/brand-statics`.
    pub name: String,
    /// Absolute, lexically normalized install directory.
    pub source_root: PathBuf,
    /// Declared package type.
    pub package_type: String,
    /// Package-local `extra` block; carried through, not interpreted.
    pub extra: serde_json::Value,
}

impl Package {
    /// Create a package with an empty `extra` block.
    #[must_use]
    pub fn new(name: &str, source_root: &Path, package_type: &str) -> Self {
        Self {
            name: name.to_string(),
            source_root: normalize_lexical(source_root),
            package_type: package_type.to_string(),
            extra: serde_json::Value::Null,
        }
    }

    /// Whether this package is of the static-asset type.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.package_type == STATIC_PACKAGE_TYPE
    }
}

/// A package as listed by the package manager, possibly wrapped in alias
/// decorators. Branch aliases declared in `extra.branch-alias` are read as
/// [`LocalPackage::Alias`] entries.
///
/// An alias delegates its name and type to the package it wraps and must
/// never be treated as a separate package.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalPackage {
    /// A real installed package.
    Concrete(Package),
    /// An alias (e.g. a branch alias) of another package.
    Alias {
        /// Version string the alias advertises.
        version: String,
        /// The wrapped package, which may itself be an alias.
        alias_of: Box<LocalPackage>,
    },
}

impl LocalPackage {
    /// Unwrap any depth of aliasing down to the concrete package.
    #[must_use]
    pub fn into_package(self) -> Package {
        let mut current = self;
        loop {
            match current {
                Self::Concrete(package) => return package,
                Self::Alias { alias_of, .. } => current = *alias_of,
            }
        }
    }

    /// Name of the underlying package.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Concrete(package) => &package.name,
            Self::Alias { alias_of, .. } => alias_of.name(),
        }
    }
}

/// Unwrap `locals` and drop later duplicates of the same package name.
#[must_use]
pub fn unwrap_aliases(locals: Vec<LocalPackage>, log: &dyn Log) -> Vec<Package> {
    let mut seen = HashSet::new();
    locals
        .into_iter()
        .inspect(|local| {
            if let LocalPackage::Alias { version, .. } = local {
                log.debug(&format!("{} {version} is an alias", local.name()));
            }
        })
        .map(LocalPackage::into_package)
        .filter(|package| seen.insert(package.name.clone()))
        .collect()
}

#[derive(Debug, Deserialize)]
struct InstalledEntry {
    name: String,
    #[serde(rename = "type")]
    package_type: Option<String>,
    #[serde(rename = "install-path")]
    install_path: Option<String>,
    #[serde(rename = "target-dir")]
    target_dir: Option<String>,
    version: Option<String>,
    #[serde(default)]
    extra: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InstalledFile {
    /// Composer 2: `{"packages": [...], "dev": ..}`.
    Indexed { packages: Vec<InstalledEntry> },
    /// Composer 1: a bare array.
    Flat(Vec<InstalledEntry>),
}

impl InstalledEntry {
    /// Version this entry is aliased to through `extra.branch-alias`.
    fn branch_alias(&self) -> Option<String> {
        let version = self.version.as_deref()?;
        self.extra
            .get("branch-alias")?
            .get(version)?
            .as_str()
            .map(str::to_string)
    }

    /// The installed package, followed by its branch alias when it has one.
    fn into_locals(self, vendor_dir: &Path) -> Vec<LocalPackage> {
        let alias = self.branch_alias();
        let concrete = self.into_local(vendor_dir);
        match alias {
            Some(version) => vec![
                concrete.clone(),
                LocalPackage::Alias {
                    version,
                    alias_of: Box::new(concrete),
                },
            ],
            None => vec![concrete],
        }
    }

    fn into_local(self, vendor_dir: &Path) -> LocalPackage {
        let source_root = match (&self.install_path, &self.target_dir) {
            (Some(install_path), _) => vendor_dir.join("composer").join(install_path),
            (None, Some(target_dir)) => join_relative(
                &join_relative(vendor_dir, &self.name),
                &normalize_separators(target_dir),
            ),
            (None, None) => join_relative(vendor_dir, &self.name),
        };

        let mut package = Package::new(
            &self.name,
            &source_root,
            self.package_type.as_deref().unwrap_or(DEFAULT_PACKAGE_TYPE),
        );
        package.extra = self.extra;
        LocalPackage::Concrete(package)
    }
}

/// Parse the contents of an `installed.json`.
///
/// `vendor_dir` must be absolute; install paths are resolved against it.
/// A package whose version has a branch alias is followed by an
/// [`LocalPackage::Alias`] wrapping it.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSyntax`] if the content matches neither
/// layout.
pub fn parse_installed(
    content: &str,
    vendor_dir: &Path,
    file: &str,
) -> Result<Vec<LocalPackage>, ConfigError> {
    let parsed: InstalledFile =
        serde_json::from_str(content).map_err(|e| ConfigError::InvalidSyntax {
            file: file.to_string(),
            message: e.to_string(),
        })?;
    let entries = match parsed {
        InstalledFile::Indexed { packages } | InstalledFile::Flat(packages) => packages,
    };

    Ok(entries
        .into_iter()
        .flat_map(|entry| entry.into_locals(vendor_dir))
        .collect())
}

/// Path of the installed-package list for `vendor_dir`.
#[must_use]
pub fn installed_json_path(vendor_dir: &Path) -> PathBuf {
    vendor_dir.join("composer").join("installed.json")
}

/// Load installed packages from `<vendor_dir>/composer/installed.json`.
///
/// A missing file means nothing is installed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file exists but cannot be read, or
/// [`ConfigError::InvalidSyntax`] if it cannot be parsed.
pub fn load(vendor_dir: &Path, log: &dyn Log) -> Result<Vec<Package>, ConfigError> {
    let path = installed_json_path(vendor_dir);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log.debug(&format!("no installed packages at {}", path.display()));
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.display().to_string(),
                source,
            });
        }
    };

    let locals = parse_installed(&content, vendor_dir, &path.display().to_string())?;
    let packages = unwrap_aliases(locals, log);
    log.debug(&format!(
        "loaded {} installed package(s) from {}",
        packages.len(),
        path.display()
    ));
    Ok(packages)
}

/// Keep the packages of the static type that have at least one theme
/// mapped, in input order.
#[must_use]
pub fn select<'a>(packages: &'a [Package], static_map: &StaticMap) -> Vec<&'a Package> {
    packages
        .iter()
        .filter(|package| package.is_static() && static_map.contains(&package.name))
        .collect()
}
