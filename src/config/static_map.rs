//! The `static-map`: package name → theme → ordered file rules.
use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::logging::Log;
use crate::paths::{has_parent_segment, normalize_separators};

/// A destination theme identifier such as `package/theme`.
///
/// Always a normalized, non-empty, relative, forward-slash path without
/// `..` segments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThemeId(String);

impl ThemeId {
    /// Validate and normalize a raw identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTheme`] if the identifier is empty,
    /// absolute, or contains a `..` segment.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidTheme {
            theme: raw.to_string(),
            reason: reason.to_string(),
        };

        if raw.starts_with('/') || raw.starts_with('\\') {
            return Err(invalid("must be a relative path"));
        }
        let normalized = normalize_separators(raw);
        if normalized.is_empty() {
            return Err(invalid("must not be empty"));
        }
        if has_parent_segment(&normalized) {
            return Err(invalid("must not contain '..'"));
        }
        Ok(Self(normalized))
    }

    /// The identifier as normalized text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directory path under `app/design/frontend` with the first character
    /// of every segment upper-cased: `package/theme` → `Package/Theme`.
    #[must_use]
    pub fn design_path(&self) -> String {
        self.0
            .split('/')
            .map(capitalize)
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// One `{src, dest}` pair.
///
/// `src` is a path or glob relative to the package root; `dest` is relative
/// to the theme's `web` directory and may be empty for globs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRule {
    /// Source path or pattern, normalized.
    pub src: String,
    /// Destination path, normalized; empty means "mirror the source".
    pub dest: String,
}

impl FileRule {
    /// Build a rule, normalizing both sides.
    #[must_use]
    pub fn new(src: &str, dest: &str) -> Self {
        Self {
            src: normalize_separators(src),
            dest: normalize_separators(dest),
        }
    }

    /// Why the rule is unsafe to apply, if it is.
    ///
    /// Both sides must stay inside their base directory: a `..` segment in
    /// `src` leaves the package root and in `dest` leaves the theme's `web`
    /// directory, where cleanup would never find the link.
    #[must_use]
    pub fn escape_reason(&self) -> Option<String> {
        [("src", &self.src), ("dest", &self.dest)]
            .into_iter()
            .find(|(_, path)| has_parent_segment(path))
            .map(|(side, path)| format!("{side} \"{path}\" must not contain '..'"))
    }

    /// Whether `src` is a glob rather than a literal path.
    #[must_use]
    pub fn is_glob(&self) -> bool {
        self.src.contains('*')
    }
}

/// The themes mapped for one package, in deterministic order.
pub type ThemeMap = BTreeMap<ThemeId, Vec<FileRule>>;

/// Parsed `static-map`.  Immutable after loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawStaticMap")]
pub struct StaticMap {
    packages: BTreeMap<String, ThemeMap>,
}

#[derive(Debug, Deserialize)]
struct RawFileRule {
    src: String,
    #[serde(default)]
    dest: String,
}

type RawStaticMap = BTreeMap<String, BTreeMap<String, Vec<RawFileRule>>>;

impl TryFrom<RawStaticMap> for StaticMap {
    type Error = ConfigError;

    fn try_from(raw: RawStaticMap) -> Result<Self, Self::Error> {
        let mut map = Self::default();
        for (package, themes) in raw {
            map.packages.entry(package.clone()).or_default();
            for (theme, rules) in themes {
                let rules = rules
                    .into_iter()
                    .map(|r| FileRule::new(&r.src, &r.dest))
                    .collect();
                map = map.with_theme(&package, &theme, rules)?;
            }
        }
        Ok(map)
    }
}

impl StaticMap {
    /// Builder entry for hosts and tests: add `rules` for `package` under
    /// `theme`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTheme`] if `theme` is not a valid
    /// identifier, or [`ConfigError::InvalidRule`] if a rule would escape
    /// its package or theme directory.
    pub fn with_theme(
        mut self,
        package: &str,
        theme: &str,
        rules: Vec<FileRule>,
    ) -> Result<Self, ConfigError> {
        let theme = ThemeId::parse(theme)?;
        if let Some(reason) = rules.iter().find_map(FileRule::escape_reason) {
            return Err(ConfigError::InvalidRule {
                package: package.to_string(),
                theme: theme.to_string(),
                reason,
            });
        }
        self.packages
            .entry(package.to_string())
            .or_default()
            .insert(theme, rules);
        Ok(self)
    }

    /// Whether `package` has at least one theme entry.
    #[must_use]
    pub fn contains(&self, package: &str) -> bool {
        self.packages.get(package).is_some_and(|t| !t.is_empty())
    }

    /// Themes mapped for `package`, if any.
    #[must_use]
    pub fn themes(&self, package: &str) -> Option<&ThemeMap> {
        self.packages.get(package)
    }

    /// Like [`themes`](Self::themes), but reports a missing entry.
    pub fn lookup(&self, package: &str, log: &dyn Log) -> Option<&ThemeMap> {
        let themes = self.themes(package);
        if themes.is_none() {
            log.error(&format!("Mappings for {package} are not defined"));
        }
        themes
    }

    /// Mapped package names in sorted order.
    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    /// Whether no package is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}
