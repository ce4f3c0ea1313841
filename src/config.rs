use crate::error::{Error, Result};
use tracing::warn;

/// Prefix identifying a path inside the managed project tree.
pub const ROOT_MARKER: &str = "res://";

const DEFAULT_DIRECTORIES: &[&str] = &["res://assets/"];
const DEFAULT_EXTENSIONS: &[&str] = &[".png", ".tscn", ".json"];

/// Settings for a rename run: which files are eligible and how names are rewritten.
///
/// Use [`RenameConfig::builder()`] to construct a configuration, or
/// [`RenameConfig::default()`] for the default-filled one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct RenameConfig {
    /// Root-relative directory prefixes, e.g. `res://assets/`
    pub directories: Vec<String>,

    /// Lowercase extensions including the leading dot, e.g. `.png`
    pub extensions: Vec<String>,

    /// Override for the camel-boundary pattern
    pub camel_regex: Option<String>,

    /// Override for the separator pattern
    pub separator_regex: Option<String>,

    /// Whether the regex overrides are applied at all
    pub custom_regex_enabled: bool,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            directories: default_directories(),
            extensions: default_extensions(),
            camel_regex: None,
            separator_regex: None,
            custom_regex_enabled: false,
        }
    }
}

pub(crate) fn default_directories() -> Vec<String> {
    DEFAULT_DIRECTORIES.iter().map(ToString::to_string).collect()
}

pub(crate) fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect()
}

/// Returns true if `dir` is a storable directory prefix.
#[must_use]
pub fn is_valid_directory(dir: &str) -> bool {
    !dir.is_empty() && dir.starts_with(ROOT_MARKER)
}

/// Returns true if `ext` is a storable extension.
#[must_use]
pub fn is_valid_extension(ext: &str) -> bool {
    ext.len() > 1 && ext.starts_with('.')
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().to_lowercase()
}

fn normalize_pattern(pattern: Option<String>) -> Option<String> {
    pattern
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
}

fn push_unique(list: &mut Vec<String>, entry: String) -> bool {
    if list.contains(&entry) {
        return false;
    }
    list.push(entry);
    true
}

impl RenameConfig {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use res_rename::RenameConfig;
    ///
    /// let config = RenameConfig::builder()
    ///     .directory("res://sprites/")
    ///     .extension(".PNG")
    ///     .build()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.extensions, vec![".png"]);
    /// ```
    #[must_use]
    pub fn builder() -> RenameConfigBuilder {
        RenameConfigBuilder::default()
    }

    /// Creates a configuration with no directories and no extensions.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            directories: Vec::new(),
            extensions: Vec::new(),
            ..Self::default()
        }
    }

    /// Adds a directory prefix. Returns false if it was already present or blank.
    pub fn add_directory(&mut self, dir: impl AsRef<str>) -> bool {
        let dir = dir.as_ref().trim();
        if dir.is_empty() {
            return false;
        }
        push_unique(&mut self.directories, dir.to_string())
    }

    /// Removes a directory prefix. Returns false if it was not present.
    pub fn remove_directory(&mut self, dir: impl AsRef<str>) -> bool {
        let dir = dir.as_ref().trim();
        let before = self.directories.len();
        self.directories.retain(|d| d != dir);
        self.directories.len() != before
    }

    /// Adds an extension (lowercased). Returns false if it was already present or blank.
    pub fn add_extension(&mut self, ext: impl AsRef<str>) -> bool {
        let ext = normalize_extension(ext.as_ref());
        if ext.is_empty() {
            return false;
        }
        push_unique(&mut self.extensions, ext)
    }

    /// Removes an extension, compared case-insensitively. Returns false if it was not present.
    pub fn remove_extension(&mut self, ext: impl AsRef<str>) -> bool {
        let ext = normalize_extension(ext.as_ref());
        let before = self.extensions.len();
        self.extensions.retain(|e| *e != ext);
        self.extensions.len() != before
    }

    /// Restores the default directories and extensions and clears regex overrides.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Sets both regex overrides. Blank strings clear the override.
    pub fn set_patterns(&mut self, camel: Option<String>, separator: Option<String>) {
        self.camel_regex = normalize_pattern(camel);
        self.separator_regex = normalize_pattern(separator);
    }

    /// Returns a copy with every invalid entry removed.
    ///
    /// Directories are trimmed and must start with [`ROOT_MARKER`]. Extensions
    /// are trimmed, lowercased, must start with `.` and be longer than the dot.
    /// Duplicates keep their first position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if no valid directory or no valid extension remains.
    pub fn validated(&self) -> Result<Self> {
        let mut directories = Vec::with_capacity(self.directories.len());
        for dir in &self.directories {
            let dir = dir.trim();
            if is_valid_directory(dir) {
                push_unique(&mut directories, dir.to_string());
            } else {
                warn!("Dropping invalid directory '{}' (must start with {})", dir, ROOT_MARKER);
            }
        }

        let mut extensions = Vec::with_capacity(self.extensions.len());
        for ext in &self.extensions {
            let ext = normalize_extension(ext);
            if is_valid_extension(&ext) {
                push_unique(&mut extensions, ext);
            } else {
                warn!("Dropping invalid extension '{}' (expected e.g. .png)", ext);
            }
        }

        if directories.is_empty() || extensions.is_empty() {
            return Err(Error::validation(format!(
                "need at least one directory starting with {} and one extension like .png \
                 ({} valid directories, {} valid extensions)",
                ROOT_MARKER,
                directories.len(),
                extensions.len()
            )));
        }

        if self.custom_regex_enabled && (self.camel_regex.is_none() || self.separator_regex.is_none()) {
            warn!("Custom regex is enabled but a pattern is empty; the default is used for it");
        }

        Ok(Self {
            directories,
            extensions,
            camel_regex: normalize_pattern(self.camel_regex.clone()),
            separator_regex: normalize_pattern(self.separator_regex.clone()),
            custom_regex_enabled: self.custom_regex_enabled,
        })
    }

    /// Returns true if `path` starts with any configured directory prefix.
    ///
    /// Comparison is an exact, case-sensitive string prefix match.
    #[must_use]
    pub fn matches_directory(&self, path: &str) -> bool {
        self.directories.iter().any(|dir| path.starts_with(dir.as_str()))
    }

    /// Returns true if the lowercased `ext` is a configured extension.
    #[must_use]
    pub fn matches_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.extensions.iter().any(|e| *e == ext)
    }
}

/// Builder for creating a [`RenameConfig`].
#[derive(Debug, Default)]
pub struct RenameConfigBuilder {
    directories: Vec<String>,
    extensions: Vec<String>,
    camel_regex: Option<String>,
    separator_regex: Option<String>,
    custom_regex_enabled: bool,
}

impl RenameConfigBuilder {
    /// Adds a directory prefix.
    #[must_use]
    pub fn directory(mut self, dir: impl Into<String>) -> Self {
        self.directories.push(dir.into());
        self
    }

    /// Adds several directory prefixes.
    #[must_use]
    pub fn directories<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directories.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// Adds an extension.
    #[must_use]
    pub fn extension(mut self, ext: impl Into<String>) -> Self {
        self.extensions.push(ext.into());
        self
    }

    /// Adds several extensions.
    #[must_use]
    pub fn extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions.extend(exts.into_iter().map(Into::into));
        self
    }

    /// Sets the camel-boundary pattern override.
    #[must_use]
    pub fn camel_regex(mut self, pattern: impl Into<String>) -> Self {
        self.camel_regex = Some(pattern.into());
        self
    }

    /// Sets the separator pattern override.
    #[must_use]
    pub fn separator_regex(mut self, pattern: impl Into<String>) -> Self {
        self.separator_regex = Some(pattern.into());
        self
    }

    /// Enables or disables the regex overrides.
    #[must_use]
    pub fn custom_regex(mut self, enabled: bool) -> Self {
        self.custom_regex_enabled = enabled;
        self
    }

    /// Builds the configuration without validating it.
    #[must_use]
    pub fn build_unchecked(self) -> RenameConfig {
        let mut config = RenameConfig {
            directories: Vec::new(),
            extensions: Vec::new(),
            camel_regex: None,
            separator_regex: None,
            custom_regex_enabled: self.custom_regex_enabled,
        };
        for dir in self.directories {
            config.add_directory(dir);
        }
        for ext in self.extensions {
            config.add_extension(ext);
        }
        config.set_patterns(self.camel_regex, self.separator_regex);
        config
    }

    /// Builds the configuration, dropping invalid entries.
    ///
    /// # Errors
    ///
    /// Returns an error if no valid directory or extension remains.
    pub fn build(self) -> Result<RenameConfig> {
        self.build_unchecked().validated()
    }
}
