//! Name normalization.
//!
//! Turns a base filename into snake_case in three steps: a separator is
//! inserted at camel-case boundaries, runs of separator characters are
//! collapsed to `_`, and the result is lowercased. The extension is kept
//! and lowercased.

use crate::config::RenameConfig;
use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

/// Default camel-boundary pattern: a lowercase letter or digit followed by an uppercase letter.
pub const DEFAULT_CAMEL_PATTERN: &str = "([a-z0-9])([A-Z])";

/// Default separator pattern: one or more whitespace or hyphen characters.
pub const DEFAULT_SEPARATOR_PATTERN: &str = r"[\s\-]+";

const CAMEL_REPLACEMENT: &str = "${1}_${2}";

static DEFAULT_CAMEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_CAMEL_PATTERN).expect("default camel pattern compiles"));

static DEFAULT_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_SEPARATOR_PATTERN).expect("default separator pattern compiles"));

/// The compiled pair of patterns used for one run.
///
/// Resolved once per invocation and never re-resolved mid-traversal.
#[derive(Debug, Clone)]
pub struct NamePatterns {
    camel: Regex,
    separator: Regex,
    custom: bool,
}

impl Default for NamePatterns {
    fn default() -> Self {
        Self {
            camel: DEFAULT_CAMEL.clone(),
            separator: DEFAULT_SEPARATOR.clone(),
            custom: false,
        }
    }
}

impl NamePatterns {
    /// Compiles user overrides. `None` or blank keeps the default for that side.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] for the first override that fails to compile.
    pub fn try_from_overrides(camel: Option<&str>, separator: Option<&str>) -> Result<Self> {
        let compile = |pattern: Option<&str>, fallback: &Regex| -> Result<(Regex, bool)> {
            match pattern.map(str::trim).filter(|p| !p.is_empty()) {
                Some(p) => Regex::new(p)
                    .map(|re| (re, true))
                    .map_err(|e| Error::invalid_pattern(p, e.to_string())),
                None => Ok((fallback.clone(), false)),
            }
        };

        let (camel, camel_custom) = compile(camel, &*DEFAULT_CAMEL)?;
        let (separator, separator_custom) = compile(separator, &*DEFAULT_SEPARATOR)?;

        Ok(Self {
            camel,
            separator,
            custom: camel_custom || separator_custom,
        })
    }

    /// Chooses the patterns for a run.
    ///
    /// Defaults are used when custom regex is disabled. If any enabled override
    /// is malformed, both patterns fall back to the defaults and a warning is logged.
    #[must_use]
    pub fn resolve(config: &RenameConfig) -> Self {
        if !config.custom_regex_enabled {
            return Self::default();
        }

        match Self::try_from_overrides(config.camel_regex.as_deref(), config.separator_regex.as_deref()) {
            Ok(patterns) => {
                debug!(
                    "Using name patterns camel={} separator={}",
                    patterns.camel.as_str(),
                    patterns.separator.as_str()
                );
                patterns
            }
            Err(e) => {
                warn!("{}; falling back to default patterns", e);
                Self::default()
            }
        }
    }

    /// Returns true if at least one override is in effect.
    #[must_use]
    pub const fn is_custom(&self) -> bool {
        self.custom
    }

    /// Camel-boundary pattern source.
    #[must_use]
    pub fn camel_pattern(&self) -> &str {
        self.camel.as_str()
    }

    /// Separator pattern source.
    #[must_use]
    pub fn separator_pattern(&self) -> &str {
        self.separator.as_str()
    }
}

/// Normalizes a base name and reattaches its lowercased extension.
///
/// `extension` includes the leading dot and may be empty.
///
/// # Examples
///
/// ```
/// use res_rename::{normalize, NamePatterns};
///
/// let patterns = NamePatterns::default();
/// assert_eq!(normalize("fooBarBaz", ".png", &patterns), "foo_bar_baz.png");
/// assert_eq!(normalize("My Cool-File", ".TSCN", &patterns), "my_cool_file.tscn");
/// ```
#[must_use]
pub fn normalize(name: &str, extension: &str, patterns: &NamePatterns) -> String {
    let name = patterns.camel.replace_all(name, CAMEL_REPLACEMENT);
    let name = patterns.separator.replace_all(&name, "_");

    let mut out = name.to_lowercase();
    out.push_str(&extension.to_lowercase());
    out
}

/// Splits a file name into base name and extension (with the dot).
///
/// A leading dot does not start an extension, so `.gitignore` has none.
#[must_use]
pub fn split_file_name(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => file_name.split_at(idx),
        _ => (file_name, ""),
    }
}

/// Normalizes a full file name, extension included.
#[must_use]
pub fn normalize_file_name(file_name: &str, patterns: &NamePatterns) -> String {
    let (name, extension) = split_file_name(file_name);
    normalize(name, extension, patterns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_normalize(file_name: &str) -> String {
        normalize_file_name(file_name, &NamePatterns::default())
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(default_normalize("fooBarBaz.png"), "foo_bar_baz.png");
        assert_eq!(default_normalize("PlayerIdle2Frame.png"), "player_idle2_frame.png");
        assert_eq!(default_normalize("level1Boss.tscn"), "level1_boss.tscn");
    }

    #[test]
    fn test_separators_and_extension_case() {
        assert_eq!(default_normalize("My Cool-File.TSCN"), "my_cool_file.tscn");
        assert_eq!(default_normalize("a  - b.json"), "a_b.json");
    }

    #[test]
    fn test_already_snake_is_unchanged() {
        assert_eq!(default_normalize("already_snake.json"), "already_snake.json");
    }

    #[test]
    fn test_idempotence() {
        let names = [
            "fooBarBaz.png",
            "My Cool-File.TSCN",
            "HTTPServer.json",
            "x-Y z.PNG",
            "already_snake.json",
            "Über Straße.png",
            "noext",
        ];
        for name in names {
            let once = default_normalize(name);
            let twice = default_normalize(&once);
            assert_eq!(once, twice, "not idempotent for {name}");
        }
    }

    #[test]
    fn test_extension_only_case_folded() {
        for name in ["fooBar.PnG", "Some File.tScN", "a-b.JSON"] {
            let (_, ext) = split_file_name(name);
            let normalized = default_normalize(name);
            let (_, new_ext) = split_file_name(&normalized);
            assert_eq!(new_ext, ext.to_lowercase());
        }
    }

    #[test]
    fn test_split_file_name() {
        assert_eq!(split_file_name("icon.png"), ("icon", ".png"));
        assert_eq!(split_file_name("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_file_name(".gitignore"), (".gitignore", ""));
        assert_eq!(split_file_name("README"), ("README", ""));
    }

    #[test]
    fn test_custom_overrides() {
        let patterns = NamePatterns::try_from_overrides(None, Some(r"[\s\-\.]+")).unwrap();
        assert!(patterns.is_custom());
        assert_eq!(patterns.camel_pattern(), DEFAULT_CAMEL_PATTERN);
        assert_eq!(normalize("my.cool-Name", ".png", &patterns), "my_cool_name.png");
    }

    #[test]
    fn test_malformed_override_is_reported() {
        let err = NamePatterns::try_from_overrides(Some("([a-z]"), None).unwrap_err();
        assert!(err.is_pattern());
        assert!(matches!(&err, Error::InvalidPattern { pattern, .. } if pattern == "([a-z]"));
    }

    #[test]
    fn test_resolve_falls_back_on_malformed_override() {
        let config = RenameConfig::builder()
            .directory("res://assets/")
            .extension(".png")
            .camel_regex("([a-z])(?P<upper>[A-Z])")
            .separator_regex("[")
            .custom_regex(true)
            .build()
            .unwrap();

        let patterns = NamePatterns::resolve(&config);
        assert!(!patterns.is_custom());
        assert_eq!(patterns.camel_pattern(), DEFAULT_CAMEL_PATTERN);
        assert_eq!(patterns.separator_pattern(), DEFAULT_SEPARATOR_PATTERN);
    }

    #[test]
    fn test_resolve_ignores_overrides_when_disabled() {
        let config = RenameConfig::builder()
            .directory("res://assets/")
            .extension(".png")
            .separator_regex("x")
            .custom_regex(false)
            .build()
            .unwrap();

        assert!(!NamePatterns::resolve(&config).is_custom());
    }
}
