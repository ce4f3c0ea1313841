//! Persistent rename settings.
//!
//! Settings live in a TOML file with a single `[settings]` table:
//!
//! ```toml
//! [settings]
//! dirs = ["res://assets/"]
//! extensions = [".png", ".tscn", ".json"]
//! camel_case_regex = ""
//! separator_regex = ""
//! custom_regex_enabled = false
//! ```
//!
//! Missing keys default to an empty list, an empty string or `false`.

use crate::{
    config::{default_directories, default_extensions, RenameConfig},
    error::{Error, Result},
    tree::ProjectRoot,
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Location of the settings file relative to the project root.
pub const DEFAULT_CONFIG_PATH: &str = "addons/rename_tool/rename_tool.toml";

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    settings: Settings,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Settings {
    dirs: Vec<String>,
    extensions: Vec<String>,
    camel_case_regex: String,
    separator_regex: String,
    custom_regex_enabled: bool,
}

impl From<&RenameConfig> for Settings {
    fn from(config: &RenameConfig) -> Self {
        Self {
            dirs: config.directories.clone(),
            extensions: config.extensions.clone(),
            camel_case_regex: config.camel_regex.clone().unwrap_or_default(),
            separator_regex: config.separator_regex.clone().unwrap_or_default(),
            custom_regex_enabled: config.custom_regex_enabled,
        }
    }
}

impl From<Settings> for RenameConfig {
    fn from(settings: Settings) -> Self {
        let mut config = Self::empty();
        for dir in settings.dirs {
            config.add_directory(dir);
        }
        for ext in settings.extensions {
            config.add_extension(ext);
        }
        if config.directories.is_empty() {
            config.directories = default_directories();
        }
        if config.extensions.is_empty() {
            config.extensions = default_extensions();
        }
        config.set_patterns(Some(settings.camel_case_regex), Some(settings.separator_regex));
        config.custom_regex_enabled = settings.custom_regex_enabled;
        config
    }
}

/// Loads and saves [`RenameConfig`] at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Creates a store backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store at [`DEFAULT_CONFIG_PATH`] inside the project.
    #[must_use]
    pub fn for_project(root: &ProjectRoot) -> Self {
        Self::new(root.dir().join(DEFAULT_CONFIG_PATH))
    }

    /// The settings file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the settings, falling back to the default configuration.
    ///
    /// A missing or unreadable file is not an error; it is logged and the
    /// default-filled configuration is returned. Empty directory or extension
    /// lists are default-filled as well.
    #[must_use]
    pub fn load(&self) -> RenameConfig {
        match self.try_load() {
            Ok(config) => {
                info!("Loaded config from {}", self.path.display());
                config
            }
            Err(e) => {
                info!("{}; using default config", e);
                RenameConfig::default()
            }
        }
    }

    /// Loads the settings without falling back.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigLoad`] if the file cannot be read or parsed.
    pub fn try_load(&self) -> Result<RenameConfig> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| Error::config_load(&self.path, e.to_string()))?;
        let file: ConfigFile =
            toml::from_str(&content).map_err(|e| Error::config_load(&self.path, e.to_string()))?;
        Ok(file.settings.into())
    }

    /// Validates and persists the settings, returning what was written.
    ///
    /// Invalid directories and extensions are dropped before writing. The
    /// file is replaced atomically; on any error the previous file is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if no valid directory or extension
    /// remains, or an IO error if the file cannot be written.
    pub fn save(&self, config: &RenameConfig) -> Result<RenameConfig> {
        let config = config.validated()?;
        let file = ConfigFile {
            settings: Settings::from(&config),
        };
        let content = toml::to_string_pretty(&file)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        write_file_atomic(&self.path, &content)?;

        info!("Config saved to {}", self.path.display());
        Ok(config)
    }
}

/// Writes to a sibling temporary file, syncs it and renames it over `path`.
fn write_file_atomic(path: &Path, content: &str) -> Result<()> {
    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let mut temp_file = fs::File::create(&temp_path).map_err(|e| Error::io(&temp_path, e))?;
    temp_file
        .write_all(content.as_bytes())
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;
    drop(temp_file);

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(path, e));
    }

    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    fn store_in(temp: &assert_fs::TempDir) -> ConfigStore {
        ConfigStore::for_project(&ProjectRoot::new(temp.path()))
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let temp = assert_fs::TempDir::new().unwrap();
        let store = store_in(&temp);

        assert!(store.try_load().is_err());
        assert_eq!(store.load(), RenameConfig::default());
    }

    #[test]
    fn test_load_corrupt_file_returns_defaults() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child(DEFAULT_CONFIG_PATH).write_str("[settings\ndirs = ").unwrap();

        let store = store_in(&temp);
        assert!(matches!(store.try_load(), Err(Error::ConfigLoad { .. })));
        assert_eq!(store.load(), RenameConfig::default());
    }

    #[test]
    fn test_missing_keys_default() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child(DEFAULT_CONFIG_PATH)
            .write_str("[settings]\ndirs = [\"res://sprites/\"]\n")
            .unwrap();

        let config = store_in(&temp).try_load().unwrap();
        assert_eq!(config.directories, vec!["res://sprites/"]);
        assert_eq!(config.extensions, vec![".png", ".tscn", ".json"]);
        assert_eq!(config.camel_regex, None);
        assert!(!config.custom_regex_enabled);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let temp = assert_fs::TempDir::new().unwrap();
        let store = store_in(&temp);

        let config = RenameConfig::builder()
            .directories(["res://assets/", "res://ui/"])
            .extensions([".png", ".ogg"])
            .camel_regex("([a-z])([A-Z])")
            .separator_regex(r"[\s\-\.]+")
            .custom_regex(true)
            .build()
            .unwrap();

        let saved = store.save(&config).unwrap();
        assert_eq!(saved, config);
        assert_eq!(store.try_load().unwrap(), config);
    }

    #[test]
    fn test_save_filters_invalid_entries() {
        let temp = assert_fs::TempDir::new().unwrap();
        let store = store_in(&temp);

        let mut config = RenameConfig::empty();
        config.add_directory("res://assets/");
        config.add_directory("/abs/path");
        config.add_extension(".PNG");
        config.add_extension("json");

        let saved = store.save(&config).unwrap();
        assert_eq!(saved.directories, vec!["res://assets/"]);
        assert_eq!(saved.extensions, vec![".png"]);

        let content = fs::read_to_string(store.path()).unwrap();
        assert!(!content.contains("/abs/path"));
        assert!(content.contains("[settings]"));
    }

    #[test]
    fn test_failed_validation_keeps_previous_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let store = store_in(&temp);
        store.save(&RenameConfig::default()).unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        let bad = RenameConfig::builder()
            .directory("not_a_root_path")
            .extension(".png")
            .build_unchecked();
        let err = store.save(&bad).unwrap_err();

        assert!(err.is_validation());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn test_failed_validation_creates_nothing() {
        let temp = assert_fs::TempDir::new().unwrap();
        let store = store_in(&temp);

        assert!(store.save(&RenameConfig::empty()).is_err());
        assert!(!store.path().exists());
    }
}
