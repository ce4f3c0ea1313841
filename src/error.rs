use serde::{Serialize, Serializer};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the res-rename library.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// IO error with context about the file path.
    #[error("IO error accessing '{path}': {message}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// A user-supplied name pattern failed to compile.
    #[error("Invalid name pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Reason why it's invalid
        reason: String,
    },

    /// Configuration has no usable directories or extensions.
    #[error("Invalid configuration: {message}")]
    Validation {
        /// Detailed error message
        message: String,
    },

    /// Config file is missing or cannot be parsed.
    #[error("Failed to load config '{path}': {message}")]
    ConfigLoad {
        /// Config file path
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// A rename of a single file failed.
    #[error("Failed to rename '{from}' to '{to}': {message}")]
    Rename {
        /// Root-relative source path
        from: String,
        /// Root-relative destination path
        to: String,
        /// Error message
        message: String,
    },

    /// The destination of a rename is already taken.
    #[error("Destination '{to}' is already taken{}", claimed_suffix(.claimed_by))]
    Collision {
        /// Root-relative destination path
        to: String,
        /// Source path that claimed the destination earlier in the same run
        claimed_by: Option<String>,
    },

    /// A path does not start with the project root marker.
    #[error("Path '{path}' is outside the project root: {reason}")]
    InvalidPath {
        /// The offending path
        path: String,
        /// Reason why it's invalid
        reason: String,
    },

    /// Serialization error.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message
        message: String,
    },
}

impl Error {
    /// Creates an IO error with path context.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Creates an invalid pattern error.
    #[must_use]
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a config load error.
    #[must_use]
    pub fn config_load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a rename error from an IO failure.
    #[must_use]
    pub fn rename(from: impl Into<String>, to: impl Into<String>, source: &std::io::Error) -> Self {
        Self::Rename {
            from: from.into(),
            to: to.into(),
            message: source.to_string(),
        }
    }

    /// Creates a collision error.
    #[must_use]
    pub fn collision(to: impl Into<String>, claimed_by: Option<String>) -> Self {
        Self::Collision {
            to: to.into(),
            claimed_by,
        }
    }

    /// Creates an invalid path error.
    #[must_use]
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this is an IO error.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns true if this is a pattern error.
    #[must_use]
    pub const fn is_pattern(&self) -> bool {
        matches!(self, Self::InvalidPattern { .. })
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns true if this is a collision error.
    #[must_use]
    pub const fn is_collision(&self) -> bool {
        matches!(self, Self::Collision { .. })
    }
}

fn claimed_suffix(claimed_by: &Option<String>) -> String {
    claimed_by
        .as_ref()
        .map(|source| format!(" by '{source}'"))
        .unwrap_or_default()
}

// Reports carry errors as their display text.
impl Serialize for Error {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization {
            message: e.to_string(),
        }
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Self::Serialization {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = Error::validation("no directories");
        assert!(err.is_validation());
        assert!(err.to_string().contains("no directories"));
    }

    #[test]
    fn test_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::io("/tmp/test.txt", io_err);
        assert!(err.is_io());
        assert!(err.to_string().contains("/tmp/test.txt"));
    }

    #[test]
    fn test_collision_message() {
        let err = Error::collision("res://a/foo.png", Some("res://a/Foo.png".to_string()));
        assert!(err.is_collision());
        assert_eq!(
            err.to_string(),
            "Destination 'res://a/foo.png' is already taken by 'res://a/Foo.png'"
        );

        let err = Error::collision("res://a/foo.png", None);
        assert_eq!(err.to_string(), "Destination 'res://a/foo.png' is already taken");
    }

    #[test]
    fn test_error_serializes_as_message() {
        let err = Error::invalid_pattern("(", "unclosed group");
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"Invalid name pattern '(': unclosed group\"");
    }
}
