//! Error types for the pipeconf library.
//!
//! This module provides the error hierarchy for building, addressing and
//! comparing pipeline configurations, using `thiserror` for ergonomic error
//! handling.
//!
//! Only hard failures are represented here. Unresolvable template references
//! are reported as [`TemplateWarning`](crate::config::TemplateWarning)s
//! and unresolvable environment tokens are left as literal text, so neither
//! aborts construction.

use thiserror::Error;

/// Result type alias for operations that may fail with a pipeconf error.
///
/// # Examples
///
/// ```
/// use pipeconf::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(42)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the pipeconf library.
#[derive(Debug, Error)]
pub enum Error {
    /// A random seed outside the accepted range or of the wrong type.
    #[error(
        "valid random seeds are positive integers up to 2147483647, \"random\", or None, not {value}"
    )]
    InvalidSeed {
        /// Text form of the rejected value.
        value: String,
    },

    /// A key path did not resolve to a value.
    #[error("key not found: {path}")]
    KeyNotFound {
        /// Dotted form of the path that failed to resolve.
        path: String,
    },

    /// A configuration key of an unsupported shape was used.
    #[error("configuration key must be a string or a sequence of strings; {found} was given")]
    InvalidKeyType {
        /// Description of the rejected key.
        found: String,
    },

    /// A base configuration could not be resolved by name or path.
    #[error("unknown preconfiguration '{name}': not a packaged name or a readable file")]
    UnknownPreconfiguration {
        /// The name or path that was requested.
        name: String,
    },

    /// Base configurations refer to each other through `FROM`.
    #[error("preconfiguration cycle detected: {}", chain.join(" -> "))]
    PreconfigurationCycle {
        /// The chain of bases up to and including the repeated one.
        chain: Vec<String>,
    },

    /// The validator rejected the merged configuration.
    #[error("schema error for '{field}': {message}")]
    Schema {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A document parsed but could not be represented as a configuration tree.
    #[error("cannot parse {source_name}: {message}")]
    Parse {
        /// File name or label of the document.
        source_name: String,
        /// A description of the problem.
        message: String,
    },

    /// A YAML (or JSON) syntax error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if error indicates a missing key path.
    ///
    /// # Examples
    ///
    /// ```
    /// use pipeconf::Error;
    ///
    /// let err = Error::KeyNotFound { path: "pipeline_setup.nope".into() };
    /// assert!(err.is_key_not_found());
    /// ```
    #[must_use]
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound { .. })
    }

    /// Check if error came from schema validation (including seed checks).
    #[must_use]
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. } | Self::InvalidSeed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_seed_error() {
        let err = Error::InvalidSeed {
            value: "0".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("2147483647"));
        assert!(display.ends_with("not 0"));
    }

    #[test]
    fn test_key_not_found_error() {
        let err = Error::KeyNotFound {
            path: "pipeline_setup.missing".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("key not found"));
        assert!(display.contains("pipeline_setup.missing"));
    }

    #[test]
    fn test_invalid_key_type_error() {
        let err = Error::InvalidKeyType {
            found: "integer `3`".to_string(),
        };
        assert!(format!("{err}").contains("integer `3`"));
    }

    #[test]
    fn test_unknown_preconfiguration_error() {
        let err = Error::UnknownPreconfiguration {
            name: "does-not-exist".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("unknown preconfiguration"));
        assert!(display.contains("does-not-exist"));
    }

    #[test]
    fn test_cycle_error_shows_chain() {
        let err = Error::PreconfigurationCycle {
            chain: vec!["a.yml".into(), "b.yml".into(), "a.yml".into()],
        };
        assert!(format!("{err}").contains("a.yml -> b.yml -> a.yml"));
    }

    #[test]
    fn test_schema_error() {
        let err = Error::Schema {
            field: "pipeline_setup".to_string(),
            message: "must be a mapping".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("schema error"));
        assert!(display.contains("pipeline_setup"));
        assert!(err.is_schema());
        assert!(!err.is_key_not_found());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(format!("{err}").contains("I/O error"));
    }
}
