//! Error types for kicad-lib-tables configuration.
//!
//! Library discovery and table generation errors live in
//! [`crate::kicad::error`].

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// A configuration value is invalid.
    #[error("invalid value for '{field}': {message}")]
    ValidationError {
        /// Name of the offending field, as written in the config file.
        field: &'static str,
        /// Description of the validation failure.
        message: String,
    },

    /// Both tables would be written to the same file, so the footprint
    /// table would overwrite the symbol table.
    #[error("sym_table and fp_table both name '{name}'; the footprint table would overwrite the symbol table")]
    SameTableFile {
        /// The shared file name.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let error = ConfigError::NotFound {
            path: PathBuf::from("/path/to/config.json"),
        };
        let msg = error.to_string();
        assert!(msg.contains("not found"));
        assert!(msg.contains("config.json"));
    }

    #[test]
    fn validation_error_display() {
        let error = ConfigError::ValidationError {
            field: "symbols_dir",
            message: "must be a single directory name".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("'symbols_dir'"));
        assert!(msg.contains("must be a single directory name"));
    }

    #[test]
    fn same_table_file_display() {
        let error = ConfigError::SameTableFile {
            name: "lib-table".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("lib-table"));
        assert!(msg.contains("overwrite"));
    }
}
