//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.

use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::kicad::output::TableLayout;
use crate::kicad::LibraryKind;

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
/// Every field is optional; an empty object yields the stock KiCad layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Symbol library directory, relative to the submodule root.
    #[serde(default = "default_symbols_dir")]
    pub symbols_dir: String,

    /// Footprint library directory, relative to the submodule root.
    #[serde(default = "default_footprints_dir")]
    pub footprints_dir: String,

    /// Symbol table file name, written to the project root.
    #[serde(default = "default_sym_table")]
    pub sym_table: String,

    /// Footprint table file name, written to the project root.
    #[serde(default = "default_fp_table")]
    pub fp_table: String,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// File this configuration was read from; `None` for built-in defaults.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            _schema: None,
            _comment: None,
            symbols_dir: default_symbols_dir(),
            footprints_dir: default_footprints_dir(),
            sym_table: default_sym_table(),
            fp_table: default_fp_table(),
            logging: LoggingConfig::default(),
            source: None,
        }
    }
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_single_component("symbols_dir", &self.symbols_dir)?;
        check_single_component("footprints_dir", &self.footprints_dir)?;
        check_table_path("sym_table", &self.sym_table)?;
        check_table_path("fp_table", &self.fp_table)?;

        if Path::new(&self.sym_table) == Path::new(&self.fp_table) {
            return Err(ConfigError::SameTableFile {
                name: self.sym_table.clone(),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logging.level",
                message: format!(
                    "'{}' is not one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            });
        }

        Ok(())
    }

    /// Scan and output names as used by table generation.
    #[must_use]
    pub fn layout(&self) -> TableLayout {
        TableLayout {
            symbols_dir: self.symbols_dir.clone(),
            footprints_dir: self.footprints_dir.clone(),
            sym_table: self.sym_table.clone(),
            fp_table: self.fp_table.clone(),
        }
    }
}

/// Accepts a plain name such as `symbols` and rejects `a/b`, `..`, or `/x`.
fn check_single_component(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let mut components = Path::new(value).components();
    let valid = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !value.contains(['/', '\\']);

    if valid {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            field,
            message: format!("must be a single directory name, got '{value}'"),
        })
    }
}

/// Table files are joined onto the project root, so any path naming a file
/// is accepted: `sym-lib-table`, `generated/sym-lib-table`, or an absolute path.
fn check_table_path(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let names_file = Path::new(value)
        .components()
        .last()
        .is_some_and(|c| matches!(c, Component::Normal(_)));

    if names_file {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            field,
            message: format!("must name a file, got '{value}'"),
        })
    }
}

fn default_symbols_dir() -> String {
    LibraryKind::Symbol.default_scan_dir().to_string()
}

fn default_footprints_dir() -> String {
    LibraryKind::Footprint.default_scan_dir().to_string()
}

fn default_sym_table() -> String {
    LibraryKind::Symbol.default_table_file().to_string()
}

fn default_fp_table() -> String {
    LibraryKind::Footprint.default_table_file().to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
