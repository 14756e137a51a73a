//! Library table serialisation.
//!
//! Both tables share one layout; only the outer tag differs:
//!
//! ```text
//! (sym_lib_table
//!   (version 7)
//!   (lib (name "Device")(type "KiCad")(uri "${KIPRJMOD}/lib/symbols/Device.kicad_sym")(options "")(descr ""))
//! )
//! ```

use std::path::{Path, PathBuf};

use tracing::info;

use super::discovery::discover;
use super::error::{TableError, TableResult};
use super::naming::assign_unique_names;
use super::{posix_string, LibraryKind};

/// Table format version written to the header.
pub const TABLE_VERSION: u32 = 7;

/// Library type written for every entry.
pub const LIB_TYPE: &str = "KiCad";

/// Macro KiCad expands to the project directory.
pub const KIPRJMOD: &str = "${KIPRJMOD}";

/// Name of the footprint table's entry for the footprint scan root.
pub const FOOTPRINTS_BASE_NAME: &str = "footprints";

/// Escapes a value for a quoted table field.
///
/// Backslashes are doubled before quotes are escaped so the backslash added
/// for a quote is not doubled again.
#[must_use]
pub fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Renders one `(lib ...)` line, including its two-space indent.
#[must_use]
pub fn lib_line(name: &str, uri: &str) -> String {
    format!(
        "  (lib (name \"{}\")(type \"{LIB_TYPE}\")(uri \"{}\")(options \"\")(descr \"\"))",
        escape(name),
        escape(uri)
    )
}

/// `${KIPRJMOD}`-relative URI for a path inside the project.
///
/// # Errors
///
/// Returns [`TableError::OutsideProjectRoot`] if `path` is not beneath
/// `project_root`.
pub fn kiprjmod_uri(path: &Path, project_root: &Path) -> TableResult<String> {
    let rel = path
        .strip_prefix(project_root)
        .map_err(|_| TableError::OutsideProjectRoot {
            path: path.to_path_buf(),
        })?;
    Ok(format!("{KIPRJMOD}/{}", posix_string(rel)))
}

/// One registered library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibEntry {
    /// Library name, unique within its table.
    pub name: String,
    /// `${KIPRJMOD}`-relative location.
    pub uri: String,
    /// Absolute path of the library on disk.
    pub path: PathBuf,
}

/// A complete symbol or footprint library table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibTable {
    kind: LibraryKind,
    entries: Vec<LibEntry>,
}

impl LibTable {
    /// Creates an empty table of the given kind.
    #[must_use]
    pub const fn new(kind: LibraryKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    /// Scans `scan_dir` and builds the table for `kind`.
    ///
    /// Footprint tables start with an entry named `footprints` pointing at
    /// `scan_dir` itself; that name is reserved for it.
    ///
    /// # Errors
    ///
    /// Propagates discovery errors, including [`TableError::NotFound`] when
    /// `scan_dir` is missing.
    pub fn scan(kind: LibraryKind, project_root: &Path, scan_dir: &Path) -> TableResult<Self> {
        let paths = discover(scan_dir, kind)?;

        let mut table = Self::new(kind);
        let reserved: &[&str] = match kind {
            LibraryKind::Symbol => &[],
            LibraryKind::Footprint => {
                table.push(LibEntry {
                    name: FOOTPRINTS_BASE_NAME.to_string(),
                    uri: kiprjmod_uri(scan_dir, project_root)?,
                    path: scan_dir.to_path_buf(),
                });
                &[FOOTPRINTS_BASE_NAME]
            }
        };

        let names = assign_unique_names(&paths, |p| kind.base_name(p), project_root, reserved);
        for (path, name) in names {
            let uri = kiprjmod_uri(&path, project_root)?;
            table.push(LibEntry { name, uri, path });
        }

        info!(
            kind = %kind,
            libraries = paths.len(),
            dir = %scan_dir.display(),
            "Built library table"
        );
        Ok(table)
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: LibEntry) {
        self.entries.push(entry);
    }

    /// Library kind of this table.
    #[must_use]
    pub const fn kind(&self) -> LibraryKind {
        self.kind
    }

    /// Entries in output order.
    #[must_use]
    pub fn entries(&self) -> &[LibEntry] {
        &self.entries
    }

    /// Number of entries, including the footprint base entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the table as KiCad reads it, ending in a single newline.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!("({}\n  (version {TABLE_VERSION})\n", self.kind.table_tag());
        for entry in &self.entries {
            out.push_str(&lib_line(&entry.name, &entry.uri));
            out.push('\n');
        }
        out.push_str(")\n");
        out
    }
}

/// Renders the symbol table for every `.kicad_sym` under `symbols_dir`.
///
/// # Errors
///
/// Returns [`TableError::NotFound`] if `symbols_dir` does not exist.
pub fn generate_sym_lib_table(project_root: &Path, symbols_dir: &Path) -> TableResult<String> {
    LibTable::scan(LibraryKind::Symbol, project_root, symbols_dir).map(|t| t.render())
}

/// Renders the footprint table for every `.pretty` under `footprints_dir`.
///
/// # Errors
///
/// Returns [`TableError::NotFound`] if `footprints_dir` does not exist.
pub fn generate_fp_lib_table(project_root: &Path, footprints_dir: &Path) -> TableResult<String> {
    LibTable::scan(LibraryKind::Footprint, project_root, footprints_dir).map(|t| t.render())
}
