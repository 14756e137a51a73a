//! KiCad project library table generation.
//!
//! A KiCad project registers its libraries in two files at the project root:
//!
//! - `sym-lib-table` — schematic symbol libraries (`*.kicad_sym` files)
//! - `fp-lib-table` — footprint libraries (`*.pretty` directories)
//!
//! This module scans a library checkout (the *submodule root*, a direct child
//! of the project root) and renders both tables with every URI expressed
//! relative to `${KIPRJMOD}`.
//!
//! # Pipeline
//!
//! 1. [`discovery`] — recursive scan for matching files or directories,
//!    sorted case-insensitively by path
//! 2. [`naming`] — library names derived from file names, collisions
//!    disambiguated by parent path
//! 3. [`table`] — serialisation into the `(sym_lib_table ...)` /
//!    `(fp_lib_table ...)` block syntax
//! 4. [`output`] — all-or-nothing write (or dry-run preview) of both tables

pub mod discovery;
pub mod error;
pub mod naming;
pub mod output;
pub mod table;

pub use error::{TableError, TableResult};
pub use output::{GeneratedTables, RenderedTable, TableLayout};
pub use table::{generate_fp_lib_table, generate_sym_lib_table, LibEntry, LibTable};

use std::fmt;
use std::path::{Path, PathBuf};

/// Symbol library file extension.
pub const SYMBOL_EXTENSION: &str = ".kicad_sym";

/// Footprint library directory suffix.
pub const FOOTPRINT_SUFFIX: &str = ".pretty";

/// The two kinds of library a KiCad project registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LibraryKind {
    /// `.kicad_sym` files.
    Symbol,
    /// `.pretty` directories.
    Footprint,
}

impl LibraryKind {
    /// Suffix a matching file or directory name ends with.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Symbol => SYMBOL_EXTENSION,
            Self::Footprint => FOOTPRINT_SUFFIX,
        }
    }

    /// Whether this kind matches directories rather than files.
    #[must_use]
    pub const fn matches_dirs(self) -> bool {
        matches!(self, Self::Footprint)
    }

    /// Outer tag of the rendered table.
    #[must_use]
    pub const fn table_tag(self) -> &'static str {
        match self {
            Self::Symbol => "sym_lib_table",
            Self::Footprint => "fp_lib_table",
        }
    }

    /// Scan directory name beneath the submodule root.
    #[must_use]
    pub const fn default_scan_dir(self) -> &'static str {
        match self {
            Self::Symbol => "symbols",
            Self::Footprint => "footprints",
        }
    }

    /// Table file name written to the project root.
    #[must_use]
    pub const fn default_table_file(self) -> &'static str {
        match self {
            Self::Symbol => "sym-lib-table",
            Self::Footprint => "fp-lib-table",
        }
    }

    /// Library name for a discovered path.
    ///
    /// Symbols use the file stem. Footprints use the directory name with the
    /// `.pretty` suffix removed.
    #[must_use]
    pub fn base_name(self, path: &Path) -> String {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match self {
            Self::Symbol => path
                .file_stem()
                .map_or(file_name, |s| s.to_string_lossy().into_owned()),
            Self::Footprint => file_name
                .strip_suffix(FOOTPRINT_SUFFIX)
                .map_or_else(|| file_name.clone(), str::to_string),
        }
    }
}

impl fmt::Display for LibraryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symbol => write!(f, "Symbols"),
            Self::Footprint => write!(f, "Footprints"),
        }
    }
}

/// Project root and library checkout root for one run.
///
/// The submodule root is always a direct child of the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRoots {
    project_root: PathBuf,
    submodule_root: PathBuf,
}

impl LibraryRoots {
    /// Builds roots from a library checkout directory.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidRoot`] if `submodule_root` has no parent.
    pub fn new(submodule_root: impl Into<PathBuf>) -> TableResult<Self> {
        let submodule_root = submodule_root.into();
        let project_root = submodule_root
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| {
                TableError::invalid_root(&submodule_root, "has no parent directory")
            })?
            .to_path_buf();

        Ok(Self {
            project_root,
            submodule_root,
        })
    }

    /// Builds roots from a library checkout directory given on the command
    /// line, resolved to an absolute path first.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidRoot`] if the directory cannot be
    /// resolved or has no parent.
    pub fn resolve(submodule_root: &Path) -> TableResult<Self> {
        let resolved = std::fs::canonicalize(submodule_root).map_err(|e| {
            TableError::invalid_root(submodule_root, format!("cannot resolve: {e}"))
        })?;
        Self::new(resolved)
    }

    /// Builds roots from the directory holding the running executable.
    ///
    /// The tool is meant to live inside the library checkout, so its own
    /// directory is the scan base.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidRoot`] if the executable location cannot
    /// be resolved.
    pub fn from_current_exe() -> TableResult<Self> {
        let exe = std::env::current_exe()
            .and_then(std::fs::canonicalize)
            .map_err(|e| {
                TableError::invalid_root("<current executable>", format!("cannot resolve: {e}"))
            })?;
        let dir = exe
            .parent()
            .ok_or_else(|| TableError::invalid_root(&exe, "has no parent directory"))?;
        Self::new(dir)
    }

    /// Directory every `${KIPRJMOD}` URI is relative to.
    #[must_use]
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Library checkout directory holding the scan directories.
    #[must_use]
    pub fn submodule_root(&self) -> &Path {
        &self.submodule_root
    }

    /// Scan directory with the given name beneath the submodule root.
    #[must_use]
    pub fn scan_dir(&self, dir_name: &str) -> PathBuf {
        self.submodule_root.join(dir_name)
    }

    /// Output file path for a table file name.
    #[must_use]
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.project_root.join(file_name)
    }
}

/// POSIX-style string form of a path.
pub(crate) fn posix_string(path: &Path) -> String {
    let s = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '\\' {
        s.replace('\\', "/")
    } else {
        s.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_base_name_is_stem() {
        let name = LibraryKind::Symbol.base_name(Path::new("/p/lib/symbols/Device.kicad_sym"));
        assert_eq!(name, "Device");
    }

    #[test]
    fn symbol_base_name_keeps_inner_dots() {
        let name = LibraryKind::Symbol.base_name(Path::new("/p/lib/symbols/MCU.ST.kicad_sym"));
        assert_eq!(name, "MCU.ST");
    }

    #[test]
    fn footprint_base_name_strips_suffix() {
        let name =
            LibraryKind::Footprint.base_name(Path::new("/p/lib/footprints/Resistor_SMD.pretty"));
        assert_eq!(name, "Resistor_SMD");
    }

    #[test]
    fn footprint_base_name_without_suffix_unchanged() {
        let name = LibraryKind::Footprint.base_name(Path::new("/p/lib/footprints/Misc"));
        assert_eq!(name, "Misc");
    }

    #[test]
    fn kind_display() {
        assert_eq!(LibraryKind::Symbol.to_string(), "Symbols");
        assert_eq!(LibraryKind::Footprint.to_string(), "Footprints");
    }

    #[test]
    fn kind_defaults() {
        assert_eq!(LibraryKind::Symbol.suffix(), ".kicad_sym");
        assert_eq!(LibraryKind::Footprint.suffix(), ".pretty");
        assert!(LibraryKind::Footprint.matches_dirs());
        assert!(!LibraryKind::Symbol.matches_dirs());
        assert_eq!(LibraryKind::Symbol.table_tag(), "sym_lib_table");
        assert_eq!(LibraryKind::Footprint.table_tag(), "fp_lib_table");
    }

    #[test]
    fn roots_from_submodule() {
        let roots = LibraryRoots::new("/work/board/kicad_lib").unwrap();
        assert_eq!(roots.project_root(), Path::new("/work/board"));
        assert_eq!(roots.submodule_root(), Path::new("/work/board/kicad_lib"));
        assert_eq!(
            roots.scan_dir("symbols"),
            Path::new("/work/board/kicad_lib/symbols")
        );
        assert_eq!(
            roots.output_path("fp-lib-table"),
            Path::new("/work/board/fp-lib-table")
        );
    }

    #[test]
    fn roots_reject_filesystem_root() {
        assert!(LibraryRoots::new("/").is_err());
    }

    #[test]
    fn roots_reject_bare_relative_name() {
        assert!(LibraryRoots::new("kicad_lib").is_err());
    }

    #[test]
    fn posix_string_uses_forward_slashes() {
        let path = Path::new("lib").join("symbols").join("a.kicad_sym");
        assert_eq!(posix_string(&path), "lib/symbols/a.kicad_sym");
    }
}
