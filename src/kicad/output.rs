//! Writing generated tables to the project root.
//!
//! Both tables are rendered before anything touches the disk, so a missing
//! footprint directory leaves no half-updated project behind.

use std::io::Write;
use std::path::PathBuf;

use tracing::info;

use super::error::{TableError, TableResult};
use super::table::LibTable;
use super::{LibraryKind, LibraryRoots};

/// Where each table is read from and written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    /// Symbol scan directory name beneath the submodule root.
    pub symbols_dir: String,
    /// Footprint scan directory name beneath the submodule root.
    pub footprints_dir: String,
    /// Symbol table file name at the project root.
    pub sym_table: String,
    /// Footprint table file name at the project root.
    pub fp_table: String,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            symbols_dir: LibraryKind::Symbol.default_scan_dir().to_string(),
            footprints_dir: LibraryKind::Footprint.default_scan_dir().to_string(),
            sym_table: LibraryKind::Symbol.default_table_file().to_string(),
            fp_table: LibraryKind::Footprint.default_table_file().to_string(),
        }
    }
}

impl TableLayout {
    fn scan_dir(&self, kind: LibraryKind) -> &str {
        match kind {
            LibraryKind::Symbol => &self.symbols_dir,
            LibraryKind::Footprint => &self.footprints_dir,
        }
    }

    fn table_file(&self, kind: LibraryKind) -> &str {
        match kind {
            LibraryKind::Symbol => &self.sym_table,
            LibraryKind::Footprint => &self.fp_table,
        }
    }
}

/// One rendered table and its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTable {
    /// The table as built from disk.
    pub table: LibTable,
    /// Rendered text.
    pub content: String,
    /// Destination file.
    pub path: PathBuf,
}

/// Both library tables, rendered and ready to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedTables {
    /// Symbol table.
    pub symbols: RenderedTable,
    /// Footprint table.
    pub footprints: RenderedTable,
}

impl GeneratedTables {
    /// Scans the library checkout and renders both tables.
    ///
    /// # Errors
    ///
    /// Returns the first discovery error; the footprint scan is not attempted
    /// if the symbol scan fails.
    pub fn generate(roots: &LibraryRoots, layout: &TableLayout) -> TableResult<Self> {
        Ok(Self {
            symbols: render(roots, layout, LibraryKind::Symbol)?,
            footprints: render(roots, layout, LibraryKind::Footprint)?,
        })
    }

    /// Tables in write order.
    #[must_use]
    pub const fn tables(&self) -> [&RenderedTable; 2] {
        [&self.symbols, &self.footprints]
    }

    /// Writes both tables, replacing any existing files.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::FileWrite`] if a file cannot be written.
    pub fn write(&self) -> TableResult<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(2);
        for rendered in self.tables() {
            std::fs::write(&rendered.path, &rendered.content).map_err(|source| {
                TableError::FileWrite {
                    path: rendered.path.clone(),
                    source,
                }
            })?;
            info!(
                path = %rendered.path.display(),
                libraries = rendered.table.len(),
                "Wrote library table"
            );
            written.push(rendered.path.clone());
        }
        Ok(written)
    }

    /// Prints what [`Self::write`] would do, without touching the disk.
    ///
    /// # Errors
    ///
    /// Returns an error if `out` cannot be written to.
    pub fn preview<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for rendered in self.tables() {
            writeln!(out, "[dry-run] would write: {}", rendered.path.display())?;
            writeln!(out, "{}", rendered.content)?;
        }
        Ok(())
    }
}

fn render(roots: &LibraryRoots, layout: &TableLayout, kind: LibraryKind) -> TableResult<RenderedTable> {
    let scan_dir = roots.scan_dir(layout.scan_dir(kind));
    let table = LibTable::scan(kind, roots.project_root(), &scan_dir)?;
    let content = table.render();
    Ok(RenderedTable {
        table,
        content,
        path: roots.output_path(layout.table_file(kind)),
    })
}
