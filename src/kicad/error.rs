//! Error types for library discovery and table generation.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use super::LibraryKind;

/// Result type for library table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Errors that can occur while discovering libraries or writing tables.
#[derive(Debug, Error)]
pub enum TableError {
    /// A scan directory does not exist.
    #[error("{kind} directory not found: {}", path.display())]
    NotFound {
        /// Which library kind was being scanned.
        kind: LibraryKind,
        /// The missing directory.
        path: PathBuf,
    },

    /// A directory entry could not be read during discovery.
    #[error("Failed to scan {}", dir.display())]
    Walk {
        /// Scan directory being walked.
        dir: PathBuf,
        /// Underlying traversal error, carrying the offending path.
        #[source]
        source: walkdir::Error,
    },

    /// A library lies outside the project root and cannot be expressed
    /// relative to `${KIPRJMOD}`.
    #[error("Library path is outside the project root: {}", path.display())]
    OutsideProjectRoot {
        /// The offending path.
        path: PathBuf,
    },

    /// The submodule root cannot serve as a scan base.
    #[error("Invalid library root {}: {message}", path.display())]
    InvalidRoot {
        /// The rejected root.
        path: PathBuf,
        /// Description of what's wrong.
        message: String,
    },

    /// Failed to write a table file.
    #[error("Failed to write file: {}", path.display())]
    FileWrite {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl TableError {
    /// Creates a not-found error for a scan directory.
    pub fn not_found(kind: LibraryKind, path: impl Into<PathBuf>) -> Self {
        Self::NotFound {
            kind,
            path: path.into(),
        }
    }

    /// Creates an invalid-root error.
    pub fn invalid_root(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidRoot {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this error reports a missing scan directory.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_kind_and_directory() {
        let err = TableError::not_found(LibraryKind::Symbol, "/proj/lib/symbols");
        let msg = err.to_string();
        assert_eq!(msg, "Symbols directory not found: /proj/lib/symbols");
        assert!(err.is_not_found());
    }

    #[test]
    fn footprint_not_found_message() {
        let err = TableError::not_found(LibraryKind::Footprint, "/proj/lib/footprints");
        assert_eq!(
            err.to_string(),
            "Footprints directory not found: /proj/lib/footprints"
        );
    }

    #[test]
    fn invalid_root_display() {
        let err = TableError::invalid_root("/", "has no parent directory");
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("has no parent directory"));
    }
}
