//! Recursive library discovery.
//!
//! Symbol libraries are files ending in `.kicad_sym`; footprint libraries are
//! directories ending in `.pretty`. Both are found anywhere beneath the scan
//! directory, including directly inside it.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use super::error::{TableError, TableResult};
use super::{posix_string, LibraryKind};

/// Finds every library of `kind` beneath `scan_dir`.
///
/// Symlinked directories are not descended into. A symlink whose own name
/// matches is still reported when its target has the right type, so
/// `Linked.pretty -> ../vendor/R.pretty` counts as a footprint library.
///
/// The result is sorted by [`compare_paths`], so the same tree always yields
/// the same order.
///
/// # Errors
///
/// - [`TableError::NotFound`] if `scan_dir` does not exist
/// - [`TableError::Walk`] if part of the tree cannot be read
pub fn discover(scan_dir: &Path, kind: LibraryKind) -> TableResult<Vec<PathBuf>> {
    if !scan_dir.exists() {
        return Err(TableError::not_found(kind, scan_dir));
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(scan_dir).min_depth(1).follow_links(false) {
        let entry = entry.map_err(|source| TableError::Walk {
            dir: scan_dir.to_path_buf(),
            source,
        })?;
        if is_library(&entry, kind) {
            debug!(kind = %kind, path = %entry.path().display(), "Discovered library");
            found.push(entry.into_path());
        }
    }

    sort_paths(&mut found);
    debug!(kind = %kind, count = found.len(), dir = %scan_dir.display(), "Discovery finished");
    Ok(found)
}

/// Name ends in the exact, case-sensitive suffix and the node (or the
/// symlink's target) is a directory for footprints, a file for symbols.
fn is_library(entry: &DirEntry, kind: LibraryKind) -> bool {
    let name_matches = entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.ends_with(kind.suffix()));
    if !name_matches {
        return false;
    }

    let file_type = entry.file_type();
    if file_type.is_symlink() {
        let target = entry.path();
        return if kind.matches_dirs() {
            target.is_dir()
        } else {
            target.is_file()
        };
    }

    if kind.matches_dirs() {
        file_type.is_dir()
    } else {
        file_type.is_file()
    }
}

/// Orders paths by their lower-cased POSIX form, falling back to the
/// unmodified form so distinct paths never compare equal.
#[must_use]
pub fn compare_paths(a: &Path, b: &Path) -> Ordering {
    let (a, b) = (posix_string(a), posix_string(b));
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(&b))
}

/// Sorts paths in discovery order.
pub fn sort_paths(paths: &mut [PathBuf]) {
    paths.sort_by_cached_key(|p| {
        let posix = posix_string(p);
        (posix.to_lowercase(), posix)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "(kicad_symbol_lib)").unwrap();
    }

    #[test]
    fn missing_dir_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("symbols");
        let err = discover(&missing, LibraryKind::Symbol).unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("symbols"));
    }

    #[test]
    fn empty_dir_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let found = discover(dir.path(), LibraryKind::Symbol).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn finds_symbols_recursively() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("Device.kicad_sym"));
        touch(&dir.path().join("power/Power.kicad_sym"));
        touch(&dir.path().join("deep/er/still/Deep.kicad_sym"));
        touch(&dir.path().join("README.md"));
        touch(&dir.path().join("Device.kicad_sym.bak"));

        let found = discover(dir.path(), LibraryKind::Symbol).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["Deep.kicad_sym", "Device.kicad_sym", "Power.kicad_sym"]);
    }

    #[test]
    fn suffix_match_is_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("Upper.KICAD_SYM"));
        fs::create_dir_all(dir.path().join("Upper.PRETTY")).unwrap();

        assert!(discover(dir.path(), LibraryKind::Symbol).unwrap().is_empty());
        assert!(discover(dir.path(), LibraryKind::Footprint)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn footprints_must_be_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Resistor_SMD.pretty")).unwrap();
        fs::create_dir_all(dir.path().join("vendor/Connector.pretty")).unwrap();
        touch(&dir.path().join("NotADir.pretty"));

        let found = discover(dir.path(), LibraryKind::Footprint).unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| p.is_dir()));
    }

    #[test]
    fn symbols_must_be_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Odd.kicad_sym")).unwrap();
        assert!(discover(dir.path(), LibraryKind::Symbol).unwrap().is_empty());
    }

    #[test]
    fn scan_dir_with_pattern_metacharacters() {
        let dir = tempfile::tempdir().unwrap();
        let scan = dir.path().join("libs [v2]");
        touch(&scan.join("Device.kicad_sym"));

        let found = discover(&scan, LibraryKind::Symbol).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_is_not_descended() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("real/R.pretty")).unwrap();
        symlink(dir.path().join("real"), dir.path().join("alias")).unwrap();

        let found = discover(dir.path(), LibraryKind::Footprint).unwrap();
        assert_eq!(found, [dir.path().join("real/R.pretty")]);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_loop_is_not_followed() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("vendor/Device.kicad_sym"));
        symlink("..", dir.path().join("vendor/up")).unwrap();

        let found = discover(dir.path(), LibraryKind::Symbol).unwrap();
        assert_eq!(found, [dir.path().join("vendor/Device.kicad_sym")]);
    }

    #[cfg(unix)]
    #[test]
    fn matching_symlink_to_library_is_reported() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        fs::create_dir_all(outside.path().join("R.pretty")).unwrap();
        touch(&outside.path().join("Device.kicad_sym"));
        symlink(outside.path().join("R.pretty"), dir.path().join("Linked.pretty")).unwrap();
        symlink(
            outside.path().join("Device.kicad_sym"),
            dir.path().join("Linked.kicad_sym"),
        )
        .unwrap();

        assert_eq!(
            discover(dir.path(), LibraryKind::Footprint).unwrap(),
            [dir.path().join("Linked.pretty")]
        );
        assert_eq!(
            discover(dir.path(), LibraryKind::Symbol).unwrap(),
            [dir.path().join("Linked.kicad_sym")]
        );
    }

    #[test]
    fn compare_is_case_insensitive() {
        assert_eq!(
            compare_paths(Path::new("/p/b.kicad_sym"), Path::new("/p/A.kicad_sym")),
            Ordering::Greater
        );
        assert_eq!(
            compare_paths(Path::new("/p/a.kicad_sym"), Path::new("/p/B.kicad_sym")),
            Ordering::Less
        );
    }

    #[test]
    fn compare_breaks_case_ties() {
        assert_eq!(
            compare_paths(Path::new("/p/A.kicad_sym"), Path::new("/p/a.kicad_sym")),
            Ordering::Less
        );
        assert_eq!(
            compare_paths(Path::new("/p/a.kicad_sym"), Path::new("/p/a.kicad_sym")),
            Ordering::Equal
        );
    }

    #[test]
    fn sort_matches_compare() {
        let mut paths = vec![
            PathBuf::from("/p/symbols/sub/a.kicad_sym"),
            PathBuf::from("/p/symbols/B.kicad_sym"),
            PathBuf::from("/p/symbols/a.kicad_sym"),
        ];
        sort_paths(&mut paths);
        assert_eq!(
            paths,
            [
                PathBuf::from("/p/symbols/a.kicad_sym"),
                PathBuf::from("/p/symbols/B.kicad_sym"),
                PathBuf::from("/p/symbols/sub/a.kicad_sym"),
            ]
        );
        assert!(paths
            .windows(2)
            .all(|w| compare_paths(&w[0], &w[1]) == Ordering::Less));
    }
}
