//! Library name assignment.
//!
//! Each library is named after its file or directory. When two libraries
//! share a name, the first one in discovery order keeps it and every later
//! one gets its parent directory appended:
//!
//! ```text
//! <project>/lib/symbols/Device.kicad_sym         -> Device
//! <project>/lib/symbols/vendor/Device.kicad_sym  -> Device_lib_symbols_vendor
//! ```
//!
//! The first occurrence is never renamed after the fact, so the result
//! depends on input order. Callers pass paths already sorted by
//! [`super::discovery::sort_paths`].

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::debug;

use super::posix_string;

/// Assigns a unique library name to each path.
///
/// `reserved` names are treated as already taken by a previous entry; the
/// footprint table reserves the name of its base entry this way.
///
/// If a disambiguated name is itself taken (for example `a/b_c` and `a/b/c`
/// both sanitise to `a_b_c`), a numeric suffix `_2`, `_3`, ... is appended
/// until it is free.
///
/// The returned map iterates in input order.
#[must_use]
pub fn assign_unique_names<F>(
    paths: &[PathBuf],
    base_name: F,
    project_root: &Path,
    reserved: &[&str],
) -> IndexMap<PathBuf, String>
where
    F: Fn(&Path) -> String,
{
    let mut seen: HashMap<String, usize> = reserved.iter().map(|r| ((*r).to_string(), 1)).collect();
    let mut taken: HashSet<String> = reserved.iter().map(|r| (*r).to_string()).collect();
    let mut result = IndexMap::with_capacity(paths.len());

    for path in paths {
        let base = base_name(path);
        let count = seen.entry(base.clone()).or_insert(0);

        let candidate = if *count == 0 {
            base
        } else {
            let suffixed = format!("{base}_{}", parent_suffix(path, project_root));
            debug!(
                base = %base,
                name = %suffixed,
                path = %path.display(),
                "Library name collision"
            );
            suffixed
        };
        *count += 1;

        let name = first_free(candidate, &taken);
        taken.insert(name.clone());
        result.insert(path.clone(), name);
    }

    result
}

/// Parent directory relative to the project root, with separators replaced
/// by underscores. Parents outside the project root use their absolute path.
#[must_use]
pub fn parent_suffix(path: &Path, project_root: &Path) -> String {
    let parent = path.parent().unwrap_or(path);
    let rel = parent.strip_prefix(project_root).unwrap_or(parent);
    sanitize(&posix_string(rel))
}

fn sanitize(s: &str) -> String {
    s.replace(['/', '\\'], "_")
}

fn first_free(candidate: String, taken: &HashSet<String>) -> String {
    if !taken.contains(&candidate) {
        return candidate;
    }
    let mut n = 2_usize;
    loop {
        let next = format!("{candidate}_{n}");
        if !taken.contains(&next) {
            debug!(name = %candidate, resolved = %next, "Library name already taken");
            return next;
        }
        n += 1;
    }
}
