//! Observation-file discovery with directory pruning.
//!
//! The source analyzer leaves one JSON observation file per translation
//! unit somewhere under the analysis root (typically next to the build
//! tree). Discovery prunes excluded directories before iteration via
//! `WalkDir::filter_entry`, fans the remaining entries out over Rayon, and
//! returns a sorted list so the executor schedules TUs in a stable order.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use walkdir::WalkDir;

/// Directories never descended into.
const EXCLUDED_DIRS: &[&str] = &[".git", ".cache", "CMakeFiles", "node_modules"];

/// Checks if a directory entry should be pruned from traversal.
#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry, excludes: &HashSet<&str>) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excludes.contains(name))
}

/// Gathers all `.json` observation files under `root`.
///
/// `extra_excludes` extends the default pruned-directory set. The result is
/// sorted by path; TU scheduling order does not change the analysis result,
/// but stable input order keeps logs and failure reports reproducible.
pub fn gather_observation_files(root: &Path, extra_excludes: &[&str]) -> Result<Vec<PathBuf>> {
    let excludes: HashSet<&str> = EXCLUDED_DIRS
        .iter()
        .copied()
        .chain(extra_excludes.iter().copied())
        .collect();

    let mut files = WalkDir::new(root)
        .into_iter()
        // filter_entry prunes entire subtrees before iteration
        .filter_entry(|e| !is_excluded_dir(e, &excludes))
        .par_bridge()
        .filter_map(|entry| match entry {
            Ok(e) => {
                let path = e.path();
                if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                    Some(Ok(path.to_path_buf()))
                } else {
                    None
                }
            }
            Err(e) => Some(Err(e.into())),
        })
        .collect::<Result<Vec<_>>>()
        .context(format!(
            "Failed to gather observation files from {}",
            root.display()
        ))?;

    files.sort();
    Ok(files)
}
