//! Result-directory to jar merge step
//!
//! Runs once per build unit after the weaver has written its class output.
//! The result directory is a scratch staging area, not a durable artifact:
//! it is always removed once the merge step completes.

use std::path::Path;

use crate::error::AjwError;
use crate::jar::merger::{classes_only, JarMerger};

/// Merge a weave result directory into a jar at `dest_jar`.
///
/// If the directory contains anything, its class-file entries are merged
/// into a fresh jar (stale destination deleted first, parent directories
/// created). The result directory is then deleted recursively, whether or
/// not a merge happened. On merge failure the partially-written jar and the
/// result directory are left in place for the caller.
pub fn merge_directory_into_jar(result_dir: &Path, dest_jar: &Path) -> Result<(), AjwError> {
    let has_content = result_dir
        .read_dir()
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false);

    if has_content {
        if dest_jar.exists() {
            std::fs::remove_file(dest_jar).map_err(|e| {
                AjwError::archive_error(dest_jar, "Failed to delete stale archive", e)
            })?;
        }

        let mut merger = JarMerger::with_filter(dest_jar, classes_only)?;
        merger.add_directory(result_dir)?;
        merger.finish()?;
    }

    if result_dir.exists() {
        std::fs::remove_dir_all(result_dir).map_err(|e| {
            AjwError::archive_error(result_dir, "Failed to delete result directory", e)
        })?;
    }

    Ok(())
}
