//! Identity resolution for filter candidates
//!
//! Dependencies exploded into the build cache live under hashed directory
//! names, so their paths carry no human-meaningful identity a filter could
//! match. For those candidates the identity is the `package` attribute of the
//! nearest enclosing `AndroidManifest.xml`, found by walking parent
//! directories. Everything outside the build cache resolves to its absolute
//! path.

use std::path::Path;

use regex::Regex;

use crate::utils::status;

/// Substring marking content-addressed build-cache paths
const BUILD_CACHE_MARKER: &str = "build-cache";

/// Identity reported for a cache path that no longer exists on disk
const EMPTY_IDENTITY: &str = "[empty]";

const MANIFEST_FILE: &str = "androidmanifest.xml";

/// Resolve the identity string filters are matched against.
///
/// Read-only and idempotent, but walks parent directories for cache paths;
/// worst case O(depth) directory listings per candidate.
pub fn resolve_identity(input: &Path) -> String {
    let raw = absolute_path(input);
    if !raw.contains(BUILD_CACHE_MARKER) {
        return raw;
    }
    if !input.exists() {
        return EMPTY_IDENTITY.to_string();
    }

    for dir in input.ancestors().skip(1) {
        let Some(manifest) = find_manifest(dir) else {
            continue;
        };
        return match read_package_attribute(&manifest) {
            Some(package) => package,
            None => {
                // Malformed manifest: warn and fall back to the raw path.
                status::log_manifest_unreadable(&manifest);
                raw
            }
        };
    }

    input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or(raw)
}

fn absolute_path(input: &Path) -> String {
    if input.is_absolute() {
        return input.to_string_lossy().into_owned();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(input).to_string_lossy().into_owned(),
        Err(_) => input.to_string_lossy().into_owned(),
    }
}

/// Find a manifest file directly inside `dir`, matching by name
/// case-insensitively.
fn find_manifest(dir: &Path) -> Option<std::path::PathBuf> {
    let entries = std::fs::read_dir(dir).ok()?;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase() == MANIFEST_FILE)
            .unwrap_or(false);
        if matches {
            return Some(path);
        }
    }
    None
}

/// Pull the `package` attribute out of the root `<manifest>` element.
fn read_package_attribute(manifest: &Path) -> Option<String> {
    let xml = std::fs::read_to_string(manifest).ok()?;
    let re = Regex::new(r#"(?s)<manifest\b[^>]*?\bpackage\s*=\s*"([^"]+)""#).ok()?;
    re.captures(&xml)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}
