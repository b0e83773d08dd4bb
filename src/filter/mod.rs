//! Dependency filtering for weave-input and aspect-path decisions
//!
//! Each jar or class directory flowing through the pipeline is matched against
//! the user's include/exclude filter sets to decide whether it joins the weave
//! inpath, the aspectpath, or is passed through untouched. Matching happens on
//! the candidate's identity string (see [`manifest`]), which for build-cache
//! paths is the declared package name rather than the hashed cache path.

pub mod manifest;

use std::path::Path;

/// Filter policy: what an empty filter set means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Policy {
    Include,
    Exclude,
}

/// Check a candidate against exclude filters.
///
/// An empty filter set excludes nothing.
pub fn is_exclude_filter_matched(file: Option<&Path>, filters: &[String]) -> bool {
    is_filter_matched(file, filters, Policy::Exclude)
}

/// Check a candidate against include filters.
///
/// An empty filter set includes everything.
pub fn is_include_filter_matched(file: Option<&Path>, filters: &[String]) -> bool {
    is_filter_matched(file, filters, Policy::Include)
}

fn is_filter_matched(file: Option<&Path>, filters: &[String], policy: Policy) -> bool {
    let Some(file) = file else {
        return false;
    };

    if filters.is_empty() {
        return policy == Policy::Include;
    }

    // Identity resolution may list parent directories and read a manifest;
    // callers filtering thousands of candidates should cache per path.
    let identity = manifest::resolve_identity(file);
    filters.iter().any(|filter| is_contained(&identity, filter))
}

/// Case-sensitive substring containment, with `/` and `\` in the filter
/// normalized to the host separator before a second comparison.
fn is_contained(identity: &str, filter: &str) -> bool {
    if identity.contains(filter) {
        return true;
    }
    let sep = std::path::MAIN_SEPARATOR_STR;
    if filter.contains('/') {
        return identity.contains(&filter.replace('/', sep));
    }
    if filter.contains('\\') {
        return identity.contains(&filter.replace('\\', sep));
    }
    false
}
