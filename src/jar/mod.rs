//! Jar assembly for woven class output
//!
//! The weaver drops its result as a directory of class files; everything the
//! downstream build consumes is a jar. This module rebuilds jars from
//! directories and existing archives with a fully deterministic layout:
//! entries sorted by final path, timestamps pinned to the DOS epoch, so
//! merging unchanged inputs twice yields byte-identical archives.

pub mod merge;
pub mod merger;

pub use merge::merge_directory_into_jar;
pub use merger::{classes_only, excludes_classes, JarMerger};
