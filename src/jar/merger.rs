//! Deterministic jar writer
//!
//! Streams directory trees and existing archives into a single jar. Entry
//! order is sorted by final entry path and timestamps are pinned to a fixed
//! epoch, so repeated merges of unchanged inputs are byte-reproducible
//! regardless of filesystem iteration order or wall-clock time.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::AjwError;

/// Jar manifest entry name
pub const MANIFEST_NAME: &str = "META-INF/MANIFEST.MF";

const DOT_CLASS: &str = ".class";

/// Entry filter keeping only compiled classes
pub fn classes_only(entry_path: &str) -> bool {
    entry_path.ends_with(DOT_CLASS)
}

/// Entry filter keeping everything but compiled classes
pub fn excludes_classes(entry_path: &str) -> bool {
    !entry_path.ends_with(DOT_CLASS)
}

/// Per-entry content hook: return new bytes, the same bytes, or `None` to
/// drop the entry from the output entirely.
pub trait EntryTransformer {
    fn transform(&self, entry_path: &str, data: Vec<u8>) -> Option<Vec<u8>>;
}

impl<F> EntryTransformer for F
where
    F: Fn(&str, Vec<u8>) -> Option<Vec<u8>>,
{
    fn transform(&self, entry_path: &str, data: Vec<u8>) -> Option<Vec<u8>> {
        self(entry_path, data)
    }
}

/// Per-entry path hook computing the final archive path of an entry.
pub trait EntryRelocator {
    fn relocate(&self, entry_path: &str) -> String;
}

impl<F> EntryRelocator for F
where
    F: Fn(&str) -> String,
{
    fn relocate(&self, entry_path: &str) -> String {
        self(entry_path)
    }
}

/// Jar merger writing one destination archive.
///
/// Lifecycle is `create` → `add_*`/`set_manifest` → `finish`; `finish`
/// consumes the merger, so writing after close is unrepresentable. Dropping
/// without `finish` still finalizes the underlying stream, but cannot report
/// errors.
///
/// When several sources produce the same final entry path, the entry written
/// last wins (within a directory scan: the file visited last; across calls:
/// the later call). No conflict error is raised.
pub struct JarMerger {
    dest: PathBuf,
    writer: ZipWriter<BufWriter<File>>,
    filter: Option<fn(&str) -> bool>,
}

impl JarMerger {
    /// Open a merger without a default entry filter.
    pub fn create(dest: &Path) -> Result<Self, AjwError> {
        Self::open(dest, None)
    }

    /// Open a merger with a default entry filter applied by `add_directory`
    /// and `add_jar`.
    pub fn with_filter(dest: &Path, filter: fn(&str) -> bool) -> Result<Self, AjwError> {
        Self::open(dest, Some(filter))
    }

    fn open(dest: &Path, filter: Option<fn(&str) -> bool>) -> Result<Self, AjwError> {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AjwError::archive_error(dest, "Failed to create parent directories", e)
            })?;
        }
        let file = File::create(dest)
            .map_err(|e| AjwError::archive_error(dest, "Failed to create archive", e))?;
        Ok(Self {
            dest: dest.to_path_buf(),
            writer: ZipWriter::new(BufWriter::new(file)),
            filter,
        })
    }

    /// Add every regular file under `dir`, filtered by the default filter.
    pub fn add_directory(&mut self, dir: &Path) -> Result<(), AjwError> {
        self.add_directory_filtered(dir, self.filter, None, None)
    }

    /// Add every regular file under `dir`.
    ///
    /// Entry paths are relative to `dir` with forward-slash separators. The
    /// filter sees the pre-relocation path; enumeration is sorted by the
    /// final (post-relocation) entry path so archive layout does not depend
    /// on filesystem iteration order. Directories themselves produce no
    /// entries.
    pub fn add_directory_filtered(
        &mut self,
        dir: &Path,
        filter: Option<EntryPredicate>,
        transformer: Option<&dyn EntryTransformer>,
        relocator: Option<&dyn EntryRelocator>,
    ) -> Result<(), AjwError> {
        let mut candidates: BTreeMap<String, PathBuf> = BTreeMap::new();

        for entry in WalkDir::new(dir) {
            let entry = entry.map_err(|e| {
                AjwError::archive_error(dir, "Failed to read directory entry", e)
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry.path().strip_prefix(dir).map_err(|e| {
                AjwError::archive_error(entry.path(), "Failed to get relative path", e)
            })?;
            let entry_path = relative.to_string_lossy().replace('\\', "/");

            if let Some(filter) = filter {
                if !filter(&entry_path) {
                    continue;
                }
            }

            let final_path = match relocator {
                Some(relocator) => relocator.relocate(&entry_path),
                None => entry_path,
            };
            candidates.insert(final_path, entry.path().to_path_buf());
        }

        for (entry_path, file) in candidates {
            let data = std::fs::read(&file)
                .map_err(|e| AjwError::archive_error(&file, "Failed to read file", e))?;
            let data = match transformer {
                Some(transformer) => match transformer.transform(&entry_path, data) {
                    Some(data) => data,
                    None => continue,
                },
                None => data,
            };
            self.write_entry(&entry_path, &data, CompressionMethod::Deflated)?;
        }

        Ok(())
    }

    /// Stream the entries of an existing archive, filtered by the default
    /// filter.
    pub fn add_jar(&mut self, jar: &Path) -> Result<(), AjwError> {
        self.add_jar_filtered(jar, self.filter, None)
    }

    /// Stream the entries of an existing archive into the destination.
    ///
    /// Directory entries are skipped. Stored (uncompressed) source entries
    /// stay stored; everything else is re-deflated. Timestamps are reset to
    /// the fixed epoch rather than copied from the source.
    pub fn add_jar_filtered(
        &mut self,
        jar: &Path,
        filter: Option<EntryPredicate>,
        relocator: Option<&dyn EntryRelocator>,
    ) -> Result<(), AjwError> {
        let file = File::open(jar)
            .map_err(|e| AjwError::archive_error(jar, "Failed to open archive", e))?;
        let mut archive = ZipArchive::new(BufReader::new(file))
            .map_err(|e| AjwError::archive_error(jar, "Failed to read archive", e))?;

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).map_err(|e| {
                AjwError::archive_error(jar, format!("Failed to read entry #{index}"), e)
            })?;
            if entry.is_dir() {
                continue;
            }

            let name = entry.name().to_string();
            if let Some(filter) = filter {
                if !filter(&name) {
                    continue;
                }
            }
            let final_path = match relocator {
                Some(relocator) => relocator.relocate(&name),
                None => name.clone(),
            };

            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data).map_err(|e| {
                AjwError::archive_error(jar, format!("Failed to read entry {name}"), e)
            })?;

            let method = if entry.compression() == CompressionMethod::Stored {
                CompressionMethod::Stored
            } else {
                CompressionMethod::Deflated
            };
            self.write_entry(&final_path, &data, method)?;
        }

        Ok(())
    }

    /// Write a single file under the given entry path.
    pub fn add_file(&mut self, entry_path: &str, file: &Path) -> Result<(), AjwError> {
        let data = std::fs::read(file)
            .map_err(|e| AjwError::archive_error(file, "Failed to read file", e))?;
        self.write_entry(entry_path, &data, CompressionMethod::Deflated)
    }

    /// Write raw bytes under the given entry path.
    pub fn add_entry(&mut self, entry_path: &str, data: &[u8]) -> Result<(), AjwError> {
        self.write_entry(entry_path, data, CompressionMethod::Deflated)
    }

    /// Write `META-INF/MANIFEST.MF` from a flat key→value mapping.
    ///
    /// The manifest-version attribute is always present and always first.
    pub fn set_manifest(&mut self, properties: &BTreeMap<String, String>) -> Result<(), AjwError> {
        let mut manifest = String::from("Manifest-Version: 1.0.0\r\n");
        for (name, value) in properties {
            manifest.push_str(name);
            manifest.push_str(": ");
            manifest.push_str(value);
            manifest.push_str("\r\n");
        }
        manifest.push_str("\r\n");
        self.write_entry(MANIFEST_NAME, manifest.as_bytes(), CompressionMethod::Deflated)
    }

    /// Finalize the central directory and close the archive.
    pub fn finish(mut self) -> Result<(), AjwError> {
        let dest = std::mem::take(&mut self.dest);
        self.writer
            .finish()
            .map_err(|e| AjwError::archive_error(&dest, "Failed to finish archive", e))?;
        Ok(())
    }

    fn write_entry(
        &mut self,
        entry_path: &str,
        data: &[u8],
        method: CompressionMethod,
    ) -> Result<(), AjwError> {
        let options = SimpleFileOptions::default()
            .compression_method(method)
            .last_modified_time(zip::DateTime::default());
        self.writer.start_file(entry_path, options).map_err(|e| {
            AjwError::archive_error(&self.dest, format!("Failed to start entry {entry_path}"), e)
        })?;
        self.writer.write_all(data).map_err(|e| {
            AjwError::archive_error(&self.dest, format!("Failed to write entry {entry_path}"), e)
        })?;
        Ok(())
    }
}

/// Per-call entry filter; `None` accepts everything.
pub type EntryPredicate = fn(&str) -> bool;
