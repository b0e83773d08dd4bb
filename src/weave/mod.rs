//! Weave pipeline orchestration
//!
//! ## Architecture
//!
//! ```text
//! ajw CLI → weave/transform.rs → weave/ajc.rs → external ajc
//!                              → jar/ (result dir → jar merge)
//! ```
//!
//! ## Modules
//!
//! - `ajc` - argument grammar, invocation lock and log scanning for the
//!   external AspectJ compiler
//! - `transform` - input classification and the weave/merge/passthrough flow

pub mod ajc;
pub mod transform;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Weave policy for a build unit.
///
/// Simple weaves only the project's own class directories; complex pulls
/// matching dependency jars into the inpath and re-merges the result into a
/// jar; library behaves like complex but packages output for a library
/// artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeavePolicy {
    #[default]
    Simple,
    Complex,
    Library,
}

impl WeavePolicy {
    /// Whether dependency jars participate in the inpath and the result is
    /// merged back into a jar.
    pub fn is_complex(self) -> bool {
        matches!(self, WeavePolicy::Complex | WeavePolicy::Library)
    }
}

impl std::fmt::Display for WeavePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeavePolicy::Simple => write!(f, "simple"),
            WeavePolicy::Complex => write!(f, "complex"),
            WeavePolicy::Library => write!(f, "library"),
        }
    }
}

/// Staging layout of one weave transform: build/ajw/<variant>/
#[derive(Debug)]
pub struct TransformStaging {
    root: PathBuf,
}

impl TransformStaging {
    pub fn new(project_root: &Path, variant: &str) -> Self {
        Self {
            root: crate::utils::paths::transform_dir(project_root, variant),
        }
    }

    /// Weaver destination for woven class files (scratch, deleted by the
    /// merge step in complex mode)
    pub fn classes_dir(&self) -> PathBuf {
        self.root.join("classes")
    }

    /// Destination for passthrough jar copies and the merged woven jar
    pub fn jars_dir(&self) -> PathBuf {
        self.root.join("jars")
    }

    /// Location of the merged woven jar
    pub fn woven_jar(&self) -> PathBuf {
        self.jars_dir().join(format!("{TRANSFORM_NAME}.jar"))
    }

    /// Weave report location
    pub fn report_file(&self) -> PathBuf {
        self.root.join("weave_info.json")
    }

    /// Delete any previous contents and recreate the staging tree empty, so
    /// each transformation owns its own configuration and output.
    pub fn reset(&self) -> Result<()> {
        if self.root.exists() {
            std::fs::remove_dir_all(&self.root).with_context(|| {
                format!("Failed to clean staging directory {}", self.root.display())
            })?;
        }
        crate::utils::paths::ensure_dir(&self.classes_dir())?;
        crate::utils::paths::ensure_dir(&self.jars_dir())?;
        Ok(())
    }
}

/// Name of the transform, used for the merged jar
pub const TRANSFORM_NAME: &str = "aspectj";

/// Summary of one executed weave, written next to its outputs
#[derive(Debug, Serialize)]
pub struct WeaveReport {
    pub variant: String,
    pub policy: String,
    pub inpath: Vec<String>,
    pub aspectpath: Vec<String>,
    pub classpath: Vec<String>,
    pub woven_jar: Option<String>,
    pub duration_secs: f64,
}

/// Write the weave report as pretty JSON
pub fn write_weave_report(report: &WeaveReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize weave report")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write weave report to {}", path.display()))?;
    Ok(())
}
