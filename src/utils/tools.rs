//! AspectJ toolchain discovery
//!
//! The ajc executable is looked up on PATH first, then under ASPECTJ_HOME.

use std::path::PathBuf;
use std::process::Command;

use which::which;

use crate::error::{hints, AjwError};

/// Name of the AspectJ compiler executable
pub const AJC: &str = "ajc";

/// Tool detection result
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Tool name
    pub name: String,
    /// Path to the tool executable
    pub path: PathBuf,
    /// Tool version string (if available)
    pub version: Option<String>,
}

/// Locate the ajc executable, or explain how to get one.
pub fn find_ajc() -> Result<ToolInfo, AjwError> {
    if let Ok(path) = which(AJC) {
        return Ok(ToolInfo {
            name: AJC.to_string(),
            path: path.clone(),
            version: get_ajc_version(&path),
        });
    }

    if let Ok(home) = std::env::var("ASPECTJ_HOME") {
        let candidate = PathBuf::from(home).join("bin").join(AJC);
        if candidate.exists() {
            return Ok(ToolInfo {
                name: AJC.to_string(),
                path: candidate.clone(),
                version: get_ajc_version(&candidate),
            });
        }
    }

    Err(AjwError::missing_tool(
        AJC,
        "compiling and weaving AspectJ sources",
        hints::ajc(),
    ))
}

/// Locate the AspectJ runtime jar under ASPECTJ_HOME, if present.
///
/// Used to extend the weave classpath so advice bodies resolve against the
/// aspectjrt types.
pub fn find_aspectjrt() -> Option<PathBuf> {
    let home = std::env::var("ASPECTJ_HOME").ok()?;
    let candidate = PathBuf::from(home).join("lib").join("aspectjrt.jar");
    candidate.exists().then_some(candidate)
}

/// Get the ajc version by running `ajc -version`
fn get_ajc_version(path: &PathBuf) -> Option<String> {
    let output = Command::new(path).arg("-version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout);
    text.lines()
        .find(|line| !line.trim().is_empty())
        .map(|line| line.trim().to_string())
}
