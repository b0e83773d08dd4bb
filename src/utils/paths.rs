//! Path utilities for the ajw CLI

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Project manifest file name
pub const PROJECT_FILE: &str = "AJW.toml";

/// Find the project root by looking for AJW.toml
pub fn find_project_root() -> Result<PathBuf> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    find_project_root_from(&current_dir)
}

/// Find the project root starting from a specific directory
pub fn find_project_root_from(start: &Path) -> Result<PathBuf> {
    let mut dir = start;
    loop {
        if dir.join(PROJECT_FILE).exists() {
            return Ok(dir.to_path_buf());
        }

        match dir.parent() {
            Some(parent) => dir = parent,
            None => {
                anyhow::bail!("Could not find AJW.toml in current directory or any parent")
            }
        }
    }
}

/// Staging directory for compiled aspect sources: build/ajc/<variant>
pub fn aspect_classes_dir(project_root: &Path, variant: &str) -> PathBuf {
    project_root.join("build").join("ajc").join(variant)
}

/// Staging root for a weave transform: build/ajw/<variant>
pub fn transform_dir(project_root: &Path, variant: &str) -> PathBuf {
    project_root.join("build").join("ajw").join(variant)
}

/// Resolve a log file name against the project build directory
pub fn log_file(project_root: &Path, name: &str) -> PathBuf {
    project_root.join("build").join(name)
}

/// Ensure a directory exists
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    }
    Ok(())
}
