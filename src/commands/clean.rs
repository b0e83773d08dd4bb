//! Clean command implementation

use anyhow::{Context, Result};
use clap::Args;

use crate::error::{hints, AjwError};
use crate::utils::paths::find_project_root;
use crate::utils::terminal::{print_info, print_success};

/// Clean weave staging output and logs
#[derive(Args, Debug)]
pub struct CleanCommand {}

impl CleanCommand {
    pub fn execute(self, verbose: bool) -> Result<()> {
        let root = find_project_root().map_err(|e| {
            AjwError::config_error_with_hint(
                "Not inside an ajw project",
                Some(e),
                hints::ajw_toml_not_found(),
            )
        })?;

        let mut removed = 0;
        for dir in [root.join("build/ajc"), root.join("build/ajw")] {
            if dir.exists() {
                std::fs::remove_dir_all(&dir)
                    .with_context(|| format!("Failed to clean {}", dir.display()))?;
                removed += 1;
                if verbose {
                    print_info(&format!("removed {}", dir.display()));
                }
            }
        }

        if removed == 0 {
            print_info("nothing to clean");
        } else {
            print_success("weave staging cleaned");
        }
        Ok(())
    }
}
