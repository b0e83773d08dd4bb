//! Check command implementation

use anyhow::Result;
use clap::Args;

use crate::config::AjwConfig;
use crate::utils::paths::find_project_root;
use crate::utils::terminal::{print_info, print_success};
use crate::utils::tools;

/// Check that the AspectJ toolchain and project configuration are usable
#[derive(Args, Debug)]
pub struct CheckCommand {}

impl CheckCommand {
    pub fn execute(self, verbose: bool) -> Result<()> {
        let ajc = tools::find_ajc()?;
        match &ajc.version {
            Some(version) => print_success(&format!(
                "found {} at {} ({version})",
                ajc.name,
                ajc.path.display()
            )),
            None => print_success(&format!("found {} at {}", ajc.name, ajc.path.display())),
        }

        // The toolchain check works outside a project; the config check only
        // runs when there is one.
        match find_project_root() {
            Ok(root) => {
                let config = AjwConfig::load(&root)?;
                let name = match &config.project.version {
                    Some(version) => format!("{} {version}", config.project.name),
                    None => config.project.name.clone(),
                };
                print_success(&format!(
                    "{name} configuration is valid (policy: {})",
                    config.aspectj.policy
                ));
                if verbose {
                    print_info(&format!("project root: {}", root.display()));
                    print_info(&format!(
                        "configured toolchain: aspectj {}",
                        config.aspectj.ajc
                    ));
                    print_info(&format!(
                        "include_jar: {:?}, exclude_jar: {:?}",
                        config.aspectj.include_jar, config.aspectj.exclude_jar
                    ));
                }
            }
            Err(_) => {
                print_info("no AJW.toml found; skipping project configuration check");
            }
        }

        Ok(())
    }
}
