//! Init command implementation

use anyhow::{bail, Result};
use clap::Args;

use crate::utils::paths::PROJECT_FILE;
use crate::utils::terminal::print_success;

const TEMPLATE: &str = r#"[project]
name = "app"

[aspectj]
# Weave policy: "simple" weaves only project classes, "complex" additionally
# weaves dependency jars matched by the filters below, "library" packages
# complex output for a library artifact.
policy = "simple"
java = "1.7"

# Substring filters over dependency identities (path, or manifest package
# for build-cache entries).
include_jar = []
exclude_jar = []
include_aspects_from_jar = []

weave_info = true
break_on_error = true

[paths]
# bootclasspath = ["sdk/android.jar"]
# source_roots = []
"#;

/// Initialize a weave project in the current directory
#[derive(Args, Debug)]
pub struct InitCommand {}

impl InitCommand {
    pub fn execute(self, _verbose: bool) -> Result<()> {
        let dest = std::env::current_dir()?.join(PROJECT_FILE);
        if dest.exists() {
            bail!("{PROJECT_FILE} already exists in this directory");
        }

        std::fs::write(&dest, TEMPLATE)?;
        print_success(&format!("created {PROJECT_FILE}"));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses_and_validates() {
        let config = crate::config::AjwConfig::parse(TEMPLATE).unwrap();
        assert!(crate::config::validation::validate_config(&config).is_ok());
        assert_eq!(config.project.name, "app");
    }
}
