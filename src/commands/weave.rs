//! Weave command implementation
//!
//! Runs the transform pipeline for one variant: routes the given class
//! directories and dependency jars through include/exclude filtering, invokes
//! ajc, and reassembles the output.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::config::AjwConfig;
use crate::error::{hints, AjwError};
use crate::utils::paths::find_project_root;
use crate::weave::ajc::AjcLock;
use crate::weave::transform::{TransformInputs, WeaveTransform};
use crate::weave::WeavePolicy;

/// Weave compiled classes and dependency jars for a variant
#[derive(Args, Debug)]
pub struct WeaveCommand {
    /// Class directories and jars to transform
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Variant being woven
    #[arg(long, default_value = "debug")]
    pub variant: String,

    /// Override the configured weave policy
    #[arg(long, value_enum)]
    pub policy: Option<WeavePolicy>,

    /// Classpath-only entries for type resolution (repeat or comma-separate)
    #[arg(long, value_delimiter = ',')]
    pub classpath: Vec<PathBuf>,
}

impl WeaveCommand {
    pub fn execute(self, verbose: bool) -> Result<()> {
        let root = find_project_root().map_err(|e| {
            AjwError::config_error_with_hint(
                "Not inside an ajw project",
                Some(e),
                hints::ajw_toml_not_found(),
            )
        })?;
        let config = AjwConfig::load(&root)?;

        let mut inputs = TransformInputs::classify(&self.inputs);
        inputs.referenced = self.classpath.clone();
        if inputs.is_empty() {
            return Err(
                AjwError::config_error("No usable inputs: every given path is missing").into(),
            );
        }

        let policy = self.policy.unwrap_or(config.aspectj.policy);

        // One weave in flight at a time, process-wide: the invocation and
        // its log inspection share the log file path.
        let lock = AjcLock::new();
        let transform = WeaveTransform {
            project_root: &root,
            variant: &self.variant,
            config: &config,
            policy,
            verbose,
        };
        transform.execute(&inputs, &lock)
    }
}
