//! Error types and helpers for user-friendly error messages
//!
//! This module provides custom error types with actionable hints and suggestions
//! to help users quickly resolve common issues.

use std::path::PathBuf;

use thiserror::Error;

/// Custom error types with helpful context and suggestions
#[derive(Error, Debug)]
pub enum AjwError {
    /// Configuration file errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
        hint: Option<String>,
    },

    /// Tool/executable not found or misconfigured
    #[error("Missing tool: {tool}")]
    MissingTool {
        tool: String,
        required_for: String,
        hint: String,
    },

    /// I/O failure while reading or assembling a jar archive
    #[error("Archive error for {}: {message}", path.display())]
    Archive {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The external AspectJ compiler reported an unrecoverable condition,
    /// or an error-level diagnostic while break-on-error is configured
    #[error("AspectJ compiler failed: {message}")]
    CompilerFailure {
        message: String,
        log_file: Option<PathBuf>,
        hint: Option<String>,
    },
}

impl AjwError {
    /// Create a configuration error with a hint
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
            hint: None,
        }
    }

    /// Create a configuration error with source and hint
    pub fn config_error_with_hint(
        message: impl Into<String>,
        source: Option<anyhow::Error>,
        hint: impl Into<String>,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source,
            hint: Some(hint.into()),
        }
    }

    /// Create a missing tool error
    pub fn missing_tool(
        tool: impl Into<String>,
        required_for: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self::MissingTool {
            tool: tool.into(),
            required_for: required_for.into(),
            hint: hint.into(),
        }
    }

    /// Create an archive error wrapping the underlying cause
    pub fn archive_error(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Archive {
            path: path.into(),
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a compiler failure pointing at the detailed log file
    pub fn compiler_failure(message: impl Into<String>, log_file: Option<PathBuf>) -> Self {
        let hint = log_file
            .as_ref()
            .map(|lf| format!("Look into {} file for details", lf.display()));
        Self::CompilerFailure {
            message: message.into(),
            log_file,
            hint,
        }
    }

    /// Display error with formatting and hints
    pub fn display_with_hints(&self) {
        use console::style;

        eprintln!("\n{} {}", style("ERROR:").red().bold(), self);

        match self {
            AjwError::Config { hint, .. } | AjwError::CompilerFailure { hint, .. } => {
                if let Some(h) = hint {
                    eprintln!("\n{} {}", style("HINT:").yellow().bold(), h);
                }
            }
            AjwError::MissingTool { hint, .. } => {
                eprintln!("\n{} {}", style("HINT:").yellow().bold(), hint);
            }
            AjwError::Archive { source, .. } => {
                if let Some(cause) = source {
                    eprintln!("\n{} {}", style("CAUSE:").cyan().bold(), cause);
                }
            }
        }

        if let AjwError::MissingTool { required_for, .. } = self {
            eprintln!("\n{} {}", style("REQUIRED FOR:").cyan().bold(), required_for);
        }

        eprintln!();
    }
}

/// Common error hints for missing tools and broken configuration
pub mod hints {
    /// Get hint for a missing ajc executable
    pub fn ajc() -> &'static str {
        "Install the AspectJ tools and make ajc discoverable:\n\
         • Download from https://eclipse.dev/aspectj/\n\
         • macOS: brew install aspectj\n\
         • Or set ASPECTJ_HOME to the unpacked distribution (ajc is expected at $ASPECTJ_HOME/bin/ajc)"
    }

    /// Get hint for AJW.toml not found
    pub fn ajw_toml_not_found() -> &'static str {
        "Could not find AJW.toml in current directory or any parent directory.\n\
         \n\
         To initialize a weave project in an existing tree:\n\
         • Run: ajw init"
    }

    /// Get hint for invalid AJW.toml
    pub fn invalid_ajw_toml() -> &'static str {
        "AJW.toml is invalid. Common issues:\n\
         • Missing [project] section\n\
         • Invalid TOML syntax (check quotes, brackets, commas)\n\
         • Unknown policy (must be 'simple', 'complex' or 'library')\n\
         • java level must look like '1.7', '1.8' or a bare release number"
    }

    /// Get hint for a weave aborted by error-level ajc diagnostics
    pub fn break_on_error() -> &'static str {
        "ajc reported error-level diagnostics and break_on_error is enabled.\n\
         • Fix the reported aspects/classes, or\n\
         • Set ignore_errors = true / break_on_error = false in [aspectj] to proceed on errors"
    }
}
