//! AJW.toml configuration parsing
//!
//! The `[aspectj]` section carries the weave configuration surface; every
//! field has a default, so a minimal project file is just:
//!
//! ```toml
//! [project]
//! name = "app"
//! ```
//!
//! Filters in `include_jar`, `exclude_jar` and `include_aspects_from_jar`
//! are plain substrings matched against a dependency's identity string, not
//! globs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::{hints, AjwError};
use crate::utils::paths::PROJECT_FILE;
use crate::weave::WeavePolicy;

/// Root configuration from AJW.toml
#[derive(Debug, Clone, Deserialize)]
pub struct AjwConfig {
    /// Project metadata
    pub project: ProjectConfig,

    /// Weave configuration
    #[serde(default)]
    pub aspectj: AspectjSettings,

    /// Filesystem configuration
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Project metadata from the [project] section
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Project name
    pub name: String,

    /// Optional project version
    #[serde(default)]
    pub version: Option<String>,
}

/// Weave configuration from the [aspectj] section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AspectjSettings {
    /// AspectJ toolchain version this project is built against
    pub ajc: String,

    /// Java language level passed as -source and -target
    pub java: String,

    /// Weave policy for the transform step
    pub policy: WeavePolicy,

    /// Weave every dependency jar regardless of include filters
    pub include_all_jars: bool,

    /// Substring filters selecting jars for the weave inpath
    pub include_jar: Vec<String>,

    /// Substring filters keeping jars out of the weave inpath
    pub exclude_jar: Vec<String>,

    /// Substring filters selecting jars whose aspects are applied
    pub include_aspects_from_jar: Vec<String>,

    /// Extend the compile classpath with the aspectj runtime
    pub extend_classpath: bool,

    /// Also weave test variants
    pub compile_tests: bool,

    /// Ask ajc to report each weave decision (-showWeaveInfo)
    pub weave_info: bool,

    /// Emit debug info (-g)
    pub debug_info: bool,

    /// Add serialVersionUID fields to woven types
    pub add_serial_version_uid: bool,

    /// Disable inlining of around advice (-XnoInline)
    pub no_inline_around: bool,

    /// Proceed on compile errors (-proceedOnError -noImportError)
    pub ignore_errors: bool,

    /// Fail the build on error-level log diagnostics
    pub break_on_error: bool,

    /// Enable experimental joinpoints
    pub experimental: bool,

    /// Source encoding
    pub encoding: String,

    /// Log file name for the transform step, relative to build/
    pub transform_log_file: String,

    /// Log file name for aspect compilation, relative to build/
    pub compilation_log_file: String,

    /// Extra arguments appended verbatim to the ajc invocation
    pub ajc_args: Vec<String>,
}

impl Default for AspectjSettings {
    fn default() -> Self {
        Self {
            ajc: "1.9.4".to_string(),
            java: "1.7".to_string(),
            policy: WeavePolicy::Simple,
            include_all_jars: false,
            include_jar: Vec::new(),
            exclude_jar: Vec::new(),
            include_aspects_from_jar: Vec::new(),
            extend_classpath: true,
            compile_tests: true,
            weave_info: true,
            debug_info: false,
            add_serial_version_uid: false,
            no_inline_around: false,
            ignore_errors: false,
            break_on_error: true,
            experimental: false,
            encoding: "UTF-8".to_string(),
            transform_log_file: "ajc-transform.log".to_string(),
            compilation_log_file: "ajc-compile.log".to_string(),
            ajc_args: Vec::new(),
        }
    }
}

/// Filesystem configuration from the [paths] section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Boot classpath entries (e.g. the android.jar of the target API)
    pub bootclasspath: Vec<PathBuf>,

    /// Extra aspect source roots beside src/<variant>/aspectj
    pub source_roots: Vec<PathBuf>,
}

impl PathsConfig {
    /// Bootclasspath entries resolved against the project root
    pub fn resolved_bootclasspath(&self, project_root: &Path) -> Vec<PathBuf> {
        self.bootclasspath
            .iter()
            .map(|p| resolve(project_root, p))
            .collect()
    }

    /// Extra source roots resolved against the project root
    pub fn resolved_source_roots(&self, project_root: &Path) -> Vec<PathBuf> {
        self.source_roots
            .iter()
            .map(|p| resolve(project_root, p))
            .collect()
    }
}

fn resolve(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

impl AjwConfig {
    /// Parse configuration from TOML text
    pub fn parse(text: &str) -> Result<Self> {
        let config: AjwConfig = toml::from_str(text).map_err(|e| {
            AjwError::config_error_with_hint(
                format!("Failed to parse {PROJECT_FILE}"),
                Some(e.into()),
                hints::invalid_ajw_toml(),
            )
        })?;
        Ok(config)
    }

    /// Load and validate the configuration of a project
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = project_root.join(PROJECT_FILE);
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::parse(&text)?;
        super::validation::validate_config(&config).map_err(|e| {
            AjwError::config_error_with_hint(
                format!("{PROJECT_FILE} failed validation"),
                Some(e),
                hints::invalid_ajw_toml(),
            )
        })?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let toml = r#"
[project]
name = "app"
"#;

        let config = AjwConfig::parse(toml).unwrap();
        assert_eq!(config.project.name, "app");

        // Defaults mirror the classic plugin extension.
        let aj = &config.aspectj;
        assert_eq!(aj.ajc, "1.9.4");
        assert_eq!(aj.java, "1.7");
        assert_eq!(aj.policy, WeavePolicy::Simple);
        assert!(!aj.include_all_jars);
        assert!(aj.extend_classpath);
        assert!(aj.compile_tests);
        assert!(aj.weave_info);
        assert!(!aj.debug_info);
        assert!(!aj.add_serial_version_uid);
        assert!(!aj.no_inline_around);
        assert!(!aj.ignore_errors);
        assert!(aj.break_on_error);
        assert!(!aj.experimental);
        assert_eq!(aj.encoding, "UTF-8");
        assert_eq!(aj.transform_log_file, "ajc-transform.log");
        assert_eq!(aj.compilation_log_file, "ajc-compile.log");
        assert!(aj.ajc_args.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[project]
name = "app"
version = "2.1.0"

[aspectj]
java = "1.8"
policy = "complex"
include_all_jars = false
include_jar = ["flexbox", "universal-image-loader"]
exclude_jar = ["dagger"]
include_aspects_from_jar = ["tracing-aspects"]
break_on_error = false
ajc_args = ["-warn:none"]

[paths]
bootclasspath = ["sdk/android.jar"]
source_roots = ["aspects/common"]
"#;

        let config = AjwConfig::parse(toml).unwrap();
        assert_eq!(config.project.version.as_deref(), Some("2.1.0"));
        let aj = &config.aspectj;
        assert_eq!(aj.java, "1.8");
        assert_eq!(aj.policy, WeavePolicy::Complex);
        assert_eq!(aj.include_jar.len(), 2);
        assert_eq!(aj.exclude_jar, vec!["dagger".to_string()]);
        assert_eq!(
            aj.include_aspects_from_jar,
            vec!["tracing-aspects".to_string()]
        );
        assert!(!aj.break_on_error);
        assert_eq!(aj.ajc_args, vec!["-warn:none".to_string()]);
        assert_eq!(config.paths.bootclasspath.len(), 1);
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let toml = r#"
[project]
name = "app"

[aspectj]
policy = "everything"
"#;
        assert!(AjwConfig::parse(toml).is_err());
    }

    #[test]
    fn test_relative_paths_resolve_against_root() {
        let toml = r#"
[project]
name = "app"

[paths]
bootclasspath = ["sdk/android.jar", "/abs/rt.jar"]
"#;
        let config = AjwConfig::parse(toml).unwrap();
        let resolved = config.paths.resolved_bootclasspath(Path::new("/work/app"));
        assert_eq!(
            resolved,
            vec![
                PathBuf::from("/work/app/sdk/android.jar"),
                PathBuf::from("/abs/rt.jar"),
            ]
        );
    }

    #[test]
    fn test_missing_project_section_is_rejected() {
        assert!(AjwConfig::parse("[aspectj]\njava = \"1.7\"\n").is_err());
    }
}
