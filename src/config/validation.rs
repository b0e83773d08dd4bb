//! Configuration validation with helpful error messages

use std::path::Path;

use anyhow::{bail, Result};
use regex::Regex;

use super::{AjwConfig, AspectjSettings};

/// Validate the entire AJW configuration
pub fn validate_config(config: &AjwConfig) -> Result<()> {
    validate_project_name(&config.project.name)?;
    validate_aspectj(&config.aspectj)?;
    Ok(())
}

fn validate_project_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Project name must not be empty");
    }
    if name.chars().any(char::is_whitespace) {
        bail!("Project name must not contain whitespace: '{name}'");
    }
    Ok(())
}

fn validate_aspectj(settings: &AspectjSettings) -> Result<()> {
    validate_java_level(&settings.java)?;
    validate_log_file_name("transform_log_file", &settings.transform_log_file)?;
    validate_log_file_name("compilation_log_file", &settings.compilation_log_file)?;

    for (field, filters) in [
        ("include_jar", &settings.include_jar),
        ("exclude_jar", &settings.exclude_jar),
        ("include_aspects_from_jar", &settings.include_aspects_from_jar),
    ] {
        for filter in filters {
            if filter.trim().is_empty() {
                bail!("Empty filter in [aspectj] {field}");
            }
        }
    }

    Ok(())
}

/// Accept classic "1.5".."1.8" levels and bare release numbers ("8", "11")
fn validate_java_level(java: &str) -> Result<()> {
    let valid = Regex::new(r"^(1\.[5-9]|[1-9]\d?)$")
        .map(|re| re.is_match(java))
        .unwrap_or(false);
    if !valid {
        bail!(
            "Invalid java level '{java}' in [aspectj] (expected e.g. '1.7', '1.8' or '11')"
        );
    }
    Ok(())
}

fn validate_log_file_name(field: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("[aspectj] {field} must not be empty");
    }
    if Path::new(name).is_absolute() {
        bail!("[aspectj] {field} must be relative to the build directory: '{name}'");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AjwConfig;

    fn config(toml: &str) -> AjwConfig {
        AjwConfig::parse(toml).unwrap()
    }

    #[test]
    fn test_valid_minimal_config() {
        let cfg = config("[project]\nname = \"app\"\n");
        assert!(validate_config(&cfg).is_ok());
    }

    #[test]
    fn test_java_levels() {
        assert!(validate_java_level("1.5").is_ok());
        assert!(validate_java_level("1.7").is_ok());
        assert!(validate_java_level("1.8").is_ok());
        assert!(validate_java_level("8").is_ok());
        assert!(validate_java_level("11").is_ok());

        assert!(validate_java_level("").is_err());
        assert!(validate_java_level("1.4.2").is_err());
        assert!(validate_java_level("one-dot-seven").is_err());
    }

    #[test]
    fn test_project_name_rules() {
        let cfg = config("[project]\nname = \"my app\"\n");
        assert!(validate_config(&cfg).is_err());

        let cfg = config("[project]\nname = \"\"\n");
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_empty_filter_rejected() {
        let cfg = config(
            "[project]\nname = \"app\"\n\n[aspectj]\ninclude_jar = [\"flexbox\", \"\"]\n",
        );
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_absolute_log_file_rejected() {
        let cfg = config(
            "[project]\nname = \"app\"\n\n[aspectj]\ntransform_log_file = \"/var/log/ajc.log\"\n",
        );
        assert!(validate_config(&cfg).is_err());
    }
}
