//! Compile command implementation
//!
//! Compiles .aj aspect sources for a variant into build/ajc/<variant>, where
//! the weave step later picks them up as compiled aspects.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::config::AjwConfig;
use crate::error::{hints, AjwError};
use crate::filter;
use crate::utils::{paths, status, tools};
use crate::weave::ajc::{AjcLock, AjcWeaver};

/// Compile .aj source files into classes with weave meta instructions
#[derive(Args, Debug)]
pub struct CompileCommand {
    /// Variant to compile aspects for
    #[arg(long, default_value = "main")]
    pub variant: String,

    /// Compiled java classes to weave against (javac output directory)
    #[arg(long)]
    pub classes: Option<PathBuf>,

    /// Additional classpath entries (repeat or comma-separate)
    #[arg(long, value_delimiter = ',')]
    pub classpath: Vec<PathBuf>,
}

impl CompileCommand {
    pub fn execute(self, verbose: bool) -> Result<()> {
        let root = paths::find_project_root().map_err(|e| {
            AjwError::config_error_with_hint(
                "Not inside an ajw project",
                Some(e),
                hints::ajw_toml_not_found(),
            )
        })?;
        let config = AjwConfig::load(&root)?;
        let settings = &config.aspectj;

        if !settings.compile_tests && self.variant.to_lowercase().contains("test") {
            crate::utils::terminal::print_info(&format!(
                "aspect compilation disabled for test variant '{}'",
                self.variant
            ));
            return Ok(());
        }

        let sources = self.find_aspect_sources(&root, &config);
        if sources.is_empty() {
            crate::utils::terminal::print_info(&format!(
                "no aspect sources for variant '{}'",
                self.variant
            ));
            return Ok(());
        }

        status::log_compilation_start();

        let dest = paths::aspect_classes_dir(&root, &self.variant);
        if dest.exists() {
            std::fs::remove_dir_all(&dest)
                .with_context(|| format!("Failed to clean {}", dest.display()))?;
        }
        std::fs::create_dir_all(&dest)
            .with_context(|| format!("Failed to create {}", dest.display()))?;

        let mut weaver = AjcWeaver::from_settings(settings);
        weaver.destination_dir = Some(dest.clone());
        weaver.bootclasspath = config.paths.resolved_bootclasspath(&root);
        weaver.log_file = Some(paths::log_file(&root, &settings.compilation_log_file));

        for source in sources {
            weaver.add_source_root(source);
        }

        weaver.add_in_path(dest.clone());
        if let Some(classes) = &self.classes {
            weaver.add_in_path(classes.clone());
            weaver.add_class_path(classes.clone());
        }
        for entry in &self.classpath {
            weaver.add_class_path(entry.clone());
        }
        if settings.extend_classpath {
            if let Some(runtime) = tools::find_aspectjrt() {
                weaver.add_class_path(runtime);
            }
        }

        // Aspect-bearing jars on the classpath join the aspectpath.
        if !settings.include_aspects_from_jar.is_empty() {
            let aspect_jars: Vec<PathBuf> = weaver
                .class_path
                .iter()
                .filter(|entry| {
                    filter::is_include_filter_matched(
                        Some(entry.as_path()),
                        &settings.include_aspects_from_jar,
                    )
                })
                .cloned()
                .collect();
            for jar in aspect_jars {
                status::log_jar_aspect_added(&jar);
                weaver.add_aspect_path(jar);
            }
        }

        let ajc = tools::find_ajc()?;
        let lock = AjcLock::new();
        weaver.weave(&ajc.path, &lock, verbose)?;

        status::log_compilation_finish();
        Ok(())
    }

    /// Aspect source roots: src/main/aspectj, src/<variant>/aspectj and any
    /// configured extra roots; only existing directories participate.
    fn find_aspect_sources(&self, root: &std::path::Path, config: &AjwConfig) -> Vec<PathBuf> {
        let mut candidates = vec![root.join("src/main/aspectj")];
        if self.variant != "main" {
            candidates.push(root.join("src").join(&self.variant).join("aspectj"));
        }
        candidates.extend(config.paths.resolved_source_roots(root));

        let mut sources = Vec::new();
        for candidate in candidates {
            if candidate.is_dir() && !sources.contains(&candidate) {
                sources.push(candidate);
            }
        }
        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn command(variant: &str) -> CompileCommand {
        CompileCommand {
            variant: variant.to_string(),
            classes: None,
            classpath: Vec::new(),
        }
    }

    #[test]
    fn test_find_aspect_sources_per_variant() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("src/main/aspectj")).unwrap();
        fs::create_dir_all(tmp.path().join("src/debug/aspectj")).unwrap();
        let config = AjwConfig::parse("[project]\nname = \"app\"\n").unwrap();

        let sources = command("debug").find_aspect_sources(tmp.path(), &config);
        assert_eq!(
            sources,
            vec![
                tmp.path().join("src/main/aspectj"),
                tmp.path().join("src/debug/aspectj"),
            ]
        );

        let sources = command("main").find_aspect_sources(tmp.path(), &config);
        assert_eq!(sources, vec![tmp.path().join("src/main/aspectj")]);
    }

    #[test]
    fn test_configured_source_roots_join_in() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("aspects/common")).unwrap();
        let config = AjwConfig::parse(
            "[project]\nname = \"app\"\n\n[paths]\nsource_roots = [\"aspects/common\"]\n",
        )
        .unwrap();

        let sources = command("main").find_aspect_sources(tmp.path(), &config);
        assert_eq!(sources, vec![tmp.path().join("aspects/common")]);
    }
}
