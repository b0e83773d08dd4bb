//! Weave transform: classify inputs, weave, merge, pass through
//!
//! One transform runs per build unit (variant). Input class directories
//! always join the inpath; dependency jars are routed by the include/exclude
//! filter sets into the inpath, the aspectpath, or a passthrough copy. After
//! a complex-mode weave the result directory is merged into a single jar.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};

use crate::config::AjwConfig;
use crate::error::AjwError;
use crate::filter;
use crate::jar;
use crate::utils::{paths, status, tools};
use crate::weave::ajc::{AjcLock, AjcWeaver};
use crate::weave::{TransformStaging, WeavePolicy, WeaveReport};

/// Compiled-class roots and dependency jars for one build unit
#[derive(Debug, Default)]
pub struct TransformInputs {
    /// Class directories (always woven)
    pub directories: Vec<PathBuf>,
    /// Dependency jars (woven, aspect source or passthrough per filters)
    pub jars: Vec<PathBuf>,
    /// Classpath-only entries for type resolution
    pub referenced: Vec<PathBuf>,
}

impl TransformInputs {
    /// Split raw paths into class directories and jars.
    ///
    /// Paths that do not exist are skipped with a warning rather than
    /// failing the build unit.
    pub fn classify(paths: &[PathBuf]) -> Self {
        let mut inputs = Self::default();
        for path in paths {
            if path.is_dir() {
                inputs.directories.push(path.clone());
            } else if path.is_file() {
                inputs.jars.push(path.clone());
            } else {
                crate::utils::terminal::print_warning(&format!(
                    "skipping missing input {}",
                    path.display()
                ));
            }
        }
        inputs
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.jars.is_empty()
    }
}

/// One weave transform over a variant's compiled output
pub struct WeaveTransform<'a> {
    pub project_root: &'a Path,
    pub variant: &'a str,
    pub config: &'a AjwConfig,
    pub policy: WeavePolicy,
    pub verbose: bool,
}

impl WeaveTransform<'_> {
    /// Run the transform pipeline to completion.
    pub fn execute(&self, inputs: &TransformInputs, lock: &AjcLock) -> Result<()> {
        let staging = TransformStaging::new(self.project_root, self.variant);
        staging.reset()?;
        let classes_dir = staging.classes_dir();

        let settings = &self.config.aspectj;
        let mut weaver = AjcWeaver::from_settings(settings);
        weaver.destination_dir = Some(classes_dir.clone());
        weaver.bootclasspath = self
            .config
            .paths
            .resolved_bootclasspath(self.project_root);
        weaver.log_file = Some(paths::log_file(
            self.project_root,
            &settings.transform_log_file,
        ));

        status::log_augmentation_start();

        // Aspects compiled by `ajw compile` join the aspectpath, and their
        // classes ride along into the output.
        let compiled_aspects = paths::aspect_classes_dir(self.project_root, self.variant);
        if compiled_aspects.exists() {
            weaver.add_aspect_path(compiled_aspects.clone());
            copy_dir_all(&compiled_aspects, &classes_dir)?;
        }

        for dir in &inputs.directories {
            weaver.add_in_path(dir.clone());
            weaver.add_class_path(dir.clone());
        }

        for jar_file in &inputs.jars {
            weaver.add_class_path(jar_file.clone());

            if self.policy.is_complex() {
                let include_matched = !settings.include_jar.is_empty()
                    && filter::is_include_filter_matched(Some(jar_file.as_path()), &settings.include_jar);
                let exclude_matched = !settings.exclude_jar.is_empty()
                    && filter::is_exclude_filter_matched(Some(jar_file.as_path()), &settings.exclude_jar);

                if exclude_matched {
                    status::log_jar_inpath_removed(jar_file);
                }

                if !exclude_matched && (settings.include_all_jars || include_matched) {
                    status::log_jar_inpath_added(jar_file);
                    weaver.add_in_path(jar_file.clone());
                } else {
                    self.copy_jar(&staging, jar_file)?;
                }
            } else if !settings.include_jar.is_empty() || !settings.exclude_jar.is_empty() {
                status::log_ignore_inpath_jars();
            }

            let aspects_matched = !settings.include_aspects_from_jar.is_empty()
                && filter::is_include_filter_matched(
                    Some(jar_file.as_path()),
                    &settings.include_aspects_from_jar,
                );
            if aspects_matched {
                status::log_jar_aspect_added(jar_file);
                weaver.add_aspect_path(jar_file.clone());
            }
        }

        for path in &inputs.referenced {
            weaver.add_class_path(path.clone());
        }

        if settings.extend_classpath {
            if let Some(runtime) = tools::find_aspectjrt() {
                weaver.add_class_path(runtime);
            }
        }

        let has_inpath_dirs = weaver.in_path.iter().any(|p| dir_has_content(p));
        let has_classpath_dirs = weaver.class_path.iter().any(|p| dir_has_content(p));
        if !has_inpath_dirs || !has_classpath_dirs {
            status::log_no_augmentation();
            return Ok(());
        }

        weaver.add_in_path(classes_dir.clone());

        status::log_weaver_policy(self.policy);
        let ajc = tools::find_ajc()?;
        let started = Instant::now();
        weaver.weave(&ajc.path, lock, self.verbose)?;

        let woven_jar = if self.policy.is_complex() {
            let dest = staging.woven_jar();
            jar::merge_directory_into_jar(&classes_dir, &dest)?;
            Some(dest)
        } else {
            self.copy_unprocessed(&inputs.directories, &classes_dir)?;
            None
        };

        let report = WeaveReport {
            variant: self.variant.to_string(),
            policy: self.policy.to_string(),
            inpath: display_all(&weaver.in_path),
            aspectpath: display_all(&weaver.aspect_path),
            classpath: display_all(&weaver.class_path),
            woven_jar: woven_jar.map(|p| p.display().to_string()),
            duration_secs: started.elapsed().as_secs_f64(),
        };
        crate::weave::write_weave_report(&report, &staging.report_file())?;

        status::log_augmentation_finish();
        Ok(())
    }

    /// Copy a jar that stays out of the weave into the output unmodified.
    fn copy_jar(&self, staging: &TransformStaging, jar_file: &Path) -> Result<()> {
        let name = jar_file
            .file_name()
            .ok_or_else(|| {
                AjwError::archive_error(
                    jar_file,
                    "Jar input has no file name",
                    std::io::Error::from(std::io::ErrorKind::InvalidInput),
                )
            })?
            .to_string_lossy()
            .into_owned();
        let dest = staging.jars_dir().join(&name);
        std::fs::copy(jar_file, &dest).with_context(|| {
            format!(
                "Failed to copy {} to {}",
                jar_file.display(),
                dest.display()
            )
        })?;
        Ok(())
    }

    /// Simple mode: files the weaver did not produce are carried over from
    /// the input directories, never overwriting woven output.
    fn copy_unprocessed(&self, input_dirs: &[PathBuf], out_dir: &Path) -> Result<()> {
        for dir in input_dirs {
            for entry in walkdir::WalkDir::new(dir) {
                let entry = entry
                    .with_context(|| format!("Failed to walk input {}", dir.display()))?;
                let relative = entry
                    .path()
                    .strip_prefix(dir)
                    .context("Failed to get relative path")?;
                if relative.as_os_str().is_empty() {
                    continue;
                }
                let dest = out_dir.join(relative);
                if dest.exists() {
                    continue;
                }
                if entry.file_type().is_dir() {
                    std::fs::create_dir_all(&dest)
                        .with_context(|| format!("Failed to create {}", dest.display()))?;
                } else {
                    if let Some(parent) = dest.parent() {
                        std::fs::create_dir_all(parent)
                            .with_context(|| format!("Failed to create {}", parent.display()))?;
                    }
                    std::fs::copy(entry.path(), &dest).with_context(|| {
                        format!(
                            "Failed to copy {} to {}",
                            entry.path().display(),
                            dest.display()
                        )
                    })?;
                }
            }
        }
        Ok(())
    }
}

fn dir_has_content(path: &Path) -> bool {
    path.is_dir()
        && path
            .read_dir()
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false)
}

fn display_all(paths: &[PathBuf]) -> Vec<String> {
    paths.iter().map(|p| p.display().to_string()).collect()
}

/// Copy a directory tree recursively, overwriting existing files
fn copy_dir_all(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let path = entry.path();
        let dest_path = dst.join(entry.file_name());

        if path.is_dir() {
            copy_dir_all(&path, &dest_path)?;
        } else {
            std::fs::copy(&path, &dest_path)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_classify_splits_dirs_and_jars() {
        let tmp = tempfile::tempdir().unwrap();
        let classes = tmp.path().join("classes");
        fs::create_dir_all(&classes).unwrap();
        let jar = tmp.path().join("dep.jar");
        fs::write(&jar, b"pk").unwrap();
        let missing = tmp.path().join("gone.jar");

        let inputs = TransformInputs::classify(&[classes.clone(), jar.clone(), missing]);
        assert_eq!(inputs.directories, vec![classes]);
        assert_eq!(inputs.jars, vec![jar]);
        assert!(inputs.referenced.is_empty());
    }

    #[test]
    fn test_dir_has_content() {
        let tmp = tempfile::tempdir().unwrap();
        let empty = tmp.path().join("empty");
        fs::create_dir_all(&empty).unwrap();
        let full = tmp.path().join("full");
        fs::create_dir_all(&full).unwrap();
        fs::write(full.join("A.class"), b"x").unwrap();

        assert!(!dir_has_content(&empty));
        assert!(!dir_has_content(&tmp.path().join("missing")));
        assert!(dir_has_content(&full));
    }

    #[test]
    fn test_copy_dir_all_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(src.join("a")).unwrap();
        fs::write(src.join("a/B.class"), b"new").unwrap();
        let dst = tmp.path().join("dst");
        fs::create_dir_all(dst.join("a")).unwrap();
        fs::write(dst.join("a/B.class"), b"old").unwrap();

        copy_dir_all(&src, &dst).unwrap();
        assert_eq!(fs::read(dst.join("a/B.class")).unwrap(), b"new");
    }

    #[test]
    fn test_empty_inputs_exit_without_weaving() {
        // No inputs at all means no non-empty inpath directory, so the
        // transform bails out before ever resolving the ajc toolchain.
        let tmp = tempfile::tempdir().unwrap();
        let config = AjwConfig::parse("[project]\nname = \"app\"\n").unwrap();
        let transform = WeaveTransform {
            project_root: tmp.path(),
            variant: "debug",
            config: &config,
            policy: WeavePolicy::Simple,
            verbose: false,
        };

        let inputs = TransformInputs::default();
        let lock = AjcLock::new();
        transform.execute(&inputs, &lock).unwrap();

        // Staging exists but nothing was woven and no report was written.
        let staging = TransformStaging::new(tmp.path(), "debug");
        assert!(staging.classes_dir().exists());
        assert!(!staging.report_file().exists());
    }

    #[test]
    fn test_unprocessed_files_do_not_overwrite_woven_output() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AjwConfig::parse("[project]\nname = \"app\"\n").unwrap();
        let transform = WeaveTransform {
            project_root: tmp.path(),
            variant: "debug",
            config: &config,
            policy: WeavePolicy::Simple,
            verbose: false,
        };

        let input = tmp.path().join("input");
        fs::create_dir_all(input.join("a")).unwrap();
        fs::write(input.join("a/B.class"), b"original").unwrap();
        fs::write(input.join("a/res.txt"), b"resource").unwrap();

        let out = tmp.path().join("out");
        fs::create_dir_all(out.join("a")).unwrap();
        fs::write(out.join("a/B.class"), b"woven").unwrap();

        transform
            .copy_unprocessed(&[input], &out)
            .unwrap();

        assert_eq!(fs::read(out.join("a/B.class")).unwrap(), b"woven");
        assert_eq!(fs::read(out.join("a/res.txt")).unwrap(), b"resource");
    }
}
