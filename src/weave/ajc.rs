//! External AspectJ compiler invocation
//!
//! Builds the ajc argument vector, runs the compiler synchronously and scans
//! its log file for error-level diagnostics. The invocation and the log
//! inspection are not reentrant with respect to the log file path, so every
//! weave goes through a single [`AjcLock`] owned by the command layer: at
//! most one weave operation is in flight at a time, process-wide.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::config::AspectjSettings;
use crate::error::AjwError;
use crate::exec;
use crate::utils::status;

/// Marker ajc writes in front of error-level diagnostics in its log
const ERROR_MARKER: &str = "[error]";

/// Path-list separator used for -classpath style arguments
const PATH_LIST_SEPARATOR: &str = if cfg!(windows) { ";" } else { ":" };

/// Explicit mutual-exclusion handle for compiler invocations.
///
/// Owned by the orchestration layer and passed into [`AjcWeaver::weave`],
/// which makes the concurrency contract visible at the call site instead of
/// hiding it in a static.
#[derive(Debug, Default)]
pub struct AjcLock(Mutex<()>);

impl AjcLock {
    pub fn new() -> Self {
        Self::default()
    }

    fn acquire(&self) -> MutexGuard<'_, ()> {
        // The guarded section holds no state worth poisoning over.
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// One configured invocation of the external AspectJ compiler
#[derive(Debug, Default)]
pub struct AjcWeaver {
    pub encoding: String,
    pub source_compatibility: String,
    pub target_compatibility: String,
    pub destination_dir: Option<PathBuf>,
    pub bootclasspath: Vec<PathBuf>,
    pub class_path: Vec<PathBuf>,
    pub aj_sources: Vec<PathBuf>,
    pub in_path: Vec<PathBuf>,
    pub aspect_path: Vec<PathBuf>,
    pub log_file: Option<PathBuf>,

    pub weave_info: bool,
    pub debug_info: bool,
    pub add_serial_vuid: bool,
    pub no_inline_around: bool,
    pub ignore_errors: bool,
    pub break_on_error: bool,
    pub experimental: bool,

    pub ajc_args: Vec<String>,
}

impl AjcWeaver {
    /// Seed a weaver from the project's [aspectj] settings
    pub fn from_settings(settings: &AspectjSettings) -> Self {
        Self {
            encoding: settings.encoding.clone(),
            source_compatibility: settings.java.clone(),
            target_compatibility: settings.java.clone(),
            weave_info: settings.weave_info,
            debug_info: settings.debug_info,
            add_serial_vuid: settings.add_serial_version_uid,
            no_inline_around: settings.no_inline_around,
            ignore_errors: settings.ignore_errors,
            break_on_error: settings.break_on_error,
            experimental: settings.experimental,
            ajc_args: settings.ajc_args.clone(),
            ..Self::default()
        }
    }

    /// Append to the classpath, preserving insertion order without duplicates
    pub fn add_class_path(&mut self, path: PathBuf) {
        push_unique(&mut self.class_path, path);
    }

    /// Append to the inpath, preserving insertion order without duplicates
    pub fn add_in_path(&mut self, path: PathBuf) {
        push_unique(&mut self.in_path, path);
    }

    /// Append to the aspectpath, preserving insertion order without duplicates
    pub fn add_aspect_path(&mut self, path: PathBuf) {
        push_unique(&mut self.aspect_path, path);
    }

    /// Append an aspect source root, preserving insertion order without duplicates
    pub fn add_source_root(&mut self, path: PathBuf) {
        push_unique(&mut self.aj_sources, path);
    }

    /// Compose the full ajc argument vector.
    ///
    /// An extra argument that duplicates an already-composed flag is warned
    /// about but still appended.
    pub fn build_args(&self) -> Vec<String> {
        // https://www.eclipse.org/aspectj/doc/released/devguide/ajc-ref.html
        let mut args = vec![
            "-encoding".to_string(),
            self.encoding.clone(),
            "-source".to_string(),
            self.source_compatibility.clone(),
            "-target".to_string(),
            self.target_compatibility.clone(),
        ];

        if let Some(dest) = &self.destination_dir {
            args.push("-d".to_string());
            args.push(dest.display().to_string());
        }

        if !self.bootclasspath.is_empty() {
            args.push("-bootclasspath".to_string());
            args.push(join_path_list(&self.bootclasspath));
        }

        args.push("-classpath".to_string());
        args.push(join_path_list(&self.class_path));

        if !self.aj_sources.is_empty() {
            args.push("-sourceroots".to_string());
            args.push(join_path_list(&self.aj_sources));
        }

        if !self.in_path.is_empty() {
            args.push("-inpath".to_string());
            args.push(join_path_list(&self.in_path));
        }

        if !self.aspect_path.is_empty() {
            args.push("-aspectpath".to_string());
            args.push(join_path_list(&self.aspect_path));
        }

        if let Some(log) = &self.log_file {
            args.push("-log".to_string());
            args.push(log.display().to_string());
        }

        if self.debug_info {
            args.push("-g".to_string());
        }

        if self.weave_info {
            args.push("-showWeaveInfo".to_string());
        }

        if self.add_serial_vuid {
            args.push("-XaddSerialVersionUID".to_string());
        }

        if self.no_inline_around {
            args.push("-XnoInline".to_string());
        }

        if self.ignore_errors {
            args.push("-proceedOnError".to_string());
            args.push("-noImportError".to_string());
        }

        if self.experimental {
            args.push("-XhasMember".to_string());
            args.push("-Xjoinpoints:synchronization,arrayconstruction".to_string());
        }

        for extra in &self.ajc_args {
            if extra.starts_with('-') && args.contains(extra) {
                status::log_extra_ajc_argument_exists(extra);
            }
            args.push(extra.clone());
        }

        args
    }

    /// Run ajc to completion under the process-wide lock.
    ///
    /// A non-zero exit is always fatal. Error-level log diagnostics are
    /// fatal only when break-on-error is configured.
    pub fn weave(&self, ajc: &Path, lock: &AjcLock, inherit_io: bool) -> Result<(), AjwError> {
        let _guard = lock.acquire();

        self.prepare_log()?;
        let args = self.build_args();
        if let Some(log) = &self.log_file {
            status::log_build_parameters(&args, log);
        }

        let spinner = if inherit_io {
            None
        } else {
            Some(crate::utils::terminal::create_spinner("running ajc..."))
        };
        let result = exec::run_command(ajc, &args, inherit_io);
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        let result = result.map_err(|e| {
            AjwError::compiler_failure(
                format!("Failed to run {}: {e}", ajc.display()),
                self.log_file.clone(),
            )
        })?;

        if !inherit_io && !result.stdout.trim().is_empty() {
            // Surfaces -showWeaveInfo and friends even in captured mode.
            eprintln!("{}", result.stdout.trim_end());
        }

        if !result.success {
            let mut message = format!("ajc exited with status {}", result.exit_code);
            let stderr = result.stderr.trim();
            if !stderr.is_empty() {
                message.push_str(&format!(": {stderr}"));
            }
            return Err(AjwError::compiler_failure(message, self.log_file.clone()));
        }

        eprintln!("ajc finished in {:.2}s", result.duration.as_secs_f64());

        self.detect_errors()
    }

    /// Delete a stale log so the scan only ever sees this invocation
    fn prepare_log(&self) -> Result<(), AjwError> {
        let Some(log) = &self.log_file else {
            return Ok(());
        };
        if log.exists() {
            std::fs::remove_file(log).map_err(|e| {
                AjwError::compiler_failure(
                    format!("Failed to delete stale log {}: {e}", log.display()),
                    None,
                )
            })?;
        }
        if let Some(parent) = log.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AjwError::compiler_failure(
                    format!("Failed to create log directory {}: {e}", parent.display()),
                    None,
                )
            })?;
        }
        Ok(())
    }

    /// Scan the log line-reversed for error-level diagnostics.
    pub fn detect_errors(&self) -> Result<(), AjwError> {
        let Some(log) = &self.log_file else {
            return Ok(());
        };
        if !log.exists() || !self.break_on_error {
            return Ok(());
        }

        let content = std::fs::read_to_string(log).map_err(|e| {
            AjwError::compiler_failure(
                format!("Failed to read log {}: {e}", log.display()),
                None,
            )
        })?;

        for line in content.lines().rev() {
            if line.contains(ERROR_MARKER) {
                return Err(AjwError::CompilerFailure {
                    message: line.to_string(),
                    log_file: Some(log.clone()),
                    hint: Some(format!(
                        "Look into {} file for details\n{}",
                        log.display(),
                        crate::error::hints::break_on_error()
                    )),
                });
            }
        }

        Ok(())
    }
}

fn push_unique(paths: &mut Vec<PathBuf>, path: PathBuf) {
    if !paths.contains(&path) {
        paths.push(path);
    }
}

fn join_path_list(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(PATH_LIST_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn weaver() -> AjcWeaver {
        AjcWeaver {
            encoding: "UTF-8".to_string(),
            source_compatibility: "1.7".to_string(),
            target_compatibility: "1.7".to_string(),
            destination_dir: Some(PathBuf::from("/out/classes")),
            class_path: vec![PathBuf::from("/deps/a.jar"), PathBuf::from("/deps/b.jar")],
            break_on_error: true,
            ..AjcWeaver::default()
        }
    }

    #[test]
    fn test_minimal_arg_grammar() {
        let args = weaver().build_args();
        let classpath = format!("/deps/a.jar{PATH_LIST_SEPARATOR}/deps/b.jar");
        let expected: Vec<String> = [
            "-encoding",
            "UTF-8",
            "-source",
            "1.7",
            "-target",
            "1.7",
            "-d",
            "/out/classes",
            "-classpath",
            classpath.as_str(),
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_eq!(args, expected);
    }

    #[test]
    fn test_optional_flags_appear_in_fixed_order() {
        let mut w = weaver();
        w.bootclasspath = vec![PathBuf::from("/sdk/android.jar")];
        w.aj_sources = vec![PathBuf::from("/src/aspectj")];
        w.in_path = vec![PathBuf::from("/classes")];
        w.aspect_path = vec![PathBuf::from("/aspects.jar")];
        w.log_file = Some(PathBuf::from("/build/ajc.log"));
        w.debug_info = true;
        w.weave_info = true;
        w.add_serial_vuid = true;
        w.no_inline_around = true;
        w.ignore_errors = true;
        w.experimental = true;
        w.ajc_args = vec!["-verbose".to_string()];

        let args = w.build_args();
        let tail: Vec<&str> = args.iter().map(String::as_str).collect();
        let suffix: Vec<&str> = tail[tail.len() - 9..].to_vec();
        assert_eq!(
            suffix,
            vec![
                "-g",
                "-showWeaveInfo",
                "-XaddSerialVersionUID",
                "-XnoInline",
                "-proceedOnError",
                "-noImportError",
                "-XhasMember",
                "-Xjoinpoints:synchronization,arrayconstruction",
                "-verbose",
            ]
        );
        assert!(tail.contains(&"-bootclasspath"));
        assert!(tail.contains(&"-sourceroots"));
        assert!(tail.contains(&"-inpath"));
        assert!(tail.contains(&"-aspectpath"));
        assert!(tail.contains(&"-log"));
    }

    #[test]
    fn test_duplicate_extra_arg_is_still_appended() {
        let mut w = weaver();
        w.debug_info = true;
        w.ajc_args = vec!["-g".to_string()];

        let args = w.build_args();
        let count = args.iter().filter(|a| a.as_str() == "-g").count();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_path_sets_preserve_order_and_dedupe() {
        let mut w = AjcWeaver::default();
        w.add_class_path(PathBuf::from("/b"));
        w.add_class_path(PathBuf::from("/a"));
        w.add_class_path(PathBuf::from("/b"));
        assert_eq!(w.class_path, vec![PathBuf::from("/b"), PathBuf::from("/a")]);
    }

    #[test]
    fn test_detect_errors_breaks_on_error_line() {
        let tmp = tempfile::tempdir().unwrap();
        let log = tmp.path().join("ajc.log");
        std::fs::write(
            &log,
            "[warning] something benign\n[error] cannot find type Foo\n[warning] after\n",
        )
        .unwrap();

        let mut w = weaver();
        w.log_file = Some(log);
        let err = w.detect_errors().unwrap_err();
        match err {
            AjwError::CompilerFailure { message, log_file, .. } => {
                assert!(message.contains("[error]"));
                assert!(log_file.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_detect_errors_ignored_without_break_on_error() {
        let tmp = tempfile::tempdir().unwrap();
        let log = tmp.path().join("ajc.log");
        std::fs::write(&log, "[error] cannot find type Foo\n").unwrap();

        let mut w = weaver();
        w.break_on_error = false;
        w.log_file = Some(log);
        assert!(w.detect_errors().is_ok());
    }

    #[test]
    fn test_detect_errors_with_clean_or_missing_log() {
        let tmp = tempfile::tempdir().unwrap();
        let mut w = weaver();

        w.log_file = Some(tmp.path().join("never-written.log"));
        assert!(w.detect_errors().is_ok());

        let log = tmp.path().join("ajc.log");
        std::fs::write(&log, "[warning] all fine\n").unwrap();
        w.log_file = Some(log);
        assert!(w.detect_errors().is_ok());
    }

    #[test]
    fn test_lock_serializes_concurrent_acquirers() {
        let lock = Arc::new(AjcLock::new());
        let counter = Arc::new(Mutex::new(0_u32));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lock = Arc::clone(&lock);
                let counter = Arc::clone(&counter);
                std::thread::spawn(move || {
                    let _guard = lock.acquire();
                    let mut value = counter.lock().unwrap();
                    *value += 1;
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(*counter.lock().unwrap(), 8);
    }
}
