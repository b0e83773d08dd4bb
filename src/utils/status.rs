//! Phase banners and per-dependency decisions for the weave pipeline

use std::path::Path;

use console::style;

use crate::weave::WeavePolicy;

pub fn log_compilation_start() {
    eprintln!("---------- Starting AspectJ sources compilation ----------");
}

pub fn log_compilation_finish() {
    eprintln!("---------- Finish AspectJ compiler ----------");
}

pub fn log_augmentation_start() {
    eprintln!("---------- Starting augmentation with AspectJ weaver ----------");
}

pub fn log_augmentation_finish() {
    eprintln!("---------- Finish AspectJ weaver ----------");
}

pub fn log_no_augmentation() {
    eprintln!("---------- Exit AspectJ weaver w/o processing ----------");
}

pub fn log_weaver_policy(policy: WeavePolicy) {
    eprintln!("Weaving in {policy} mode");
}

pub fn log_ignore_inpath_jars() {
    eprintln!("Ignoring additional jars adding to -inpath in simple mode");
}

pub fn log_jar_inpath_added(jar: &Path) {
    eprintln!("include jar :: {}", jar.display());
}

pub fn log_jar_inpath_removed(jar: &Path) {
    eprintln!("exclude jar :: {}", jar.display());
}

pub fn log_jar_aspect_added(jar: &Path) {
    eprintln!("include aspects from :: {}", jar.display());
}

pub fn log_extra_ajc_argument_exists(arg: &str) {
    eprintln!(
        "{}: extra ajc argument {} already exists in build config",
        style("warning").yellow().bold(),
        arg
    );
}

pub fn log_manifest_unreadable(manifest: &Path) {
    eprintln!(
        "{}: unreadable package attribute in {}; falling back to the raw path for filter matching",
        style("warning").yellow().bold(),
        manifest.display()
    );
}

/// Echo the adapted compiler parameters, compressing long path lists.
pub fn log_build_parameters(args: &[String], log_file: &Path) {
    let mut params = String::new();
    for arg in args {
        if arg.starts_with('-') {
            params.push_str(&format!("{arg} :: "));
        } else if arg.len() > 200 {
            params.push_str("[ list files ],\n");
        } else {
            params.push_str(&format!("{arg}, "));
        }
    }

    eprintln!("Ajc config: {params}");
    eprintln!("Detailed log in {}", log_file.display());
}
