//! AJW.toml configuration loading and validation

pub mod ajw_toml;
pub mod validation;

pub use ajw_toml::{AjwConfig, AspectjSettings, PathsConfig, ProjectConfig};
