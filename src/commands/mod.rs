//! Command implementations
//!
//! Each command module provides a clap-derived struct and execute method.

pub mod check;
pub mod clean;
pub mod compile;
pub mod init;
pub mod weave;
