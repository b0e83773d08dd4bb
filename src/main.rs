//! AJW CLI - a build-pipeline driver for the AspectJ compiler/weaver
//!
//! ## Architecture
//!
//! ```text
//! ajw CLI → weave/ modules → external ajc → jar/ (result merge)
//! ```

mod cli;
mod commands;
mod config;
mod error;
mod exec;
mod filter;
mod jar;
mod utils;
mod weave;

use anyhow::Result;
use clap::Parser;

use cli::Cli;
use error::AjwError;

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Err(err) = cli.execute() {
        // Known failures come with hints; everything else bubbles to anyhow.
        if let Some(known) = err.downcast_ref::<AjwError>() {
            known.display_with_hints();
            std::process::exit(1);
        }
        return Err(err);
    }
    Ok(())
}
