//! CLI argument parsing using clap derive macros

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{
    check::CheckCommand, clean::CleanCommand, compile::CompileCommand, init::InitCommand,
    weave::WeaveCommand,
};

/// AJW - AspectJ weave-pipeline driver
///
/// Routes compiled Android class output through the external AspectJ
/// compiler/weaver and reassembles the woven result into deterministic jars.
#[derive(Parser, Debug)]
#[command(name = "ajw")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a weave project in the current directory
    Init(InitCommand),

    /// Check the AspectJ toolchain and project configuration
    Check(CheckCommand),

    /// Compile .aj aspect sources for a variant
    Compile(CompileCommand),

    /// Weave compiled classes and dependency jars for a variant
    Weave(WeaveCommand),

    /// Clean weave staging output
    Clean(CleanCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        // Set up terminal colors
        if self.no_color {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }

        // Execute the subcommand
        match self.command {
            Commands::Init(cmd) => cmd.execute(self.verbose),
            Commands::Check(cmd) => cmd.execute(self.verbose),
            Commands::Compile(cmd) => cmd.execute(self.verbose),
            Commands::Weave(cmd) => cmd.execute(self.verbose),
            Commands::Clean(cmd) => cmd.execute(self.verbose),
        }
    }
}
