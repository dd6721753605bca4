use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "license-gate")]
#[command(about = "Block commits and builds that bring in restricted licenses")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan the workspace for license and commercial-use violations
    Scan {
        /// Workspace root (default: current directory)
        #[arg(short, long, default_value = ".")]
        workspace: PathBuf,

        /// Only scan files staged in git
        #[arg(long)]
        staged_only: bool,

        /// Treat these paths as the staged set instead of asking git
        #[arg(long, num_args = 1.., value_name = "PATH")]
        staged_files: Vec<PathBuf>,

        /// Configuration file (default: .license-gate.toml, then pyproject.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Do not write the JSON snapshot
        #[arg(long)]
        no_snapshot: bool,
    },
    /// Write the built-in policy to .license-gate.toml
    Init {
        /// Workspace root (default: current directory)
        #[arg(short, long, default_value = ".")]
        workspace: PathBuf,

        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
    },
    /// Show or validate configuration
    Config {
        /// Workspace root (default: current directory)
        #[arg(short, long, default_value = ".")]
        workspace: PathBuf,

        /// Configuration file (default: .license-gate.toml, then pyproject.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
