use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sqlapply")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Declarative SQL script batches for PostgreSQL", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (defaults to ./sqlapply.toml, then ~/.config/sqlapply/config.toml)
    #[arg(short, long, global = true, env = "SQLAPPLY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Execute scripts whose declaration drifted from recorded state
    Apply(ApplyArgs),

    /// Preview drift without connecting to any database
    Plan(PlanArgs),

    /// Show declared scripts and their recorded state
    Status,

    /// Drop a script's recorded state (leaves the database untouched)
    Forget {
        /// Script name as declared in the config
        name: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser)]
pub struct ApplyArgs {
    /// Only apply the script with this name
    pub name: Option<String>,

    /// Show what would run without executing anything
    #[arg(short, long)]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct PlanArgs {
    /// Only plan the script with this name
    pub name: Option<String>,
}
