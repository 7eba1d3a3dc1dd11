mod cli;
mod commands;
mod config;
mod engine;
mod observer;
mod state;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    match cli.command {
        Command::Apply(args) => commands::apply::run(
            &ctx,
            cli.config.as_deref(),
            args.name.as_deref(),
            args.dry_run,
        ),
        Command::Plan(args) => commands::plan::run(&ctx, cli.config.as_deref(), args.name.as_deref()),
        Command::Status => commands::status::run(&ctx, cli.config.as_deref()),
        Command::Forget { name } => commands::forget::run(&ctx, cli.config.as_deref(), &name),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "sqlapply", &mut io::stdout());
            Ok(())
        }
    }
}
