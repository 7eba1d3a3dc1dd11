//! `sqlapply apply` - converge databases to the declared scripts.

use anyhow::{Result, bail};
use std::path::Path;

use crate::Context;
use crate::config::Config;
use crate::engine::{compute_diffs, display_diffs, execute};
use crate::state::ApplyState;
use crate::ui;

pub fn run(
    ctx: &Context,
    config_path: Option<&Path>,
    name: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    ui::header("Applying SQL scripts");

    if dry_run {
        ui::warn("Dry run - no statements will be executed");
    }

    let (config, config_path) = Config::load(config_path)?;
    let state_path = config.state_path(&config_path);
    let mut state = ApplyState::load(&state_path)?;

    let mut diffs = compute_diffs(&config, &state)?;
    if let Some(name) = name {
        if config.script(name).is_none() {
            bail!("no script named '{}' in {}", name, config_path.display());
        }
        diffs.retain(|d| d.name == name);
    }

    display_diffs(&diffs, ctx.quiet);

    let outcome = execute(&config, &mut state, &state_path, &diffs, dry_run)?;

    if !outcome.applied.is_empty() {
        println!();
        ui::success(&format!("Applied {} script(s)", outcome.applied.len()));
    }

    if !outcome.is_success() {
        println!();
        for (name, error) in &outcome.failed {
            ui::dim(&format!("{}: {}", name, error));
        }
        bail!("{} script(s) failed", outcome.failed.len());
    }

    Ok(())
}
