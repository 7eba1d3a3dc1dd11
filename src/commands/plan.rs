//! `sqlapply plan` - preview drift without touching any database.
//!
//! Planning only recomputes declared identities and compares them to
//! recorded state; it never opens a connection, so it is safe to run
//! anywhere the config and state files are readable.

use anyhow::{Result, bail};
use std::path::Path;

use crate::Context;
use crate::config::Config;
use crate::engine::{compute_diffs, display_diffs};
use crate::state::ApplyState;
use crate::ui;

pub fn run(ctx: &Context, config_path: Option<&Path>, name: Option<&str>) -> Result<()> {
    ui::header("Plan");

    let (config, config_path) = Config::load(config_path)?;
    let state_path = config.state_path(&config_path);
    let state = ApplyState::load(&state_path)?;

    let mut diffs = compute_diffs(&config, &state)?;
    if let Some(name) = name {
        if config.script(name).is_none() {
            bail!("no script named '{}' in {}", name, config_path.display());
        }
        diffs.retain(|d| d.name == name);
    }

    display_diffs(&diffs, ctx.quiet);

    if diffs.iter().any(crate::engine::ScriptDiff::needs_apply) {
        println!();
        ui::info("Run 'sqlapply apply' to execute the pending scripts.");
    }

    Ok(())
}
