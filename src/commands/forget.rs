//! `sqlapply forget` - drop a script's recorded state.
//!
//! There is no teardown: the engine never undoes what declared SQL did,
//! so removing a script from management only erases its bookkeeping.
//! Dropping the objects it created is the declared SQL's own business.

use anyhow::{Result, bail};
use std::path::Path;

use crate::Context;
use crate::config::Config;
use crate::state::ApplyState;
use crate::ui;

pub fn run(_ctx: &Context, config_path: Option<&Path>, name: &str) -> Result<()> {
    let (config, config_path) = Config::load(config_path)?;
    let state_path = config.state_path(&config_path);
    let mut state = ApplyState::load(&state_path)?;

    if !state.forget(name) {
        bail!("no recorded state for script '{}'", name);
    }
    state.save(&state_path)?;

    ui::success(&format!("Forgot script '{}'", name));
    ui::dim("Objects created by its SQL are left in place.");
    Ok(())
}
