//! `sqlapply status` - declared scripts vs recorded state.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::Context;
use crate::config::Config;
use crate::engine::differ::{self, Change, compute_diffs};
use crate::state::ApplyState;
use crate::ui;

pub fn run(ctx: &Context, config_path: Option<&Path>) -> Result<()> {
    ui::header("sqlapply Status");

    let (config, config_path) = Config::load(config_path)?;
    let state_path = config.state_path(&config_path);
    let state = ApplyState::load(&state_path)?;

    ui::kv("Config", &config_path.display().to_string());
    ui::kv("State", &state_path.display().to_string());
    ui::kv(
        "Server",
        &format!(
            "{}:{}/{}",
            config.connection.host, config.connection.port, config.connection.database
        ),
    );

    if config.scripts.is_empty() {
        println!();
        ui::warn("No scripts declared");
        return Ok(());
    }

    let diffs = compute_diffs(&config, &state)?;

    ui::section("Scripts");
    for diff in &diffs {
        let status_icon = match diff.change {
            Change::Unchanged => "✓".green(),
            Change::Changed => "~".yellow(),
            Change::New => "+".red(),
        };

        println!(
            "  {} {} {}",
            status_icon,
            diff.name.bold(),
            format!("[{}]", diff.database).dimmed()
        );

        if ctx.quiet {
            continue;
        }

        // Full digests only with -v; the short prefix is enough to eyeball.
        let digest = |fingerprint: &str| {
            if ctx.verbose > 0 {
                fingerprint.to_string()
            } else {
                differ::short(fingerprint).to_string()
            }
        };

        match state.get(&diff.name) {
            Some(recorded) => {
                ui::dim(&format!(
                    "  applied {} as {}",
                    recorded.applied_at.format("%Y-%m-%d %H:%M:%S UTC"),
                    digest(&recorded.fingerprint)
                ));
                if diff.change == Change::Changed {
                    ui::dim(&format!("  now declares {}", digest(&diff.declared)));
                }
            }
            None => ui::dim("  never applied"),
        }
    }

    let pending = diffs.iter().filter(|d| d.needs_apply()).count();
    println!();
    if pending == 0 {
        ui::success("All scripts match recorded state");
    } else {
        ui::warn(&format!("{} script(s) pending apply", pending));
    }

    Ok(())
}
