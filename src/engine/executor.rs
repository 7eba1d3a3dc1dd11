//! Sequential apply of drifted scripts.
//!
//! Scripts run one after another, each through the engine's full
//! resolve/retry pipeline. State is recorded and saved after every
//! successful script, so a failure mid-run keeps earlier successes and
//! leaves the failed script drifted for the next apply.

use anyhow::{Context as AnyhowContext, Result};
use colored::Colorize;
use scriptkit::ConnectionProvider;
use std::path::Path;

use crate::config::Config;
use crate::engine::differ::ScriptDiff;
use crate::observer::LogObserver;
use crate::state::ApplyState;
use crate::ui;

/// Outcome of one apply run.
#[derive(Debug, Default)]
pub struct ApplyOutcome {
    /// Scripts that ran to completion
    pub applied: Vec<String>,
    /// Scripts already matching recorded state
    pub unchanged: usize,
    /// Scripts that failed, with the surfaced error
    pub failed: Vec<(String, String)>,
}

impl ApplyOutcome {
    /// Whether every drifted script ran to completion.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Execute every drifted script in declaration order.
///
/// With `dry_run` nothing is executed and no connection is opened; the
/// pending scripts are listed instead.
pub fn execute(
    config: &Config,
    state: &mut ApplyState,
    state_path: &Path,
    diffs: &[ScriptDiff],
    dry_run: bool,
) -> Result<ApplyOutcome> {
    let mut outcome = ApplyOutcome::default();
    let pending: Vec<&ScriptDiff> = diffs.iter().filter(|d| d.needs_apply()).collect();
    outcome.unchanged = diffs.len() - pending.len();

    if pending.is_empty() {
        return Ok(outcome);
    }

    if dry_run {
        for diff in &pending {
            println!(
                "  {} would apply {} to {}",
                "→".cyan(),
                diff.name.bold(),
                diff.database
            );
        }
        return Ok(outcome);
    }

    let provider = config.connection.provider();
    let default_database = &config.connection.database;

    let mut default_conn = provider
        .open(default_database)
        .with_context(|| format!("connecting to database '{}'", default_database))?;

    let observer = LogObserver;

    for diff in pending {
        let Some(script) = config.script(&diff.name) else {
            continue;
        };
        let batch = script.batch()?;

        log::info!("applying script '{}' to '{}'", script.name, diff.database);
        match scriptkit::apply(
            &batch,
            default_conn.as_mut(),
            default_database,
            &provider,
            &observer,
        ) {
            Ok(applied) => {
                state.record(&script.name, applied.fingerprint, applied.database);
                state.save(state_path)?;
                ui::success(&format!("{} applied to {}", script.name, diff.database));
                outcome.applied.push(script.name.clone());
            }
            Err(error) => {
                ui::error(&format!("{} failed: {}", script.name, error));
                outcome.failed.push((script.name.clone(), error.to_string()));
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::differ::compute_diffs;
    use tempfile::TempDir;

    const RAW: &str = r#"
        [connection]
        user = "deploy"
        database = "app"

        [[script]]
        name = "roles"
        commands = ["CREATE ROLE reporting;"]
    "#;

    #[test]
    fn test_dry_run_opens_no_connection() {
        let tmp = TempDir::new().unwrap();
        let config: Config = toml::from_str(RAW).unwrap();
        let mut state = ApplyState::default();
        let diffs = compute_diffs(&config, &state).unwrap();

        // There is no server behind these settings; a dry run must not try
        // to reach one.
        let outcome = execute(
            &config,
            &mut state,
            &tmp.path().join("state.toml"),
            &diffs,
            true,
        )
        .unwrap();

        assert!(outcome.is_success());
        assert!(outcome.applied.is_empty());
        assert!(state.scripts.is_empty());
    }

    #[test]
    fn test_nothing_pending_short_circuits() {
        let tmp = TempDir::new().unwrap();
        let config: Config = toml::from_str(RAW).unwrap();
        let fingerprint = config
            .script("roles")
            .unwrap()
            .batch()
            .unwrap()
            .fingerprint();

        let mut state = ApplyState::default();
        state.record("roles", fingerprint, "app".to_string());
        let diffs = compute_diffs(&config, &state).unwrap();

        let outcome = execute(
            &config,
            &mut state,
            &tmp.path().join("state.toml"),
            &diffs,
            false,
        )
        .unwrap();

        assert!(outcome.is_success());
        assert_eq!(outcome.unchanged, 1);
        assert!(outcome.applied.is_empty());
    }
}
