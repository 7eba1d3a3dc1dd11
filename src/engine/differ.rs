//! Drift computation and display.
//!
//! Drift is decided entirely from declared input and recorded state: the
//! declared command list is re-fingerprinted and compared against what the
//! last successful apply recorded. Nothing here opens a connection or runs
//! a statement - this is the read path.

use crate::config::Config;
use crate::state::ApplyState;
use anyhow::Result;
use colored::Colorize;

/// Why a script will (or will not) run on the next apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Nothing recorded yet; first apply
    New,
    /// Declared commands or target database differ from what last ran
    Changed,
    /// Declaration matches recorded state
    Unchanged,
}

/// Drift of one declared script against recorded state.
#[derive(Debug, Clone)]
pub struct ScriptDiff {
    /// Script name
    pub name: String,
    /// Drift classification
    pub change: Change,
    /// Fingerprint recorded by the last successful apply, if any
    pub stored: Option<String>,
    /// Fingerprint of the declaration as it stands now
    pub declared: String,
    /// Database the declaration resolves to
    pub database: String,
}

impl ScriptDiff {
    /// Whether the next apply should execute this script.
    pub fn needs_apply(&self) -> bool {
        self.change != Change::Unchanged
    }
}

/// Recompute every declared script's identity and compare to recorded
/// state.
pub fn compute_diffs(config: &Config, state: &ApplyState) -> Result<Vec<ScriptDiff>> {
    let mut diffs = Vec::with_capacity(config.scripts.len());

    for script in &config.scripts {
        let batch = script.batch()?;
        let declared = batch.fingerprint();
        let database = batch
            .database()
            .unwrap_or(&config.connection.database)
            .to_string();

        let (change, stored) = match state.get(&script.name) {
            None => (Change::New, None),
            Some(recorded) => {
                let change = if recorded.fingerprint == declared && recorded.database == database {
                    Change::Unchanged
                } else {
                    Change::Changed
                };
                (change, Some(recorded.fingerprint.clone()))
            }
        };

        diffs.push(ScriptDiff {
            name: script.name.clone(),
            change,
            stored,
            declared,
            database,
        });
    }

    Ok(diffs)
}

/// Shorten a fingerprint for display.
pub fn short(fingerprint: &str) -> &str {
    &fingerprint[..fingerprint.len().min(12)]
}

/// Display diffs in a user-friendly format.
pub fn display_diffs(diffs: &[ScriptDiff], quiet: bool) {
    let pending = diffs.iter().filter(|d| d.needs_apply()).count();

    if pending == 0 {
        println!();
        println!(
            "  {} No drift - all scripts match recorded state",
            "✓".green()
        );
        return;
    }

    println!();
    for diff in diffs {
        if diff.change == Change::Unchanged && quiet {
            continue;
        }

        let (symbol, note) = match diff.change {
            Change::New => ("+".green(), "(never applied)".to_string()),
            Change::Changed => (
                "~".yellow(),
                format!(
                    "{} → {}",
                    diff.stored.as_deref().map(short).unwrap_or("?"),
                    short(&diff.declared)
                ),
            ),
            Change::Unchanged => ("✓".dimmed(), String::new()),
        };

        println!(
            "  {} {:<24} {} {}",
            symbol,
            diff.name.bold(),
            format!("[{}]", diff.database).cyan(),
            note.dimmed()
        );
    }

    println!();
    println!(
        "  {} of {} script(s) to apply",
        pending.to_string().bold(),
        diffs.len()
    );
}
