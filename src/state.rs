//! Apply state: what each script last ran as, and where.
//!
//! The state file is the recorded half of drift detection. A script whose
//! declared fingerprint matches its recorded one needs nothing; anything
//! else runs on the next apply. A failed apply leaves its entry untouched,
//! so the script stays drifted and runs again from scratch.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Recorded outcomes of applied scripts, keyed by script name.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApplyState {
    #[serde(default)]
    pub scripts: HashMap<String, ScriptState>,

    /// Last time the state was updated
    pub last_updated: DateTime<Utc>,
}

/// What one script last ran as.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ScriptState {
    /// Digest of the command list that last ran to completion
    pub fingerprint: String,

    /// Database the script ran against
    pub database: String,

    /// When the last successful apply finished
    pub applied_at: DateTime<Utc>,
}

impl ApplyState {
    /// Load state from disk, or return default if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("State file does not exist, using default state");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file: {}", path.display()))?;

        let state: ApplyState = toml::from_str(&content)
            .with_context(|| format!("Failed to parse state file: {}", path.display()))?;

        log::debug!("Loaded state from {}", path.display());
        Ok(state)
    }

    /// Save state to disk.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create state directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(&self).context("Failed to serialize state to TOML")?;

        fs::write(path, &content)
            .with_context(|| format!("Failed to write state file: {}", path.display()))?;

        log::debug!("Saved state to {}", path.display());
        Ok(())
    }

    /// Record a successful apply for a script.
    pub fn record(&mut self, name: &str, fingerprint: String, database: String) {
        self.scripts.insert(
            name.to_string(),
            ScriptState {
                fingerprint,
                database,
                applied_at: Utc::now(),
            },
        );
        self.last_updated = Utc::now();
    }

    /// Drop a script's recorded state. Returns whether an entry existed.
    pub fn forget(&mut self, name: &str) -> bool {
        let removed = self.scripts.remove(name).is_some();
        if removed {
            self.last_updated = Utc::now();
        }
        removed
    }

    /// Get the recorded state for a script.
    pub fn get(&self, name: &str) -> Option<&ScriptState> {
        self.scripts.get(name)
    }
}

impl Default for ApplyState {
    fn default() -> Self {
        Self {
            scripts: HashMap::new(),
            last_updated: Utc::now(),
        }
    }
}
