//! Configuration: the declared desired state.
//!
//! `sqlapply.toml` declares the server connection and an ordered set of
//! scripts, each an ordered batch of SQL statements with its own retry
//! policy and optional target database.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use scriptkit::{PostgresProvider, ScriptBatch};

/// Top-level config file contents.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server settings shared by every script
    pub connection: ConnectionSettings,

    /// Declared scripts, in file order
    #[serde(default, rename = "script")]
    pub scripts: Vec<ScriptDecl>,

    /// Where apply state is recorded; relative paths resolve against the
    /// config file's directory
    #[serde(default)]
    pub state_file: Option<PathBuf>,
}

/// PostgreSQL server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    pub user: String,

    /// Falls back to $PGPASSWORD when unset
    #[serde(default)]
    pub password: Option<String>,

    /// Default database for scripts that do not declare one
    pub database: String,

    /// Seconds to wait when opening a session
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

impl ConnectionSettings {
    /// Build the session provider for these settings.
    pub fn provider(&self) -> PostgresProvider {
        let password = self
            .password
            .clone()
            .or_else(|| std::env::var("PGPASSWORD").ok());
        PostgresProvider::new(self.host.clone(), self.port, self.user.clone())
            .with_password(password)
            .with_connect_timeout(Duration::from_secs(self.connect_timeout))
    }
}

/// One declared script.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptDecl {
    /// Unique name; the key under which apply state is recorded
    pub name: String,

    /// Target database (defaults to the connection's database)
    #[serde(default)]
    pub database: Option<String>,

    /// SQL statements, in execution order. Kept as raw values so that a
    /// non-string element is rejected by [`ScriptDecl::statements`] with a
    /// message naming it, instead of a generic deserialization error.
    pub commands: Vec<toml::Value>,

    /// Number of tries for a failing batch
    #[serde(default = "default_tries")]
    pub tries: u32,

    /// Seconds between two tries of the batch
    #[serde(default = "default_backoff_delay")]
    pub backoff_delay: u64,

    /// Seconds for one try of the batch to complete
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl ScriptDecl {
    /// Convert the declared command values into statement strings.
    ///
    /// This is the single place declared input crosses into typed form;
    /// a non-string element fails here, before anything is executed.
    pub fn statements(&self) -> Result<Vec<String>> {
        let mut statements = Vec::with_capacity(self.commands.len());
        for value in &self.commands {
            match value.as_str() {
                Some(statement) => statements.push(statement.to_string()),
                None => bail!("element {} is not a string", value),
            }
        }
        Ok(statements)
    }

    /// Build the validated batch this declaration describes.
    pub fn batch(&self) -> Result<ScriptBatch> {
        let statements = self
            .statements()
            .with_context(|| format!("script '{}'", self.name))?;
        let batch = ScriptBatch::new(
            statements,
            self.database.clone(),
            self.tries,
            Duration::from_secs(self.backoff_delay),
            Duration::from_secs(self.timeout),
        )
        .with_context(|| format!("script '{}'", self.name))?;
        Ok(batch)
    }
}

impl Config {
    /// Load and validate a config file.
    ///
    /// Without an explicit path, looks for `sqlapply.toml` in the current
    /// directory, then `~/.config/sqlapply/config.toml`.
    pub fn load(path: Option<&Path>) -> Result<(Self, PathBuf)> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => default_config_path()?,
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok((config, path))
    }

    /// Reject configs that cannot be applied meaningfully.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for script in &self.scripts {
            if !seen.insert(script.name.as_str()) {
                bail!("duplicate script name '{}'", script.name);
            }
            if script.commands.is_empty() {
                // Applying an empty batch is a no-op; almost certainly a
                // declaration mistake, but not worth failing over.
                log::warn!("script '{}' declares no commands", script.name);
            }
        }
        Ok(())
    }

    /// The state file path for a config loaded from `config_path`.
    pub fn state_path(&self, config_path: &Path) -> PathBuf {
        let file = self
            .state_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("sqlapply.state.toml"));
        if file.is_absolute() {
            file
        } else {
            config_path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(file)
        }
    }

    /// Look up a declared script by name.
    pub fn script(&self, name: &str) -> Option<&ScriptDecl> {
        self.scripts.iter().find(|s| s.name == name)
    }
}

fn default_config_path() -> Result<PathBuf> {
    let local = PathBuf::from("sqlapply.toml");
    if local.exists() {
        return Ok(local);
    }

    let fallback = dirs::config_dir()
        .context("Could not determine config directory")?
        .join("sqlapply")
        .join("config.toml");
    if fallback.exists() {
        return Ok(fallback);
    }

    bail!(
        "no config found (looked for {} and {})",
        local.display(),
        fallback.display()
    )
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_tries() -> u32 {
    1
}

fn default_backoff_delay() -> u64 {
    1
}

fn default_timeout() -> u64 {
    5 * 60
}
