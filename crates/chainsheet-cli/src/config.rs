//! Configuration file handling for `.chainsheet.toml`
//!
//! Configuration files can be placed in:
//! - User home directory: `~/.chainsheet.toml` (user defaults)
//! - Project directory: `./.chainsheet.toml` (project defaults)
//! - Custom location via `--config`
//!
//! Precedence order (highest to lowest):
//! 1. Command-line flags (`--pretty`, `--output-dir`)
//! 2. `--config` file
//! 3. Project config
//! 4. User config
//! 5. Built-in defaults
//!
//! Files are merged key by key, so a project file that only sets
//! `template.nodes.quantity_row` keeps every other value from the layers
//! beneath it.

use anyhow::{Context, Result};
use chainsheet_core::TemplateSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use toml::{Table, Value};

/// File name looked up in the home and current directories
pub const CONFIG_FILE_NAME: &str = ".chainsheet.toml";

/// Effective configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Template positions used by the extractors
    pub template: TemplateSchema,
    /// Output defaults
    pub output: OutputConfig,
}

/// `[output]` table: JSON formatting and where `batch` writes records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output
    pub pretty: bool,
    /// Default directory for `batch` records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl Config {
    /// Discover, merge and validate configuration.
    ///
    /// A broken user or project file is skipped with a warning; a broken
    /// `--config` file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut layers = Vec::new();
        for path in [user_config_path(), Some(PathBuf::from(CONFIG_FILE_NAME))]
            .into_iter()
            .flatten()
        {
            if !path.exists() {
                continue;
            }
            match read_table(&path) {
                Ok(table) => {
                    log::debug!("loaded config {}", path.display());
                    layers.push(table);
                }
                Err(e) => log::warn!("Ignoring config {}: {e:#}", path.display()),
            }
        }
        if let Some(path) = explicit {
            layers.push(read_table(path)?);
        }
        Self::from_layers(layers)
    }

    /// Merge TOML tables, later layers overriding earlier ones
    pub fn from_layers(layers: Vec<Table>) -> Result<Self> {
        let merged = layers.into_iter().fold(Table::new(), |mut acc, layer| {
            merge_tables(&mut acc, layer);
            acc
        });
        let config: Self = Value::Table(merged)
            .try_into()
            .context("Invalid configuration")?;
        config.template.validate()?;
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
}

fn read_table(path: &Path) -> Result<Table> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Recursively overlay `overlay` onto `base`; nested tables merge, any other
/// value replaces
fn merge_tables(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Table(existing)), Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
