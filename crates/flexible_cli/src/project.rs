//! Starter files for `flexible init`

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config::{self, CONFIG_FILE};
use crate::scenario::Scenario;

pub const SCENARIO_FILE: &str = "scenario.json";

/// Write a starter `panel.toml` and `scenario.json` into `path`
pub fn init(path: &Path, force: bool) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let config_path = path.join(CONFIG_FILE);
    let scenario_path = path.join(SCENARIO_FILE);

    if !force {
        for existing in [&config_path, &scenario_path] {
            if existing.exists() {
                anyhow::bail!(
                    "{} already exists. Use --force to overwrite.",
                    existing.display()
                );
            }
        }
    }

    let toml = format!(
        "# Flexible panel configuration\n# Offsets are distances from the top edge: close >= open >= extend\n\n{}",
        config::to_toml(&config::starter())?
    );
    fs::write(&config_path, toml)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    fs::write(&scenario_path, Scenario::starter().to_json()?)
        .with_context(|| format!("Failed to write {}", scenario_path.display()))?;

    tracing::info!(
        "Created {} and {}",
        config_path.display(),
        scenario_path.display()
    );
    Ok(())
}
