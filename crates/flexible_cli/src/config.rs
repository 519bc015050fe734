//! Panel configuration file handling

use anyhow::{Context, Result};
use flexible_panel::{Offsets, PanelConfig};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "panel.toml";

/// Load a panel configuration from a file or a directory holding `panel.toml`
pub fn load(path: &Path) -> Result<PanelConfig> {
    let config_path = if path.is_dir() {
        path.join(CONFIG_FILE)
    } else {
        path.to_path_buf()
    };

    if !config_path.exists() {
        anyhow::bail!(
            "No panel config found at {}. Run `flexible init` to create one.",
            config_path.display()
        );
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;

    let config = parse(&content)
        .with_context(|| format!("Failed to parse {}", config_path.display()))?;

    // The panel runs degraded rather than refusing odd geometry
    if let Err(err) = config.validate() {
        tracing::warn!("{}: {}", config_path.display(), err);
    }

    Ok(config)
}

pub fn parse(content: &str) -> Result<PanelConfig> {
    Ok(toml::from_str(content)?)
}

/// Starter configuration written by `flexible init`
pub fn starter() -> PanelConfig {
    PanelConfig::new(Offsets::new(300, 150, 0))
        .allow_open(true)
        .allow_extend(true)
}

pub fn to_toml(config: &PanelConfig) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize panel config")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_round_trips_through_toml() {
        let starter = starter();
        let text = to_toml(&starter).unwrap();
        assert_eq!(parse(&text).unwrap(), starter);
    }

    #[test]
    fn test_parse_reports_missing_offsets() {
        assert!(parse("allow_open = true").is_err());
    }

    #[test]
    fn test_load_missing_file_suggests_init() {
        let err = load(Path::new("/nonexistent/flexible/panel.toml")).unwrap_err();
        assert!(err.to_string().contains("flexible init"));
    }
}
