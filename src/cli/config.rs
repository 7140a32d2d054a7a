//! Config command handler.

use crate::config::{self, AppConfig, Validatable};
use anyhow::{Context, Result};
use std::path::Path;

/// What the `config` command prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigView {
    /// JSON Schema of the config file format
    Schema,
    /// Example YAML config with every default spelled out
    Example,
    /// Effective configuration (defaults merged with the discovered file)
    Effective,
}

/// Render the requested configuration view.
pub fn run_config(view: ConfigView, config_path: Option<&Path>) -> Result<String> {
    match view {
        ConfigView::Schema => Ok(config::generate_json_schema()),
        ConfigView::Example => Ok(config::generate_example_config()),
        ConfigView::Effective => {
            let (config, loaded_from) = config::load_or_default(config_path);
            render_effective(&config, loaded_from.as_deref())
        }
    }
}

fn render_effective(config: &AppConfig, loaded_from: Option<&Path>) -> Result<String> {
    let mut out = match loaded_from {
        Some(path) => format!("# Loaded from: {}\n", path.display()),
        None => "# No config file found; showing defaults\n".to_string(),
    };
    for error in config.validate() {
        out.push_str(&format!("# warning: {error}\n"));
    }
    out.push_str(&serde_yaml::to_string(config).context("failed to serialize config")?);
    Ok(out)
}
