//! Configuration file loading and discovery.

use super::types::AppConfig;
use crate::reports::ReportFormat;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".dq-scan.yaml",
    ".dq-scan.yml",
    "dq-scan.yaml",
    "dq-scan.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (`~/.config/dq-scan/`)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        // An explicit path is returned as-is so a missing file surfaces as an error
        return Some(path.to_path_buf());
    }

    if let Some(path) = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_config_in_dir(&cwd))
    {
        return Some(path);
    }

    if let Some(path) = find_git_root().and_then(|root| find_config_in_dir(&root)) {
        return Some(path);
    }

    if let Some(path) =
        dirs::config_dir().and_then(|dir| find_config_in_dir(&dir.join("dq-scan")))
    {
        return Some(path);
    }

    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => {
                tracing::debug!("Loaded config from {}", path.display());
                (config, Some(path))
            }
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence.
    ///
    /// Only values that differ from their defaults override. The rule set is
    /// never taken from `other`; rules come from files only.
    pub fn merge(&mut self, other: &Self) {
        for id in &other.detectors.disabled {
            if !self.detectors.disabled.contains(id) {
                self.detectors.disabled.push(*id);
            }
        }

        if other.output.format != ReportFormat::default() {
            self.output.format = other.output.format;
        }
        if other.output.file.is_some() {
            self.output.file.clone_from(&other.output.file);
        }
        if other.output.pretty {
            self.output.pretty = true;
        }
        if other.output.no_color {
            self.output.no_color = true;
        }

        if other.behavior.min_score.is_some() {
            self.behavior.min_score = other.behavior.min_score;
        }
        if other.behavior.quiet {
            self.behavior.quiet = true;
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        r"# dq-scan configuration
# Place this file at .dq-scan.yaml in your project root or ~/.config/dq-scan/
# CLI arguments always override file settings.

{}",
        serde_yaml::to_string(&example).unwrap_or_default()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::DetectorId;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir() {
        let dir = TempDir::new().unwrap();
        assert!(find_config_in_dir(dir.path()).is_none());

        std::fs::write(dir.path().join("dq-scan.yml"), "behavior:\n  quiet: true\n").unwrap();
        std::fs::write(dir.path().join(".dq-scan.yaml"), "{}").unwrap();
        assert_eq!(
            find_config_in_dir(dir.path()),
            Some(dir.path().join(".dq-scan.yaml"))
        );
    }

    #[test]
    fn test_discover_config_file() {
        let dir = TempDir::new().unwrap();
        let explicit = dir.path().join("missing.yaml");
        assert_eq!(discover_config_file(Some(&explicit)), Some(explicit));

        if let Some(found) = discover_config_file(None) {
            let name = found.file_name().and_then(|n| n.to_str()).unwrap();
            assert!(CONFIG_FILE_NAMES.contains(&name));
        }
    }

    #[test]
    fn test_load_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".dq-scan.yaml");
        std::fs::write(
            &path,
            "output:\n  format: summary\n  pretty: true\nrules:\n  thresholds:\n    location_cap: 5\n",
        )
        .unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.output.format, ReportFormat::Summary);
        assert!(config.output.pretty);
        assert_eq!(config.rules.thresholds.location_cap, 5);
        assert_eq!(config.rules.thresholds.example_cap, 5);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_config_file(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigFileError::NotFound(_)));
    }

    #[test]
    fn test_load_or_default_on_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.yaml");
        std::fs::write(&path, "output: [unclosed").unwrap();

        let (config, loaded_from) = load_or_default(Some(&path));
        assert_eq!(config, AppConfig::default());
        assert!(loaded_from.is_none());
    }

    #[test]
    fn test_merge_cli_over_file() {
        let mut file = AppConfig::builder()
            .output_format(ReportFormat::Summary)
            .min_score(Some(50.0))
            .disable(DetectorId::Whitespace)
            .build();
        let cli = AppConfig::builder()
            .min_score(Some(90.0))
            .pretty(true)
            .disable(DetectorId::TypeMismatch)
            .build();

        file.merge(&cli);
        assert_eq!(file.output.format, ReportFormat::Summary);
        assert_eq!(file.behavior.min_score, Some(90.0));
        assert!(file.output.pretty);
        assert_eq!(
            file.detectors.disabled,
            vec![DetectorId::Whitespace, DetectorId::TypeMismatch]
        );
    }

    #[test]
    fn test_example_config_parses() {
        let example = generate_example_config();
        assert!(example.starts_with("# dq-scan configuration"));
        let parsed: AppConfig = serde_yaml::from_str(&example).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }
}
