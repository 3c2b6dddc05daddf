//! Configuration loading and parsing

use anyhow::{Context, Result};
use lifespan_sweep::{SweepConfig, ValidationPolicy, YearWindow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputConfig {
    #[serde(default)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidationConfig {
    #[serde(default)]
    pub policy: ValidationPolicy,
    #[serde(default)]
    pub two_digit_years: bool,
    /// Set to false to accept any year without warnings
    #[serde(default = "default_true")]
    pub check_years: bool,
    #[serde(default = "default_first_year")]
    pub first_year: i64,
    #[serde(default = "default_last_year")]
    pub last_year: i64,
}

fn default_true() -> bool {
    true
}

fn default_first_year() -> i64 {
    YearWindow::default().first
}

fn default_last_year() -> i64 {
    YearWindow::default().last
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            policy: ValidationPolicy::default(),
            two_digit_years: false,
            check_years: true,
            first_year: default_first_year(),
            last_year: default_last_year(),
        }
    }
}

impl ValidationConfig {
    /// Translate into the library configuration
    pub fn to_sweep_config(&self) -> SweepConfig {
        let config = SweepConfig::new()
            .with_policy(self.policy)
            .with_two_digit_years(self.two_digit_years);

        if self.check_years {
            config.with_expected_years(self.first_year, self.last_year)
        } else {
            config.without_expected_years()
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    pub output_file: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub show_roster: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            output_file: None,
            show_roster: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Txt,
    Json,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    if config.validation.first_year > config.validation.last_year {
        anyhow::bail!(
            "Invalid year window in {:?}: first_year {} is after last_year {}",
            path,
            config.validation.first_year,
            config.validation.last_year
        );
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [input]
            files = ["people.csv", "more.csv"]

            [validation]
            policy = "strict"
            two_digit_years = true

            [output]
            format = "json"
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.input.files.len(), 2);
        assert_eq!(config.validation.policy, ValidationPolicy::Strict);
        assert!(config.validation.two_digit_years);
        assert_eq!(config.validation.first_year, 1900);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.show_roster);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.input.files.is_empty());
        assert_eq!(config.output.format, OutputFormat::Txt);
        assert_eq!(config.validation.to_sweep_config(), SweepConfig::default());
    }

    #[test]
    fn test_year_check_can_be_disabled() {
        let config: AppConfig = toml::from_str("[validation]\ncheck_years = false\n").unwrap();
        assert_eq!(config.validation.to_sweep_config().expected_years, None);
    }

    #[test]
    fn test_load_config_rejects_inverted_window() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[validation]\nfirst_year = 2000\nlast_year = 1900").unwrap();
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(load_config(Path::new("does-not-exist.toml")).is_err());
    }
}
