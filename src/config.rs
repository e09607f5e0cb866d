use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::LogConfig;
use crate::models::PacingRequest;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging setup for the CLI
    pub logging: LogConfig,

    /// Plan presentation preferences
    pub output: OutputSettings,
}

/// How plans are printed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Default output format when `--format` is not given
    pub format: OutputFormat,

    /// Colorize headings and effort labels
    pub color: bool,

    /// Print the race strategy narrative after the plan
    pub show_strategy: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            color: true,
            show_strategy: true,
        }
    }
}

/// Plan output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Json,
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("racepace")
            .join("config.toml")
    }

    /// Load configuration with fallback to defaults
    ///
    /// Runs before logging is initialized, so nothing is reported here.
    pub fn load_or_default() -> Self {
        Self::load_from_file(Self::default_config_path()).unwrap_or_default()
    }
}

/// Read a pacing request from a TOML or JSON file, chosen by extension
pub fn load_request<P: AsRef<Path>>(path: P) -> Result<PacingRequest> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file: {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let request = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON request: {}", path.display()))?
    } else {
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML request: {}", path.display()))?
    };

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogFormat, LogLevel};
    use crate::models::{AthleteLevel, PacingApproach, RunFitness, SwimFitness};
    use tempfile::tempdir;

    const OLYMPIC_REQUEST: &str = r#"
race_type = "Olympic Triathlon"

[athlete]
age = 35
gender = "male"
current_weight_lbs = 170.0
race_weight_lbs = 165.0
athlete_level = "competitive"

[approach]
method = "fitness"
swim = { known_css = "1:40" }
bike = { known_ftp = 250 }
run = { fastest_5k = "22:30" }
"#;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig = toml::from_str("[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert_eq!(config.output, OutputSettings::default());
    }

    #[test]
    fn test_config_file_io() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut original_config = AppConfig::default();
        original_config.output.format = OutputFormat::Json;
        original_config.output.show_strategy = false;

        original_config.save_to_file(&config_path).unwrap();
        let loaded_config = AppConfig::load_from_file(&config_path).unwrap();

        assert_eq!(loaded_config, original_config);
    }

    #[test]
    fn test_missing_config_file_errors() {
        let temp_dir = tempdir().unwrap();
        let result = AppConfig::load_from_file(temp_dir.path().join("absent.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_toml_request() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("olympic.toml");
        fs::write(&path, OLYMPIC_REQUEST).unwrap();

        let request = load_request(&path).unwrap();
        assert_eq!(request.race_type, "Olympic Triathlon");
        assert_eq!(request.athlete.athlete_level, Some(AthleteLevel::Competitive));
        assert!(request.custom_distances.run.is_none());

        let PacingApproach::Fitness(inputs) = &request.approach else {
            panic!("expected fitness approach");
        };
        assert_eq!(inputs.swim, Some(SwimFitness::KnownCss("1:40".to_string())));
        assert_eq!(inputs.run, RunFitness::Fastest5k("22:30".to_string()));
        assert_eq!(inputs.run_threshold_power, None);
    }

    #[test]
    fn test_request_toml_round_trip() {
        let request: PacingRequest = toml::from_str(OLYMPIC_REQUEST).unwrap();
        let serialized = toml::to_string(&request).unwrap();
        let reloaded: PacingRequest = toml::from_str(&serialized).unwrap();
        assert_eq!(request, reloaded);
    }

    #[test]
    fn test_load_json_request() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("marathon.json");
        fs::write(
            &path,
            r#"{
                "athlete": {"age": 45, "gender": "female", "current_weight_lbs": 130.0,
                            "race_weight_lbs": 128.0, "athlete_level": "Weekend Warrior"},
                "race_type": "Full Marathon",
                "approach": {"method": "target", "target_time": "3:45:00"}
            }"#,
        )
        .unwrap();

        let request = load_request(&path).unwrap();
        assert_eq!(request.athlete.athlete_level, None);
        assert!(matches!(request.approach, PacingApproach::Target(_)));
    }
}
