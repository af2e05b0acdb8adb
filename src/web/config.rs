use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub elements: ElementsConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub predict: PredictConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub url: String,
    pub api_key: String,
    #[serde(default = "default_positions_table")]
    pub positions_table: String,
    #[serde(default = "default_elements_table")]
    pub elements_table: String,
}

fn default_positions_table() -> String {
    "iss_positions".to_string()
}

fn default_elements_table() -> String {
    "iss_tle".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_telemetry_url")]
    pub url: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            url: default_telemetry_url(),
        }
    }
}

fn default_telemetry_url() -> String {
    "http://api.open-notify.org/iss-now.json".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElementsConfig {
    #[serde(default = "default_source_url")]
    pub source_url: String,
}

impl Default for ElementsConfig {
    fn default() -> Self {
        Self {
            source_url: default_source_url(),
        }
    }
}

fn default_source_url() -> String {
    "https://celestrak.org/NORAD/elements/gp.php?CATNR=25544&FORMAT=TLE".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval_seconds(),
        }
    }
}

fn default_interval_seconds() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictConfig {
    #[serde(default = "default_horizon_seconds")]
    pub horizon_seconds: i64,
    #[serde(default = "default_step_seconds")]
    pub step_seconds: i64,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            horizon_seconds: default_horizon_seconds(),
            step_seconds: default_step_seconds(),
        }
    }
}

fn default_horizon_seconds() -> i64 {
    crate::predict::DEFAULT_HORIZON_SECONDS
}

fn default_step_seconds() -> i64 {
    crate::predict::DEFAULT_STEP_SECONDS
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_defaults() {
        let config: Config = serde_yaml::from_str(
            "store:\n  url: https://example.supabase.co\n  api_key: secret\n",
        )
        .unwrap();
        assert_eq!(config.web.bind, "0.0.0.0:8080");
        assert_eq!(config.store.positions_table, "iss_positions");
        assert_eq!(config.store.elements_table, "iss_tle");
        assert_eq!(config.tracker.interval_seconds, 60);
        assert_eq!(config.predict.horizon_seconds, 5400);
        assert_eq!(config.predict.step_seconds, 60);
        assert!(config.telemetry.url.contains("iss-now"));
        assert!(config.elements.source_url.contains("CATNR=25544"));
    }
}
