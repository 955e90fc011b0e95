//! Layered configuration for the `brainstem` binary (§10.3).
//!
//! Load order, later overriding earlier: defaults, then
//! `~/.brainstem/brainstem.toml`, then `./.brainstem/brainstem.toml`, then
//! `BRAINSTEM_*` environment variables, then CLI flags (applied by the
//! caller after `BrainstemConfig::load`).

use std::path::{Path, PathBuf};

use brainstem_core::kernel::BatteryThresholds;
use serde::{Deserialize, Serialize};
use tooling::config::{get_env_parse, get_env_or};
use tracing::{debug, info};

use crate::error::{BrainstemError, Result};

/// Which checkpoint backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointBackend {
    /// Ephemeral, process-local.
    #[default]
    Memory,
    /// Durable, one file per thread, under `checkpoint_dir`.
    File,
}

/// Full configuration surface (§10.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrainstemConfig {
    /// ReAct iteration cap (§4.3 R8), default 20.
    pub max_iter: u32,
    /// Battery percentage below which K4 forces SAFE mode (§4.2 rank 1).
    pub battery_safe_threshold: f64,
    /// Battery percentage below which K4 forces CHARGE mode (§4.2 rank 2).
    pub battery_charge_threshold: f64,
    /// Checkpoint backend selection.
    pub checkpoint_backend: CheckpointBackend,
    /// Directory for the `file` checkpoint backend.
    pub checkpoint_dir: PathBuf,
    /// Oracle endpoint base URL.
    pub oracle_base_url: String,
    /// Oracle model identifier.
    pub oracle_model: String,
    /// Oracle API key; typically supplied via `BRAINSTEM_ORACLE_API_KEY` rather
    /// than committed to a config file.
    pub oracle_api_key: Option<String>,
    /// Seconds the host loop sleeps between telemetry pulls when running
    /// continuously (as opposed to a fixed `--ticks` count).
    pub tick_poll_interval_s: f64,
    /// Coordinates of the charging station, for the CHARGE-mode synthesized dispatch.
    pub charging_station: (f64, f64),
}

impl Default for BrainstemConfig {
    fn default() -> Self {
        Self {
            max_iter: brainstem_react::nodes::DEFAULT_MAX_ITER,
            battery_safe_threshold: 5.0,
            battery_charge_threshold: 20.0,
            checkpoint_backend: CheckpointBackend::default(),
            checkpoint_dir: PathBuf::from(".brainstem/checkpoints"),
            oracle_base_url: "https://api.anthropic.com".to_string(),
            oracle_model: "claude-3-5-sonnet-20241022".to_string(),
            oracle_api_key: None,
            tick_poll_interval_s: 1.0,
            charging_station: (0.0, 0.0),
        }
    }
}

impl BrainstemConfig {
    /// This configuration's battery cutoffs as the `BatteryThresholds` K4 expects.
    pub fn battery_thresholds(&self) -> BatteryThresholds {
        BatteryThresholds {
            safe: self.battery_safe_threshold,
            charge: self.battery_charge_threshold,
        }
    }

    /// Validate that this configuration can drive a host loop.
    pub fn validate(&self) -> Result<()> {
        if self.max_iter == 0 {
            return Err(BrainstemError::Config("max_iter must be non-zero".into()));
        }
        if !(0.0..=100.0).contains(&self.battery_safe_threshold)
            || !(0.0..=100.0).contains(&self.battery_charge_threshold)
        {
            return Err(BrainstemError::Config(
                "battery thresholds must be in 0..=100".into(),
            ));
        }
        if self.battery_safe_threshold >= self.battery_charge_threshold {
            return Err(BrainstemError::Config(
                "battery_safe_threshold must be lower than battery_charge_threshold".into(),
            ));
        }
        Ok(())
    }

    /// Load layered config: defaults, user-level file, project-level file,
    /// then `BRAINSTEM_*` environment variables.
    pub async fn load() -> Result<Self> {
        let mut config = Self::default();
        info!("loading brainstem configuration with defaults");

        if let Some(home) = dirs::home_dir() {
            config = Self::merge_from_file(config, &home.join(".brainstem/brainstem.toml")).await?;
        }
        config = Self::merge_from_file(config, Path::new("./.brainstem/brainstem.toml")).await?;
        config = Self::merge_from_env(config)?;

        config.validate()?;
        Ok(config)
    }

    async fn merge_from_file(mut config: Self, path: &Path) -> Result<Self> {
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => {
                let file_config: PartialConfig = toml::from_str(&contents)
                    .map_err(|e| BrainstemError::Config(format!("{}: {e}", path.display())))?;
                debug!("merged config from {}", path.display());
                file_config.apply_to(&mut config);
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(config),
            Err(e) => Err(BrainstemError::Config(format!("{}: {e}", path.display()))),
        }
    }

    fn merge_from_env(mut config: Self) -> Result<Self> {
        if let Some(v) = get_env_parse::<u32>("BRAINSTEM_MAX_ITER")
            .map_err(|e| BrainstemError::Config(e.to_string()))?
        {
            config.max_iter = v;
        }
        if let Some(v) = get_env_parse::<f64>("BRAINSTEM_BATTERY_SAFE_THRESHOLD")
            .map_err(|e| BrainstemError::Config(e.to_string()))?
        {
            config.battery_safe_threshold = v;
        }
        if let Some(v) = get_env_parse::<f64>("BRAINSTEM_BATTERY_CHARGE_THRESHOLD")
            .map_err(|e| BrainstemError::Config(e.to_string()))?
        {
            config.battery_charge_threshold = v;
        }
        config.oracle_base_url =
            get_env_or("BRAINSTEM_ORACLE_BASE_URL", config.oracle_base_url.clone())
                .map_err(|e| BrainstemError::Config(e.to_string()))?;
        config.oracle_model = get_env_or("BRAINSTEM_ORACLE_MODEL", config.oracle_model.clone())
            .map_err(|e| BrainstemError::Config(e.to_string()))?;
        if let Some(v) = tooling::config::get_env("BRAINSTEM_ORACLE_API_KEY")
            .map_err(|e| BrainstemError::Config(e.to_string()))?
        {
            config.oracle_api_key = Some(v);
        }
        Ok(config)
    }
}

/// Mirrors [`BrainstemConfig`] with every field optional, for parsing a
/// possibly-partial TOML file and applying only the fields it sets.
#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    max_iter: Option<u32>,
    battery_safe_threshold: Option<f64>,
    battery_charge_threshold: Option<f64>,
    checkpoint_backend: Option<CheckpointBackend>,
    checkpoint_dir: Option<PathBuf>,
    oracle_base_url: Option<String>,
    oracle_model: Option<String>,
    oracle_api_key: Option<String>,
    tick_poll_interval_s: Option<f64>,
    charging_station: Option<(f64, f64)>,
}

impl PartialConfig {
    fn apply_to(self, config: &mut BrainstemConfig) {
        if let Some(v) = self.max_iter {
            config.max_iter = v;
        }
        if let Some(v) = self.battery_safe_threshold {
            config.battery_safe_threshold = v;
        }
        if let Some(v) = self.battery_charge_threshold {
            config.battery_charge_threshold = v;
        }
        if let Some(v) = self.checkpoint_backend {
            config.checkpoint_backend = v;
        }
        if let Some(v) = self.checkpoint_dir {
            config.checkpoint_dir = v;
        }
        if let Some(v) = self.oracle_base_url {
            config.oracle_base_url = v;
        }
        if let Some(v) = self.oracle_model {
            config.oracle_model = v;
        }
        if let Some(v) = self.oracle_api_key {
            config.oracle_api_key = Some(v);
        }
        if let Some(v) = self.tick_poll_interval_s {
            config.tick_poll_interval_s = v;
        }
        if let Some(v) = self.charging_station {
            config.charging_station = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(BrainstemConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_max_iter_is_rejected() {
        let mut config = BrainstemConfig::default();
        config.max_iter = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn battery_thresholds_reflect_configured_values() {
        let mut config = BrainstemConfig::default();
        config.battery_safe_threshold = 7.0;
        config.battery_charge_threshold = 25.0;
        let thresholds = config.battery_thresholds();
        assert_eq!(thresholds.safe, 7.0);
        assert_eq!(thresholds.charge, 25.0);
    }

    #[test]
    fn inverted_battery_thresholds_are_rejected() {
        let mut config = BrainstemConfig::default();
        config.battery_safe_threshold = 50.0;
        config.battery_charge_threshold = 10.0;
        assert!(config.validate().is_err());
    }
}
