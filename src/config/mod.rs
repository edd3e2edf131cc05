use serde::Deserialize;
use std::path::PathBuf;

/// Complete dashboard configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Telemetry simulation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    /// Period of the updater task (milliseconds)
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_device_count")]
    pub device_count: usize,
    #[serde(default = "default_alert_count")]
    pub alert_count: usize,
    /// Efficiency samples generated on (re)initialization
    #[serde(default = "default_initial_samples")]
    pub initial_samples: usize,
    /// Maximum efficiency samples kept in history
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Fixed seed for reproducible runs; entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_tick_interval_ms() -> u64 {
    3000
}

fn default_device_count() -> usize {
    12
}

fn default_alert_count() -> usize {
    8
}

fn default_initial_samples() -> usize {
    20
}

fn default_history_capacity() -> usize {
    50
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            device_count: default_device_count(),
            alert_count: default_alert_count(),
            initial_samples: default_initial_samples(),
            history_capacity: default_history_capacity(),
            seed: None,
        }
    }
}

/// HTTP API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Capacity of the store update broadcast channel
    #[serde(default = "default_broadcast_capacity")]
    pub broadcast_capacity: usize,
}

fn default_bind_address() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_broadcast_capacity() -> usize {
    256
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            broadcast_capacity: default_broadcast_capacity(),
        }
    }
}

/// Persisted session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// JSON key/value file holding the signed-in user
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("iotdash-session.json")
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
        }
    }
}

impl DashboardConfig {
    /// Apply `IOTDASH_*` environment overrides; unparsable values are ignored
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(n) = lookup("IOTDASH_TICK_INTERVAL_MS").and_then(|v| v.parse::<u64>().ok()) {
            self.simulation.tick_interval_ms = n;
        }
        if let Some(n) = lookup("IOTDASH_DEVICE_COUNT").and_then(|v| v.parse::<usize>().ok()) {
            self.simulation.device_count = n;
        }
        if let Some(n) = lookup("IOTDASH_ALERT_COUNT").and_then(|v| v.parse::<usize>().ok()) {
            self.simulation.alert_count = n;
        }
        if let Some(n) = lookup("IOTDASH_INITIAL_SAMPLES").and_then(|v| v.parse::<usize>().ok()) {
            self.simulation.initial_samples = n;
        }
        if let Some(n) = lookup("IOTDASH_HISTORY_CAPACITY").and_then(|v| v.parse::<usize>().ok()) {
            self.simulation.history_capacity = n;
        }
        if let Some(n) = lookup("IOTDASH_SEED").and_then(|v| v.parse::<u64>().ok()) {
            self.simulation.seed = Some(n);
        }
        if let Some(addr) = lookup("IOTDASH_BIND_ADDRESS") {
            self.api.bind_address = addr;
        }
        if let Some(n) = lookup("IOTDASH_BROADCAST_CAPACITY").and_then(|v| v.parse::<usize>().ok())
        {
            self.api.broadcast_capacity = n;
        }
        if let Some(path) = lookup("IOTDASH_SESSION_PATH") {
            self.session.storage_path = PathBuf::from(path);
        }
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &str) -> anyhow::Result<DashboardConfig> {
    use anyhow::Context;

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path))?;
    let config: DashboardConfig =
        toml::from_str(&contents).context("Failed to parse config TOML")?;
    Ok(config)
}
