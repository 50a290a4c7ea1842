//! Configuration management
//!
//! Values are layered: built-in defaults, then an optional TOML file
//! (`callcast.toml`, or the path in `CALLCAST_CONFIG`), then environment
//! variables such as `CALLCAST__SERVER__PORT=9000`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub simulator: SimulatorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Simulated call progress and inbound traffic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Delay between dial and the far end connecting
    pub connect_delay_ms: u64,
    /// Period of the simulated inbound call generator
    pub incoming_interval_secs: u64,
    /// Caller number used for simulated inbound calls
    pub incoming_number: String,
    pub enable_incoming: bool,
    /// Operator status at process start
    pub initial_status: String,
}

impl SimulatorConfig {
    pub fn connect_delay(&self) -> Duration {
        Duration::from_millis(self.connect_delay_ms)
    }

    pub fn incoming_interval(&self) -> Duration {
        Duration::from_secs(self.incoming_interval_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            simulator: SimulatorConfig::default(),
        }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            connect_delay_ms: 2000,
            incoming_interval_secs: 30,
            incoming_number: "+79001234567".to_string(),
            enable_incoming: true,
            initial_status: "ready".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from defaults, file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::var("CALLCAST_CONFIG").unwrap_or_else(|_| "callcast".to_string());
        Self::builder()?
            .add_source(config::File::with_name(&path).required(false))
            .add_source(config::Environment::with_prefix("CALLCAST").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Parse configuration from a TOML string layered over the defaults
    pub fn from_toml(toml: &str) -> Result<Self, config::ConfigError> {
        Self::builder()?
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        let defaults = Config::default();
        config::Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("simulator.connect_delay_ms", defaults.simulator.connect_delay_ms)?
            .set_default(
                "simulator.incoming_interval_secs",
                defaults.simulator.incoming_interval_secs,
            )?
            .set_default("simulator.incoming_number", defaults.simulator.incoming_number)?
            .set_default("simulator.enable_incoming", defaults.simulator.enable_incoming)?
            .set_default("simulator.initial_status", defaults.simulator.initial_status)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
