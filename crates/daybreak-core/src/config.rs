//! Gateway configuration loaded from `config/gateway.toml` and `DAYBREAK_*`
//! environment variables. Change behavior without code edits.

use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_user_name() -> String {
    "Kevin".to_string()
}

/// Global application configuration (gateway + dashboard). Load from TOML or env.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Application identity shown in the health endpoint and the TUI header.
    pub app_name: String,
    /// HTTP port for the gateway.
    pub port: u16,
    /// Base URL of the upstream AI agent API.
    pub agent_base_url: String,
    /// Agent mode ("live" calls the upstream API, "mock" serves fixtures only).
    pub agent_mode: String,
    /// Name the dashboard greets in the header.
    #[serde(default = "default_user_name")]
    pub user_name: String,
    /// DAYBREAK_DEBUG: log the resolved agent URL and mode at startup.
    #[serde(default)]
    pub debug: bool,
}

impl CoreConfig {
    /// Load config from file and environment. Precedence: env `DAYBREAK_CONFIG`
    /// path > `config/gateway.toml` > defaults, with `DAYBREAK__*` env overrides
    /// on top.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("DAYBREAK_CONFIG").unwrap_or_else(|_| "config/gateway".to_string());
        let builder = config::Config::builder()
            .set_default("app_name", "Daybreak")?
            .set_default("port", 8080_i64)?
            .set_default("agent_base_url", "http://localhost:8001")?
            .set_default("agent_mode", "live")?
            .set_default("user_name", "Kevin")?
            .set_default("debug", false)?;

        let path = Path::new(&config_path);
        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        let built = builder
            .add_source(config::Environment::with_prefix("DAYBREAK").separator("__"))
            .build()?;

        built.try_deserialize()
    }
}

/// Parse a boolean env toggle. Unset or invalid => `default`.
pub fn env_bool(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(v) => v.trim().eq_ignore_ascii_case("true") || (v.trim().is_empty() && default),
        Err(_) => default,
    }
}
