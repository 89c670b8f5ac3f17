use std::path::Path;

use board::RosterUser;
use serde::{Deserialize, Serialize};

pub const CONFIG_PATH_ENV: &str = "CLASSBOARD_CONFIG";

fn default_host() -> String {
    "127.0.0.1".to_string()
}

/// Server settings, loaded from an optional JSON file named by
/// `CLASSBOARD_CONFIG` and then overridden by `HOST`/`PORT`. Port 0 asks
/// the OS for a free port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default)]
    pub port: u16,
    /// The assignable-user universe the board offers.
    #[serde(default)]
    pub roster: Vec<RosterUser>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: 0,
            roster: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };

        if let Ok(host) = std::env::var("HOST") {
            config.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            config.port = port.trim().parse()?;
        }
        Ok(config)
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
