// src/config.rs

use std::env;
use std::path::PathBuf;

use crate::errors::ConfigError;
use crate::state::BackendConfig;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_STATIC_DIR: &str = "static";

pub struct AppConfig {
    pub backend: BackendConfig,
    pub port: u16,
    pub static_dir: PathBuf,
}

impl AppConfig {
    /// Wczytuje konfigurację ze zmiennych środowiskowych (po `dotenv()`).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let backend_url = required("BACKEND_URL")?;
        let token = required("ADMIN_TOKEN")?;

        let port = match lookup("PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: value.clone(),
            })?,
            None => DEFAULT_PORT,
        };

        let static_dir = lookup("STATIC_DIR")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string());

        Ok(AppConfig {
            backend: BackendConfig::new(backend_url, token),
            port,
            static_dir: PathBuf::from(static_dir),
        })
    }
}
