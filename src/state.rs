// src/state.rs

use std::path::PathBuf;

use reqwest::Client;
use tokio::sync::{Mutex, RwLock};

use crate::config::AppConfig;
use crate::models::FormState;
use crate::submitter::{ADD_PRODUCT_PATH, SubmissionGate};

pub struct AppState {
    pub form: Mutex<FormState>,
    /// Aktualizacje formularza trzymają odczyt od przyjęcia żądania do zapisu
    /// w stanie, wysyłka trzyma zapis. Wysyłka czeka więc na rozpoczęte zmiany,
    /// a zmiany przychodzące w trakcie wysyłki trafiają do następnego formularza.
    pub update_order: RwLock<()>,
    pub submission_gate: SubmissionGate,
    pub backend: BackendConfig,
    pub http_client: Client,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self::with_http_client(config, Client::new())
    }

    pub fn with_http_client(config: AppConfig, http_client: Client) -> Self {
        AppState {
            form: Mutex::new(FormState::default()),
            update_order: RwLock::new(()),
            submission_gate: SubmissionGate::default(),
            backend: config.backend,
            http_client,
            static_dir: config.static_dir,
        }
    }
}

#[derive(Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub token: String,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        BackendConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub fn add_product_url(&self) -> String {
        format!("{}{}", self.base_url, ADD_PRODUCT_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_product_url_ignores_trailing_slashes() {
        let backend = BackendConfig::new("https://api.example.com//", "t");
        assert_eq!(
            backend.add_product_url(),
            "https://api.example.com/api/product/add"
        );
    }
}
