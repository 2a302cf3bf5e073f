// src/config.rs
//! Service configuration: defaults, optional TOML file, env overrides.

use std::{env, fs, path::Path};

use serde::Deserialize;

use crate::ecfr::DEFAULT_BASE_URL;

// --- env names ---
pub const ENV_CONFIG_PATH: &str = "ECFR_CONFIG_PATH";
pub const ENV_API_BASE_URL: &str = "ECFR_API_BASE_URL";
pub const ENV_BIND_ADDR: &str = "ECFR_BIND_ADDR";
pub const ENV_UI_DIR: &str = "ECFR_UI_DIR";
pub const ENV_HISTORY_MONTHS: &str = "ECFR_HISTORY_MONTHS";

fn default_api_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}
fn default_history_months() -> u32 {
    60
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Static dashboard bundle served at `/` when set.
    #[serde(default)]
    pub ui_dir: Option<String>,
    /// How far back the historical series reaches.
    #[serde(default = "default_history_months")]
    pub history_months: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            bind_addr: default_bind_addr(),
            ui_dir: None,
            history_months: default_history_months(),
        }
    }
}

impl AppConfig {
    /// Resolve configuration: TOML file named by `ECFR_CONFIG_PATH` (when
    /// set), then individual env overrides on top.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match env::var(ENV_CONFIG_PATH) {
            Ok(path) => Self::load_from_file(&path)?,
            Err(_) => Self::default(),
        };

        if let Ok(v) = env::var(ENV_API_BASE_URL) {
            cfg.api_base_url = v;
        }
        if let Ok(v) = env::var(ENV_BIND_ADDR) {
            cfg.bind_addr = v;
        }
        if let Ok(v) = env::var(ENV_UI_DIR) {
            cfg.ui_dir = Some(v);
        }
        if let Ok(v) = env::var(ENV_HISTORY_MONTHS) {
            if let Ok(months) = v.trim().parse::<u32>() {
                cfg.history_months = months;
            }
        }

        cfg.sanitize();
        Ok(cfg)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(&path)?;
        let mut cfg: AppConfig = toml::from_str(&data)?;
        cfg.sanitize();
        Ok(cfg)
    }

    fn sanitize(&mut self) {
        if self.history_months == 0 {
            self.history_months = default_history_months();
        }
        while self.api_base_url.ends_with('/') {
            self.api_base_url.pop();
        }
    }
}
