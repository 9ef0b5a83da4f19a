use serde::Deserialize;
use std::{env, fs, io, path::PathBuf};
use thiserror::Error;

use crate::domain::entities::{Account, ModulePlan};

const DEFAULT_CONFIG_PATH: &str = "config_server.toml";

// Runtime settings for the config service.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub port: u16,
    pub session_ttl_seconds: u64,
    // Plan applied at startup when no database is configured.
    pub initial_mode: ModulePlan,
    pub accounts: Vec<Account>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: 3003,
            session_ttl_seconds: 60 * 60,
            initial_mode: ModulePlan::OpenFloor,
            accounts: Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

pub fn config_path() -> PathBuf {
    env::var("CONFIG_SERVER_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

// Load settings from the TOML file (optional) and apply env overrides.
pub fn load_settings() -> Result<Settings, SettingsError> {
    let path = config_path();
    let mut settings = match fs::read_to_string(&path) {
        Ok(raw) => parse_settings(&raw).map_err(|source| SettingsError::Parse {
            path: path.clone(),
            source,
        })?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Settings::default()
        }
        Err(source) => return Err(SettingsError::Read { path, source }),
    };

    if let Some(port) = env::var("CONFIG_SERVER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        settings.port = port;
    }
    if let Some(ttl) = env::var("SESSION_TTL_SECONDS")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        settings.session_ttl_seconds = ttl;
    }

    Ok(settings)
}

pub fn parse_settings(raw: &str) -> Result<Settings, toml::de::Error> {
    toml::from_str(raw)
}

pub fn database_url() -> Option<String> {
    env::var("DATABASE_URL").ok().filter(|v| !v.trim().is_empty())
}
