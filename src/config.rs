use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

const CONFIG_DIR_ENV: &str = "TICKET_HOOK_CONFIG_DIR";
const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_CLOSE_STATUS: &str = "closed";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tracker_url: Option<String>,
    pub tracker_user: Option<String>,
    pub tracker_token: Option<String>,
    pub close_status: String,
    pub notify: bool,
}

/// What `config init` writes to disk. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracker_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracker_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracker_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify: Option<String>,
}

pub fn config_directory() -> AppResult<PathBuf> {
    if let Some(dir) = env::var_os(CONFIG_DIR_ENV).filter(|dir| !dir.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir()
        .map(|dir| dir.join("ticket-hook"))
        .ok_or_else(|| {
            AppError::Configuration("could not determine a configuration directory".to_string())
        })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        let path = config_file_path()?;
        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        let path = config_file_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(&path, data)?;
        Ok(())
    }
}

impl AppConfig {
    /// Stored settings with `TICKET_HOOK_*` environment variables on top.
    pub fn load() -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        Self::from_layers(stored, |key| env::var(key).ok())
    }

    fn from_layers(stored: StoredConfig, env_var: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let pick = |key: &str, fallback: Option<String>| {
            env_var(key)
                .filter(|value| !value.trim().is_empty())
                .or(fallback)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let notify = match pick("TICKET_HOOK_NOTIFY", stored.notify) {
            Some(value) => parse_flag(&value)?,
            None => true,
        };

        Ok(Self {
            tracker_url: pick("TICKET_HOOK_TRACKER_URL", stored.tracker_url),
            tracker_user: pick("TICKET_HOOK_TRACKER_USER", stored.tracker_user),
            tracker_token: pick("TICKET_HOOK_TRACKER_TOKEN", stored.tracker_token),
            close_status: pick("TICKET_HOOK_CLOSE_STATUS", stored.close_status)
                .unwrap_or_else(|| DEFAULT_CLOSE_STATUS.to_string()),
            notify,
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            tracker_url: None,
            tracker_user: None,
            tracker_token: None,
            close_status: DEFAULT_CLOSE_STATUS.to_string(),
            notify: true,
        }
    }
}

pub fn parse_flag(value: &str) -> AppResult<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AppError::Configuration(format!(
            "expected a boolean for notify, got '{other}'"
        ))),
    }
}
