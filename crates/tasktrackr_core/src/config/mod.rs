use crate::error::AppError;
use crate::storage::json_store;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "TASKTRACKR_CONFIG_PATH";
const STORE_ENV_VAR: &str = "TASKTRACKR_STORE_PATH";
const SCAN_INTERVAL_ENV_VAR: &str = "TASKTRACKR_SCAN_INTERVAL_SECONDS";

pub const DEFAULT_SCAN_INTERVAL_SECONDS: u64 = 60;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage_path: Option<PathBuf>,
    #[serde(default)]
    pub scan_interval_seconds: Option<u64>,
}

impl Config {
    /// Resolution order: env var, config file, platform default.
    pub fn store_path(&self) -> Result<PathBuf, AppError> {
        if let Ok(path) = std::env::var(STORE_ENV_VAR)
            && !path.trim().is_empty()
        {
            return Ok(PathBuf::from(path));
        }

        if let Some(path) = self.storage_path.as_ref() {
            return Ok(path.clone());
        }

        json_store::default_store_path()
    }

    pub fn scan_interval(&self) -> Duration {
        let seconds = std::env::var(SCAN_INTERVAL_ENV_VAR)
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .or(self.scan_interval_seconds)
            .unwrap_or(DEFAULT_SCAN_INTERVAL_SECONDS);
        Duration::from_secs(seconds.max(1))
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::persistence("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("tasktrackr")
            .join(CONFIG_FILE_NAME))
    } else {
        let home =
            std::env::var("HOME").map_err(|_| AppError::persistence("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("tasktrackr")
            .join(CONFIG_FILE_NAME))
    }
}

/// Missing or malformed config never aborts startup; defaults are returned
/// and the error is handed back for logging.
pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::persistence(format!("{}: {}", path.display(), err)))?;
    serde_json::from_str(&content).map_err(|err| {
        AppError::persistence(format!("invalid JSON in {}: {}", path.display(), err))
    })
}
