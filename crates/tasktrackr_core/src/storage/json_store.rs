use crate::error::AppError;
use crate::model::Task;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: u32 = 1;
const STORE_FILE_NAME: &str = "tasks.json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredTasks {
    schema_version: u32,
    // Highest id nanos ever issued, deleted tasks included, so ids are
    // never reused even if the wall clock moves backwards.
    #[serde(default)]
    last_issued_nanos: i128,
    tasks: Vec<Task>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub tasks: Vec<Task>,
    pub last_issued_nanos: i128,
}

/// Platform default location; env and config overrides are resolved in
/// `config::Config::store_path`.
pub fn default_store_path() -> Result<PathBuf, AppError> {
    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::persistence("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("tasktrackr")
            .join(STORE_FILE_NAME))
    } else {
        let home =
            std::env::var("HOME").map_err(|_| AppError::persistence("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("tasktrackr")
            .join(STORE_FILE_NAME))
    }
}

pub fn load_tasks(path: &Path) -> Result<Vec<Task>, AppError> {
    Ok(load_state(path)?.tasks)
}

pub fn load_state(path: &Path) -> Result<StoreSnapshot, AppError> {
    if !path.exists() {
        return Ok(StoreSnapshot::default());
    }

    let content =
        std::fs::read_to_string(path).map_err(|err| AppError::persistence(err.to_string()))?;
    let stored: StoredTasks = serde_json::from_str(&content)
        .map_err(|err| AppError::persistence(format!("malformed store file: {err}")))?;

    if !(1..=SCHEMA_VERSION).contains(&stored.schema_version) {
        return Err(AppError::persistence("schema_version mismatch"));
    }

    Ok(StoreSnapshot {
        tasks: stored.tasks,
        last_issued_nanos: stored.last_issued_nanos,
    })
}

pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<(), AppError> {
    save_state(
        path,
        &StoreSnapshot {
            tasks: tasks.to_vec(),
            last_issued_nanos: 0,
        },
    )
}

/// Writes the full collection to a sibling temporary file and renames it
/// over the target, so a crash mid-write never truncates the previous state.
pub fn save_state(path: &Path, state: &StoreSnapshot) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| AppError::persistence(err.to_string()))?;
    }

    let stored = StoredTasks {
        schema_version: SCHEMA_VERSION,
        last_issued_nanos: state.last_issued_nanos,
        tasks: state.tasks.to_vec(),
    };
    let content = serde_json::to_string_pretty(&stored)
        .map_err(|err| AppError::persistence(err.to_string()))?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, content).map_err(|err| AppError::persistence(err.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&tmp, permissions)
            .map_err(|err| AppError::persistence(err.to_string()))?;
    }

    std::fs::rename(&tmp, path).map_err(|err| AppError::persistence(err.to_string()))?;

    Ok(())
}
