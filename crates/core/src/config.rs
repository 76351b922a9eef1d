use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::{BaseDirs, ProjectDirs};
use once_cell::sync::Lazy;

/// Storage key the task collection is persisted under.
pub static TASKS_KEY: &str = "clearLoopTasks";

static DEFAULT_LOG_NAME: &str = "clearloop.log";
static ENV_DATA_DIR: &str = "CLEARLOOP_DATA_DIR";

static PROJECT_DIRS: Lazy<Option<ProjectDirs>> =
    Lazy::new(|| ProjectDirs::from("dev", "clearloop", "clearloop"));

#[derive(Debug, Clone)]
pub struct AppConfig {
    data_dir: PathBuf,
    log_path: PathBuf,
}

impl AppConfig {
    /// Construct [`AppConfig`] by resolving the data directory using the provided override,
    /// environment variables, and platform defaults.
    pub fn discover(data_dir_override: Option<PathBuf>) -> Result<Self> {
        let data_dir = resolve_data_dir(data_dir_override)?;
        if !data_dir.exists() {
            fs::create_dir_all(&data_dir).with_context(|| {
                format!("Failed to create data directory at {}", data_dir.display())
            })?;
        }
        Self::from_data_dir(data_dir)
    }

    /// Construct [`AppConfig`] directly from a resolved data directory.
    pub fn from_data_dir(data_dir: PathBuf) -> Result<Self> {
        let log_path = data_dir.join(DEFAULT_LOG_NAME);
        Ok(Self { data_dir, log_path })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// File backing the task collection blob.
    pub fn store_path(&self) -> PathBuf {
        crate::storage::FileStore::path_for(&self.data_dir, TASKS_KEY)
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

fn resolve_data_dir(data_dir_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = data_dir_override {
        return Ok(dir);
    }

    if let Ok(env_dir) = env::var(ENV_DATA_DIR) {
        return Ok(PathBuf::from(env_dir));
    }

    if cfg!(debug_assertions) {
        let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let dev_dir = manifest_dir.join("..").join("tmp").join("dev-clearloop");
        return Ok(dev_dir);
    }

    if let Some(project) = &*PROJECT_DIRS {
        return Ok(project.data_dir().to_path_buf());
    }

    if let Some(base) = BaseDirs::new() {
        return Ok(base.home_dir().join(".clearloop"));
    }

    Ok(env::current_dir()?.join(".clearloop"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn discover_creates_override_directory() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("nested").join("data");
        let config = AppConfig::discover(Some(target.clone())).unwrap();

        assert!(target.is_dir());
        assert_eq!(config.data_dir(), target.as_path());
        assert_eq!(config.store_path(), target.join("clearLoopTasks.json"));
        assert_eq!(config.log_path(), target.join("clearloop.log").as_path());
    }
}
