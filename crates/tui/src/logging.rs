use std::fs::{File, OpenOptions};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

const DEFAULT_DIRECTIVE: &str = "info";

/// Routes tracing output to the log file in the data directory; the terminal
/// UI owns stdout.
pub fn init_tracing(config: &AppConfig, filter: Option<&str>) -> Result<()> {
    let directive: Directive = filter
        .unwrap_or(DEFAULT_DIRECTIVE)
        .parse()
        .with_context(|| format!("invalid log directive `{}`", filter.unwrap_or_default()))?;
    let env_filter = EnvFilter::builder()
        .with_default_directive(directive)
        .from_env_lossy();

    let file = open_log(config)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

fn open_log(config: &AppConfig) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())
        .with_context(|| format!("failed to open log file {}", config.log_path().display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn rejects_garbage_directive() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::from_data_dir(dir.path().to_path_buf()).unwrap();
        assert!(init_tracing(&config, Some("clearloop=loud")).is_err());
    }

    #[test]
    fn creates_log_file() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::from_data_dir(dir.path().to_path_buf()).unwrap();
        init_tracing(&config, Some("debug")).unwrap();
        assert!(config.log_path().exists());
    }
}
