//! Persistent defaults read from `config.toml`.
use std::path::{Path, PathBuf};

use bulkfetch_common::config_dir;
use log::{debug, warn};
use serde::Deserialize;
use tokio::fs::{read_to_string, write};

use crate::error::CliError;

const SAMPLE_CONFIG_TOML: &str = include_str!("sample.toml");

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Accepted range of `max_workers`, same as `-d`.
const MAX_WORKERS_RANGE: std::ops::RangeInclusive<usize> = 1..=32;

/// Values loaded from the config file. Anything missing falls back to the built-in defaults.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub download_dir: Option<PathBuf>,
    pub max_workers: Option<usize>,
    pub replace_existing: Option<bool>,
    pub chunk_size: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

impl FileConfig {
    /// Reads `config.toml` from the config directory, writing the commented sample first
    /// when the file does not exist yet.
    ///
    /// Without a usable config directory the built-in defaults are used.
    pub async fn load() -> Result<Self, CliError> {
        match config_dir() {
            Ok(dir) => Self::load_from(&dir.join(CONFIG_FILE_NAME)).await,
            Err(error) => {
                warn!("No config directory available ({}). Using defaults.", error);
                Ok(Self::default())
            }
        }
    }

    /// Same as [`load`](Self::load) with an explicit file path.
    pub async fn load_from(path: &Path) -> Result<Self, CliError> {
        if !path.exists() {
            debug!("Writing sample config to {}", path.display());
            if let Err(error) = write(path, SAMPLE_CONFIG_TOML).await {
                warn!(
                    "Could not create {} ({}). Using defaults.",
                    path.display(),
                    error
                );
                return Ok(Self::default());
            }
        }

        let contents = read_to_string(path).await?;

        let config: Self = toml::from_str(&contents).map_err(|e| CliError::ConfigParseFail {
            file: path.display().to_string(),
            message: e.to_string(),
        })?;

        if let Some(workers) = config.max_workers {
            if !MAX_WORKERS_RANGE.contains(&workers) {
                return Err(CliError::ConfigParseFail {
                    file: path.display().to_string(),
                    message: format!("max_workers must be between 1 and 32 (got {workers})"),
                });
            }
        }

        debug!("Loaded config: {:?}", config);
        Ok(config)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn sample_is_written_and_parses_empty() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);

        let config = FileConfig::load_from(&path).await.unwrap();

        assert!(path.exists());
        assert_eq!(config, FileConfig::default());
    }

    #[tokio::test]
    async fn reads_values() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "max_workers = 8\nreplace_existing = false\ntimeout_secs = 30\n",
        )
        .unwrap();

        let config = FileConfig::load_from(&path).await.unwrap();

        assert_eq!(config.max_workers, Some(8));
        assert_eq!(config.replace_existing, Some(false));
        assert_eq!(config.timeout_secs, Some(30));
        assert_eq!(config.download_dir, None);
    }

    #[tokio::test]
    async fn unwritable_location_falls_back_to_defaults() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("missing").join(CONFIG_FILE_NAME);

        let config = FileConfig::load_from(&path).await.unwrap();

        assert_eq!(config, FileConfig::default());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn worker_count_is_bounded() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);

        for bad in ["max_workers = 0\n", "max_workers = 33\n"] {
            std::fs::write(&path, bad).unwrap();
            let err = FileConfig::load_from(&path).await.unwrap_err();
            assert!(matches!(err, CliError::ConfigParseFail { .. }));
        }

        std::fs::write(&path, "max_workers = 32\n").unwrap();
        let config = FileConfig::load_from(&path).await.unwrap();
        assert_eq!(config.max_workers, Some(32));
    }

    #[tokio::test]
    async fn rejects_unknown_keys() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "workers = 3\n").unwrap();

        let err = FileConfig::load_from(&path).await.unwrap_err();
        assert!(matches!(err, CliError::ConfigParseFail { .. }));
    }
}
