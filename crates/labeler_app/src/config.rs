//! RON configuration for the labeler binary.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use labeler_core::DEFAULT_ROW_LIMIT;
use labeler_engine::DEFAULT_API_BASE;
use labeler_logging::DEFAULT_LOG_FILE;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "labeler.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("unknown dataset `{0}`")]
    UnknownDataset(String),
    #[error("no dataset selected: pass --dataset or --csv")]
    NoDataset,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reviewer name to CSV path, relative to the working directory and,
    /// when saving remotely, to the repository root.
    pub datasets: BTreeMap<String, PathBuf>,
    pub row_limit: Option<usize>,
    pub remote: Option<RemoteConfig>,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            datasets: BTreeMap::new(),
            row_limit: Some(DEFAULT_ROW_LIMIT),
            remote: None,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    pub owner: String,
    pub repo: String,
    #[serde(default)]
    pub branch: Option<String>,
    /// Environment variable holding the bearer token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// `{dataset}` and `{timestamp}` (session start, RFC 3339) are substituted.
    #[serde(default = "default_commit_message")]
    pub commit_message: String,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_commit_message() -> String {
    "Update labels for {dataset} ({timestamp})".to_string()
}

/// Dataset picked for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetChoice {
    pub name: String,
    pub path: PathBuf,
}

impl Config {
    /// `None` when there is no file at `path`.
    pub fn read(path: &Path) -> Result<Option<Self>, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        ron::from_str(&content)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// `--csv` wins over `--dataset`; a single configured dataset is used implicitly.
    pub fn resolve_dataset(
        &self,
        name: Option<&str>,
        csv: Option<&Path>,
    ) -> Result<DatasetChoice, ConfigError> {
        if let Some(path) = csv {
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            return Ok(DatasetChoice {
                name,
                path: path.to_path_buf(),
            });
        }
        match name {
            Some(name) => self
                .datasets
                .get(name)
                .map(|path| DatasetChoice {
                    name: name.to_string(),
                    path: path.clone(),
                })
                .ok_or_else(|| ConfigError::UnknownDataset(name.to_string())),
            None if self.datasets.len() == 1 => self
                .datasets
                .iter()
                .next()
                .map(|(name, path)| DatasetChoice {
                    name: name.clone(),
                    path: path.clone(),
                })
                .ok_or(ConfigError::NoDataset),
            None => Err(ConfigError::NoDataset),
        }
    }
}

impl RemoteConfig {
    pub fn commit_message(&self, dataset: &str, now: DateTime<Utc>) -> String {
        self.commit_message
            .replace("{dataset}", dataset)
            .replace("{timestamp}", &now.to_rfc3339())
    }
}

/// Repository path for a local dataset path, `/`-separated without `.` parts.
pub fn repository_path(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
