use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bundle_source::default_application_dirs;
use crate::recency::MAX_RECENT_APPS;
use crate::search::SEARCH_RESULT_LIMIT;

const APP_DIR_NAME: &str = "appswitch";
const CONFIG_FILE_NAME: &str = "config.toml";
const STORE_FILE_NAME: &str = "store.sqlite3";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_results: u16,
    pub recency_capacity: usize,
    pub bundle_scan_timeout_ms: u64,
    pub installed_cache_ttl_secs: u64,
    pub application_dirs: Vec<PathBuf>,
    pub store_path: PathBuf,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let base = stable_app_data_dir();
        Self {
            max_results: SEARCH_RESULT_LIMIT as u16,
            recency_capacity: MAX_RECENT_APPS,
            bundle_scan_timeout_ms: 50,
            installed_cache_ttl_secs: 180,
            application_dirs: default_application_dirs(),
            store_path: base.join(STORE_FILE_NAME),
            config_path: base.join(CONFIG_FILE_NAME),
        }
    }
}

pub fn stable_app_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

pub fn validate(cfg: &Config) -> Result<(), String> {
    if cfg.max_results == 0 || cfg.max_results > 50 {
        return Err("max_results must be between 1 and 50".into());
    }

    if cfg.recency_capacity == 0 || cfg.recency_capacity > 200 {
        return Err("recency_capacity must be between 1 and 200".into());
    }

    if cfg.bundle_scan_timeout_ms == 0 || cfg.bundle_scan_timeout_ms > 10_000 {
        return Err("bundle_scan_timeout_ms must be between 1 and 10000".into());
    }

    if cfg.installed_cache_ttl_secs == 0 || cfg.installed_cache_ttl_secs > 86_400 {
        return Err("installed_cache_ttl_secs must be between 1 and 86400".into());
    }

    if cfg.application_dirs.is_empty() {
        return Err("application_dirs must list at least one directory".into());
    }

    if cfg.store_path.as_os_str().is_empty() {
        return Err("store_path is required".into());
    }

    Ok(())
}

/// Loads `path` (or the default location). A missing file yields defaults.
///
/// `.json` and `.json5` files are read as JSON5; everything else as TOML.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Config::default().config_path);

    let mut config = if config_path.exists() {
        let raw = std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
            path: config_path.clone(),
            source,
        })?;
        parse(&config_path, &raw)?
    } else {
        Config::default()
    };

    config.config_path = config_path;
    validate(&config).map_err(ConfigError::Invalid)?;
    Ok(config)
}

pub fn save(cfg: &Config) -> Result<(), ConfigError> {
    let encoded = toml::to_string_pretty(cfg)?;
    if let Some(parent) = cfg.config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(&cfg.config_path, encoded).map_err(|source| ConfigError::Write {
        path: cfg.config_path.clone(),
        source,
    })
}

fn parse(path: &Path, raw: &str) -> Result<Config, ConfigError> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json") || ext.eq_ignore_ascii_case("json5"));

    let parsed = if is_json {
        json5::from_str::<Config>(raw).map_err(|error| error.to_string())
    } else {
        toml::from_str::<Config>(raw).map_err(|error| error.to_string())
    };

    parsed.map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    })
}
