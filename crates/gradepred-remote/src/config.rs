//! Configuration and predictor factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use gradepred_core::traits::RemotePredictor;
use gradepred_core::PredictionService;

use crate::http::{
    HttpPredictor, DEFAULT_HEALTH_RETRIES, DEFAULT_HEALTH_TIMEOUT_SECS, DEFAULT_RETRY_DELAY_MS,
    DEFAULT_TIMEOUT_SECS,
};

/// Environment variable that overrides `[remote] base_url`.
pub const API_URL_ENV: &str = "GRADEPRED_API_URL";

/// Connection settings for the remote prediction backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL the endpoint paths (`/predict`, `/health`, ...) are appended to.
    pub base_url: String,
    /// Bound on a single prediction call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_health_timeout_secs")]
    pub health_timeout_secs: u64,
    /// Health checks that cannot reach the backend are repeated this often.
    #[serde(default = "default_health_retries")]
    pub health_retries: u32,
    /// Retry `n` waits `n * retry_delay_ms`.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl RemoteConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: default_timeout_secs(),
            health_timeout_secs: default_health_timeout_secs(),
            health_retries: default_health_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_health_timeout_secs() -> u64 {
    DEFAULT_HEALTH_TIMEOUT_SECS
}
fn default_health_retries() -> u32 {
    DEFAULT_HEALTH_RETRIES
}
fn default_retry_delay_ms() -> u64 {
    DEFAULT_RETRY_DELAY_MS
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("./gradepred-data")
}

/// Top-level gradepred configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradepredConfig {
    /// Directory the student data and prediction history are stored in.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Remote predictor; predictions are computed locally when absent.
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
}

impl Default for GradepredConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            remote: None,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `gradepred.toml` in the current directory
/// 2. `~/.config/gradepred/config.toml`
///
/// `GRADEPRED_API_URL` overrides (or supplies) the remote base URL.
pub fn load_config() -> Result<GradepredConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<GradepredConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("gradepred.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<GradepredConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => GradepredConfig::default(),
    };

    apply_overrides(&mut config, std::env::var(API_URL_ENV).ok());
    Ok(config)
}

fn apply_overrides(config: &mut GradepredConfig, api_url: Option<String>) {
    if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
        match config.remote.as_mut() {
            Some(remote) => remote.base_url = url,
            None => config.remote = Some(RemoteConfig::new(url)),
        }
    }

    if let Some(remote) = config.remote.as_mut() {
        remote.base_url = resolve_env_vars(&remote.base_url);
    }
    config.data_dir = PathBuf::from(resolve_env_vars(&config.data_dir.to_string_lossy()));
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("gradepred"))
}

/// Create a remote predictor from its configuration.
pub fn create_predictor(config: &RemoteConfig) -> Result<Arc<dyn RemotePredictor>> {
    let predictor =
        HttpPredictor::with_timeouts(&config.base_url, config.timeout(), config.health_timeout())
            .with_context(|| format!("invalid remote predictor at {}", config.base_url))?
            .with_health_retries(config.health_retries, config.retry_delay());
    Ok(Arc::new(predictor))
}

/// Build the prediction service described by `config`.
///
/// Without a `[remote]` section every prediction uses the local heuristic.
pub fn prediction_service(config: &GradepredConfig) -> Result<PredictionService> {
    match &config.remote {
        Some(remote) => Ok(PredictionService::new(create_predictor(remote)?)
            .with_timeout(remote.timeout())),
        None => Ok(PredictionService::offline()),
    }
}
