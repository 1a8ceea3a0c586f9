//! Client configuration.
//!
//! Every field is optional at each layer; layers are merged with
//! [`ClientConfig::merge`] (CLI flags over environment over file) and the
//! result is validated and defaulted by [`ClientConfig::resolve`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::controller::{ControllerOptions, DEFAULT_REFRESH_INTERVAL};
use crate::remote::{HttpRemoteSource, DEFAULT_ENDPOINT_URL, DEFAULT_REQUEST_TIMEOUT};
use crate::util::{is_http_url, normalize_text_option};
use crate::{Error, Result};

const APP_DIR: &str = "listsync";
const CONFIG_FILE: &str = "config.json";
const DB_FILE: &str = "listsync.db";

pub const ENV_ENDPOINT_URL: &str = "LISTSYNC_ENDPOINT_URL";
pub const ENV_REFRESH_INTERVAL_SECS: &str = "LISTSYNC_REFRESH_INTERVAL_SECS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "LISTSYNC_REQUEST_TIMEOUT_SECS";
pub const ENV_DB_PATH: &str = "LISTSYNC_DB_PATH";

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    #[serde(default)]
    pub endpoint_url: Option<String>,
    #[serde(default)]
    pub refresh_interval_secs: Option<u64>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

/// Validated configuration with defaults filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub endpoint_url: String,
    pub refresh_interval: Duration,
    pub request_timeout: Duration,
    pub db_path: PathBuf,
}

impl ClientConfig {
    /// Read the `LISTSYNC_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a layer from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let text = |key: &str| normalize_text_option(lookup(key));
        Ok(Self {
            endpoint_url: text(ENV_ENDPOINT_URL),
            refresh_interval_secs: text(ENV_REFRESH_INTERVAL_SECS)
                .map(|raw| parse_secs(ENV_REFRESH_INTERVAL_SECS, &raw))
                .transpose()?,
            request_timeout_secs: text(ENV_REQUEST_TIMEOUT_SECS)
                .map(|raw| parse_secs(ENV_REQUEST_TIMEOUT_SECS, &raw))
                .transpose()?,
            db_path: text(ENV_DB_PATH).map(PathBuf::from),
        })
    }

    /// Field-wise merge; values present in `self` win over `fallback`.
    #[must_use]
    pub fn merge(self, fallback: Self) -> Self {
        Self {
            endpoint_url: normalize_text_option(self.endpoint_url)
                .or_else(|| normalize_text_option(fallback.endpoint_url)),
            refresh_interval_secs: self.refresh_interval_secs.or(fallback.refresh_interval_secs),
            request_timeout_secs: self.request_timeout_secs.or(fallback.request_timeout_secs),
            db_path: self.db_path.or(fallback.db_path),
        }
    }

    pub fn resolve(self) -> Result<ResolvedConfig> {
        let endpoint_url = normalize_text_option(self.endpoint_url)
            .unwrap_or_else(|| DEFAULT_ENDPOINT_URL.to_string());
        if !is_http_url(&endpoint_url) {
            return Err(Error::InvalidInput(format!(
                "endpoint_url must include http:// or https://, got {endpoint_url}"
            )));
        }

        let refresh_interval = self
            .refresh_interval_secs
            .map_or(Ok(DEFAULT_REFRESH_INTERVAL), |secs| {
                non_zero_secs("refresh_interval_secs", secs)
            })?;
        let request_timeout = self
            .request_timeout_secs
            .map_or(Ok(DEFAULT_REQUEST_TIMEOUT), |secs| {
                non_zero_secs("request_timeout_secs", secs)
            })?;

        Ok(ResolvedConfig {
            endpoint_url,
            refresh_interval,
            request_timeout,
            db_path: self.db_path.unwrap_or_else(default_db_path),
        })
    }
}

impl ResolvedConfig {
    pub fn remote_source(&self) -> Result<HttpRemoteSource> {
        Ok(HttpRemoteSource::new(
            self.endpoint_url.clone(),
            self.request_timeout,
        )?)
    }

    pub fn controller_options(&self) -> Result<ControllerOptions> {
        ControllerOptions::with_refresh_interval(self.refresh_interval)
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<u64> {
    raw.parse::<u64>().map_err(|_| {
        Error::InvalidInput(format!("{key} must be a whole number of seconds, got {raw}"))
    })
}

fn non_zero_secs(field: &str, secs: u64) -> Result<Duration> {
    if secs == 0 {
        Err(Error::InvalidInput(format!("{field} must be greater than zero")))
    } else {
        Ok(Duration::from_secs(secs))
    }
}

fn app_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::data_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

pub fn default_config_path() -> PathBuf {
    app_data_dir().join(CONFIG_FILE)
}

pub fn default_db_path() -> PathBuf {
    app_data_dir().join(DB_FILE)
}

/// Load the config file. A missing file yields defaults; an unreadable or
/// unparsable one is logged and ignored.
pub fn load_from_path(path: &Path) -> ClientConfig {
    if !path.exists() {
        return ClientConfig::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<ClientConfig>(&content) {
            Ok(config) => config,
            Err(error) => {
                tracing::warn!("Failed to parse config at {}: {}", path.display(), error);
                ClientConfig::default()
            }
        },
        Err(error) => {
            tracing::warn!("Failed to read config at {}: {}", path.display(), error);
            ClientConfig::default()
        }
    }
}
