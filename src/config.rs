// src/config.rs

pub mod ignore;
pub mod token;

use self::token::load_or_create_external_config;
use crate::{
    cli::Cli,
    constants,
    error::{AppError, AppResult},
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf, time::Duration};
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub connect_timeout_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
}

/// Contents of `~/.canvas-dl/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accesstoken: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default)]
    pub network: NetworkConfig,
}

impl ExternalConfig {
    pub(crate) fn default_app_config() -> Self {
        let network_config = NetworkConfig {
            connect_timeout_secs: Some(10),
            timeout_secs: Some(300),
            max_retries: Some(3),
        };

        Self {
            accesstoken: None,
            base_url: Some(constants::DEFAULT_BASE_URL.to_string()),
            network: network_config,
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub base_url: Url,
    pub output_dir: PathBuf,
    pub force_redownload: bool,
    pub max_workers: usize,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub max_retries: u32,
    /// `accesstoken` from the config file, the last resort for the token.
    pub config_token: Option<String>,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("base_url", &self.base_url)
            .field("output_dir", &self.output_dir)
            .field("force_redownload", &self.force_redownload)
            .field("max_workers", &self.max_workers)
            .field("user_agent", &self.user_agent)
            .field("connect_timeout", &self.connect_timeout)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("config_token", &self.config_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl AppConfig {
    pub fn new(args: &Cli) -> AppResult<Self> {
        let external_config = load_or_create_external_config()?;

        let base_url_source = args
            .base_url
            .clone()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| {
                std::env::var(constants::BASE_URL_ENV_VAR)
                    .ok()
                    .filter(|s| !s.trim().is_empty())
            })
            .or(external_config.base_url)
            .unwrap_or_else(|| constants::DEFAULT_BASE_URL.to_string());
        let base_url = parse_base_url(&base_url_source)?;
        debug!("Using Canvas base URL {}", base_url);

        let (output_dir, force_redownload) = match args.download_args() {
            Some(download) => (download.output.clone(), download.force),
            None => (PathBuf::from(constants::DEFAULT_SAVE_DIR), false),
        };

        Ok(Self {
            base_url,
            output_dir,
            force_redownload,
            max_workers: args.workers.unwrap_or(constants::DEFAULT_WORKERS).max(1),
            user_agent: constants::USER_AGENT.into(),
            connect_timeout: Duration::from_secs(
                external_config.network.connect_timeout_secs.unwrap_or(10),
            ),
            timeout: Duration::from_secs(external_config.network.timeout_secs.unwrap_or(300)),
            max_retries: external_config.network.max_retries.unwrap_or(3),
            config_token: external_config.accesstoken,
        })
    }
}

/// Accepts a bare host (`canvas.example.ac.uk`) or a full URL; bare hosts get `https://`.
pub fn parse_base_url(raw: &str) -> AppResult<Url> {
    let trimmed = raw.trim().trim_end_matches('/');
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };
    let mut url = Url::parse(&candidate)?;
    if url.host_str().is_none() {
        return Err(AppError::Config(format!("base URL '{}' has no host", raw)));
    }
    // API paths are joined relative to the base, which needs a trailing slash.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(feature = "testing")]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://127.0.0.1").expect("static URL"),
            output_dir: PathBuf::from(constants::DEFAULT_SAVE_DIR),
            force_redownload: false,
            max_workers: 2,
            user_agent: "test-agent/1.0".to_string(),
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(15),
            max_retries: 0,
            config_token: None,
        }
    }
}
