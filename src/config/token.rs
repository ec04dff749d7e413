// src/config/token.rs

use crate::{
    config::ExternalConfig,
    constants,
    error::{AppError, AppResult},
};
use anyhow::{Context, anyhow};
use log::{debug, info};
use std::{fs, path::PathBuf};

pub(super) fn get_config_path() -> AppResult<PathBuf> {
    let path = dirs::home_dir()
        .ok_or_else(|| AppError::Other(anyhow!("could not determine the home directory")))?
        .join(constants::CONFIG_DIR_NAME)
        .join(constants::CONFIG_FILE_NAME);
    Ok(path)
}

pub(crate) fn load_or_create_external_config() -> AppResult<ExternalConfig> {
    let config_path = get_config_path()?;
    if config_path.is_file() {
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read config file '{}'", config_path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file '{}'", config_path.display()))
            .map_err(AppError::from)
    } else {
        info!("Config file {:?} does not exist, writing defaults.", config_path);
        let config = ExternalConfig::default_app_config();

        if let Some(dir) = config_path.parent() {
            fs::create_dir_all(dir)?;
        }

        let json_content = serde_json::to_string_pretty(&config)?;
        fs::write(&config_path, json_content)?;

        Ok(config)
    }
}

/// Resolves the access token: command line, then `CANVAS_TOKEN`, then the
/// config file's `accesstoken` as loaded into [`crate::config::AppConfig`].
pub fn resolve_token(cli_token: Option<&str>, config_token: Option<&str>) -> (Option<String>, String) {
    let env_token = std::env::var(constants::TOKEN_ENV_VAR).ok();
    select_token(cli_token, env_token.as_deref(), config_token)
}

fn select_token(
    cli_token: Option<&str>,
    env_token: Option<&str>,
    config_token: Option<&str>,
) -> (Option<String>, String) {
    let candidates = [
        (cli_token, "command line".to_string()),
        (env_token, format!("environment ({})", constants::TOKEN_ENV_VAR)),
        (config_token, "config file".to_string()),
    ];
    for (token, source) in candidates {
        if let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) {
            debug!("Using token from {}", source);
            return (Some(token.to_string()), source);
        }
    }
    debug!("No access token found anywhere");
    (None, "nowhere".to_string())
}
