// src/error.rs

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("access denied for '{url}': {message}")]
    Unauthorized { url: String, message: String },
    #[error("network request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("network middleware error: {0}")]
    NetworkMiddleware(#[from] reqwest_middleware::Error),
    #[error("API request to '{url}' returned {status}: {message}")]
    Api {
        url: String,
        status: StatusCode,
        message: String,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to persist temporary file: {0}")]
    TempFilePersist(#[from] tempfile::PersistError),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not parse API response from '{url}': {source}")]
    ApiParseFailed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("course '{course}' does not use the modules page")]
    NoModules { course: String },
    #[error("course '{course}' does not seem to have any files publicly available")]
    NoFiles { course: String },
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("security error: {0}")]
    Security(String),
    #[error("interrupted by user")]
    UserInterrupt,
    #[error("unknown error: {0}")]
    Other(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;
