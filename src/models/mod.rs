// src/models/mod.rs

pub mod api;

use crate::error::AppError;
use crate::symbols;
use colored::{ColoredString, Colorize};
use std::path::PathBuf;

pub use api::{CanvasFile, Course, Module, ModuleItem, Page, StatusEnvelope};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DownloadStatus {
    Success,
    Skipped,
    HttpError,
    NetworkError,
    ConnectionError,
    TimeoutError,
    AuthError,
    IoError,
    ValidationError,
    UnexpectedError,
}

impl DownloadStatus {
    pub fn get_display_info(
        &self,
    ) -> (
        &'static ColoredString,
        fn(ColoredString) -> ColoredString,
        &'static str,
    ) {
        match self {
            DownloadStatus::Success => (&symbols::OK, |s| s.green(), "downloaded"),
            DownloadStatus::Skipped => (&symbols::SKIP, |s| s.cyan(), "skipped"),
            DownloadStatus::HttpError => (&symbols::ERROR, |s| s.red(), "server returned an error"),
            DownloadStatus::NetworkError => (&symbols::ERROR, |s| s.red(), "network request failed"),
            DownloadStatus::ConnectionError => (&symbols::ERROR, |s| s.red(), "could not connect"),
            DownloadStatus::TimeoutError => (&symbols::WARN, |s| s.yellow(), "request timed out"),
            DownloadStatus::AuthError => (&symbols::ERROR, |s| s.red(), "access denied"),
            DownloadStatus::IoError => (&symbols::ERROR, |s| s.red(), "local file error"),
            DownloadStatus::ValidationError => (&symbols::ERROR, |s| s.red(), "nothing to download"),
            DownloadStatus::UnexpectedError => {
                (&symbols::ERROR, |s| s.red(), "unexpected error")
            }
        }
    }
}

impl From<&AppError> for DownloadStatus {
    fn from(error: &AppError) -> Self {
        match error {
            AppError::Unauthorized { .. } => DownloadStatus::AuthError,
            AppError::Network(err)
            | AppError::NetworkMiddleware(reqwest_middleware::Error::Reqwest(err)) => {
                if err.is_timeout() {
                    DownloadStatus::TimeoutError
                } else if err.is_connect() {
                    DownloadStatus::ConnectionError
                } else if err.is_status() {
                    DownloadStatus::HttpError
                } else {
                    DownloadStatus::NetworkError
                }
            }
            AppError::NetworkMiddleware(_) => DownloadStatus::NetworkError,
            AppError::Api { .. } => DownloadStatus::HttpError,
            AppError::Io(_) | AppError::TempFilePersist(_) | AppError::Security(_) => {
                DownloadStatus::IoError
            }
            AppError::Validation(_) => DownloadStatus::ValidationError,
            _ => DownloadStatus::UnexpectedError,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DownloadResult {
    pub filename: String,
    pub status: DownloadStatus,
    pub message: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum DownloadAction {
    Skip(String),
    DownloadNew,
}

/// A resolved Canvas file together with where it lands on disk.
#[derive(Debug, Clone)]
pub struct FileTask {
    pub course_name: String,
    pub file: CanvasFile,
    pub filepath: PathBuf,
}

impl FileTask {
    pub fn display_name(&self) -> String {
        self.filepath
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file.local_name())
    }
}
