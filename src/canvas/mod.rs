// src/canvas/mod.rs

pub mod courses;
mod files;
mod modules;
pub mod pagination;
pub mod resolver;

pub use courses::filter_courses;
pub use resolver::extract_file_links;

use crate::{
    client::RobustClient,
    config::AppConfig,
    error::*,
    models::{Course, StatusEnvelope},
    requester::Requester,
    utils,
};
use log::{debug, trace};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::{fs, path::PathBuf, sync::Arc};
use url::Url;

/// Typed access to the Canvas endpoints the scraper walks.
#[derive(Clone)]
pub struct CanvasApi {
    http_client: Arc<RobustClient>,
    requester: Arc<Requester>,
    config: Arc<AppConfig>,
}

impl CanvasApi {
    pub fn new(
        http_client: Arc<RobustClient>,
        requester: Arc<Requester>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            http_client,
            requester,
            config,
        }
    }

    pub fn requester(&self) -> &Requester {
        &self.requester
    }

    /// Creates the course's output directory; an existing one is fine.
    pub fn ensure_course_dir(&self, course: &Course) -> AppResult<PathBuf> {
        let dir = utils::course_dir(&self.config.output_dir, course)?;
        fs::create_dir_all(&dir)?;
        debug!("Course directory ready: {}", dir.display());
        Ok(dir)
    }

    /// GETs a single JSON object.
    pub(crate) async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> AppResult<T> {
        let url = Url::parse(url)?;
        let res = self
            .http_client
            .send(url.clone(), &self.requester.headers)
            .await?;
        let status = res.status();
        let body = res.bytes().await?;
        decode_response(url.as_str(), status, &body)
    }
}

/// Decodes a Canvas response body.
///
/// Non-success statuses and successful bodies of the wrong shape are
/// classified through the Canvas error envelope: an `unauthorized` status
/// becomes [`AppError::Unauthorized`], other envelopes [`AppError::Api`], and
/// anything unrecognisable [`AppError::ApiParseFailed`].
pub fn decode_response<T: DeserializeOwned>(
    url: &str,
    status: StatusCode,
    body: &[u8],
) -> AppResult<T> {
    let envelope = || serde_json::from_slice::<StatusEnvelope>(body).ok();

    if !status.is_success() {
        let envelope = envelope();
        let message = envelope
            .as_ref()
            .map(StatusEnvelope::describe)
            .unwrap_or_else(|| String::from_utf8_lossy(body).chars().take(200).collect());
        let unauthorized = matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
            || envelope.as_ref().is_some_and(StatusEnvelope::is_unauthorized);
        return Err(if unauthorized {
            AppError::Unauthorized {
                url: url.to_string(),
                message,
            }
        } else {
            AppError::Api {
                url: url.to_string(),
                status,
                message,
            }
        });
    }

    match serde_json::from_slice::<T>(body) {
        Ok(value) => Ok(value),
        Err(source) => {
            trace!("Undecodable body from {}: {}", url, String::from_utf8_lossy(body));
            match envelope() {
                Some(env) if env.is_unauthorized() => Err(AppError::Unauthorized {
                    url: url.to_string(),
                    message: env.describe(),
                }),
                _ => Err(AppError::ApiParseFailed {
                    url: url.to_string(),
                    source,
                }),
            }
        }
    }
}
