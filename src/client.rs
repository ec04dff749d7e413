// src/client.rs

use crate::{config::AppConfig, error::*};
use reqwest::{IntoUrl, Response, StatusCode, header::HeaderMap};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::sync::Arc;

#[derive(Clone)]
pub struct RobustClient {
    pub client: ClientWithMiddleware,
}

impl RobustClient {
    pub fn new(config: Arc<AppConfig>) -> AppResult<Self> {
        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(
            reqwest::Client::builder()
                .user_agent(config.user_agent.clone())
                .connect_timeout(config.connect_timeout)
                .timeout(config.timeout)
                .pool_max_idle_per_host(config.max_workers * 3)
                .build()?,
        )
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build();

        Ok(Self { client })
    }

    /// Sends a GET and hands back the response whatever its status, so callers
    /// can inspect Canvas error bodies.
    pub async fn send<T: IntoUrl>(&self, url: T, headers: &HeaderMap) -> AppResult<Response> {
        Ok(self
            .client
            .get(url)
            .headers(headers.clone())
            .send()
            .await?)
    }

    /// Sends a GET and fails on any non-success status.
    pub async fn get<T: IntoUrl>(&self, url: T, headers: &HeaderMap) -> AppResult<Response> {
        let res = self.send(url, headers).await?;
        if matches!(res.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(AppError::Unauthorized {
                url: res.url().to_string(),
                message: res.status().to_string(),
            });
        }
        Ok(res.error_for_status()?)
    }
}
