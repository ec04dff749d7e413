// src/requester.rs

use crate::{
    config::AppConfig,
    constants,
    error::{AppError, AppResult},
};
use log::debug;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use url::Url;

/// Everything a Canvas request needs: where to go, how to authenticate and
/// which file extensions are never fetched.
#[derive(Debug, Clone)]
pub struct Requester {
    pub base_url: Url,
    pub headers: HeaderMap,
    pub ignore_extensions: Vec<String>,
}

impl Requester {
    pub fn new(base_url: Url, token: Option<&str>, ignore_extensions: Vec<String>) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| AppError::Config("access token contains invalid characters".into()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Ok(Self {
            base_url,
            headers,
            ignore_extensions,
        })
    }

    pub fn from_config(
        config: &AppConfig,
        token: Option<&str>,
        ignore_extensions: Vec<String>,
    ) -> AppResult<Self> {
        let requester = Self::new(config.base_url.clone(), token, ignore_extensions)?;
        debug!(
            "Requester for {} (authorized: {}, ignoring: {:?})",
            requester.base_url,
            requester.is_authorized(),
            requester.ignore_extensions
        );
        Ok(requester)
    }

    pub fn is_authorized(&self) -> bool {
        self.headers.contains_key(AUTHORIZATION)
    }

    /// Host the page scanner looks for in embedded links.
    pub fn host(&self) -> &str {
        self.base_url.host_str().unwrap_or_default()
    }

    pub fn courses_url(&self) -> AppResult<Url> {
        let mut url = self.base_url.join(constants::api::COURSES_PATH)?;
        url.query_pairs_mut()
            .append_pair("per_page", constants::api::PER_PAGE);
        Ok(url)
    }

    /// `{base}/api/v1/courses/{id}/{endpoint}?per_page=...`
    pub fn course_endpoint_url(&self, course_id: u64, endpoint: &str) -> AppResult<Url> {
        let mut url = self.base_url.join(&format!(
            "{}/{}/{}",
            constants::api::COURSES_PATH,
            course_id,
            endpoint
        ))?;
        url.query_pairs_mut()
            .append_pair("per_page", constants::api::PER_PAGE);
        Ok(url)
    }

    pub fn is_ignored_extension(&self, extension: &str) -> bool {
        self.ignore_extensions
            .iter()
            .any(|ignored| ignored.eq_ignore_ascii_case(extension))
    }
}
