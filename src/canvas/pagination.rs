// src/canvas/pagination.rs

use super::{CanvasApi, decode_response};
use crate::{constants, error::*};
use log::{debug, warn};
use regex::Regex;
use reqwest::header::LINK;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;
use url::Url;

static NEXT_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<([^>]+)>\s*;\s*rel\s*=\s*"?next"?"#).unwrap());

/// Extracts the `rel="next"` target of a `Link` header.
pub fn parse_next_link(header: &str) -> Option<String> {
    header
        .split(',')
        .find_map(|part| NEXT_LINK_RE.captures(part.trim()))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

impl CanvasApi {
    /// GETs a collection endpoint and follows `Link` pagination until exhausted.
    pub(crate) async fn fetch_collection<T: DeserializeOwned>(&self, url: Url) -> AppResult<Vec<T>> {
        let mut items = Vec::new();
        let mut visited = Vec::new();
        let mut next = Some(url);

        while let Some(page_url) = next.take() {
            if visited.contains(&page_url) {
                warn!("Pagination loop detected at {}, stopping", page_url);
                break;
            }
            if visited.len() >= constants::api::MAX_PAGES {
                warn!("Stopped after {} pages of {}", visited.len(), visited[0]);
                break;
            }

            let res = self
                .http_client
                .send(page_url.clone(), &self.requester.headers)
                .await?;
            let status = res.status();
            next = res
                .headers()
                .get(LINK)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_next_link)
                .and_then(|link| page_url.join(&link).ok());
            let body = res.bytes().await?;

            let page: Vec<T> = decode_response(page_url.as_str(), status, &body)?;
            debug!("Fetched {} entries from {}", page.len(), page_url);
            items.extend(page);
            visited.push(page_url);
        }

        Ok(items)
    }
}
