// src/canvas/resolver.rs

use super::CanvasApi;
use crate::{
    constants::api::url_markers,
    error::*,
    models::{CanvasFile, ModuleItem, Page},
};
use itertools::Itertools;
use log::{debug, info, warn};
use regex::Regex;
use std::sync::LazyLock;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"https?://(www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b([-a-zA-Z0-9()@:%_+.~#?&/=]*)",
    )
    .unwrap()
});

/// Finds file API links embedded in a page body.
///
/// The body is split on whitespace; a token qualifies when it mentions `host`
/// and contains both `files` and `api`. The bare URL is cut out of the token
/// (attribute quotes, markup) and duplicates are dropped, first occurrence wins.
pub fn extract_file_links(body: &str, host: &str) -> Vec<String> {
    if host.is_empty() {
        return Vec::new();
    }
    body.split_whitespace()
        .filter(|token| token.contains(host))
        .filter(|token| token.contains(url_markers::FILES) && token.contains(url_markers::API))
        .map(|token| token.replace("&amp;", "&"))
        .filter_map(|token| URL_RE.find(&token).map(|m| m.as_str().to_string()))
        .filter(|url| url.contains(host))
        .unique()
        .collect()
}

/// Files an item resolved to, plus the links that could not be fetched.
/// A page keeps every file it could resolve even when some of its links fail.
#[derive(Debug, Default)]
pub struct Resolution {
    pub files: Vec<CanvasFile>,
    pub failures: Vec<(String, AppError)>,
}

impl Resolution {
    fn push_record(&mut self, url: &str, file: CanvasFile) {
        if file.is_file_record() {
            self.files.push(file);
        } else {
            debug!("{} is not a file record, skipping", url);
        }
    }
}

impl CanvasApi {
    /// Resolves a module item into the files it stands for.
    ///
    /// Quizzes and URL-less items resolve to nothing, pages to the files they
    /// link, and anything else to the file record behind its URL. Records
    /// without a name (discussions, assignments, tool launches) are dropped.
    pub async fn resolve_item(&self, item: &ModuleItem) -> AppResult<Resolution> {
        let mut resolution = Resolution::default();
        let Some(url) = item.api_url() else {
            debug!("Item '{}' ({}) has no API URL, skipping", item.title, item.kind);
            return Ok(resolution);
        };
        if item.is_quiz() {
            debug!("Item '{}' is a quiz, skipping", item.title);
            return Ok(resolution);
        }
        if item.is_page() {
            return self.resolve_page(url).await;
        }
        let file = self.fetch_file(url).await?;
        resolution.push_record(url, file);
        Ok(resolution)
    }

    async fn resolve_page(&self, url: &str) -> AppResult<Resolution> {
        let page: Page = self.fetch_json(url).await?;
        let links = extract_file_links(page.body.as_deref().unwrap_or_default(), self.requester.host());
        let mut resolution = Resolution::default();
        if links.is_empty() {
            debug!("Page '{}' embeds no files", page.title);
            return Ok(resolution);
        }
        info!("Page '{}' embeds {} file links", page.title, links.len());

        for link in links {
            match self.fetch_file(&link).await {
                Ok(file) => resolution.push_record(&link, file),
                Err(e) => {
                    warn!("Linked file {} on page '{}' failed: {}", link, page.title, e);
                    resolution.failures.push((link, e));
                }
            }
        }
        Ok(resolution)
    }
}
