// src/models/api.rs
//
// Canvas REST payloads. Canvas omits or nulls many fields depending on role
// and course settings, so nearly everything defaults.

use crate::constants;
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

// --- Courses ---

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Course {
    pub id: u64,
    pub name: String,
    pub course_code: Option<String>,
    pub workflow_state: Option<String>,
    pub account_id: Option<u64>,
    pub uuid: Option<String>,
    pub enrollment_term_id: Option<u64>,
    pub default_view: Option<String>,
    pub start_at: Option<DateTime<FixedOffset>>,
    pub end_at: Option<DateTime<FixedOffset>>,
    pub created_at: Option<DateTime<FixedOffset>>,
    pub access_restricted_by_date: bool,
}

// --- Modules ---

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Module {
    pub id: u64,
    pub name: String,
    pub position: Option<u32>,
    pub state: Option<String>,
    pub items_count: Option<u32>,
    pub items_url: String,
    pub published: Option<bool>,
    pub require_sequential_progress: Option<bool>,
    pub completed_at: Option<DateTime<FixedOffset>>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ModuleItem {
    pub id: u64,
    pub title: String,
    pub position: Option<u32>,
    pub indent: Option<u32>,
    #[serde(rename = "type")]
    pub kind: String,
    pub module_id: Option<u64>,
    pub html_url: Option<String>,
    pub content_id: Option<u64>,
    pub url: Option<String>,
    pub external_url: Option<String>,
}

impl ModuleItem {
    pub fn api_url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }

    pub fn is_quiz(&self) -> bool {
        self.api_url()
            .is_some_and(|u| u.contains(constants::api::url_markers::QUIZ))
    }

    pub fn is_page(&self) -> bool {
        self.api_url()
            .is_some_and(|u| u.contains(constants::api::url_markers::PAGE))
    }
}

// --- Pages ---

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Page {
    pub title: String,
    pub url: Option<String>,
    pub page_id: Option<u64>,
    pub html_url: Option<String>,
    pub body: Option<String>,
    pub published: Option<bool>,
    pub front_page: bool,
    pub locked_for_user: bool,
    pub created_at: Option<DateTime<FixedOffset>>,
    pub updated_at: Option<DateTime<FixedOffset>>,
}

// --- Files ---

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct CanvasFile {
    pub id: u64,
    pub uuid: Option<String>,
    pub folder_id: Option<u64>,
    pub display_name: String,
    pub filename: String,
    #[serde(rename = "content-type")]
    pub content_type: Option<String>,
    pub url: Option<String>,
    pub size: Option<u64>,
    pub created_at: Option<DateTime<FixedOffset>>,
    pub updated_at: Option<DateTime<FixedOffset>>,
    pub modified_at: Option<DateTime<FixedOffset>>,
    pub locked: bool,
    pub hidden: bool,
    pub locked_for_user: bool,
    pub mime_class: Option<String>,
}

impl CanvasFile {
    pub fn download_url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }

    /// Name the file is stored under: `filename`, falling back to the display name.
    pub fn local_name(&self) -> String {
        if !self.filename.trim().is_empty() {
            self.filename.clone()
        } else {
            self.display_name.clone()
        }
    }

    /// Canvas file records always carry a name. Other objects (discussions,
    /// tool launches) decode into a nameless record and are not files.
    pub fn is_file_record(&self) -> bool {
        !self.filename.trim().is_empty() || !self.display_name.trim().is_empty()
    }
}

// --- Error envelope ---

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ApiErrorMessage {
    pub message: String,
}

/// Body Canvas sends instead of the requested resource, e.g.
/// `{"status":"unauthorized","errors":[{"message":"user not authorized to perform that action"}]}`.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct StatusEnvelope {
    pub status: Option<String>,
    pub errors: Vec<ApiErrorMessage>,
    pub message: Option<String>,
}

impl StatusEnvelope {
    pub fn is_unauthorized(&self) -> bool {
        self.status.as_deref().is_some_and(|s| {
            constants::api::status::UNAUTHORIZED
                .iter()
                .any(|u| s.eq_ignore_ascii_case(u))
        })
    }

    pub fn describe(&self) -> String {
        let mut parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| e.message.clone())
            .filter(|m| !m.is_empty())
            .collect();
        if let Some(message) = self.message.as_ref().filter(|m| !m.is_empty()) {
            parts.push(message.clone());
        }
        if parts.is_empty() {
            self.status.clone().unwrap_or_else(|| "unknown error".to_string())
        } else {
            parts.join("; ")
        }
    }
}
