// src/canvas/courses.rs

use super::CanvasApi;
use crate::{error::*, models::Course, utils};
use log::{debug, info};

/// Keeps the courses whose name matches a filter, ignoring case and whitespace.
/// No filters keeps everything.
pub fn filter_courses(courses: Vec<Course>, filters: &[String]) -> Vec<Course> {
    if filters.is_empty() {
        return courses;
    }
    let keys: Vec<String> = filters.iter().map(|f| utils::match_key(f)).collect();
    courses
        .into_iter()
        .filter(|course| {
            let key = utils::match_key(&course.name);
            keys.iter().any(|k| *k == key)
        })
        .collect()
}

/// Filters that did not select any course, for reporting typos.
pub fn unmatched_filters<'a>(courses: &[Course], filters: &'a [String]) -> Vec<&'a str> {
    filters
        .iter()
        .filter(|f| {
            let key = utils::match_key(f);
            !courses.iter().any(|c| utils::match_key(&c.name) == key)
        })
        .map(String::as_str)
        .collect()
}

impl CanvasApi {
    pub async fn list_courses(&self, filters: &[String]) -> AppResult<Vec<Course>> {
        if !self.requester.is_authorized() {
            return Err(AppError::Config(
                "no access token configured, cannot authenticate".to_string(),
            ));
        }
        let url = self.requester.courses_url()?;
        info!("Discovering courses at {}", url);
        let courses: Vec<Course> = self.fetch_collection(url).await?;
        debug!("Discovered {} courses", courses.len());

        let selected = filter_courses(courses, filters);
        if !filters.is_empty() {
            info!(
                "{} courses match the filters {:?}",
                selected.len(),
                filters
            );
        }
        Ok(selected)
    }
}
