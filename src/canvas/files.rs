// src/canvas/files.rs

use super::CanvasApi;
use crate::{
    constants,
    error::*,
    models::{CanvasFile, Course},
};
use log::{debug, info};

impl CanvasApi {
    /// Lists every file of a course directly, the fallback for courses without modules.
    /// Both an empty listing and an access-denied answer mean [`AppError::NoFiles`].
    pub async fn list_course_files(&self, course: &Course) -> AppResult<Vec<CanvasFile>> {
        info!("Looking for files in course '{}'", course.name);
        self.ensure_course_dir(course)?;
        let url = self
            .requester
            .course_endpoint_url(course.id, constants::api::endpoints::FILES)?;

        let files: Vec<CanvasFile> = match self.fetch_collection(url).await {
            Ok(files) => files,
            Err(AppError::Unauthorized { url, message }) => {
                debug!("Files of '{}' not accessible ({}): {}", course.name, url, message);
                return Err(AppError::NoFiles {
                    course: course.name.clone(),
                });
            }
            Err(e) => return Err(e),
        };

        if files.is_empty() {
            return Err(AppError::NoFiles {
                course: course.name.clone(),
            });
        }
        debug!("Course '{}' lists {} files", course.name, files.len());
        Ok(files)
    }

    /// Fetches one file record from its API URL.
    pub async fn fetch_file(&self, url: &str) -> AppResult<CanvasFile> {
        let file: CanvasFile = self.fetch_json(url).await?;
        debug!("Resolved file '{}' from {}", file.display_name, url);
        Ok(file)
    }
}
