// src/config/ignore.rs

use crate::{
    constants,
    error::{AppError, AppResult},
};
use log::{info, warn};
use std::{fs, path::Path};

/// Parses an ignore list: one extension per line, an optional leading dot is dropped.
pub fn parse_ignore_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim().trim_start_matches('.').to_string())
        .filter(|ext| !ext.is_empty())
        .collect()
}

/// Loads the ignore list. An explicitly given file must be readable; a missing
/// default `.scrapeignore` means nothing is ignored.
pub fn load_ignore_list(explicit: Option<&Path>) -> AppResult<Vec<String>> {
    let (path, is_explicit) = match explicit {
        Some(path) => (path, true),
        None => (Path::new(constants::DEFAULT_IGNORE_FILE), false),
    };

    match fs::read_to_string(path) {
        Ok(content) => {
            let list = parse_ignore_list(&content);
            info!("Loaded {} ignored extensions from '{}'", list.len(), path.display());
            Ok(list)
        }
        Err(e) if !is_explicit && e.kind() == std::io::ErrorKind::NotFound => {
            info!("No '{}' found, no extension is ignored", path.display());
            Ok(Vec::new())
        }
        Err(e) => {
            warn!("Could not read ignore file '{}': {}", path.display(), e);
            Err(AppError::Config(format!(
                "could not read ignore file '{}': {}",
                path.display(),
                e
            )))
        }
    }
}

/// Reads course filters from a requirements file, one course name per line.
pub fn load_requirements(path: &Path) -> AppResult<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| {
        AppError::Config(format!(
            "could not read requirements file '{}': {}",
            path.display(),
            e
        ))
    })?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
