// src/utils.rs

use crate::{
    error::*,
    models::{CanvasFile, Course},
};
use std::path::{Component, Path, PathBuf};

/// Removes every space, the transformation applied to directory and file names.
pub fn strip_spaces(name: &str) -> String {
    name.replace(' ', "")
}

/// Key used to compare course names with user filters.
pub fn match_key(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// Substring after the final `.` of the file name, if any.
pub fn extension_of(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    let (_, ext) = name.rsplit_once('.')?;
    (!ext.is_empty()).then(|| ext.to_string())
}

pub fn course_dir_name(course: &Course) -> String {
    let stripped = strip_spaces(course.name.trim());
    if stripped.is_empty() {
        format!("course-{}", course.id)
    } else {
        stripped
    }
}

/// `<output_root>/<course name without spaces>`
pub fn course_dir(output_root: &Path, course: &Course) -> AppResult<PathBuf> {
    secure_join_path(output_root, Path::new(&course_dir_name(course)))
}

/// `<output_root>/<course name without spaces>/<file name without spaces>`
pub fn target_path(output_root: &Path, course: &Course, file: &CanvasFile) -> AppResult<PathBuf> {
    let dir = course_dir(output_root, course)?;
    let name = strip_spaces(&file.local_name());
    let joined = secure_join_path(&dir, Path::new(&name))?;
    if joined == dir {
        return Err(AppError::Security(format!(
            "file name '{}' does not name a file",
            file.local_name()
        )));
    }
    Ok(joined)
}

/// Joins server-supplied names lexically, refusing anything that climbs out of `base_dir`.
pub fn secure_join_path(base_dir: &Path, relative_path: &Path) -> AppResult<PathBuf> {
    let mut final_path = base_dir.to_path_buf();
    for component in relative_path.components() {
        match component {
            Component::Normal(part) => final_path.push(part),
            Component::ParentDir => {
                return Err(AppError::Security(format!(
                    "path traversal detected in '{}'",
                    relative_path.display()
                )));
            }
            _ => continue,
        }
    }
    if !final_path.starts_with(base_dir) {
        return Err(AppError::Security(format!(
            "path traversal detected in '{}'",
            relative_path.display()
        )));
    }
    Ok(final_path)
}

pub fn truncate_text(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut end_pos = 0;
    for (i, c) in text.char_indices() {
        width += if c.is_ascii() { 1 } else { 2 };
        if width > max_width.saturating_sub(3) {
            end_pos = i;
            break;
        }
    }
    if end_pos == 0 { text.to_string() } else { format!("{}...", &text[..end_pos]) }
}
