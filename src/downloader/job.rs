// src/downloader/job.rs

use super::task_runner;
use crate::{
    ScrapeContext,
    error::*,
    models::{CanvasFile, Course, FileTask},
    symbols, ui, utils,
};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::path::PathBuf;

/// Walks one course (modules, items, files) and downloads what it finds.
pub struct CourseScraper {
    context: ScrapeContext,
}

impl CourseScraper {
    pub fn new(context: ScrapeContext) -> Self {
        Self { context }
    }

    /// Discovery failures are recorded and swallowed so the next course still
    /// runs; only an interruption is returned.
    pub async fn run(&self, course: &Course) -> AppResult<()> {
        info!("Scraping course {} '{}'", course.id, course.name);
        ui::print_sub_header(&course.name);

        let files = match self.collect_module_files(course).await {
            Ok(files) => files,
            Err(AppError::NoModules { .. }) => {
                println!(
                    "{} '{}' does not use the modules page, listing course files instead",
                    *symbols::FALLBACK,
                    course.name
                );
                match self.context.api.list_course_files(course).await {
                    Ok(files) => files,
                    Err(e @ AppError::NoFiles { .. }) => {
                        println!("{} {}", *symbols::SKIP, e);
                        self.context
                            .manager
                            .record_course_issue(&course.name, "no files available");
                        return Ok(());
                    }
                    Err(e) => return self.course_failed(course, e),
                }
            }
            Err(e) => return self.course_failed(course, e),
        };

        if self.context.is_cancelled() {
            return Err(AppError::UserInterrupt);
        }

        let tasks = self.build_tasks(course, files);
        if tasks.is_empty() {
            ui::info(&format!("Nothing to download for '{}'", course.name));
            return Ok(());
        }
        task_runner::execute_tasks(&self.context, &tasks).await
    }

    /// Modules in order, items in order, each item resolved to its files.
    async fn collect_module_files(&self, course: &Course) -> AppResult<Vec<CanvasFile>> {
        let api = &self.context.api;
        let modules = api.list_modules(course).await?;
        let mut files = Vec::new();

        for module in &modules {
            if self.context.is_cancelled() {
                return Err(AppError::UserInterrupt);
            }
            let items = match api.list_module_items(module).await {
                Ok(items) => items,
                Err(e) => {
                    self.context.manager.record_course_issue(
                        &format!("{} / {}", course.name, module.name),
                        &e.to_string(),
                    );
                    continue;
                }
            };
            for item in &items {
                let location = format!("{} / {} / {}", course.name, module.name, item.title);
                match api.resolve_item(item).await {
                    Ok(resolution) => {
                        for (link, e) in &resolution.failures {
                            self.context
                                .manager
                                .record_course_issue(&format!("{} / {}", location, link), &e.to_string());
                        }
                        files.extend(resolution.files);
                    }
                    Err(e) => self.context.manager.record_course_issue(&location, &e.to_string()),
                }
            }
        }
        debug!("Course '{}' resolved {} files from modules", course.name, files.len());
        Ok(files)
    }

    /// Maps files to their target paths. When two files land on the same path
    /// the first one wins.
    fn build_tasks(&self, course: &Course, files: Vec<CanvasFile>) -> Vec<FileTask> {
        let mut seen: HashSet<PathBuf> = HashSet::new();
        let mut tasks = Vec::with_capacity(files.len());
        for file in files {
            let filepath = match utils::target_path(&self.context.config.output_dir, course, &file) {
                Ok(path) => path,
                Err(e) => {
                    warn!("Skipping file {} of '{}': {}", file.id, course.name, e);
                    self.context
                        .manager
                        .record_course_issue(&format!("{} / {}", course.name, file.local_name()), &e.to_string());
                    continue;
                }
            };
            if !seen.insert(filepath.clone()) {
                debug!("Duplicate target {}, keeping the first file", filepath.display());
                continue;
            }
            tasks.push(FileTask {
                course_name: course.name.clone(),
                file,
                filepath,
            });
        }
        tasks
    }

    fn course_failed(&self, course: &Course, e: AppError) -> AppResult<()> {
        if matches!(e, AppError::UserInterrupt) {
            return Err(e);
        }
        error!("Course '{}' aborted: {}", course.name, e);
        ui::error(&format!("Could not scrape '{}': {}", course.name, e));
        self.context.manager.record_course_issue(&course.name, &e.to_string());
        Ok(())
    }
}
