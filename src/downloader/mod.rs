// src/downloader/mod.rs

mod job;
mod task_processor;
mod task_runner;

pub use job::CourseScraper;
pub use task_processor::TaskProcessor;
pub use task_runner::execute_tasks;

use crate::{symbols, ui};
use colored::*;
use log::info;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct DownloadStats {
    pub total: usize,
    pub success: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Run-wide bookkeeping shared by all download workers.
#[derive(Clone)]
pub struct DownloadManager {
    stats: Arc<Mutex<DownloadStats>>,
    failed_downloads: Arc<Mutex<Vec<(String, String)>>>,
    skipped_downloads: Arc<Mutex<Vec<(String, String)>>>,
    course_issues: Arc<Mutex<Vec<(String, String)>>>,
}

impl Default for DownloadManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadManager {
    pub fn new() -> Self {
        Self {
            stats: Arc::new(Mutex::new(DownloadStats::default())),
            failed_downloads: Arc::new(Mutex::new(Vec::new())),
            skipped_downloads: Arc::new(Mutex::new(Vec::new())),
            course_issues: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn add_tasks(&self, count: usize) {
        info!("Queued {} more download tasks", count);
        lock(&self.stats).total += count;
    }

    pub fn record_success(&self) {
        lock(&self.stats).success += 1;
    }

    pub fn record_skip(&self, filename: &str, reason: &str) {
        info!("Skipped '{}': {}", filename, reason);
        lock(&self.stats).skipped += 1;
        lock(&self.skipped_downloads).push((filename.to_string(), reason.to_string()));
    }

    pub fn record_failure(&self, filename: &str, reason: &str) {
        log::error!("Download of '{}' failed: {}", filename, reason);
        lock(&self.stats).failed += 1;
        lock(&self.failed_downloads).push((filename.to_string(), reason.to_string()));
    }

    /// Records a course, module or item that could not be traversed.
    pub fn record_course_issue(&self, location: &str, reason: &str) {
        log::warn!("'{}': {}", location, reason);
        lock(&self.course_issues).push((location.to_string(), reason.to_string()));
    }

    pub fn get_stats(&self) -> DownloadStats {
        lock(&self.stats).clone()
    }

    pub fn course_issues(&self) -> Vec<(String, String)> {
        lock(&self.course_issues).clone()
    }

    pub fn did_all_succeed(&self) -> bool {
        lock(&self.stats).failed == 0
    }

    pub fn print_report(&self) {
        let stats = self.get_stats();
        let skipped = lock(&self.skipped_downloads).clone();
        let failed = lock(&self.failed_downloads).clone();
        let issues = self.course_issues();
        info!(
            "Download report: Total={}, Success={}, Skipped={}, Failed={}, Issues={}",
            stats.total,
            stats.success,
            stats.skipped,
            stats.failed,
            issues.len()
        );

        if !skipped.is_empty() || !failed.is_empty() || !issues.is_empty() {
            ui::print_sub_header("Details");
            if !issues.is_empty() {
                println!("\n{} Not traversed ({}):", *symbols::WARN, issues.len());
                for (location, reason) in &issues {
                    println!("  - {}: {}", location, reason.yellow());
                }
            }
            if !skipped.is_empty() {
                println!("\n{} Skipped files ({}):", *symbols::INFO, stats.skipped);
                print_grouped_report(&skipped, |s| s.cyan());
            }
            if !failed.is_empty() {
                println!("\n{} Failed files ({}):", *symbols::ERROR, stats.failed);
                print_grouped_report(&failed, |s| s.red());
            }
        }
        ui::print_sub_header("Summary");
        if stats.failed == 0 {
            println!(
                "{} All {} files handled ({} downloaded, {} skipped).",
                *symbols::OK,
                stats.total,
                stats.success,
                stats.skipped
            );
        } else {
            let summary = format!(
                "{} | {} | {}",
                format!("Downloaded: {}", stats.success).green(),
                format!("Failed: {}", stats.failed).red(),
                format!("Skipped: {}", stats.skipped).yellow()
            );
            println!("{}", summary);
        }
    }
}

// A poisoned lock only means a worker panicked mid-update; the counters are still usable.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn print_grouped_report(
    items: &[(String, String)],
    color_fn: fn(ColoredString) -> ColoredString,
) {
    let mut grouped: HashMap<&String, Vec<&String>> = HashMap::new();
    for (filename, reason) in items {
        grouped.entry(reason).or_default().push(filename);
    }
    let mut sorted_reasons: Vec<_> = grouped.keys().copied().collect();
    sorted_reasons.sort();
    for reason in sorted_reasons {
        println!("  - {}", color_fn(format!("Reason: {}", reason).into()));
        let mut filenames = grouped.get(reason).cloned().unwrap_or_default();
        filenames.sort();
        for filename in filenames {
            println!("    - {}", filename);
        }
    }
}
