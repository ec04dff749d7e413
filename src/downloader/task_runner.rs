// src/downloader/task_runner.rs

use super::task_processor::TaskProcessor;
use crate::{ScrapeContext, constants, error::*, models::*, ui, utils};
use futures::{StreamExt, stream};
use indicatif::ProgressBar;
use log::{debug, error};
use std::cmp::min;

/// Runs one course's tasks on a bounded pool and returns only once every
/// task has finished.
pub async fn execute_tasks(context: &ScrapeContext, tasks: &[FileTask]) -> AppResult<()> {
    let max_workers = min(context.config.max_workers.max(1), tasks.len());
    if max_workers == 0 {
        return Ok(());
    }
    context.manager.add_tasks(tasks.len());
    debug!("Running {} tasks on {} workers", tasks.len(), max_workers);

    let pbar = ui::new_tasks_progress_bar(tasks.len() as u64, "Downloading");

    stream::iter(tasks.iter())
        .for_each_concurrent(max_workers, |task| {
            run_single_concurrent_task(task, context, pbar.clone())
        })
        .await;

    pbar.finish_and_clear();
    if context.is_cancelled() {
        return Err(AppError::UserInterrupt);
    }
    Ok(())
}

async fn run_single_concurrent_task(task: &FileTask, context: &ScrapeContext, pbar: ProgressBar) {
    if context.is_cancelled() {
        return;
    }

    let processor = TaskProcessor::new(context.clone());
    match processor.process(task).await {
        Ok(result) => {
            match result.status {
                DownloadStatus::Success => context.manager.record_success(),
                DownloadStatus::Skipped => context.manager.record_skip(
                    &result.filename,
                    result.message.as_deref().unwrap_or("skipped"),
                ),
                status => {
                    let (_, _, default_msg) = status.get_display_info();
                    let reason = result.message.as_deref().unwrap_or(default_msg);
                    context.manager.record_failure(&result.filename, reason);
                }
            }
            pbar.inc(1);

            if result.status != DownloadStatus::Skipped {
                let (symbol, color_fn, default_msg) = result.status.get_display_info();
                let name = utils::truncate_text(&result.filename, constants::FILENAME_TRUNCATE_LENGTH);
                let line = match result.message {
                    Some(detail) => format!(
                        "{} {} {}",
                        symbol,
                        name,
                        color_fn(format!("{} ({})", default_msg, detail).into())
                    ),
                    None => format!("{} {} {}", symbol, task.course_name, name),
                };
                pbar.println(line);
            }
        }
        Err(AppError::UserInterrupt) => {
            debug!("'{}' interrupted", task.display_name());
        }
        Err(e) => {
            error!("Unhandled error in download pool: {}", e);
            pbar.inc(1);
        }
    }
}
