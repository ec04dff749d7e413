// src/downloader/task_processor.rs

use crate::{ScrapeContext, error::*, models::*, utils};
use futures::StreamExt;
use log::{debug, error, info};
use std::{fs, io::Write as IoWrite, path::Path};
use tempfile::NamedTempFile;

const SKIP_EXISTS: &str = "already exists";
const SKIP_IGNORED: &str = "ignored extension";

/// Handles a single file task: the download decision, then the transfer.
pub struct TaskProcessor {
    context: ScrapeContext,
}

impl TaskProcessor {
    pub fn new(context: ScrapeContext) -> Self {
        Self { context }
    }

    /// Failures of this one file are folded into the returned [`DownloadResult`];
    /// only an interrupted run is an `Err`.
    pub async fn process(&self, task: &FileTask) -> AppResult<DownloadResult> {
        let filename = task.display_name();
        let attempt: AppResult<DownloadResult> = async {
            if let DownloadAction::Skip(reason) =
                Self::prepare_download_action(&task.filepath, self.context.config.force_redownload)
            {
                return Ok(DownloadResult {
                    filename: filename.clone(),
                    status: DownloadStatus::Skipped,
                    message: Some(reason),
                });
            }
            let status = self.download(task).await?;
            let message = (status == DownloadStatus::Skipped).then(|| SKIP_IGNORED.to_string());
            Ok(DownloadResult {
                filename: filename.clone(),
                status,
                message,
            })
        }
        .await;

        match attempt {
            Ok(result) => Ok(result),
            Err(e @ AppError::UserInterrupt) => Err(e),
            Err(e) => {
                error!("Processing '{}' failed: {}", task.filepath.display(), e);
                Ok(DownloadResult {
                    filename,
                    status: DownloadStatus::from(&e),
                    message: Some(e.to_string()),
                })
            }
        }
    }

    /// An existing target is kept unless the run is forced.
    pub(super) fn prepare_download_action(filepath: &Path, force: bool) -> DownloadAction {
        if !filepath.exists() {
            return DownloadAction::DownloadNew;
        }
        if force {
            info!("Forcing re-download of {}", filepath.display());
            return DownloadAction::DownloadNew;
        }
        DownloadAction::Skip(SKIP_EXISTS.to_string())
    }

    /// Streams the file body to a temporary file next to the target and moves
    /// it into place once complete. Ignored extensions never touch the network.
    pub async fn download(&self, task: &FileTask) -> AppResult<DownloadStatus> {
        let Some(url) = task.file.download_url() else {
            return Err(AppError::Validation(format!(
                "file '{}' has no download URL",
                task.file.local_name()
            )));
        };

        let requester = self.context.api.requester();
        if let Some(ext) = utils::extension_of(&task.filepath)
            && requester.is_ignored_extension(&ext)
        {
            debug!("Not downloading '{}': .{} is ignored", task.display_name(), ext);
            return Ok(DownloadStatus::Skipped);
        }

        let parent = task
            .filepath
            .parent()
            .ok_or_else(|| AppError::Security(format!("'{}' has no parent directory", task.filepath.display())))?;
        fs::create_dir_all(parent)?;

        let res = self.context.http_client.get(url, &requester.headers).await?;
        let mut tmp = NamedTempFile::new_in(parent)?;
        let mut written: u64 = 0;
        let mut stream = res.bytes_stream();
        while let Some(chunk_result) = stream.next().await {
            if self.context.is_cancelled() {
                // Dropping `tmp` removes the partial file.
                return Err(AppError::UserInterrupt);
            }
            let chunk = chunk_result?;
            tmp.write_all(&chunk)?;
            written += chunk.len() as u64;
        }
        tmp.flush()?;
        tmp.persist(&task.filepath)?;
        debug!("Wrote {} bytes to {}", written, task.filepath.display());
        Ok(DownloadStatus::Success)
    }
}
