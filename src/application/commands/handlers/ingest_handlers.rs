//! Ingest Command Handlers

use std::sync::Arc;

use crate::application::commands::ingest_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    CompletionCallback, DropboxPort, IngestError, IngestPipelinePort, IngestSource,
    IngestTrackerPort,
};
use crate::domain::ingest::{IngestJob, IngestSourceKind, IngestState};
use crate::domain::sound::{SoundId, UploadFileName};

const INVALID_FILE_NAME: &str =
    "Invalid file name! Valid characters are A-Z, 0-9, _ and -. The name must end in .mp3 or .wav";

/// 完成回调：把导入结果写回任务追踪器
fn track_completion(tracker: Arc<dyn IngestTrackerPort>, id: SoundId) -> CompletionCallback {
    Box::new(move |outcome| {
        let result = tracker.transition(id, &mut |job| match &outcome {
            Ok(_) => job.complete(),
            Err(e @ IngestError::NothingUploadedYet) => {
                job.back_to_awaiting(e.kind(), e.user_message())
            }
            Err(e) => job.fail(e.kind(), e.user_message()),
        });

        if let Err(e) = result {
            tracing::warn!(sound_id = %id, error = %e, "Failed to record ingest outcome");
        }
    })
}

fn is_http_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    matches!(rest, Some(rest) if !rest.is_empty() && !rest.starts_with('/'))
}

/// IngestFromUrl Handler
pub struct IngestFromUrlHandler {
    pipeline: Arc<dyn IngestPipelinePort>,
    tracker: Arc<dyn IngestTrackerPort>,
}

impl IngestFromUrlHandler {
    pub fn new(pipeline: Arc<dyn IngestPipelinePort>, tracker: Arc<dyn IngestTrackerPort>) -> Self {
        Self { pipeline, tracker }
    }

    pub fn handle(&self, cmd: IngestFromUrlCommand) -> Result<IngestAcceptedResponse, ApplicationError> {
        let url = cmd.url.trim().to_string();
        if !is_http_url(&url) {
            return Err(ApplicationError::validation(format!("Invalid URL: {}", url)));
        }

        let sound_id = SoundId::new();
        self.tracker
            .track(IngestJob::started(sound_id, IngestSourceKind::Url));

        tracing::info!(sound_id = %sound_id, url = %url, "Ingest from URL accepted");

        self.pipeline.ingest_async(
            sound_id,
            IngestSource::Url(url),
            track_completion(self.tracker.clone(), sound_id),
        );

        Ok(IngestAcceptedResponse {
            sound_id,
            source: IngestSourceKind::Url,
            state: IngestState::Fetching,
        })
    }
}

/// IngestServerFile Handler
pub struct IngestServerFileHandler {
    pipeline: Arc<dyn IngestPipelinePort>,
    tracker: Arc<dyn IngestTrackerPort>,
}

impl IngestServerFileHandler {
    pub fn new(pipeline: Arc<dyn IngestPipelinePort>, tracker: Arc<dyn IngestTrackerPort>) -> Self {
        Self { pipeline, tracker }
    }

    pub fn handle(
        &self,
        cmd: IngestServerFileCommand,
    ) -> Result<IngestAcceptedResponse, ApplicationError> {
        let file_name = UploadFileName::parse(cmd.file_name)
            .map_err(|_| ApplicationError::validation(INVALID_FILE_NAME))?;

        let sound_id = SoundId::new();
        self.tracker
            .track(IngestJob::started(sound_id, IngestSourceKind::ServerFile));

        tracing::info!(sound_id = %sound_id, file_name = %file_name, "Ingest from server file accepted");

        self.pipeline.ingest_async(
            sound_id,
            IngestSource::ServerFile(file_name),
            track_completion(self.tracker.clone(), sound_id),
        );

        Ok(IngestAcceptedResponse {
            sound_id,
            source: IngestSourceKind::ServerFile,
            state: IngestState::Fetching,
        })
    }
}

/// CreateDropboxUpload Handler - 投递箱第一阶段
pub struct CreateDropboxUploadHandler {
    dropbox: Arc<dyn DropboxPort>,
    tracker: Arc<dyn IngestTrackerPort>,
}

impl CreateDropboxUploadHandler {
    pub fn new(dropbox: Arc<dyn DropboxPort>, tracker: Arc<dyn IngestTrackerPort>) -> Self {
        Self { dropbox, tracker }
    }

    pub fn handle(&self, _cmd: CreateDropboxUploadCommand) -> DropboxUploadResponse {
        let sound_id = SoundId::new();
        self.tracker.track(IngestJob::awaiting_upload(sound_id));

        let upload_url = self.dropbox.upload_url(sound_id);
        tracing::info!(sound_id = %sound_id, upload_url = %upload_url, "Dropbox upload created");

        DropboxUploadResponse {
            sound_id,
            upload_url,
        }
    }
}

/// ConfirmDropboxUpload Handler - 投递箱第二阶段
pub struct ConfirmDropboxUploadHandler {
    pipeline: Arc<dyn IngestPipelinePort>,
    tracker: Arc<dyn IngestTrackerPort>,
}

impl ConfirmDropboxUploadHandler {
    pub fn new(pipeline: Arc<dyn IngestPipelinePort>, tracker: Arc<dyn IngestTrackerPort>) -> Self {
        Self { pipeline, tracker }
    }

    pub fn handle(
        &self,
        cmd: ConfirmDropboxUploadCommand,
    ) -> Result<IngestAcceptedResponse, ApplicationError> {
        let sound_id = cmd.sound_id;

        // 未知 id：调用方重新解析，隐式登记（已有任务时保持不变）
        if self.tracker.track_if_absent(IngestJob::awaiting_upload(sound_id)) {
            tracing::debug!(sound_id = %sound_id, "Registered unknown dropbox upload");
        }

        let job = self.tracker.transition(sound_id, &mut |job| job.begin_fetch())?;

        tracing::info!(
            sound_id = %sound_id,
            attempt = job.attempts(),
            "Dropbox upload confirmed, fetching"
        );

        self.pipeline.ingest_async(
            sound_id,
            IngestSource::Dropbox,
            track_completion(self.tracker.clone(), sound_id),
        );

        Ok(IngestAcceptedResponse {
            sound_id,
            source: job.source(),
            state: job.state(),
        })
    }
}
