//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    ConfirmDropboxUploadHandler, CreateDropboxUploadHandler, IngestFromUrlHandler,
    IngestServerFileHandler, PlaySoundHandler, StopSoundHandler,
    // Query handlers
    FindChannelHandler, GetIngestStatusHandler, ListSoundsHandler, LookupSoundHandler,
    // Ports
    DropboxPort, IngestPipelinePort, IngestTrackerPort, PlaybackPort, SoundStorePort,
};
use crate::infrastructure::events::EventPublisher;

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub store: Arc<dyn SoundStorePort>,
    pub playback: Arc<dyn PlaybackPort>,
    pub event_publisher: Arc<EventPublisher>,

    // ========== Command Handlers ==========
    pub ingest_url_handler: IngestFromUrlHandler,
    pub ingest_server_file_handler: IngestServerFileHandler,
    pub create_dropbox_upload_handler: CreateDropboxUploadHandler,
    pub confirm_dropbox_upload_handler: ConfirmDropboxUploadHandler,
    pub play_sound_handler: PlaySoundHandler,
    pub stop_sound_handler: StopSoundHandler,

    // ========== Query Handlers ==========
    pub lookup_sound_handler: LookupSoundHandler,
    pub ingest_status_handler: GetIngestStatusHandler,
    pub list_sounds_handler: ListSoundsHandler,
    pub find_channel_handler: FindChannelHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        store: Arc<dyn SoundStorePort>,
        tracker: Arc<dyn IngestTrackerPort>,
        pipeline: Arc<dyn IngestPipelinePort>,
        dropbox: Arc<dyn DropboxPort>,
        playback: Arc<dyn PlaybackPort>,
        event_publisher: Arc<EventPublisher>,
        default_max_duration_secs: u64,
    ) -> Self {
        Self {
            // Ports
            store: store.clone(),
            playback: playback.clone(),
            event_publisher,

            // Command handlers
            ingest_url_handler: IngestFromUrlHandler::new(pipeline.clone(), tracker.clone()),
            ingest_server_file_handler: IngestServerFileHandler::new(
                pipeline.clone(),
                tracker.clone(),
            ),
            create_dropbox_upload_handler: CreateDropboxUploadHandler::new(
                dropbox,
                tracker.clone(),
            ),
            confirm_dropbox_upload_handler: ConfirmDropboxUploadHandler::new(
                pipeline,
                tracker.clone(),
            ),
            play_sound_handler: PlaySoundHandler::new(playback.clone(), default_max_duration_secs),
            stop_sound_handler: StopSoundHandler::new(playback.clone()),

            // Query handlers
            lookup_sound_handler: LookupSoundHandler::new(store.clone()),
            ingest_status_handler: GetIngestStatusHandler::new(tracker, store.clone()),
            list_sounds_handler: ListSoundsHandler::new(store),
            find_channel_handler: FindChannelHandler::new(playback),
        }
    }
}
