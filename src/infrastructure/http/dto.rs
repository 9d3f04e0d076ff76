//! Data Transfer Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ingest::IngestJob;
use crate::domain::playback::{ChannelHandle, PlaybackMode, PlaybackSession};
use crate::domain::sound::{SoundFormat, SoundId, SoundRecord};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

// ============================================================================
// Sound DTOs
// ============================================================================

/// 只带 sound_id 的请求体（status / lookup / confirm / stop / channel）
#[derive(Debug, Deserialize)]
pub struct SoundIdRequest {
    pub sound_id: SoundId,
}

#[derive(Debug, Deserialize)]
pub struct IngestUrlRequest {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct IngestServerFileRequest {
    pub file_name: String,
}

#[derive(Debug, Serialize)]
pub struct IngestAcceptedDto {
    pub sound_id: SoundId,
    pub source: String,
    pub state: String,
}

#[derive(Debug, Serialize)]
pub struct DropboxUploadDto {
    pub sound_id: SoundId,
    pub upload_url: String,
}

#[derive(Debug, Serialize)]
pub struct SoundRecordDto {
    pub sound_id: SoundId,
    pub format: SoundFormat,
    pub mime_type: &'static str,
    pub size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    pub checksum: String,
    pub created_at: String,
}

impl From<&SoundRecord> for SoundRecordDto {
    fn from(record: &SoundRecord) -> Self {
        Self {
            sound_id: record.id(),
            format: record.format(),
            mime_type: record.format().mime_type(),
            size_bytes: record.size_bytes(),
            duration_ms: record.duration_ms(),
            checksum: record.checksum().to_string(),
            created_at: record.created_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LookupSoundDto {
    pub sound_id: SoundId,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<SoundRecordDto>,
}

#[derive(Debug, Serialize)]
pub struct IngestStatusDto {
    pub sound_id: SoundId,
    pub source: String,
    pub state: String,
    pub stored: bool,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub updated_at: String,
}

impl IngestStatusDto {
    pub fn new(job: &IngestJob, stored: bool) -> Self {
        Self {
            sound_id: job.sound_id(),
            source: job.source().as_str().to_string(),
            state: job.state().as_str().to_string(),
            stored,
            attempts: job.attempts(),
            error_kind: job.error_kind().map(str::to_string),
            error: job.error_message().map(str::to_string),
            updated_at: job.updated_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SoundListDto {
    pub count: u64,
    pub total_bytes: u64,
    pub sounds: Vec<SoundRecordDto>,
}

// ============================================================================
// Playback DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LocationDto {
    pub level: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Deserialize)]
pub struct PlayRequest {
    pub sound_id: SoundId,
    pub mode: PlaybackMode,
    #[serde(default)]
    pub location: Option<LocationDto>,
    pub range: f32,
    #[serde(default)]
    pub excluded_listener: Option<Uuid>,
    #[serde(default)]
    pub max_duration_secs: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct PlayResponseDto {
    pub sound_id: SoundId,
    pub handle: ChannelHandle,
    pub mode: PlaybackMode,
}

#[derive(Debug, Serialize)]
pub struct StopResponseDto {
    pub sound_id: SoundId,
    pub stopped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<ChannelHandle>,
}

#[derive(Debug, Serialize)]
pub struct SessionDto {
    pub handle: ChannelHandle,
    pub mode: PlaybackMode,
    pub range: f32,
    pub started_at: String,
}

impl From<&PlaybackSession> for SessionDto {
    fn from(session: &PlaybackSession) -> Self {
        Self {
            handle: session.handle(),
            mode: session.mode(),
            range: session.range().value(),
            started_at: session.started_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChannelDto {
    pub sound_id: SoundId,
    pub playing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionDto>,
}
