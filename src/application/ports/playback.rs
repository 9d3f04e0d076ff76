//! Playback Port - 播放频道管理
//!
//! 具体实现为 infrastructure/playback 的 PlaybackChannelManager

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::playback::{
    ChannelHandle, DurationLimit, ListenerId, PlaybackSession, PlaybackTarget, Range,
};
use crate::domain::sound::SoundId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayError {
    #[error("Sound not found: {0}")]
    SoundNotFound(SoundId),

    #[error("Voice transport unavailable")]
    TransportUnavailable,

    #[error("Stored payload unavailable: {0}")]
    PayloadUnavailable(SoundId),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// 播放请求
#[derive(Debug, Clone)]
pub struct PlayRequest {
    pub sound_id: SoundId,
    pub target: PlaybackTarget,
    pub range: Range,
    pub excluded: Option<ListenerId>,
    pub duration_limit: DurationLimit,
}

/// stop 的结果；NotPlaying 是正常结果而不是错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped(ChannelHandle),
    NotPlaying,
}

/// Playback Port
///
/// play / stop / find_channel 不等待网络 I/O
#[async_trait]
pub trait PlaybackPort: Send + Sync {
    async fn play(&self, request: PlayRequest) -> Result<ChannelHandle, PlayError>;

    async fn stop(&self, id: SoundId) -> StopOutcome;

    fn find_channel(&self, id: SoundId) -> Option<ChannelHandle>;

    fn sessions(&self) -> Vec<PlaybackSession>;
}
