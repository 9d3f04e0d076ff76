//! Voice Transport Port - 实时语音传输能力
//!
//! 宿主语音层只暴露"以 range 打开一个定位 / 静态广播，返回频道句柄"的能力，
//! 线路协议不在本 crate 范围内

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::domain::playback::{ChannelHandle, DurationLimit, ListenerId, PlaybackTarget, Range};
use crate::domain::sound::{SoundFormat, SoundId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Voice transport unavailable")]
    Unavailable,

    #[error("Channel rejected: {0}")]
    Rejected(String),
}

/// 打开频道请求
#[derive(Debug, Clone)]
pub struct OpenChannelRequest {
    pub sound_id: SoundId,
    pub payload: Vec<u8>,
    pub format: SoundFormat,
    pub target: PlaybackTarget,
    pub range: Range,
    /// 听不到这次播放的听众（通常是发起者本人）
    pub excluded: Option<ListenerId>,
    pub duration_limit: DurationLimit,
    /// 音频自身时长（已知时）
    pub duration_ms: Option<u64>,
}

impl OpenChannelRequest {
    /// 实际播放时长；都未知时为 None（一直播放直到被关闭）
    pub fn play_duration(&self) -> Option<Duration> {
        self.duration_limit
            .effective(self.duration_ms.map(Duration::from_millis))
    }
}

/// 传输层发出的频道事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// 播放自然结束（或到达时长上限）
    Finished {
        handle: ChannelHandle,
        sound_id: SoundId,
    },
}

/// Voice Transport Port
#[async_trait]
pub trait VoiceTransportPort: Send + Sync {
    fn is_available(&self) -> bool;

    async fn open_channel(&self, request: OpenChannelRequest)
        -> Result<ChannelHandle, TransportError>;

    /// 频道是否仍在播放
    fn is_open(&self, handle: ChannelHandle) -> bool;

    /// 关闭频道；句柄未知（已结束）时返回 false
    async fn close_channel(&self, handle: ChannelHandle) -> bool;
}
