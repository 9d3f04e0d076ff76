//! Playback Commands - 播放相关命令

use crate::domain::playback::{ChannelHandle, ListenerId, Location, PlaybackMode};
use crate::domain::sound::SoundId;

/// 播放命令
#[derive(Debug, Clone)]
pub struct PlaySoundCommand {
    pub sound_id: SoundId,
    pub mode: PlaybackMode,
    /// 定位模式必填，静态模式忽略
    pub location: Option<Location>,
    pub range: f32,
    pub excluded_listener: Option<ListenerId>,
    /// 为空时使用配置的默认上限；0 表示不限制
    pub max_duration_secs: Option<u64>,
}

/// 播放响应
#[derive(Debug, Clone)]
pub struct PlaySoundResponse {
    pub sound_id: SoundId,
    pub handle: ChannelHandle,
    pub mode: PlaybackMode,
}

/// 停止命令
#[derive(Debug, Clone)]
pub struct StopSoundCommand {
    pub sound_id: SoundId,
}

/// 停止响应
#[derive(Debug, Clone)]
pub struct StopSoundResponse {
    pub sound_id: SoundId,
    pub stopped: bool,
    pub handle: Option<ChannelHandle>,
}
