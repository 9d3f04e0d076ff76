//! Playback Queries - 播放频道查询

use crate::domain::playback::{ChannelHandle, PlaybackSession};
use crate::domain::sound::SoundId;

/// 查询某个音频当前的频道
#[derive(Debug, Clone)]
pub struct FindChannelQuery {
    pub sound_id: SoundId,
}

#[derive(Debug, Clone)]
pub struct FindChannelResponse {
    pub sound_id: SoundId,
    pub handle: Option<ChannelHandle>,
    pub session: Option<PlaybackSession>,
}
