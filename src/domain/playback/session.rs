//! Playback Context - Session

use chrono::{DateTime, Utc};

use super::{ChannelHandle, DurationLimit, ListenerId, Location, PlaybackMode, PlaybackTarget, Range};
use crate::domain::sound::SoundId;

/// 一次正在进行的播放
///
/// 生命周期: play 成功时创建，stop 或传输层报告自然结束时销毁
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    sound_id: SoundId,
    handle: ChannelHandle,
    target: PlaybackTarget,
    range: Range,
    excluded: Option<ListenerId>,
    duration_limit: DurationLimit,
    started_at: DateTime<Utc>,
}

impl PlaybackSession {
    pub fn new(
        sound_id: SoundId,
        handle: ChannelHandle,
        target: PlaybackTarget,
        range: Range,
        excluded: Option<ListenerId>,
        duration_limit: DurationLimit,
    ) -> Self {
        Self {
            sound_id,
            handle,
            target,
            range,
            excluded,
            duration_limit,
            started_at: Utc::now(),
        }
    }

    pub fn sound_id(&self) -> SoundId {
        self.sound_id
    }

    pub fn handle(&self) -> ChannelHandle {
        self.handle
    }

    pub fn mode(&self) -> PlaybackMode {
        self.target.mode()
    }

    pub fn location(&self) -> Option<&Location> {
        self.target.location()
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn excluded(&self) -> Option<ListenerId> {
        self.excluded
    }

    pub fn duration_limit(&self) -> DurationLimit {
        self.duration_limit
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}
