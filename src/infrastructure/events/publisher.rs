//! Event Publisher Implementation
//!
//! 导入与播放事件的全局广播，由 WebSocket 订阅

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::application::ports::IngestError;
use crate::domain::ingest::IngestSourceKind;
use crate::domain::playback::{ChannelHandle, PlaybackMode};
use crate::domain::sound::{SoundFormat, SoundId, SoundRecord};

/// 频道关闭原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelCloseReason {
    /// 被 stop 或 StopPrevious 关闭
    Stopped,
    /// 自然播放结束
    Finished,
    /// 服务关闭
    Shutdown,
}

/// WebSocket 事件类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum SoundEvent {
    IngestStarted {
        sound_id: SoundId,
        source: IngestSourceKind,
    },
    SoundStored {
        sound_id: SoundId,
        format: SoundFormat,
        size_bytes: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        duration_ms: Option<u64>,
    },
    IngestFailed {
        sound_id: SoundId,
        kind: String,
        error: String,
    },
    ChannelOpened {
        sound_id: SoundId,
        handle: ChannelHandle,
        mode: PlaybackMode,
    },
    ChannelClosed {
        sound_id: SoundId,
        handle: ChannelHandle,
        reason: ChannelCloseReason,
    },
}

/// 事件发布器
pub struct EventPublisher {
    channel: broadcast::Sender<SoundEvent>,
}

impl EventPublisher {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(100);
        Self { channel: tx }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅全部事件
    pub fn subscribe(&self) -> broadcast::Receiver<SoundEvent> {
        self.channel.subscribe()
    }

    pub fn publish_ingest_started(&self, sound_id: SoundId, source: IngestSourceKind) {
        self.publish(SoundEvent::IngestStarted { sound_id, source });
    }

    pub fn publish_sound_stored(&self, record: &SoundRecord) {
        self.publish(SoundEvent::SoundStored {
            sound_id: record.id(),
            format: record.format(),
            size_bytes: record.size_bytes(),
            duration_ms: record.duration_ms(),
        });
    }

    /// 只推送 kind 与用户可见信息
    pub fn publish_ingest_failed(&self, sound_id: SoundId, error: &IngestError) {
        self.publish(SoundEvent::IngestFailed {
            sound_id,
            kind: error.kind().to_string(),
            error: error.user_message(),
        });
    }

    pub fn publish_channel_opened(
        &self,
        sound_id: SoundId,
        handle: ChannelHandle,
        mode: PlaybackMode,
    ) {
        self.publish(SoundEvent::ChannelOpened {
            sound_id,
            handle,
            mode,
        });
    }

    pub fn publish_channel_closed(
        &self,
        sound_id: SoundId,
        handle: ChannelHandle,
        reason: ChannelCloseReason,
    ) {
        self.publish(SoundEvent::ChannelClosed {
            sound_id,
            handle,
            reason,
        });
    }

    fn publish(&self, event: SoundEvent) {
        if let Err(e) = self.channel.send(event) {
            tracing::debug!(error = %e, "Failed to publish event (no receivers)");
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}
