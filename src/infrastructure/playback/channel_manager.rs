//! Playback Channel Manager
//!
//! 实现 PlaybackPort trait
//!
//! 每个 SoundId 的状态: Idle → Playing → Idle
//! - play: 解析记录 → 读取本地 payload → 打开频道 → 登记（覆盖）
//! - stop: 移除登记并关闭频道
//! - 传输层报告自然结束时，只有登记仍指向该频道才移除

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{
    ChannelEvent, ChannelRegistryPort, OpenChannelRequest, PlayError, PlayRequest, PlaybackPort,
    SoundStorePort, StopOutcome, StoreError, TransportError, VoiceTransportPort,
};
use crate::domain::playback::{ChannelHandle, PlaybackSession};
use crate::domain::sound::SoundId;
use crate::infrastructure::events::{ChannelCloseReason, EventPublisher};

/// 同一 SoundId 再次播放时对旧频道的处理
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplayPolicy {
    /// 旧频道继续播放，但不再能通过 id 找到
    #[default]
    KeepPrevious,
    /// 关闭旧频道
    StopPrevious,
}

impl ReplayPolicy {
    pub fn from_stop_previous(stop_previous: bool) -> Self {
        if stop_previous {
            ReplayPolicy::StopPrevious
        } else {
            ReplayPolicy::KeepPrevious
        }
    }
}

/// 播放频道管理器
pub struct PlaybackChannelManager {
    store: Arc<dyn SoundStorePort>,
    registry: Arc<dyn ChannelRegistryPort>,
    transport: Arc<dyn VoiceTransportPort>,
    event_publisher: Arc<EventPublisher>,
    policy: ReplayPolicy,
    shutdown: CancellationToken,
}

impl PlaybackChannelManager {
    pub fn new(
        store: Arc<dyn SoundStorePort>,
        registry: Arc<dyn ChannelRegistryPort>,
        transport: Arc<dyn VoiceTransportPort>,
        event_publisher: Arc<EventPublisher>,
        policy: ReplayPolicy,
    ) -> Self {
        tracing::info!(policy = ?policy, "PlaybackChannelManager initialized");
        Self {
            store,
            registry,
            transport,
            event_publisher,
            policy,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn policy(&self) -> ReplayPolicy {
        self.policy
    }

    /// 处理传输层事件
    pub fn handle_channel_event(&self, event: ChannelEvent) {
        match event {
            ChannelEvent::Finished { handle, sound_id } => {
                match self.registry.remove_if_current(sound_id, handle) {
                    Some(_) => {
                        tracing::debug!(sound_id = %sound_id, handle = %handle, "Playback finished");
                        self.event_publisher.publish_channel_closed(
                            sound_id,
                            handle,
                            ChannelCloseReason::Finished,
                        );
                    }
                    None => {
                        tracing::debug!(
                            sound_id = %sound_id,
                            handle = %handle,
                            "Superseded channel finished"
                        );
                    }
                }
            }
        }
    }

    /// 启动事件循环，直到 shutdown 或事件通道关闭
    pub fn spawn_event_loop(
        self: &Arc<Self>,
        mut events: mpsc::UnboundedReceiver<ChannelEvent>,
    ) -> JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = manager.shutdown.cancelled() => break,
                    event = events.recv() => match event {
                        Some(event) => manager.handle_channel_event(event),
                        None => break,
                    },
                }
            }
            tracing::debug!("Channel event loop stopped");
        })
    }

    /// 关闭所有登记的频道
    pub async fn shutdown(&self) {
        self.shutdown.cancel();

        let sessions = self.registry.drain();
        let count = sessions.len();
        for session in sessions {
            self.transport.close_channel(session.handle()).await;
            self.event_publisher.publish_channel_closed(
                session.sound_id(),
                session.handle(),
                ChannelCloseReason::Shutdown,
            );
        }

        tracing::info!(closed = count, "PlaybackChannelManager stopped");
    }

    async fn close_previous(&self, previous: PlaybackSession) {
        match self.policy {
            ReplayPolicy::KeepPrevious => {
                tracing::debug!(
                    sound_id = %previous.sound_id(),
                    handle = %previous.handle(),
                    "Previous channel left playing"
                );
            }
            ReplayPolicy::StopPrevious => {
                if self.transport.close_channel(previous.handle()).await {
                    self.event_publisher.publish_channel_closed(
                        previous.sound_id(),
                        previous.handle(),
                        ChannelCloseReason::Stopped,
                    );
                }
            }
        }
    }
}

#[async_trait]
impl PlaybackPort for PlaybackChannelManager {
    async fn play(&self, request: PlayRequest) -> Result<ChannelHandle, PlayError> {
        let id = request.sound_id;

        let record = self.store.get(id).await.map_err(|e| match e {
            StoreError::NotFound(_) => PlayError::SoundNotFound(id),
            other => {
                tracing::warn!(sound_id = %id, error = %other, "Failed to resolve sound");
                PlayError::PayloadUnavailable(id)
            }
        })?;

        if !self.transport.is_available() {
            return Err(PlayError::TransportUnavailable);
        }

        let payload = self.store.read_payload(id).await.map_err(|e| {
            tracing::warn!(sound_id = %id, error = %e, "Failed to read stored payload");
            PlayError::PayloadUnavailable(id)
        })?;

        let handle = self
            .transport
            .open_channel(OpenChannelRequest {
                sound_id: id,
                payload,
                format: record.format(),
                target: request.target.clone(),
                range: request.range,
                excluded: request.excluded,
                duration_limit: request.duration_limit,
                duration_ms: record.duration_ms(),
            })
            .await
            .map_err(|e| match e {
                TransportError::Unavailable => PlayError::TransportUnavailable,
                TransportError::Rejected(msg) => {
                    tracing::warn!(sound_id = %id, error = %msg, "Transport rejected channel");
                    PlayError::Transport(msg)
                }
            })?;

        let session = PlaybackSession::new(
            id,
            handle,
            request.target,
            request.range,
            request.excluded,
            request.duration_limit,
        );
        let mode = session.mode();

        if let Some(previous) = self.registry.register(session) {
            self.close_previous(previous).await;
        }

        tracing::info!(
            sound_id = %id,
            handle = %handle,
            mode = %mode,
            range = %request.range,
            "Playback started"
        );
        self.event_publisher.publish_channel_opened(id, handle, mode);

        // 登记之前就结束的频道，其 Finished 事件已被忽略
        if !self.transport.is_open(handle) && self.registry.remove_if_current(id, handle).is_some() {
            tracing::debug!(sound_id = %id, handle = %handle, "Channel finished before registration");
            self.event_publisher
                .publish_channel_closed(id, handle, ChannelCloseReason::Finished);
        }

        Ok(handle)
    }

    async fn stop(&self, id: SoundId) -> StopOutcome {
        match self.registry.remove(id) {
            Some(session) => {
                let handle = session.handle();
                self.transport.close_channel(handle).await;
                tracing::info!(sound_id = %id, handle = %handle, "Playback stopped");
                self.event_publisher
                    .publish_channel_closed(id, handle, ChannelCloseReason::Stopped);
                StopOutcome::Stopped(handle)
            }
            None => {
                tracing::debug!(sound_id = %id, "Stop requested but nothing is playing");
                StopOutcome::NotPlaying
            }
        }
    }

    fn find_channel(&self, id: SoundId) -> Option<ChannelHandle> {
        self.registry.find(id).map(|s| s.handle())
    }

    fn sessions(&self) -> Vec<PlaybackSession> {
        self.registry.list()
    }
}
