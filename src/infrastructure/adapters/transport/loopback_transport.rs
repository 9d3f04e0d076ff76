//! Loopback Voice Transport - 进程内语音传输
//!
//! 不连接真实语音服务：每个频道是一个 tokio 任务，
//! "播放" min(音频时长, 时长上限) 后发出 Finished 事件

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::AbortHandle;

use crate::application::ports::{
    ChannelEvent, OpenChannelRequest, TransportError, VoiceTransportPort,
};
use crate::domain::playback::ChannelHandle;

/// 进程内语音传输
pub struct LoopbackVoiceTransport {
    available: AtomicBool,
    /// handle -> 播放任务
    channels: Arc<DashMap<ChannelHandle, AbortHandle>>,
    events: mpsc::UnboundedSender<ChannelEvent>,
}

impl LoopbackVoiceTransport {
    /// 创建传输层，同时返回频道事件接收端
    pub fn new(enabled: bool) -> (Self, mpsc::UnboundedReceiver<ChannelEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        tracing::info!(enabled = enabled, "LoopbackVoiceTransport initialized");
        (
            Self {
                available: AtomicBool::new(enabled),
                channels: Arc::new(DashMap::new()),
                events,
            },
            rx,
        )
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 切换可用状态（模拟语音服务断开 / 恢复）
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
        tracing::info!(available = available, "Voice transport availability changed");
    }

    /// 当前打开的频道数
    pub fn open_channels(&self) -> usize {
        self.channels.len()
    }
}

#[async_trait]
impl VoiceTransportPort for LoopbackVoiceTransport {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn open_channel(
        &self,
        request: OpenChannelRequest,
    ) -> Result<ChannelHandle, TransportError> {
        if !self.is_available() {
            return Err(TransportError::Unavailable);
        }
        if request.payload.is_empty() {
            return Err(TransportError::Rejected("empty payload".to_string()));
        }

        let handle = ChannelHandle::new();
        let sound_id = request.sound_id;
        let play_for = request.play_duration();

        // 登记完成之前任务不能结束
        let (ready_tx, ready_rx) = oneshot::channel::<()>();
        let channels = self.channels.clone();
        let events = self.events.clone();

        let task = tokio::spawn(async move {
            if ready_rx.await.is_err() {
                return;
            }

            match play_for {
                Some(duration) => tokio::time::sleep(duration).await,
                // 时长未知且不限制：一直播放直到被关闭
                None => std::future::pending::<()>().await,
            }

            // 与 close_channel 竞争同一个条目，只有一方会成功
            if channels.remove(&handle).is_some() {
                tracing::debug!(handle = %handle, sound_id = %sound_id, "Channel finished");
                let _ = events.send(ChannelEvent::Finished { handle, sound_id });
            }
        });

        self.channels.insert(handle, task.abort_handle());
        let _ = ready_tx.send(());

        tracing::debug!(
            handle = %handle,
            sound_id = %sound_id,
            format = %request.format,
            mode = %request.target.mode(),
            range = %request.range,
            excluded = ?request.excluded,
            play_for_ms = ?play_for.map(|d| d.as_millis()),
            "Channel opened"
        );

        Ok(handle)
    }

    fn is_open(&self, handle: ChannelHandle) -> bool {
        self.channels.contains_key(&handle)
    }

    async fn close_channel(&self, handle: ChannelHandle) -> bool {
        match self.channels.remove(&handle) {
            Some((_, task)) => {
                task.abort();
                tracing::debug!(handle = %handle, "Channel closed");
                true
            }
            None => false,
        }
    }
}
