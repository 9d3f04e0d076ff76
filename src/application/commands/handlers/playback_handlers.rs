//! Playback Command Handlers

use std::sync::Arc;

use crate::application::commands::playback_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{PlayRequest, PlaybackPort, StopOutcome};
use crate::domain::playback::{DurationLimit, PlaybackMode, PlaybackTarget, Range};

/// PlaySound Handler
///
/// range 严格为正在这里检查，PlaybackChannelManager 不再重复
pub struct PlaySoundHandler {
    playback: Arc<dyn PlaybackPort>,
    default_max_duration_secs: u64,
}

impl PlaySoundHandler {
    pub fn new(playback: Arc<dyn PlaybackPort>, default_max_duration_secs: u64) -> Self {
        Self {
            playback,
            default_max_duration_secs,
        }
    }

    pub async fn handle(&self, cmd: PlaySoundCommand) -> Result<PlaySoundResponse, ApplicationError> {
        let range = Range::new(cmd.range).map_err(|e| ApplicationError::validation(e))?;

        let target = match (cmd.mode, cmd.location) {
            (PlaybackMode::Positional, Some(location)) => PlaybackTarget::Positional(location),
            (PlaybackMode::Positional, None) => {
                return Err(ApplicationError::validation(
                    "positional playback requires a location",
                ))
            }
            (PlaybackMode::Static, location) => {
                if location.is_some() {
                    tracing::debug!(sound_id = %cmd.sound_id, "Ignoring location for static playback");
                }
                PlaybackTarget::Static
            }
        };

        // 请求只能收紧服务端配置的上限
        let configured = DurationLimit::from_secs(self.default_max_duration_secs);
        let duration_limit = match cmd.max_duration_secs {
            Some(secs) => configured.tighten(DurationLimit::from_secs(secs)),
            None => configured,
        };

        let handle = self
            .playback
            .play(PlayRequest {
                sound_id: cmd.sound_id,
                target,
                range,
                excluded: cmd.excluded_listener,
                duration_limit,
            })
            .await?;

        tracing::info!(
            sound_id = %cmd.sound_id,
            handle = %handle,
            mode = %cmd.mode,
            range = %range,
            "Successfully played sound"
        );

        Ok(PlaySoundResponse {
            sound_id: cmd.sound_id,
            handle,
            mode: cmd.mode,
        })
    }
}

/// StopSound Handler
pub struct StopSoundHandler {
    playback: Arc<dyn PlaybackPort>,
}

impl StopSoundHandler {
    pub fn new(playback: Arc<dyn PlaybackPort>) -> Self {
        Self { playback }
    }

    pub async fn handle(&self, cmd: StopSoundCommand) -> StopSoundResponse {
        match self.playback.stop(cmd.sound_id).await {
            StopOutcome::Stopped(handle) => StopSoundResponse {
                sound_id: cmd.sound_id,
                stopped: true,
                handle: Some(handle),
            },
            StopOutcome::NotPlaying => StopSoundResponse {
                sound_id: cmd.sound_id,
                stopped: false,
                handle: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::application::ports::PlayError;
    use crate::domain::playback::{ChannelHandle, Location, PlaybackSession};
    use crate::domain::sound::SoundId;

    /// 记录请求的播放端口
    #[derive(Default)]
    struct RecordingPlayback {
        requests: Mutex<Vec<PlayRequest>>,
    }

    #[async_trait]
    impl PlaybackPort for RecordingPlayback {
        async fn play(&self, request: PlayRequest) -> Result<ChannelHandle, PlayError> {
            self.requests.lock().unwrap().push(request);
            Ok(ChannelHandle::new())
        }

        async fn stop(&self, _id: SoundId) -> StopOutcome {
            StopOutcome::NotPlaying
        }

        fn find_channel(&self, _id: SoundId) -> Option<ChannelHandle> {
            None
        }

        fn sessions(&self) -> Vec<PlaybackSession> {
            Vec::new()
        }
    }

    fn command(mode: PlaybackMode, location: Option<Location>, range: f32) -> PlaySoundCommand {
        PlaySoundCommand {
            sound_id: SoundId::new(),
            mode,
            location,
            range,
            excluded_listener: None,
            max_duration_secs: None,
        }
    }

    #[tokio::test]
    async fn test_range_zero_is_rejected_before_manager() {
        let playback = Arc::new(RecordingPlayback::default());
        let handler = PlaySoundHandler::new(playback.clone(), 0);

        let result = handler.handle(command(PlaybackMode::Static, None, 0.0)).await;

        assert!(matches!(result, Err(ApplicationError::ValidationError(_))));
        assert!(playback.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_positional_requires_location_static_ignores_it() {
        let playback = Arc::new(RecordingPlayback::default());
        let handler = PlaySoundHandler::new(playback.clone(), 0);
        let location = Location::new("minecraft:overworld", 0.0, 64.0, 0.0).unwrap();

        assert!(handler
            .handle(command(PlaybackMode::Positional, None, 16.0))
            .await
            .is_err());

        let ok = handler
            .handle(command(PlaybackMode::Positional, Some(location.clone()), 16.0))
            .await
            .unwrap();
        assert_eq!(ok.mode, PlaybackMode::Positional);

        let ok = handler
            .handle(command(PlaybackMode::Static, Some(location.clone()), 16.0))
            .await
            .unwrap();
        assert_eq!(ok.mode, PlaybackMode::Static);

        let requests = playback.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].target, PlaybackTarget::Positional(location));
        assert_eq!(requests[1].target, PlaybackTarget::Static);
    }

    #[tokio::test]
    async fn test_default_duration_limit_applies() {
        let playback = Arc::new(RecordingPlayback::default());
        let handler = PlaySoundHandler::new(playback.clone(), 30);

        handler
            .handle(command(PlaybackMode::Static, None, 48.0))
            .await
            .unwrap();
        let mut shorter = command(PlaybackMode::Static, None, 48.0);
        shorter.max_duration_secs = Some(5);
        handler.handle(shorter).await.unwrap();

        let requests = playback.requests.lock().unwrap();
        assert_eq!(requests[0].duration_limit, DurationLimit::from_secs(30));
        assert_eq!(requests[1].duration_limit, DurationLimit::from_secs(5));
    }

    #[tokio::test]
    async fn test_request_cannot_exceed_configured_limit() {
        let playback = Arc::new(RecordingPlayback::default());
        let handler = PlaySoundHandler::new(playback.clone(), 30);

        let mut unbounded = command(PlaybackMode::Static, None, 48.0);
        unbounded.max_duration_secs = Some(0);
        handler.handle(unbounded).await.unwrap();

        let mut longer = command(PlaybackMode::Static, None, 48.0);
        longer.max_duration_secs = Some(600);
        handler.handle(longer).await.unwrap();

        // 未配置上限时请求可以自行设置或不限制
        let open_handler = PlaySoundHandler::new(playback.clone(), 0);
        let mut limited = command(PlaybackMode::Static, None, 48.0);
        limited.max_duration_secs = Some(600);
        open_handler.handle(limited).await.unwrap();
        open_handler
            .handle(command(PlaybackMode::Static, None, 48.0))
            .await
            .unwrap();

        let requests = playback.requests.lock().unwrap();
        assert_eq!(requests[0].duration_limit, DurationLimit::from_secs(30));
        assert_eq!(requests[1].duration_limit, DurationLimit::from_secs(30));
        assert_eq!(requests[2].duration_limit, DurationLimit::from_secs(600));
        assert_eq!(requests[3].duration_limit, DurationLimit::Unbounded);
    }

    #[tokio::test]
    async fn test_stop_not_playing() {
        let handler = StopSoundHandler::new(Arc::new(RecordingPlayback::default()));
        let response = handler
            .handle(StopSoundCommand {
                sound_id: SoundId::new(),
            })
            .await;
        assert!(!response.stopped);
        assert!(response.handle.is_none());
    }
}
