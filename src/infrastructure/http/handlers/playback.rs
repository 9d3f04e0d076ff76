//! Playback Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{FindChannelQuery, PlaySoundCommand, StopSoundCommand};
use crate::domain::playback::{ListenerId, Location};
use crate::infrastructure::http::dto::{
    ApiResponse, ChannelDto, PlayRequest, PlayResponseDto, SessionDto, SoundIdRequest,
    StopResponseDto,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 播放
pub async fn play(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlayRequest>,
) -> Result<Json<ApiResponse<PlayResponseDto>>, ApiError> {
    let location = req
        .location
        .map(|l| Location::new(l.level, l.x, l.y, l.z))
        .transpose()
        .map_err(|e| ApiError::BadRequest(format!("Invalid location: {}", e)))?;

    let cmd = PlaySoundCommand {
        sound_id: req.sound_id,
        mode: req.mode,
        location,
        range: req.range,
        excluded_listener: req.excluded_listener.map(ListenerId::from_uuid),
        max_duration_secs: req.max_duration_secs,
    };

    let result = state.play_sound_handler.handle(cmd).await?;

    Ok(Json(ApiResponse::success(PlayResponseDto {
        sound_id: result.sound_id,
        handle: result.handle,
        mode: result.mode,
    })))
}

/// 停止播放（未在播放时 stopped = false）
pub async fn stop(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SoundIdRequest>,
) -> Json<ApiResponse<StopResponseDto>> {
    let result = state
        .stop_sound_handler
        .handle(StopSoundCommand {
            sound_id: req.sound_id,
        })
        .await;

    Json(ApiResponse::success(StopResponseDto {
        sound_id: result.sound_id,
        stopped: result.stopped,
        handle: result.handle,
    }))
}

/// 查询当前频道
pub async fn find_channel(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SoundIdRequest>,
) -> Json<ApiResponse<ChannelDto>> {
    let result = state.find_channel_handler.handle(FindChannelQuery {
        sound_id: req.sound_id,
    });

    Json(ApiResponse::success(ChannelDto {
        sound_id: result.sound_id,
        playing: result.handle.is_some(),
        session: result.session.as_ref().map(SessionDto::from),
    }))
}
