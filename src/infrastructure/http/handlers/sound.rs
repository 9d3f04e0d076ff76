//! Sound Handlers - 导入与查询

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{
    ConfirmDropboxUploadCommand, CreateDropboxUploadCommand, GetIngestStatusQuery,
    IngestAcceptedResponse, IngestFromUrlCommand, IngestServerFileCommand, ListSoundsQuery,
    LookupSoundQuery,
};
use crate::infrastructure::http::dto::{
    ApiResponse, DropboxUploadDto, IngestAcceptedDto, IngestServerFileRequest, IngestStatusDto,
    IngestUrlRequest, LookupSoundDto, SoundIdRequest, SoundListDto, SoundRecordDto,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

fn accepted(result: IngestAcceptedResponse) -> Json<ApiResponse<IngestAcceptedDto>> {
    Json(ApiResponse::success(IngestAcceptedDto {
        sound_id: result.sound_id,
        source: result.source.as_str().to_string(),
        state: result.state.as_str().to_string(),
    }))
}

/// 从 URL 导入
pub async fn ingest_url(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IngestUrlRequest>,
) -> Result<Json<ApiResponse<IngestAcceptedDto>>, ApiError> {
    let result = state
        .ingest_url_handler
        .handle(IngestFromUrlCommand { url: req.url })?;
    Ok(accepted(result))
}

/// 从上传目录导入
pub async fn ingest_server_file(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IngestServerFileRequest>,
) -> Result<Json<ApiResponse<IngestAcceptedDto>>, ApiError> {
    let result = state
        .ingest_server_file_handler
        .handle(IngestServerFileCommand {
            file_name: req.file_name,
        })?;
    Ok(accepted(result))
}

/// 投递箱第一阶段
pub async fn create_filebin_upload(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<DropboxUploadDto>> {
    let result = state
        .create_dropbox_upload_handler
        .handle(CreateDropboxUploadCommand);

    Json(ApiResponse::success(DropboxUploadDto {
        sound_id: result.sound_id,
        upload_url: result.upload_url,
    }))
}

/// 投递箱第二阶段
pub async fn confirm_filebin_upload(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SoundIdRequest>,
) -> Result<Json<ApiResponse<IngestAcceptedDto>>, ApiError> {
    let result = state
        .confirm_dropbox_upload_handler
        .handle(ConfirmDropboxUploadCommand {
            sound_id: req.sound_id,
        })?;
    Ok(accepted(result))
}

/// 导入任务状态
pub async fn ingest_status(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SoundIdRequest>,
) -> Result<Json<ApiResponse<IngestStatusDto>>, ApiError> {
    let result = state
        .ingest_status_handler
        .handle(GetIngestStatusQuery {
            sound_id: req.sound_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(IngestStatusDto::new(
        &result.job,
        result.stored,
    ))))
}

/// 查询音频记录
pub async fn lookup_sound(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SoundIdRequest>,
) -> Result<Json<ApiResponse<LookupSoundDto>>, ApiError> {
    let result = state
        .lookup_sound_handler
        .handle(LookupSoundQuery {
            sound_id: req.sound_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(LookupSoundDto {
        sound_id: result.sound_id,
        found: result.record.is_some(),
        record: result.record.as_ref().map(SoundRecordDto::from),
    })))
}

/// 列出已存储的音频
pub async fn list_sounds(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SoundListDto>>, ApiError> {
    let result = state.list_sounds_handler.handle(ListSoundsQuery).await?;

    Ok(Json(ApiResponse::success(SoundListDto {
        count: result.stats.sound_count,
        total_bytes: result.stats.total_bytes,
        sounds: result.records.iter().map(SoundRecordDto::from).collect(),
    })))
}
