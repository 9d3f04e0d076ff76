//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::{IngestError, PlayError, StoreError, TrackerError};
use crate::domain::sound::SoundId;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 音频未找到
    #[error("Sound not found: {0}")]
    SoundNotFound(SoundId),

    /// 导入任务未找到
    #[error("Ingest job not found: {0}")]
    JobNotFound(SoundId),

    /// 语音传输不可用
    #[error("Voice transport unavailable")]
    TransportUnavailable,

    /// 导入失败（kind + 用户提示）
    #[error("{0}")]
    Ingest(IngestError),

    /// 播放失败
    #[error("Playback error: {0}")]
    Playback(String),

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 状态无效
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建状态无效错误
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<IngestError> for ApplicationError {
    fn from(err: IngestError) -> Self {
        Self::Ingest(err)
    }
}

impl From<StoreError> for ApplicationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::SoundNotFound(id),
            other => Self::StorageError(other.to_string()),
        }
    }
}

impl From<PlayError> for ApplicationError {
    fn from(err: PlayError) -> Self {
        match err {
            PlayError::SoundNotFound(id) => Self::SoundNotFound(id),
            PlayError::TransportUnavailable => Self::TransportUnavailable,
            other => Self::Playback(other.to_string()),
        }
    }
}

impl From<TrackerError> for ApplicationError {
    fn from(err: TrackerError) -> Self {
        match err {
            TrackerError::NotFound(id) => Self::JobNotFound(id),
            other => Self::InvalidState(other.to_string()),
        }
    }
}
