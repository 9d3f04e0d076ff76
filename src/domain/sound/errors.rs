//! Sound Context - Errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SoundError {
    #[error("无效的音频 ID: {0}")]
    InvalidId(String),

    #[error("无法识别的音频格式: {0}")]
    UnknownFormat(String),

    #[error("无效的文件名: {0}")]
    InvalidFileName(String),
}
