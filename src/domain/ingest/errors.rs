//! Ingest Context - Errors

use thiserror::Error;

use super::IngestState;
use crate::domain::sound::SoundId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestJobError {
    #[error("正在抓取上传的文件: {0}")]
    AlreadyFetching(SoundId),

    #[error("音频已经导入完成: {0}")]
    AlreadyStored(SoundId),

    #[error("任务 {0} 不在抓取状态 (当前: {1})")]
    NotFetching(SoundId, IngestState),
}
