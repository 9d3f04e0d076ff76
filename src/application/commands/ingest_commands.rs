//! Ingest Commands - 导入相关命令

use crate::domain::ingest::{IngestSourceKind, IngestState};
use crate::domain::sound::SoundId;

/// 从 URL 导入
#[derive(Debug, Clone)]
pub struct IngestFromUrlCommand {
    pub url: String,
}

/// 从上传目录导入
#[derive(Debug, Clone)]
pub struct IngestServerFileCommand {
    pub file_name: String,
}

/// 投递箱第一阶段：分配 id 并返回上传地址
#[derive(Debug, Clone, Default)]
pub struct CreateDropboxUploadCommand;

/// 投递箱第二阶段：抓取已上传的文件
#[derive(Debug, Clone)]
pub struct ConfirmDropboxUploadCommand {
    pub sound_id: SoundId,
}

/// 导入已受理
#[derive(Debug, Clone)]
pub struct IngestAcceptedResponse {
    pub sound_id: SoundId,
    pub source: IngestSourceKind,
    pub state: IngestState,
}

/// 投递箱上传地址
#[derive(Debug, Clone)]
pub struct DropboxUploadResponse {
    pub sound_id: SoundId,
    pub upload_url: String,
}
