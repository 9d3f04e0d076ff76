//! Sound Store Port - 音频存储
//!
//! 按 SoundId 寻址的音频持久化抽象，具体实现为 payload 文件 + Sled 索引

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::sound::{SoundId, SoundRecord};

/// 导入失败原因
///
/// 每种失败都有稳定的 kind 字符串和面向用户的提示，底层错误原文只进日志
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error("Unreachable host: {0}")]
    UnreachableHost(String),

    #[error("Download failed with HTTP status {status}")]
    DownloadFailed { status: u16 },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Missing local file: {0}")]
    MissingLocalFile(String),

    #[error("Payload too large, limit {limit_bytes} bytes")]
    PayloadTooLarge { limit_bytes: u64 },

    #[error("Nothing uploaded yet")]
    NothingUploadedYet,

    #[error("IO failure: {0}")]
    IoFailure(String),

    #[error("Ingestion aborted")]
    Aborted,
}

impl IngestError {
    pub fn kind(&self) -> &'static str {
        match self {
            IngestError::UnreachableHost(_) => "unreachable_host",
            IngestError::DownloadFailed { .. } => "download_failed",
            IngestError::UnsupportedFormat(_) => "unsupported_format",
            IngestError::MissingLocalFile(_) => "missing_local_file",
            IngestError::PayloadTooLarge { .. } => "payload_too_large",
            IngestError::NothingUploadedYet => "nothing_uploaded_yet",
            IngestError::IoFailure(_) => "io_failure",
            IngestError::Aborted => "aborted",
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            IngestError::UnreachableHost(_) => "Failed to download sound: Unknown host".to_string(),
            IngestError::DownloadFailed { status } => {
                format!("Failed to download sound: Server responded with status {}", status)
            }
            IngestError::UnsupportedFormat(_) => {
                "Failed to download sound: Invalid file format".to_string()
            }
            IngestError::MissingLocalFile(name) => format!("Could not find file {}.", name),
            IngestError::PayloadTooLarge { limit_bytes } => format!(
                "Failed to download sound: File exceeds the maximum size of {} bytes",
                limit_bytes
            ),
            IngestError::NothingUploadedYet => {
                "Nothing has been uploaded yet, upload a file and try again".to_string()
            }
            IngestError::IoFailure(_) => "Failed to store sound: Internal IO error".to_string(),
            IngestError::Aborted => "Sound ingestion was aborted".to_string(),
        }
    }

    /// 可预期的结果，而不是故障
    pub fn is_expected(&self) -> bool {
        matches!(self, IngestError::NothingUploadedYet)
    }
}

/// 音频来源
#[derive(Debug, Clone)]
pub enum SoundSource {
    /// 远程 URL，由 SoundFetcherPort 下载
    Url(String),
    /// 本地文件
    LocalPath(PathBuf),
    /// 内存中的数据
    Bytes {
        data: Vec<u8>,
        extension_hint: Option<String>,
    },
}

impl SoundSource {
    pub fn describe(&self) -> String {
        match self {
            SoundSource::Url(url) => url.clone(),
            SoundSource::LocalPath(path) => path.display().to_string(),
            SoundSource::Bytes { data, .. } => format!("<{} bytes>", data.len()),
        }
    }
}

/// 存储查询错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Sound not found: {0}")]
    NotFound(SoundId),

    #[error("Index error: {0}")]
    Index(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// 存储统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub sound_count: u64,
    pub total_bytes: u64,
}

/// Sound Store Port
///
/// - 不同 id 的并发 put 互不影响
/// - 同一 id 的并发 put 后写者胜出，两次都返回成功
#[async_trait]
pub trait SoundStorePort: Send + Sync {
    /// 读取完整 payload，校验格式后写入 `<sounds_dir>/<id>.<ext>` 并更新索引
    async fn put(&self, id: SoundId, source: SoundSource) -> Result<SoundRecord, IngestError>;

    /// 纯本地查询
    async fn get(&self, id: SoundId) -> Result<SoundRecord, StoreError>;

    async fn contains(&self, id: SoundId) -> bool;

    /// 读取已存储的 payload（播放时使用）
    async fn read_payload(&self, id: SoundId) -> Result<Vec<u8>, StoreError>;

    async fn list(&self) -> Result<Vec<SoundRecord>, StoreError>;

    async fn stats(&self) -> StoreStats;
}
