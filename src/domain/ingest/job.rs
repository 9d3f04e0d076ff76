//! Ingest Context - Job Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::IngestJobError;
use crate::domain::sound::SoundId;

/// 导入来源类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestSourceKind {
    Url,
    ServerFile,
    Dropbox,
}

impl IngestSourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestSourceKind::Url => "url",
            IngestSourceKind::ServerFile => "server_file",
            IngestSourceKind::Dropbox => "dropbox",
        }
    }
}

impl std::fmt::Display for IngestSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 导入任务状态
///
/// ```text
/// AwaitingUpload ──confirm──▶ Fetching ──▶ Stored
///       ▲                        │
///       └──nothing uploaded──────┤
///                                ▼
///                              Failed ──confirm──▶ Fetching
/// ```
///
/// AwaitingUpload 只出现在投递箱流程中
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestState {
    AwaitingUpload,
    Fetching,
    Stored,
    Failed,
}

impl IngestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestState::AwaitingUpload => "awaiting_upload",
            IngestState::Fetching => "fetching",
            IngestState::Stored => "stored",
            IngestState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, IngestState::Stored | IngestState::Failed)
    }
}

impl std::fmt::Display for IngestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 导入任务
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestJob {
    sound_id: SoundId,
    source: IngestSourceKind,
    state: IngestState,
    error_kind: Option<String>,
    error_message: Option<String>,
    attempts: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl IngestJob {
    /// 直接开始抓取的任务（URL / 服务器文件）
    pub fn started(sound_id: SoundId, source: IngestSourceKind) -> Self {
        let now = Utc::now();
        Self {
            sound_id,
            source,
            state: IngestState::Fetching,
            error_kind: None,
            error_message: None,
            attempts: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// 投递箱第一阶段：等待用户上传
    pub fn awaiting_upload(sound_id: SoundId) -> Self {
        let now = Utc::now();
        Self {
            sound_id,
            source: IngestSourceKind::Dropbox,
            state: IngestState::AwaitingUpload,
            error_kind: None,
            error_message: None,
            attempts: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// 投递箱第二阶段：开始抓取已上传的文件
    pub fn begin_fetch(&mut self) -> Result<(), IngestJobError> {
        match self.state {
            IngestState::AwaitingUpload | IngestState::Failed => {
                self.state = IngestState::Fetching;
                self.error_kind = None;
                self.error_message = None;
                self.attempts += 1;
                self.touch();
                Ok(())
            }
            IngestState::Fetching => Err(IngestJobError::AlreadyFetching(self.sound_id)),
            IngestState::Stored => Err(IngestJobError::AlreadyStored(self.sound_id)),
        }
    }

    pub fn complete(&mut self) -> Result<(), IngestJobError> {
        self.ensure_fetching()?;
        self.state = IngestState::Stored;
        self.touch();
        Ok(())
    }

    pub fn fail(
        &mut self,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<(), IngestJobError> {
        self.ensure_fetching()?;
        self.state = IngestState::Failed;
        self.error_kind = Some(kind.into());
        self.error_message = Some(message.into());
        self.touch();
        Ok(())
    }

    /// 投递箱中还没有文件，回到等待上传
    pub fn back_to_awaiting(
        &mut self,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<(), IngestJobError> {
        self.ensure_fetching()?;
        self.state = IngestState::AwaitingUpload;
        self.error_kind = Some(kind.into());
        self.error_message = Some(message.into());
        self.touch();
        Ok(())
    }

    fn ensure_fetching(&self) -> Result<(), IngestJobError> {
        if self.state == IngestState::Fetching {
            Ok(())
        } else {
            Err(IngestJobError::NotFetching(self.sound_id, self.state))
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    // Getters
    pub fn sound_id(&self) -> SoundId {
        self.sound_id
    }

    pub fn source(&self) -> IngestSourceKind {
        self.source
    }

    pub fn state(&self) -> IngestState {
        self.state
    }

    pub fn error_kind(&self) -> Option<&str> {
        self.error_kind.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
