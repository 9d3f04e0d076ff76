//! Ingest Tracker Port - 导入任务追踪
//!
//! 定义导入任务状态的抽象接口，所有状态存储在内存中

use thiserror::Error;

use crate::domain::ingest::{IngestJob, IngestJobError};
use crate::domain::sound::SoundId;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Ingest job not found: {0}")]
    NotFound(SoundId),

    #[error("Ingest job already exists: {0}")]
    AlreadyExists(SoundId),

    #[error(transparent)]
    InvalidTransition(#[from] IngestJobError),
}

/// Ingest Tracker Port
pub trait IngestTrackerPort: Send + Sync {
    /// 登记新任务（同一 id 的已有任务会被替换）
    fn track(&self, job: IngestJob);

    /// 仅在 id 尚无任务时登记，返回是否登记成功
    fn track_if_absent(&self, job: IngestJob) -> bool;

    fn get(&self, id: SoundId) -> Option<IngestJob>;

    /// 对任务执行一次状态迁移，返回迁移后的任务
    ///
    /// 迁移在条目锁内完成，同一 id 的并发确认只有一个能成功
    fn transition(
        &self,
        id: SoundId,
        f: &mut dyn FnMut(&mut IngestJob) -> Result<(), IngestJobError>,
    ) -> Result<IngestJob, TrackerError>;

    fn list(&self) -> Vec<IngestJob>;

    /// 清理已结束超过指定秒数的任务，返回清理数量
    fn prune_finished(&self, older_than_secs: u64) -> usize;
}
