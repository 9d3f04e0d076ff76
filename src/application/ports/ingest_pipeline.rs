//! Ingest Pipeline Port - 异步导入
//!
//! fetch → validate → store 在后台任务中执行，具体实现在 infrastructure/worker 层

use tokio::sync::oneshot;

use super::IngestError;
use crate::domain::ingest::IngestSourceKind;
use crate::domain::sound::{SoundId, SoundRecord, UploadFileName};

/// 导入来源（命令层视角）
#[derive(Debug, Clone)]
pub enum IngestSource {
    Url(String),
    /// 上传目录中的暂存文件
    ServerFile(UploadFileName),
    /// 通过投递箱解析
    Dropbox,
}

impl IngestSource {
    pub fn kind(&self) -> IngestSourceKind {
        match self {
            IngestSource::Url(_) => IngestSourceKind::Url,
            IngestSource::ServerFile(_) => IngestSourceKind::ServerFile,
            IngestSource::Dropbox => IngestSourceKind::Dropbox,
        }
    }
}

pub type IngestOutcome = Result<SoundRecord, IngestError>;

/// 完成回调，恰好调用一次
pub type CompletionCallback = Box<dyn FnOnce(IngestOutcome) + Send + 'static>;

/// Ingest Pipeline Port
pub trait IngestPipelinePort: Send + Sync {
    /// 提交导入，立即返回
    ///
    /// on_complete 恰好被调用一次：成功或带类型的失败；
    /// 流水线关闭或任务被丢弃时收到 Aborted
    fn ingest_async(&self, id: SoundId, source: IngestSource, on_complete: CompletionCallback);

    /// 基于 ingest_async 的便捷接口
    fn ingest(&self, id: SoundId, source: IngestSource) -> oneshot::Receiver<IngestOutcome> {
        let (tx, rx) = oneshot::channel();
        self.ingest_async(
            id,
            source,
            Box::new(move |outcome| {
                let _ = tx.send(outcome);
            }),
        );
        rx
    }
}
