//! Ingest Context - 导入限界上下文
//!
//! 职责:
//! - 导入任务状态机（URL / 服务器文件 / 投递箱）
//! - 投递箱两阶段确认规则

mod errors;
mod job;

pub use errors::IngestJobError;
pub use job::{IngestJob, IngestSourceKind, IngestState};
