//! Domain Layer - 领域层
//!
//! 包含三个限界上下文:
//! - Sound Context: 音频标识、格式与存储记录
//! - Ingest Context: 导入任务状态
//! - Playback Context: 播放会话

pub mod ingest;
pub mod playback;
pub mod sound;
