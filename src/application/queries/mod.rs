//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：处理所有读操作

mod playback_queries;
mod sound_queries;

pub mod handlers;

pub use playback_queries::*;
pub use sound_queries::*;
