//! Memory Layer - In-Memory State Management
//!
//! 实现 ChannelRegistry 和 IngestTracker，管理播放会话和导入任务的内存状态

mod channel_registry;
mod ingest_tracker;

pub use channel_registry::InMemoryChannelRegistry;
pub use ingest_tracker::InMemoryIngestTracker;
