//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod ingest_handlers;
mod playback_handlers;

pub use ingest_handlers::*;
pub use playback_handlers::*;
