//! Playback Layer - 播放频道管理

mod channel_manager;

pub use channel_manager::{PlaybackChannelManager, ReplayPolicy};
