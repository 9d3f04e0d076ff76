//! Playback Context - 播放限界上下文
//!
//! 职责:
//! - 频道句柄、播放模式、范围与时长上限
//! - 播放会话（PlaybackSession）

mod session;
mod value_objects;

pub use session::PlaybackSession;
pub use value_objects::{
    ChannelHandle, DurationLimit, ListenerId, Location, PlaybackMode, PlaybackTarget, Range,
};
