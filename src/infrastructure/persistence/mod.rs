//! Persistence Layer - 数据持久化
//!
//! Sled 音频索引实现

pub mod sled;

pub use self::sled::{IndexError, SledSoundIndex};
