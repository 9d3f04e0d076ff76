//! Sled 嵌入式存储

mod sound_index;

pub use sound_index::{IndexError, SledSoundIndex};
