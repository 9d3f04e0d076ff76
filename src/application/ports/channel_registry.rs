//! Channel Registry Port - 播放会话登记
//!
//! SoundId → PlaybackSession 映射，具体实现在 infrastructure/memory 层

use crate::domain::playback::{ChannelHandle, PlaybackSession};
use crate::domain::sound::SoundId;

/// Channel Registry Port
///
/// 每个操作对单个条目是原子的，同一 id 上的并发 play / stop 可线性化
pub trait ChannelRegistryPort: Send + Sync {
    /// 登记会话（覆盖），返回被替换的旧会话
    fn register(&self, session: PlaybackSession) -> Option<PlaybackSession>;

    fn find(&self, id: SoundId) -> Option<PlaybackSession>;

    /// 移除并返回会话
    fn remove(&self, id: SoundId) -> Option<PlaybackSession>;

    /// 仅当条目仍指向该句柄时移除
    fn remove_if_current(&self, id: SoundId, handle: ChannelHandle) -> Option<PlaybackSession>;

    /// 移除全部会话
    fn drain(&self) -> Vec<PlaybackSession>;

    fn list(&self) -> Vec<PlaybackSession>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
