//! In-Memory Channel Registry Implementation

use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::ChannelRegistryPort;
use crate::domain::playback::{ChannelHandle, PlaybackSession};
use crate::domain::sound::SoundId;

/// 内存频道登记表
///
/// 只记录 SoundId → 最近一次播放会话，不延长传输层频道的生命周期
pub struct InMemoryChannelRegistry {
    sessions: DashMap<SoundId, PlaybackSession>,
}

impl InMemoryChannelRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for InMemoryChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelRegistryPort for InMemoryChannelRegistry {
    fn register(&self, session: PlaybackSession) -> Option<PlaybackSession> {
        let sound_id = session.sound_id();
        let handle = session.handle();
        let previous = self.sessions.insert(sound_id, session);
        tracing::debug!(
            sound_id = %sound_id,
            handle = %handle,
            replaced = previous.is_some(),
            "Channel registered"
        );
        previous
    }

    fn find(&self, id: SoundId) -> Option<PlaybackSession> {
        self.sessions.get(&id).map(|s| s.clone())
    }

    fn remove(&self, id: SoundId) -> Option<PlaybackSession> {
        self.sessions.remove(&id).map(|(_, session)| {
            tracing::debug!(sound_id = %id, handle = %session.handle(), "Channel removed");
            session
        })
    }

    fn remove_if_current(&self, id: SoundId, handle: ChannelHandle) -> Option<PlaybackSession> {
        self.sessions
            .remove_if(&id, |_, session| session.handle() == handle)
            .map(|(_, session)| session)
    }

    fn drain(&self) -> Vec<PlaybackSession> {
        let ids: Vec<SoundId> = self.sessions.iter().map(|e| *e.key()).collect();
        ids.into_iter()
            .filter_map(|id| self.sessions.remove(&id).map(|(_, s)| s))
            .collect()
    }

    fn list(&self) -> Vec<PlaybackSession> {
        self.sessions.iter().map(|e| e.value().clone()).collect()
    }

    fn len(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::playback::{DurationLimit, PlaybackTarget, Range};

    fn session(id: SoundId) -> PlaybackSession {
        PlaybackSession::new(
            id,
            ChannelHandle::new(),
            PlaybackTarget::Static,
            Range::new(48.0).unwrap(),
            None,
            DurationLimit::Unbounded,
        )
    }

    #[test]
    fn test_register_overwrites_and_returns_previous() {
        let registry = InMemoryChannelRegistry::new();
        let id = SoundId::new();
        let first = session(id);
        let second = session(id);

        assert!(registry.register(first.clone()).is_none());
        let replaced = registry.register(second.clone()).unwrap();
        assert_eq!(replaced.handle(), first.handle());
        assert_eq!(registry.find(id).unwrap().handle(), second.handle());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_if_current_ignores_stale_handle() {
        let registry = InMemoryChannelRegistry::new();
        let id = SoundId::new();
        let first = session(id);
        let second = session(id);
        registry.register(first.clone());
        registry.register(second.clone());

        assert!(registry.remove_if_current(id, first.handle()).is_none());
        assert!(registry.find(id).is_some());

        let removed = registry.remove_if_current(id, second.handle()).unwrap();
        assert_eq!(removed.handle(), second.handle());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_drain() {
        let registry = InMemoryChannelRegistry::new();
        registry.register(session(SoundId::new()));
        registry.register(session(SoundId::new()));

        assert_eq!(registry.drain().len(), 2);
        assert!(registry.is_empty());
        assert!(registry.remove(SoundId::new()).is_none());
    }
}
