//! Playback Query Handlers

use std::sync::Arc;

use crate::application::ports::PlaybackPort;
use crate::application::queries::playback_queries::{FindChannelQuery, FindChannelResponse};

/// FindChannel Handler
pub struct FindChannelHandler {
    playback: Arc<dyn PlaybackPort>,
}

impl FindChannelHandler {
    pub fn new(playback: Arc<dyn PlaybackPort>) -> Self {
        Self { playback }
    }

    pub fn handle(&self, query: FindChannelQuery) -> FindChannelResponse {
        let handle = self.playback.find_channel(query.sound_id);
        let session = handle.and_then(|handle| {
            self.playback
                .sessions()
                .into_iter()
                .find(|s| s.sound_id() == query.sound_id && s.handle() == handle)
        });

        FindChannelResponse {
            sound_id: query.sound_id,
            handle,
            session,
        }
    }
}
