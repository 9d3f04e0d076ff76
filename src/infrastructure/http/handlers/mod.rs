//! HTTP Handlers

mod ping;
mod playback;
mod sound;
mod websocket;

pub use ping::*;
pub use playback::*;
pub use sound::*;
pub use websocket::*;
