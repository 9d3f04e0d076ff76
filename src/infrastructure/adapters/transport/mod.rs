//! Voice Transport 适配器

mod loopback_transport;

pub use loopback_transport::LoopbackVoiceTransport;
