//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod channel_registry;
mod dropbox;
mod ingest_pipeline;
mod ingest_tracker;
mod playback;
mod sound_fetcher;
mod sound_store;
mod sound_validator;
mod task_spawner;
mod voice_transport;

pub use channel_registry::ChannelRegistryPort;
pub use dropbox::DropboxPort;
pub use ingest_pipeline::{
    CompletionCallback, IngestOutcome, IngestPipelinePort, IngestSource,
};
pub use ingest_tracker::{IngestTrackerPort, TrackerError};
pub use playback::{PlayError, PlayRequest, PlaybackPort, StopOutcome};
pub use sound_fetcher::{FetchedPayload, SoundFetcherPort};
pub use sound_store::{IngestError, SoundSource, SoundStorePort, StoreError, StoreStats};
pub use sound_validator::{FormatError, SoundInfo, SoundValidatorPort};
pub use task_spawner::TaskSpawnerPort;
pub use voice_transport::{ChannelEvent, OpenChannelRequest, TransportError, VoiceTransportPort};
