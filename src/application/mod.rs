//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（SoundStore、IngestPipeline、VoiceTransport、Playback 等）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Ingest commands
    ConfirmDropboxUploadCommand,
    CreateDropboxUploadCommand,
    DropboxUploadResponse,
    IngestAcceptedResponse,
    IngestFromUrlCommand,
    IngestServerFileCommand,
    // Playback commands
    PlaySoundCommand,
    PlaySoundResponse,
    StopSoundCommand,
    StopSoundResponse,
    // Handlers
    handlers::{
        ConfirmDropboxUploadHandler, CreateDropboxUploadHandler, IngestFromUrlHandler,
        IngestServerFileHandler, PlaySoundHandler, StopSoundHandler,
    },
};

pub use error::ApplicationError;

pub use ports::{
    // Channel registry
    ChannelRegistryPort,
    // Dropbox
    DropboxPort,
    // Ingest pipeline
    CompletionCallback,
    IngestOutcome,
    IngestPipelinePort,
    IngestSource,
    // Ingest tracker
    IngestTrackerPort,
    TrackerError,
    // Playback
    PlayError,
    PlayRequest,
    PlaybackPort,
    StopOutcome,
    // Sound fetcher
    FetchedPayload,
    SoundFetcherPort,
    // Sound store
    IngestError,
    SoundSource,
    SoundStorePort,
    StoreError,
    StoreStats,
    // Sound validator
    FormatError,
    SoundInfo,
    SoundValidatorPort,
    // Task spawner
    TaskSpawnerPort,
    // Voice transport
    ChannelEvent,
    OpenChannelRequest,
    TransportError,
    VoiceTransportPort,
};

pub use queries::{
    // Playback queries
    FindChannelQuery,
    FindChannelResponse,
    // Sound queries
    GetIngestStatusQuery,
    GetIngestStatusResponse,
    ListSoundsQuery,
    ListSoundsResponse,
    LookupSoundQuery,
    LookupSoundResponse,
    // Handlers
    handlers::{FindChannelHandler, GetIngestStatusHandler, ListSoundsHandler, LookupSoundHandler},
};
