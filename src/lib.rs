//! Audioplayer - 游戏内音频导入与空间播放服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Sound Context: 音频标识、格式与记录
//! - Ingest Context: 导入任务状态机（投递箱两阶段流程）
//! - Playback Context: 播放目标、范围、时长上限与播放会话
//!
//! 应用层 (application/):
//! - Ports: 端口定义（SoundStore, SoundValidator, SoundFetcher, Dropbox, IngestPipeline,
//!   VoiceTransport, ChannelRegistry, Playback）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API + WebSocket
//! - Adapters: 文件存储, symphonia 格式识别, HTTP 下载, Filebin, 进程内语音传输
//! - Persistence: Sled 音频索引
//! - Memory: ChannelRegistry, IngestTracker 内存实现
//! - Worker: IngestPipeline 后台导入
//! - Playback: PlaybackChannelManager
//! - Events: WebSocket 事件发布

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
