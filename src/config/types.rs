//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// URL 下载配置
    #[serde(default)]
    pub download: DownloadConfig,

    /// 投递箱（Filebin）配置
    #[serde(default)]
    pub filebin: FilebinConfig,

    /// 导入流水线配置
    #[serde(default)]
    pub ingest: IngestConfig,

    /// 播放配置
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// 语音传输配置
    #[serde(default)]
    pub voice: VoiceConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 公开访问的 Base URL
    /// 如果未设置，则使用 http://{host}:{port}
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5070
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
        }
    }
}

impl ServerConfig {
    /// 获取公开的 Base URL
    pub fn public_base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| {
            let host = if self.host == "0.0.0.0" {
                "localhost"
            } else {
                &self.host
            };
            format!("http://{}:{}", host, self.port)
        })
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 已导入音频目录
    #[serde(default = "default_sounds_dir")]
    pub sounds_dir: PathBuf,

    /// 服务器暂存文件目录（serverfile 导入来源）
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Sled 索引路径，默认 `<sounds_dir>.sled`
    #[serde(default)]
    pub index_path: Option<PathBuf>,

    /// 单个音频最大大小（字节），默认 20MB
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: u64,

    /// serverfile 导入成功后删除暂存文件
    #[serde(default = "default_delete_staged_files")]
    pub delete_staged_files: bool,
}

fn default_sounds_dir() -> PathBuf {
    PathBuf::from("data/sounds")
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("data/upload")
}

fn default_max_payload_bytes() -> u64 {
    20 * 1024 * 1024 // 20 MB
}

fn default_delete_staged_files() -> bool {
    true
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            sounds_dir: default_sounds_dir(),
            upload_dir: default_upload_dir(),
            index_path: None,
            max_payload_bytes: default_max_payload_bytes(),
            delete_staged_files: default_delete_staged_files(),
        }
    }
}

impl StorageConfig {
    /// 实际使用的索引路径
    pub fn resolved_index_path(&self) -> PathBuf {
        self.index_path
            .clone()
            .unwrap_or_else(|| self.sounds_dir.with_extension("sled"))
    }
}

/// URL 下载配置
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadConfig {
    /// 请求超时时间（秒）
    #[serde(default = "default_download_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_download_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("audioplayer/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_download_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// 投递箱配置
#[derive(Debug, Clone, Deserialize)]
pub struct FilebinConfig {
    /// Filebin 服务基础 URL
    #[serde(default = "default_filebin_url")]
    pub url: String,
}

fn default_filebin_url() -> String {
    "https://filebin.net".to_string()
}

impl Default for FilebinConfig {
    fn default() -> Self {
        Self {
            url: default_filebin_url(),
        }
    }
}

/// 导入流水线配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestConfig {
    /// 最大并发导入数，0 表示不限制
    #[serde(default)]
    pub max_concurrent: usize,
}

/// 播放配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaybackConfig {
    /// 默认播放时长上限（秒），0 表示不限制
    #[serde(default)]
    pub max_duration_secs: u64,

    /// 同一音频再次播放时关闭旧频道
    #[serde(default)]
    pub stop_previous_on_replay: bool,
}

/// 语音传输配置
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceConfig {
    /// 语音传输是否可用
    #[serde(default = "default_voice_enabled")]
    pub enabled: bool,
}

fn default_voice_enabled() -> bool {
    true
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: default_voice_enabled(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
