//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "AUDIOPLAYER";

/// 加载应用配置
///
/// # 环境变量示例
/// - `AUDIOPLAYER_SERVER__PORT=8080`
/// - `AUDIOPLAYER_STORAGE__SOUNDS_DIR=/data/sounds`
/// - `AUDIOPLAYER_FILEBIN__URL=https://filebin.example.com`
/// - `AUDIOPLAYER_PLAYBACK__STOP_PREVIOUS_ON_REPLAY=true`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// config_path 为 None 时搜索 config.toml / config.local.toml
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5070)?
        .set_default("storage.sounds_dir", "data/sounds")?
        .set_default("storage.upload_dir", "data/upload")?
        .set_default("storage.max_payload_bytes", 20 * 1024 * 1024)?
        .set_default("storage.delete_staged_files", true)?
        .set_default("download.timeout_secs", 30)?
        .set_default("filebin.url", "https://filebin.net")?
        .set_default("ingest.max_concurrent", 0)?
        .set_default("playback.max_duration_secs", 0)?
        .set_default("playback.stop_previous_on_replay", false)?
        .set_default("voice.enabled", true)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级），层级分隔符 __
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性，一次报告全部问题
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    let mut problems = Vec::new();

    if config.server.port == 0 {
        problems.push("server.port must not be 0");
    }
    if !(config.filebin.url.starts_with("http://") || config.filebin.url.starts_with("https://")) {
        problems.push("filebin.url must be an http(s) URL");
    }
    if config.storage.max_payload_bytes == 0 {
        problems.push("storage.max_payload_bytes must not be 0");
    }
    if config.download.timeout_secs == 0 {
        problems.push("download.timeout_secs must not be 0");
    }
    if config.storage.sounds_dir == config.storage.upload_dir {
        problems.push("storage.sounds_dir and storage.upload_dir must differ");
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(problems.join("; ")))
    }
}

/// 启动时输出生效的配置
pub fn print_config(config: &AppConfig) {
    tracing::info!(
        listen = %format!("{}:{}", config.server.host, config.server.port),
        public_base_url = %config.server.public_base_url(),
        log_level = %config.log.level,
        "Server configuration"
    );
    tracing::info!(
        sounds_dir = %config.storage.sounds_dir.display(),
        upload_dir = %config.storage.upload_dir.display(),
        index = %config.storage.resolved_index_path().display(),
        max_payload_bytes = config.storage.max_payload_bytes,
        delete_staged_files = config.storage.delete_staged_files,
        "Storage configuration"
    );
    tracing::info!(
        download_timeout_secs = config.download.timeout_secs,
        filebin_url = %config.filebin.url,
        max_concurrent = config.ingest.max_concurrent,
        "Ingest configuration"
    );
    tracing::info!(
        max_duration_secs = config.playback.max_duration_secs,
        stop_previous_on_replay = config.playback.stop_previous_on_replay,
        voice_enabled = config.voice.enabled,
        "Playback configuration"
    );
}
