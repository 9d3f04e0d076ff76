//! Audioplayer - 游戏内音频导入与空间播放服务
//!
//! - Domain: sound/, ingest/, playback/ (Bounded Contexts)
//! - Application: commands, queries, ports
//! - Infrastructure: http, adapters, persistence, memory, worker, playback, events

use std::sync::Arc;
use std::time::Duration;

use audioplayer::application::IngestTrackerPort;
use audioplayer::config::{load_config, print_config, AppConfig};
use audioplayer::infrastructure::adapters::{
    FileSoundStore, FileSoundStoreConfig, FilebinClient, FilebinClientConfig, HttpSoundFetcher,
    HttpSoundFetcherConfig, LoopbackVoiceTransport, SymphoniaSoundValidator,
};
use audioplayer::infrastructure::events::EventPublisher;
use audioplayer::infrastructure::http::{AppState, HttpServer, ServerConfig};
use audioplayer::infrastructure::memory::{InMemoryChannelRegistry, InMemoryIngestTracker};
use audioplayer::infrastructure::persistence::SledSoundIndex;
use audioplayer::infrastructure::playback::{PlaybackChannelManager, ReplayPolicy};
use audioplayer::infrastructure::worker::{IngestPipeline, IngestPipelineConfig, TokioTaskSpawner};

/// 已结束的导入任务保留时间
const FINISHED_JOB_RETENTION_SECS: u64 = 3600;
const JOB_PRUNE_INTERVAL: Duration = Duration::from_secs(600);

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},audioplayer={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);
    tracing::info!("Audioplayer - sound ingestion and playback service");
    print_config(&config);

    // 确保数据目录存在
    tokio::fs::create_dir_all(&config.storage.sounds_dir).await?;
    tokio::fs::create_dir_all(&config.storage.upload_dir).await?;

    // 音频索引（损坏时重建）
    let index = SledSoundIndex::open(config.storage.resolved_index_path())?.arc();
    if index.was_recreated() {
        tracing::warn!(path = %index.path().display(), "Sound index was recreated, rebuilding from disk");
    }

    // 存储适配器
    let fetcher = HttpSoundFetcher::new(HttpSoundFetcherConfig {
        timeout_secs: config.download.timeout_secs,
        max_payload_bytes: config.storage.max_payload_bytes,
        user_agent: config.download.user_agent.clone(),
    })?;
    let store = FileSoundStore::new(
        FileSoundStoreConfig {
            sounds_dir: config.storage.sounds_dir.clone(),
            max_payload_bytes: config.storage.max_payload_bytes,
        },
        index.clone(),
        Arc::new(SymphoniaSoundValidator::new()),
        Arc::new(fetcher),
    )
    .await?
    .arc();
    store.reconcile().await?;

    // 投递箱
    let dropbox = Arc::new(FilebinClient::new(
        FilebinClientConfig::new(&config.filebin.url).with_timeout(config.download.timeout_secs),
    )?);

    // 事件发布器
    let event_publisher = EventPublisher::new().arc();

    // 导入流水线
    let pipeline = IngestPipeline::new(
        IngestPipelineConfig {
            upload_dir: config.storage.upload_dir.clone(),
            delete_staged_files: config.storage.delete_staged_files,
            max_concurrent: config.ingest.max_concurrent,
        },
        store.clone(),
        dropbox.clone(),
        TokioTaskSpawner::new().arc(),
        event_publisher.clone(),
    )
    .arc();

    // 播放频道管理
    let (transport, channel_events) = LoopbackVoiceTransport::new(config.voice.enabled);
    let playback = PlaybackChannelManager::new(
        store.clone(),
        InMemoryChannelRegistry::new().arc(),
        transport.arc(),
        event_publisher.clone(),
        ReplayPolicy::from_stop_previous(config.playback.stop_previous_on_replay),
    )
    .arc();
    playback.spawn_event_loop(channel_events);

    // 导入任务状态，定期清理已结束的任务
    let tracker = InMemoryIngestTracker::new().arc();
    {
        let tracker = tracker.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(JOB_PRUNE_INTERVAL);
            loop {
                interval.tick().await;
                tracker.prune_finished(FINISHED_JOB_RETENTION_SECS);
            }
        });
    }

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(
        store,
        tracker,
        pipeline.clone(),
        dropbox,
        playback.clone(),
        event_publisher,
        config.playback.max_duration_secs,
    );

    let server = HttpServer::bind(&server_config, state).await?;
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    // 依次关闭：导入 → 播放 → 索引落盘
    pipeline.shutdown().await;
    playback.shutdown().await;
    if let Err(e) = index.flush() {
        tracing::error!(error = %e, "Failed to flush sound index");
    }

    tracing::info!("Server shutdown complete");

    Ok(())
}
