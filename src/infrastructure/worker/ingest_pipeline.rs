//! Ingest Pipeline - Background Sound Ingestion
//!
//! 实现 IngestPipelinePort trait
//!
//! 每次导入是一个后台任务: 解析来源 → store.put (fetch → validate → store)
//! 完成回调恰好触发一次，任务在完成前被丢弃时回调收到 Aborted

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{
    CompletionCallback, DropboxPort, IngestError, IngestOutcome, IngestPipelinePort, IngestSource,
    SoundSource, SoundStorePort, TaskSpawnerPort,
};
use crate::domain::sound::SoundId;
use crate::infrastructure::events::EventPublisher;

/// Pipeline 配置
#[derive(Debug, Clone)]
pub struct IngestPipelineConfig {
    /// 服务器暂存文件目录
    pub upload_dir: PathBuf,
    /// 导入成功后删除暂存文件
    pub delete_staged_files: bool,
    /// 最大并发导入数（0 = 不限制）
    pub max_concurrent: usize,
}

impl Default for IngestPipelineConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("data/upload"),
            delete_staged_files: true,
            max_concurrent: 0,
        }
    }
}

/// 完成回调守卫
///
/// finish 之前被 drop 时以 Aborted 调用回调
struct Completion {
    sound_id: SoundId,
    callback: Option<CompletionCallback>,
}

impl Completion {
    fn new(sound_id: SoundId, callback: CompletionCallback) -> Self {
        Self {
            sound_id,
            callback: Some(callback),
        }
    }

    fn finish(mut self, outcome: IngestOutcome) {
        if let Some(callback) = self.callback.take() {
            callback(outcome);
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            tracing::warn!(sound_id = %self.sound_id, "Ingest task dropped before completion");
            callback(Err(IngestError::Aborted));
        }
    }
}

/// 单个导入任务需要的依赖
#[derive(Clone)]
struct IngestStage {
    store: Arc<dyn SoundStorePort>,
    dropbox: Arc<dyn DropboxPort>,
    upload_dir: PathBuf,
    delete_staged_files: bool,
    limiter: Option<Arc<Semaphore>>,
}

impl IngestStage {
    async fn run(self, id: SoundId, source: IngestSource) -> IngestOutcome {
        let _permit = match &self.limiter {
            Some(limiter) => Some(
                limiter
                    .clone()
                    .acquire_owned()
                    .await
                    .map_err(|_| IngestError::Aborted)?,
            ),
            None => None,
        };

        match source {
            IngestSource::Url(url) => self.store.put(id, SoundSource::Url(url)).await,
            IngestSource::ServerFile(name) => {
                let staged = self.upload_dir.join(name.as_str());
                let record = self
                    .store
                    .put(id, SoundSource::LocalPath(staged.clone()))
                    .await?;

                if self.delete_staged_files {
                    if let Err(e) = tokio::fs::remove_file(&staged).await {
                        tracing::warn!(
                            sound_id = %id,
                            path = %staged.display(),
                            error = %e,
                            "Failed to delete staged file"
                        );
                    }
                }
                Ok(record)
            }
            IngestSource::Dropbox => {
                let url = self.dropbox.resolve_download(id).await?;
                tracing::debug!(sound_id = %id, url = %url, "Dropbox upload resolved");
                self.store.put(id, SoundSource::Url(url)).await
            }
        }
    }
}

/// 导入流水线
pub struct IngestPipeline {
    stage: IngestStage,
    spawner: Arc<dyn TaskSpawnerPort>,
    event_publisher: Arc<EventPublisher>,
    cancel: CancellationToken,
}

impl IngestPipeline {
    pub fn new(
        config: IngestPipelineConfig,
        store: Arc<dyn SoundStorePort>,
        dropbox: Arc<dyn DropboxPort>,
        spawner: Arc<dyn TaskSpawnerPort>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        tracing::info!(
            upload_dir = %config.upload_dir.display(),
            delete_staged_files = config.delete_staged_files,
            max_concurrent = config.max_concurrent,
            "IngestPipeline initialized"
        );

        let limiter = (config.max_concurrent > 0)
            .then(|| Arc::new(Semaphore::new(config.max_concurrent)));

        Self {
            stage: IngestStage {
                store,
                dropbox,
                upload_dir: config.upload_dir,
                delete_staged_files: config.delete_staged_files,
                limiter,
            },
            spawner,
            event_publisher,
            cancel: CancellationToken::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 当前未完成的导入数
    pub fn in_flight(&self) -> usize {
        self.spawner.active()
    }

    /// 取消所有进行中的导入（回调收到 Aborted）并等待任务结束
    pub async fn shutdown(&self) {
        tracing::info!(in_flight = self.spawner.active(), "IngestPipeline shutting down");
        self.cancel.cancel();
        if let Some(limiter) = &self.stage.limiter {
            limiter.close();
        }
        self.spawner.wait_idle().await;
        tracing::info!("IngestPipeline stopped");
    }
}

impl IngestPipelinePort for IngestPipeline {
    fn ingest_async(&self, id: SoundId, source: IngestSource, on_complete: CompletionCallback) {
        let completion = Completion::new(id, on_complete);

        if self.cancel.is_cancelled() {
            tracing::debug!(sound_id = %id, "Pipeline stopped, rejecting ingest");
            completion.finish(Err(IngestError::Aborted));
            return;
        }

        let kind = source.kind();
        self.event_publisher.publish_ingest_started(id, kind);
        tracing::info!(sound_id = %id, source = %kind.as_str(), "Ingest submitted");

        let stage = self.stage.clone();
        let cancel = self.cancel.clone();
        let event_publisher = self.event_publisher.clone();

        // completion 随 future 一起移动，future 未被执行就被丢弃时同样会触发回调
        self.spawner.spawn(Box::pin(async move {
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(IngestError::Aborted),
                outcome = stage.run(id, source) => outcome,
            };

            match &outcome {
                Ok(record) => {
                    event_publisher.publish_sound_stored(record);
                }
                Err(e) if e.is_expected() => {
                    tracing::info!(sound_id = %id, kind = e.kind(), "Ingest finished without a sound");
                    event_publisher.publish_ingest_failed(id, e);
                }
                Err(e) => {
                    tracing::warn!(sound_id = %id, kind = e.kind(), error = %e, "Ingest failed");
                    event_publisher.publish_ingest_failed(id, e);
                }
            }

            completion.finish(outcome);
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures_util::future::BoxFuture;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::tempdir;

    use crate::application::ports::{StoreError, StoreStats};
    use crate::domain::sound::{SoundFormat, SoundRecord, UploadFileName};
    use crate::infrastructure::adapters::{
        FileSoundStore, FileSoundStoreConfig, HttpSoundFetcher, HttpSoundFetcherConfig,
        SymphoniaSoundValidator,
    };
    use crate::infrastructure::persistence::SledSoundIndex;
    use crate::infrastructure::worker::TokioTaskSpawner;

    /// 按来源决定结果的存储
    ///
    /// URL 含 "pending" 时永不返回，含 "bad" 时格式错误
    struct ScriptedStore;

    #[async_trait]
    impl SoundStorePort for ScriptedStore {
        async fn put(&self, id: SoundId, source: SoundSource) -> Result<SoundRecord, IngestError> {
            match source {
                SoundSource::Url(url) if url.contains("pending") => {
                    std::future::pending::<()>().await;
                    Err(IngestError::Aborted)
                }
                SoundSource::Url(url) if url.contains("bad") => {
                    Err(IngestError::UnsupportedFormat("no header".into()))
                }
                SoundSource::LocalPath(path) if !path.exists() => Err(
                    IngestError::MissingLocalFile(path.file_name().unwrap().to_string_lossy().into()),
                ),
                _ => Ok(SoundRecord::new(
                    id,
                    SoundFormat::Mp3,
                    3,
                    PathBuf::from(format!("/sounds/{}.mp3", id)),
                    None,
                    SoundRecord::checksum_of(b"abc"),
                )),
            }
        }

        async fn get(&self, id: SoundId) -> Result<SoundRecord, StoreError> {
            Err(StoreError::NotFound(id))
        }

        async fn contains(&self, _id: SoundId) -> bool {
            false
        }

        async fn read_payload(&self, id: SoundId) -> Result<Vec<u8>, StoreError> {
            Err(StoreError::NotFound(id))
        }

        async fn list(&self) -> Result<Vec<SoundRecord>, StoreError> {
            Ok(Vec::new())
        }

        async fn stats(&self) -> StoreStats {
            StoreStats::default()
        }
    }

    struct FixedDropbox(Result<String, IngestError>);

    #[async_trait]
    impl DropboxPort for FixedDropbox {
        fn upload_url(&self, id: SoundId) -> String {
            format!("https://filebin.test/{}", id)
        }

        async fn resolve_download(&self, _id: SoundId) -> Result<String, IngestError> {
            self.0.clone()
        }
    }

    /// 不执行任务直接丢弃
    struct DroppingSpawner;

    #[async_trait]
    impl TaskSpawnerPort for DroppingSpawner {
        fn spawn(&self, task: BoxFuture<'static, ()>) {
            drop(task);
        }

        fn active(&self) -> usize {
            0
        }

        async fn wait_idle(&self) {}
    }

    fn pipeline_with(
        config: IngestPipelineConfig,
        store: Arc<dyn SoundStorePort>,
        dropbox: FixedDropbox,
        spawner: Arc<dyn TaskSpawnerPort>,
    ) -> IngestPipeline {
        IngestPipeline::new(
            config,
            store,
            Arc::new(dropbox),
            spawner,
            EventPublisher::new().arc(),
        )
    }

    fn pipeline() -> IngestPipeline {
        pipeline_with(
            IngestPipelineConfig::default(),
            Arc::new(ScriptedStore),
            FixedDropbox(Err(IngestError::NothingUploadedYet)),
            TokioTaskSpawner::new().arc(),
        )
    }

    #[tokio::test]
    async fn test_callback_fires_exactly_once_on_success() {
        let pipeline = pipeline();
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = tokio::sync::oneshot::channel();
        let id = SoundId::new();

        let counter = calls.clone();
        pipeline.ingest_async(
            id,
            IngestSource::Url("http://example.com/ok.mp3".into()),
            Box::new(move |outcome| {
                counter.fetch_add(1, Ordering::SeqCst);
                let _ = tx.send(outcome);
            }),
        );

        let record = rx.await.unwrap().unwrap();
        assert_eq!(record.id(), id);

        pipeline.shutdown().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_is_reported() {
        let pipeline = pipeline();

        let outcome = pipeline
            .ingest(SoundId::new(), IngestSource::Url("http://example.com/bad".into()))
            .await
            .unwrap();
        assert!(matches!(outcome, Err(IngestError::UnsupportedFormat(_))));
    }

    #[tokio::test]
    async fn test_events_are_published() {
        let publisher = EventPublisher::new().arc();
        let mut rx = publisher.subscribe();
        let pipeline = IngestPipeline::new(
            IngestPipelineConfig::default(),
            Arc::new(ScriptedStore),
            Arc::new(FixedDropbox(Err(IngestError::NothingUploadedYet))),
            TokioTaskSpawner::new().arc(),
            publisher,
        );
        let id = SoundId::new();

        pipeline
            .ingest(id, IngestSource::Url("http://example.com/ok.mp3".into()))
            .await
            .unwrap()
            .unwrap();

        use crate::infrastructure::events::SoundEvent;
        assert!(matches!(rx.recv().await.unwrap(), SoundEvent::IngestStarted { sound_id, .. } if sound_id == id));
        assert!(matches!(rx.recv().await.unwrap(), SoundEvent::SoundStored { sound_id, .. } if sound_id == id));
    }

    #[tokio::test]
    async fn test_shutdown_aborts_in_flight_ingest() {
        let pipeline = pipeline();

        let rx = pipeline.ingest(
            SoundId::new(),
            IngestSource::Url("http://example.com/pending.mp3".into()),
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(pipeline.in_flight(), 1);

        tokio::time::timeout(Duration::from_secs(2), pipeline.shutdown())
            .await
            .unwrap();
        assert_eq!(rx.await.unwrap().unwrap_err(), IngestError::Aborted);

        // 关闭之后的提交直接 Aborted
        let late = pipeline
            .ingest(SoundId::new(), IngestSource::Url("http://example.com/ok.mp3".into()))
            .await
            .unwrap();
        assert_eq!(late.unwrap_err(), IngestError::Aborted);
    }

    #[tokio::test]
    async fn test_max_concurrent_queues_extra_ingests() {
        let pipeline = pipeline_with(
            IngestPipelineConfig {
                max_concurrent: 1,
                ..Default::default()
            },
            Arc::new(ScriptedStore),
            FixedDropbox(Err(IngestError::NothingUploadedYet)),
            TokioTaskSpawner::new().arc(),
        );

        let blocking = pipeline.ingest(
            SoundId::new(),
            IngestSource::Url("http://example.com/pending.mp3".into()),
        );
        tokio::time::sleep(Duration::from_millis(20)).await;

        let mut queued = pipeline.ingest(
            SoundId::new(),
            IngestSource::Url("http://example.com/ok.mp3".into()),
        );
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(queued.try_recv().is_err());
        assert_eq!(pipeline.in_flight(), 2);

        pipeline.shutdown().await;
        assert_eq!(blocking.await.unwrap().unwrap_err(), IngestError::Aborted);
        assert_eq!(queued.await.unwrap().unwrap_err(), IngestError::Aborted);
    }

    #[tokio::test]
    async fn test_dropped_task_resolves_aborted() {
        let pipeline = pipeline_with(
            IngestPipelineConfig::default(),
            Arc::new(ScriptedStore),
            FixedDropbox(Err(IngestError::NothingUploadedYet)),
            Arc::new(DroppingSpawner),
        );

        let outcome = pipeline
            .ingest(SoundId::new(), IngestSource::Url("http://example.com/ok.mp3".into()))
            .await
            .unwrap();
        assert_eq!(outcome.unwrap_err(), IngestError::Aborted);
    }

    #[tokio::test]
    async fn test_server_file_is_deleted_after_success() {
        let dir = tempdir().unwrap();
        let staged = dir.path().join("theme song.mp3");
        std::fs::write(&staged, b"whatever").unwrap();

        let pipeline = pipeline_with(
            IngestPipelineConfig {
                upload_dir: dir.path().to_path_buf(),
                delete_staged_files: true,
                max_concurrent: 1,
            },
            Arc::new(ScriptedStore),
            FixedDropbox(Err(IngestError::NothingUploadedYet)),
            TokioTaskSpawner::new().arc(),
        );

        let name = UploadFileName::parse("theme song.mp3").unwrap();
        pipeline
            .ingest(SoundId::new(), IngestSource::ServerFile(name.clone()))
            .await
            .unwrap()
            .unwrap();
        assert!(!staged.exists());

        let missing = pipeline
            .ingest(SoundId::new(), IngestSource::ServerFile(name))
            .await
            .unwrap();
        assert_eq!(
            missing.unwrap_err(),
            IngestError::MissingLocalFile("theme song.mp3".into())
        );
    }

    #[tokio::test]
    async fn test_dropbox_source() {
        let empty = pipeline();
        let outcome = empty
            .ingest(SoundId::new(), IngestSource::Dropbox)
            .await
            .unwrap();
        assert_eq!(outcome.unwrap_err(), IngestError::NothingUploadedYet);

        let filled = pipeline_with(
            IngestPipelineConfig::default(),
            Arc::new(ScriptedStore),
            FixedDropbox(Ok("https://filebin.test/bin/clip.mp3".into())),
            TokioTaskSpawner::new().arc(),
        );
        let id = SoundId::new();
        let record = filled
            .ingest(id, IngestSource::Dropbox)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.id(), id);
    }

    #[tokio::test]
    async fn test_unreachable_url_leaves_sound_absent() {
        let dir = tempdir().unwrap();
        let index = SledSoundIndex::open(dir.path().join("index.sled"))
            .unwrap()
            .arc();
        let fetcher = HttpSoundFetcher::new(HttpSoundFetcherConfig {
            timeout_secs: 5,
            ..Default::default()
        })
        .unwrap();
        let store: Arc<dyn SoundStorePort> = Arc::new(
            FileSoundStore::new(
                FileSoundStoreConfig {
                    sounds_dir: dir.path().join("sounds"),
                    max_payload_bytes: 1024 * 1024,
                },
                index,
                Arc::new(SymphoniaSoundValidator::new()),
                Arc::new(fetcher),
            )
            .await
            .unwrap(),
        );

        let pipeline = pipeline_with(
            IngestPipelineConfig::default(),
            store.clone(),
            FixedDropbox(Err(IngestError::NothingUploadedYet)),
            TokioTaskSpawner::new().arc(),
        );
        let id = SoundId::new();

        let outcome = pipeline
            .ingest(id, IngestSource::Url("http://127.0.0.1:1/sound.mp3".into()))
            .await
            .unwrap();

        assert!(matches!(outcome, Err(IngestError::UnreachableHost(_))));
        assert!(matches!(store.get(id).await, Err(StoreError::NotFound(_))));
    }
}
