//! File Sound Store - 文件系统音频存储实现
//!
//! 实现 SoundStorePort trait
//!
//! 目录结构:
//! - `<sounds_dir>/<id>.wav` / `<sounds_dir>/<id>.mp3`  已存储的音频
//! - `<sounds_dir>/.<id>.<nonce>.tmp`                  写入中的临时文件

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::application::ports::{
    IngestError, SoundFetcherPort, SoundSource, SoundStorePort, SoundValidatorPort, StoreError,
    StoreStats,
};
use crate::domain::sound::{SoundFormat, SoundId, SoundRecord};
use crate::infrastructure::persistence::SledSoundIndex;

const TEMP_SUFFIX: &str = ".tmp";
const LOCK_STRIPES: usize = 64;

/// 文件存储配置
#[derive(Debug, Clone)]
pub struct FileSoundStoreConfig {
    /// 音频目录
    pub sounds_dir: PathBuf,
    /// 最大 payload 大小（字节）
    pub max_payload_bytes: u64,
}

impl Default for FileSoundStoreConfig {
    fn default() -> Self {
        Self {
            sounds_dir: PathBuf::from("data/sounds"),
            max_payload_bytes: 20 * 1024 * 1024, // 20 MB
        }
    }
}

/// 启动对账结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// 删除的临时文件
    pub temp_removed: u64,
    /// 重新建立索引的文件
    pub reindexed: u64,
    /// 文件已不存在而被删除的索引条目
    pub dropped: u64,
    /// 无法识别格式的文件
    pub invalid: u64,
}

/// 文件系统音频存储
pub struct FileSoundStore {
    sounds_dir: PathBuf,
    max_payload_bytes: u64,
    index: Arc<SledSoundIndex>,
    validator: Arc<dyn SoundValidatorPort>,
    fetcher: Arc<dyn SoundFetcherPort>,
    /// 同一 id 的写入串行化（按 id 分条带）
    write_locks: Vec<Mutex<()>>,
}

impl FileSoundStore {
    /// 创建新的文件存储
    pub async fn new(
        config: FileSoundStoreConfig,
        index: Arc<SledSoundIndex>,
        validator: Arc<dyn SoundValidatorPort>,
        fetcher: Arc<dyn SoundFetcherPort>,
    ) -> Result<Self, StoreError> {
        // 确保目录存在
        fs::create_dir_all(&config.sounds_dir)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        Ok(Self {
            sounds_dir: config.sounds_dir,
            max_payload_bytes: config.max_payload_bytes,
            index,
            validator,
            fetcher,
            write_locks: (0..LOCK_STRIPES).map(|_| Mutex::new(())).collect(),
        })
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 获取存储根目录
    pub fn sounds_dir(&self) -> &Path {
        &self.sounds_dir
    }

    /// `<sounds_dir>/<id>.<ext>`
    pub fn payload_path(&self, id: SoundId, format: SoundFormat) -> PathBuf {
        self.sounds_dir
            .join(format!("{}.{}", id, format.extension()))
    }

    fn temp_path(&self, id: SoundId) -> PathBuf {
        self.sounds_dir
            .join(format!(".{}.{}{}", id, Uuid::new_v4().simple(), TEMP_SUFFIX))
    }

    fn write_lock(&self, id: SoundId) -> &Mutex<()> {
        &self.write_locks[(id.as_uuid().as_u128() % LOCK_STRIPES as u128) as usize]
    }

    fn check_size(&self, size: u64) -> Result<(), IngestError> {
        if size > self.max_payload_bytes {
            return Err(IngestError::PayloadTooLarge {
                limit_bytes: self.max_payload_bytes,
            });
        }
        Ok(())
    }

    /// 读取完整 payload 及格式提示
    async fn read_source(
        &self,
        source: SoundSource,
    ) -> Result<(Vec<u8>, Option<String>), IngestError> {
        match source {
            SoundSource::Url(url) => {
                let fetched = self.fetcher.fetch(&url).await?;
                let hint = fetched.extension_hint();
                Ok((fetched.bytes, hint))
            }
            SoundSource::LocalPath(path) => {
                let display_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());

                let metadata = match fs::metadata(&path).await {
                    Ok(m) if m.is_file() => m,
                    Ok(_) => return Err(IngestError::MissingLocalFile(display_name)),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        return Err(IngestError::MissingLocalFile(display_name))
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to stat local file");
                        return Err(IngestError::IoFailure(e.to_string()));
                    }
                };
                self.check_size(metadata.len())?;

                let data = fs::read(&path).await.map_err(|e| {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to read local file");
                    if e.kind() == std::io::ErrorKind::NotFound {
                        IngestError::MissingLocalFile(display_name.clone())
                    } else {
                        IngestError::IoFailure(e.to_string())
                    }
                })?;
                let hint = path
                    .extension()
                    .map(|ext| ext.to_string_lossy().to_lowercase());
                Ok((data, hint))
            }
            SoundSource::Bytes {
                data,
                extension_hint,
            } => Ok((data, extension_hint)),
        }
    }

    /// 临时文件 + rename 写入，并清理另一种格式的旧文件
    async fn write_payload(
        &self,
        id: SoundId,
        format: SoundFormat,
        data: &[u8],
    ) -> std::io::Result<PathBuf> {
        let final_path = self.payload_path(id, format);
        let temp_path = self.temp_path(id);

        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e);
        }
        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e);
        }

        for other in SoundFormat::ALL.iter().filter(|f| **f != format) {
            let stale = self.payload_path(id, *other);
            match fs::remove_file(&stale).await {
                Ok(()) => {
                    tracing::debug!(sound_id = %id, path = %stale.display(), "Removed stale payload")
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }

        Ok(final_path)
    }

    /// 启动时对账：索引与目录保持一致
    pub async fn reconcile(&self) -> Result<ReconcileReport, StoreError> {
        let mut report = ReconcileReport::default();

        let purged = self
            .index
            .purge_corrupt()
            .map_err(|e| StoreError::Index(e.to_string()))?;
        report.dropped += purged as u64;

        let mut entries = fs::read_dir(&self.sounds_dir)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?
        {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();

            if name.ends_with(TEMP_SUFFIX) {
                if fs::remove_file(&path).await.is_ok() {
                    report.temp_removed += 1;
                }
                continue;
            }

            let Some((id, format)) = Self::parse_payload_name(&name) else {
                continue;
            };

            let indexed = self
                .index
                .get(id)
                .map_err(|e| StoreError::Index(e.to_string()))?;
            if matches!(&indexed, Some(r) if r.path() == path.as_path()) {
                continue;
            }

            let data = match fs::read(&path).await {
                Ok(data) => data,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to read payload during reconcile");
                    continue;
                }
            };

            match self.validator.classify(&data, Some(format.extension())) {
                Ok(info) if info.format == format => {
                    let record = SoundRecord::new(
                        id,
                        format,
                        data.len() as u64,
                        path.clone(),
                        info.duration_ms,
                        SoundRecord::checksum_of(&data),
                    );
                    self.index
                        .insert(&record)
                        .map_err(|e| StoreError::Index(e.to_string()))?;
                    report.reindexed += 1;
                }
                Ok(info) => {
                    tracing::warn!(
                        path = %path.display(),
                        detected = %info.format,
                        "Payload extension does not match content, skipping"
                    );
                    report.invalid += 1;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Unrecognized payload, skipping");
                    report.invalid += 1;
                }
            }
        }

        let records = self
            .index
            .records()
            .map_err(|e| StoreError::Index(e.to_string()))?;
        for record in records {
            if !fs::try_exists(record.path()).await.unwrap_or(false) {
                self.index
                    .remove(record.id())
                    .map_err(|e| StoreError::Index(e.to_string()))?;
                report.dropped += 1;
            }
        }

        self.index
            .flush()
            .map_err(|e| StoreError::Index(e.to_string()))?;

        tracing::info!(
            temp_removed = report.temp_removed,
            reindexed = report.reindexed,
            dropped = report.dropped,
            invalid = report.invalid,
            "Sound store reconciled"
        );

        Ok(report)
    }

    /// `<uuid>.<wav|mp3>`
    fn parse_payload_name(name: &str) -> Option<(SoundId, SoundFormat)> {
        let (stem, ext) = name.rsplit_once('.')?;
        let format = SoundFormat::from_extension(ext)?;
        let id = stem.parse::<SoundId>().ok()?;
        Some((id, format))
    }
}

#[async_trait]
impl SoundStorePort for FileSoundStore {
    async fn put(&self, id: SoundId, source: SoundSource) -> Result<SoundRecord, IngestError> {
        let description = source.describe();
        let (data, hint) = self.read_source(source).await?;
        self.check_size(data.len() as u64)?;

        let info = self
            .validator
            .classify(&data, hint.as_deref())
            .map_err(|e| {
                tracing::info!(sound_id = %id, source = %description, error = %e, "Rejected unsupported payload");
                IngestError::UnsupportedFormat(e.to_string())
            })?;

        let _guard = self.write_lock(id).lock().await;

        let path = self
            .write_payload(id, info.format, &data)
            .await
            .map_err(|e| {
                tracing::error!(sound_id = %id, error = %e, "Failed to write payload");
                IngestError::IoFailure(e.to_string())
            })?;

        let record = SoundRecord::new(
            id,
            info.format,
            data.len() as u64,
            path,
            info.duration_ms,
            SoundRecord::checksum_of(&data),
        );

        self.index.insert(&record).map_err(|e| {
            tracing::error!(sound_id = %id, error = %e, "Failed to index sound");
            IngestError::IoFailure(e.to_string())
        })?;

        tracing::info!(
            sound_id = %id,
            format = %record.format(),
            size_bytes = record.size_bytes(),
            source = %description,
            "Sound stored"
        );

        Ok(record)
    }

    async fn get(&self, id: SoundId) -> Result<SoundRecord, StoreError> {
        self.index
            .get(id)
            .map_err(|e| StoreError::Index(e.to_string()))?
            .ok_or(StoreError::NotFound(id))
    }

    async fn contains(&self, id: SoundId) -> bool {
        self.index.contains(id).unwrap_or(false)
    }

    async fn read_payload(&self, id: SoundId) -> Result<Vec<u8>, StoreError> {
        let record = self.get(id).await?;
        fs::read(record.path()).await.map_err(|e| {
            tracing::warn!(sound_id = %id, path = %record.path().display(), error = %e, "Failed to read stored payload");
            StoreError::Io(e.to_string())
        })
    }

    async fn list(&self) -> Result<Vec<SoundRecord>, StoreError> {
        self.index
            .records()
            .map_err(|e| StoreError::Index(e.to_string()))
    }

    async fn stats(&self) -> StoreStats {
        let records = self.index.records().unwrap_or_default();
        StoreStats {
            sound_count: records.len() as u64,
            total_bytes: records.iter().map(|r| r.size_bytes()).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    use crate::application::ports::FetchedPayload;
    use crate::infrastructure::adapters::validator::fixtures::{mp3_bytes, wav_bytes, wav_of_size};
    use crate::infrastructure::adapters::validator::SymphoniaSoundValidator;

    /// 固定返回同一份数据的下载器
    struct StaticFetcher(Result<Vec<u8>, IngestError>);

    #[async_trait]
    impl SoundFetcherPort for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedPayload, IngestError> {
            self.0.clone().map(|bytes| FetchedPayload {
                bytes,
                file_name_hint: url.rsplit('/').next().map(str::to_string),
            })
        }
    }

    async fn store_with(
        dir: &TempDir,
        fetcher: StaticFetcher,
        max_payload_bytes: u64,
    ) -> FileSoundStore {
        let index = SledSoundIndex::open(dir.path().join("index.sled"))
            .unwrap()
            .arc();
        FileSoundStore::new(
            FileSoundStoreConfig {
                sounds_dir: dir.path().join("sounds"),
                max_payload_bytes,
            },
            index,
            Arc::new(SymphoniaSoundValidator::new()),
            Arc::new(fetcher),
        )
        .await
        .unwrap()
    }

    async fn store(dir: &TempDir) -> FileSoundStore {
        store_with(dir, StaticFetcher(Ok(Vec::new())), 10 * 1024 * 1024).await
    }

    fn bytes(data: Vec<u8>) -> SoundSource {
        SoundSource::Bytes {
            data,
            extension_hint: None,
        }
    }

    #[tokio::test]
    async fn test_lookup_of_unknown_id_is_not_found() {
        let dir = tempdir().unwrap();
        let store = store(&dir).await;
        let id = SoundId::new();

        assert!(matches!(store.get(id).await, Err(StoreError::NotFound(_))));
        assert!(!store.contains(id).await);
    }

    #[tokio::test]
    async fn test_local_wav_scenario() {
        let dir = tempdir().unwrap();
        let store = store(&dir).await;
        let source = dir.path().join("upload.wav");
        std::fs::write(&source, wav_of_size(500 * 1024)).unwrap();
        let id = SoundId::new();

        let record = store.put(id, SoundSource::LocalPath(source)).await.unwrap();

        assert_eq!(record.id(), id);
        assert_eq!(record.format(), SoundFormat::Wav);
        assert_eq!(record.path(), store.payload_path(id, SoundFormat::Wav));
        assert!(record.duration_ms().is_some());

        let found = store.get(id).await.unwrap();
        assert_eq!(found, record);
        let payload = store.read_payload(id).await.unwrap();
        assert_eq!(payload.len() as u64, record.size_bytes());
        assert_eq!(SoundRecord::checksum_of(&payload), record.checksum());
    }

    #[tokio::test]
    async fn test_garbage_is_unsupported_for_every_source() {
        let dir = tempdir().unwrap();
        let garbage = b"<html>definitely not audio</html>".to_vec();
        let store = store_with(&dir, StaticFetcher(Ok(garbage.clone())), 1024 * 1024).await;
        let local = dir.path().join("fake.mp3");
        std::fs::write(&local, &garbage).unwrap();

        let sources = vec![
            SoundSource::Url("http://example.com/fake.wav".into()),
            SoundSource::LocalPath(local),
            SoundSource::Bytes {
                data: garbage,
                extension_hint: Some("wav".into()),
            },
        ];

        for source in sources {
            let id = SoundId::new();
            let result = store.put(id, source).await;
            assert!(matches!(result, Err(IngestError::UnsupportedFormat(_))));
            assert!(!store.contains(id).await);
        }
    }

    #[tokio::test]
    async fn test_missing_local_file() {
        let dir = tempdir().unwrap();
        let store = store(&dir).await;

        let result = store
            .put(
                SoundId::new(),
                SoundSource::LocalPath(dir.path().join("nope.wav")),
            )
            .await;
        assert_eq!(
            result.unwrap_err(),
            IngestError::MissingLocalFile("nope.wav".into())
        );
    }

    #[tokio::test]
    async fn test_fetch_errors_pass_through() {
        let dir = tempdir().unwrap();
        let store = store_with(
            &dir,
            StaticFetcher(Err(IngestError::UnreachableHost("nowhere".into()))),
            1024,
        )
        .await;
        let id = SoundId::new();

        let result = store
            .put(id, SoundSource::Url("http://nowhere/a.mp3".into()))
            .await;
        assert!(matches!(result, Err(IngestError::UnreachableHost(_))));
        assert!(matches!(store.get(id).await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_payload_too_large() {
        let dir = tempdir().unwrap();
        let store = store_with(&dir, StaticFetcher(Ok(Vec::new())), 1000).await;

        let result = store.put(SoundId::new(), bytes(wav_bytes(8000, 1, 4000))).await;
        assert_eq!(
            result.unwrap_err(),
            IngestError::PayloadTooLarge { limit_bytes: 1000 }
        );
    }

    #[tokio::test]
    async fn test_reingest_with_other_format_replaces_file() {
        let dir = tempdir().unwrap();
        let store = store(&dir).await;
        let id = SoundId::new();

        store.put(id, bytes(wav_bytes(8000, 1, 800))).await.unwrap();
        let record = store.put(id, bytes(mp3_bytes(10))).await.unwrap();

        assert_eq!(record.format(), SoundFormat::Mp3);
        assert!(store.payload_path(id, SoundFormat::Mp3).exists());
        assert!(!store.payload_path(id, SoundFormat::Wav).exists());
        assert_eq!(store.stats().await.sound_count, 1);
    }

    #[tokio::test]
    async fn test_concurrent_puts_for_same_id_both_succeed() {
        let dir = tempdir().unwrap();
        let store = Arc::new(store(&dir).await);
        let id = SoundId::new();

        let a = {
            let store = store.clone();
            tokio::spawn(async move { store.put(id, bytes(wav_bytes(8000, 1, 800))).await })
        };
        let b = {
            let store = store.clone();
            tokio::spawn(async move { store.put(id, bytes(mp3_bytes(10))).await })
        };

        assert!(a.await.unwrap().is_ok());
        assert!(b.await.unwrap().is_ok());

        let record = store.get(id).await.unwrap();
        assert!(record.path().exists());
        let other = SoundFormat::ALL
            .into_iter()
            .find(|f| *f != record.format())
            .unwrap();
        assert!(!store.payload_path(id, other).exists());
    }

    #[tokio::test]
    async fn test_reconcile_rebuilds_index() {
        let dir = tempdir().unwrap();
        let store = store(&dir).await;

        // 已索引但文件被删除
        let vanished = SoundId::new();
        let record = store
            .put(vanished, bytes(wav_bytes(8000, 1, 800)))
            .await
            .unwrap();
        std::fs::remove_file(record.path()).unwrap();

        // 目录中存在但没有索引
        let orphan = SoundId::new();
        std::fs::write(
            store.payload_path(orphan, SoundFormat::Mp3),
            mp3_bytes(10),
        )
        .unwrap();

        // 残留的临时文件与无法识别的文件
        std::fs::write(
            store.sounds_dir().join(format!(".{}.abc.tmp", SoundId::new())),
            b"partial",
        )
        .unwrap();
        std::fs::write(
            store.payload_path(SoundId::new(), SoundFormat::Wav),
            b"garbage",
        )
        .unwrap();

        let report = store.reconcile().await.unwrap();

        assert_eq!(
            report,
            ReconcileReport {
                temp_removed: 1,
                reindexed: 1,
                dropped: 1,
                invalid: 1,
            }
        );
        assert!(!store.contains(vanished).await);
        assert_eq!(store.get(orphan).await.unwrap().format(), SoundFormat::Mp3);

        // 第二次对账没有变化
        let again = store.reconcile().await.unwrap();
        assert_eq!(again.reindexed, 0);
        assert_eq!(again.dropped, 0);
    }
}
