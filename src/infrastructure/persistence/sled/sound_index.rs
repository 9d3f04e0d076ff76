//! Sled-based Sound Index Implementation
//!
//! SoundId → 记录元数据。索引可以通过扫描音频目录重建，
//! 打不开的索引会被丢弃并重新创建

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sled::Db;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::domain::sound::{SoundFormat, SoundId, SoundRecord};

const KEY_PREFIX: &str = "sound:";

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// 内部索引条目
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    format: SoundFormat,
    size_bytes: u64,
    path: String,
    duration_ms: Option<u64>,
    checksum: String,
    created_at: i64,
}

impl IndexEntry {
    fn from_record(record: &SoundRecord) -> Self {
        Self {
            format: record.format(),
            size_bytes: record.size_bytes(),
            path: record.path().to_string_lossy().to_string(),
            duration_ms: record.duration_ms(),
            checksum: record.checksum().to_string(),
            created_at: record.created_at().timestamp_millis(),
        }
    }

    fn into_record(self, id: SoundId) -> SoundRecord {
        let created_at: DateTime<Utc> = Utc
            .timestamp_millis_opt(self.created_at)
            .single()
            .unwrap_or_else(Utc::now);
        SoundRecord::restore(
            id,
            self.format,
            self.size_bytes,
            PathBuf::from(self.path),
            self.duration_ms,
            self.checksum,
            created_at,
        )
    }
}

/// Sled 音频索引
pub struct SledSoundIndex {
    db: Db,
    path: PathBuf,
    recreated: bool,
}

impl SledSoundIndex {
    /// 打开索引；失败时删除旧索引并重新创建
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, IndexError> {
        let path = path.as_ref().to_path_buf();

        let (db, recreated) = match sled::open(&path) {
            Ok(db) => (db, false),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Sound index unreadable, recreating"
                );
                if path.exists() {
                    let removed = if path.is_dir() {
                        std::fs::remove_dir_all(&path)
                    } else {
                        std::fs::remove_file(&path)
                    };
                    removed.map_err(|e| IndexError::IoError(e.to_string()))?;
                }
                let db = sled::open(&path).map_err(|e| IndexError::DatabaseError(e.to_string()))?;
                (db, true)
            }
        };

        tracing::info!(
            path = %path.display(),
            entries = db.scan_prefix(KEY_PREFIX).count(),
            recreated = recreated,
            "SledSoundIndex initialized"
        );

        Ok(Self {
            db,
            path,
            recreated,
        })
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 打开时旧索引是否被丢弃
    pub fn was_recreated(&self) -> bool {
        self.recreated
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn key(id: SoundId) -> String {
        format!("{}{}", KEY_PREFIX, id)
    }

    pub fn insert(&self, record: &SoundRecord) -> Result<(), IndexError> {
        let entry = IndexEntry::from_record(record);
        let bytes =
            bincode::serialize(&entry).map_err(|e| IndexError::SerializationError(e.to_string()))?;

        self.db
            .insert(Self::key(record.id()), bytes)
            .map_err(|e| IndexError::DatabaseError(e.to_string()))?;

        tracing::debug!(
            sound_id = %record.id(),
            format = %record.format(),
            size_bytes = record.size_bytes(),
            "Sound indexed"
        );
        Ok(())
    }

    /// 查询记录；无法反序列化的条目视为不存在并被删除
    pub fn get(&self, id: SoundId) -> Result<Option<SoundRecord>, IndexError> {
        let key = Self::key(id);
        match self.db.get(&key) {
            Ok(Some(data)) => match bincode::deserialize::<IndexEntry>(&data) {
                Ok(entry) => Ok(Some(entry.into_record(id))),
                Err(e) => {
                    tracing::warn!(sound_id = %id, error = %e, "Dropping corrupt index entry");
                    let _ = self.db.remove(&key);
                    Ok(None)
                }
            },
            Ok(None) => Ok(None),
            Err(e) => Err(IndexError::DatabaseError(e.to_string())),
        }
    }

    pub fn contains(&self, id: SoundId) -> Result<bool, IndexError> {
        self.db
            .contains_key(Self::key(id))
            .map_err(|e| IndexError::DatabaseError(e.to_string()))
    }

    pub fn remove(&self, id: SoundId) -> Result<Option<SoundRecord>, IndexError> {
        let removed = self
            .db
            .remove(Self::key(id))
            .map_err(|e| IndexError::DatabaseError(e.to_string()))?;

        Ok(removed
            .and_then(|data| bincode::deserialize::<IndexEntry>(&data).ok())
            .map(|entry| entry.into_record(id)))
    }

    /// 全部可读的记录（跳过损坏条目）
    pub fn records(&self) -> Result<Vec<SoundRecord>, IndexError> {
        let mut records = Vec::new();
        for item in self.db.scan_prefix(KEY_PREFIX) {
            let (key, value) = item.map_err(|e| IndexError::DatabaseError(e.to_string()))?;
            let id = std::str::from_utf8(&key[KEY_PREFIX.len()..])
                .ok()
                .and_then(|s| s.parse::<SoundId>().ok());
            let entry = bincode::deserialize::<IndexEntry>(&value).ok();

            match (id, entry) {
                (Some(id), Some(entry)) => records.push(entry.into_record(id)),
                _ => {
                    tracing::warn!(key = %String::from_utf8_lossy(&key), "Skipping corrupt index entry");
                }
            }
        }
        Ok(records)
    }

    /// 删除所有无法解析的条目，返回删除数量
    pub fn purge_corrupt(&self) -> Result<usize, IndexError> {
        let mut corrupt = Vec::new();
        for item in self.db.scan_prefix(KEY_PREFIX) {
            let (key, value) = item.map_err(|e| IndexError::DatabaseError(e.to_string()))?;
            let id_ok = std::str::from_utf8(&key[KEY_PREFIX.len()..])
                .ok()
                .map(|s| s.parse::<SoundId>().is_ok())
                .unwrap_or(false);
            if !id_ok || bincode::deserialize::<IndexEntry>(&value).is_err() {
                corrupt.push(key);
            }
        }

        for key in &corrupt {
            self.db
                .remove(key)
                .map_err(|e| IndexError::DatabaseError(e.to_string()))?;
        }
        Ok(corrupt.len())
    }

    pub fn len(&self) -> usize {
        self.db.scan_prefix(KEY_PREFIX).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 刷新数据库
    pub fn flush(&self) -> Result<(), IndexError> {
        self.db
            .flush()
            .map_err(|e| IndexError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn insert_raw(&self, key: &str, value: &[u8]) {
        self.db.insert(key, value).unwrap();
    }
}
