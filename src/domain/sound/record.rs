//! Sound Context - Stored Record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{SoundFormat, SoundId};

/// 已存储的音频记录
///
/// 不变量:
/// - 仅在某个 id 的导入成功完成后存在
/// - 创建后不再修改
/// - format 与 payload 实际编码族一致
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundRecord {
    id: SoundId,
    format: SoundFormat,
    size_bytes: u64,
    path: PathBuf,
    duration_ms: Option<u64>,
    checksum: String,
    created_at: DateTime<Utc>,
}

impl SoundRecord {
    pub fn new(
        id: SoundId,
        format: SoundFormat,
        size_bytes: u64,
        path: PathBuf,
        duration_ms: Option<u64>,
        checksum: String,
    ) -> Self {
        Self {
            id,
            format,
            size_bytes,
            path,
            duration_ms,
            checksum,
            created_at: Utc::now(),
        }
    }

    /// 从持久化索引恢复（保留原始创建时间）
    pub fn restore(
        id: SoundId,
        format: SoundFormat,
        size_bytes: u64,
        path: PathBuf,
        duration_ms: Option<u64>,
        checksum: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            format,
            size_bytes,
            path,
            duration_ms,
            checksum,
            created_at,
        }
    }

    /// 计算 payload 的 MD5 校验和
    pub fn checksum_of(payload: &[u8]) -> String {
        format!("{:x}", md5::compute(payload))
    }

    // Getters
    pub fn id(&self) -> SoundId {
        self.id
    }

    pub fn format(&self) -> SoundFormat {
        self.format
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn duration_ms(&self) -> Option<u64> {
        self.duration_ms
    }

    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_stable_md5() {
        assert_eq!(
            SoundRecord::checksum_of(b""),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
    }

    #[test]
    fn test_record_creation() {
        let id = SoundId::new();
        let record = SoundRecord::new(
            id,
            SoundFormat::Mp3,
            42,
            PathBuf::from("/tmp/sound.mp3"),
            Some(1000),
            SoundRecord::checksum_of(b"abc"),
        );

        assert_eq!(record.id(), id);
        assert_eq!(record.format(), SoundFormat::Mp3);
        assert_eq!(record.size_bytes(), 42);
        assert_eq!(record.duration_ms(), Some(1000));
    }
}
