//! Sound Queries - 音频与导入状态查询

use crate::application::ports::StoreStats;
use crate::domain::ingest::IngestJob;
use crate::domain::sound::{SoundId, SoundRecord};

/// 查询音频记录
#[derive(Debug, Clone)]
pub struct LookupSoundQuery {
    pub sound_id: SoundId,
}

/// 记录不存在时 record 为 None
#[derive(Debug, Clone)]
pub struct LookupSoundResponse {
    pub sound_id: SoundId,
    pub record: Option<SoundRecord>,
}

/// 查询导入任务状态
#[derive(Debug, Clone)]
pub struct GetIngestStatusQuery {
    pub sound_id: SoundId,
}

#[derive(Debug, Clone)]
pub struct GetIngestStatusResponse {
    pub job: IngestJob,
    /// 记录是否已在存储中
    pub stored: bool,
}

/// 列出已存储的音频
#[derive(Debug, Clone, Default)]
pub struct ListSoundsQuery;

#[derive(Debug, Clone)]
pub struct ListSoundsResponse {
    pub records: Vec<SoundRecord>,
    pub stats: StoreStats,
}
