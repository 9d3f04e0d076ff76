//! Sound Fetcher Port - 远程下载

use async_trait::async_trait;

use super::IngestError;

/// 下载结果
#[derive(Debug, Clone)]
pub struct FetchedPayload {
    pub bytes: Vec<u8>,
    /// URL 路径最后一段，用作格式提示
    pub file_name_hint: Option<String>,
}

impl FetchedPayload {
    pub fn extension_hint(&self) -> Option<String> {
        self.file_name_hint
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_lowercase())
    }
}

/// Sound Fetcher Port
///
/// 失败分类: 主机不可达 → UnreachableHost，非 2xx → DownloadFailed，
/// 超过大小上限 → PayloadTooLarge，其它 → IoFailure
#[async_trait]
pub trait SoundFetcherPort: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPayload, IngestError>;
}
