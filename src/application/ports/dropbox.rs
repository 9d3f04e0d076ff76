//! Dropbox Port - 投递箱（Filebin）

use async_trait::async_trait;

use super::IngestError;
use crate::domain::sound::SoundId;

/// Dropbox Port
///
/// 第一阶段给出上传地址，第二阶段把已上传的文件解析成可下载的 URL
#[async_trait]
pub trait DropboxPort: Send + Sync {
    /// 上传地址: `<base>/<id>`
    fn upload_url(&self, id: SoundId) -> String;

    /// 找到投递箱中的文件并返回其下载地址
    ///
    /// 投递箱不存在或为空时返回 NothingUploadedYet
    async fn resolve_download(&self, id: SoundId) -> Result<String, IngestError>;
}
