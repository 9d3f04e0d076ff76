//! Filebin Client - 投递箱适配器
//!
//! 实现 DropboxPort trait
//!
//! Filebin API:
//! GET {base}/{bin}            (Accept: application/json) → bin 信息与文件列表
//! GET {base}/{bin}/{filename} → 文件内容

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

use crate::application::ports::{DropboxPort, IngestError};
use crate::domain::sound::SoundId;

/// Filebin bin 响应
#[derive(Debug, Deserialize)]
struct BinResponse {
    #[serde(default)]
    files: Vec<BinFile>,
}

#[derive(Debug, Deserialize)]
struct BinFile {
    filename: String,
    #[serde(default)]
    bytes: u64,
}

/// Filebin 客户端配置
#[derive(Debug, Clone)]
pub struct FilebinClientConfig {
    /// Filebin 服务基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for FilebinClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://filebin.net".to_string(),
            timeout_secs: 30,
        }
    }
}

impl FilebinClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Filebin 客户端
pub struct FilebinClient {
    client: Client,
    base_url: Url,
}

impl FilebinClient {
    pub fn new(config: FilebinClientConfig) -> Result<Self, IngestError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| IngestError::IoFailure(format!("Invalid filebin URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(IngestError::IoFailure(format!(
                "Invalid filebin URL: {}",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| IngestError::IoFailure(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// `{base}/{segments...}`
    fn url_for(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        url
    }
}

#[async_trait]
impl DropboxPort for FilebinClient {
    fn upload_url(&self, id: SoundId) -> String {
        self.url_for(&[&id.to_string()]).to_string()
    }

    async fn resolve_download(&self, id: SoundId) -> Result<String, IngestError> {
        let bin = id.to_string();
        let bin_url = self.url_for(&[&bin]);

        let response = self
            .client
            .get(bin_url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(sound_id = %id, error = %e, "Filebin request failed");
                if e.is_connect() {
                    IngestError::UnreachableHost(
                        bin_url.host_str().unwrap_or_default().to_string(),
                    )
                } else {
                    IngestError::IoFailure(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(sound_id = %id, "Filebin bin does not exist yet");
            return Err(IngestError::NothingUploadedYet);
        }
        if !status.is_success() {
            tracing::warn!(sound_id = %id, status = %status, "Filebin responded with error");
            return Err(IngestError::DownloadFailed {
                status: status.as_u16(),
            });
        }

        let body: BinResponse = response.json().await.map_err(|e| {
            tracing::warn!(sound_id = %id, error = %e, "Invalid filebin response");
            IngestError::IoFailure(format!("Invalid filebin response: {}", e))
        })?;

        let file = body
            .files
            .into_iter()
            .find(|f| !f.filename.is_empty())
            .ok_or(IngestError::NothingUploadedYet)?;

        tracing::debug!(
            sound_id = %id,
            filename = %file.filename,
            bytes = file.bytes,
            "Filebin upload found"
        );

        Ok(self.url_for(&[&bin, &file.filename]).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, http::StatusCode, routing::get, Json, Router};
    use serde_json::json;
    use std::net::SocketAddr;

    async fn fake_filebin(filled: SoundId, empty: SoundId) -> SocketAddr {
        let app = Router::new().route(
            "/:bin",
            get(move |Path(bin): Path<String>| async move {
                if bin == filled.to_string() {
                    Ok(Json(json!({
                        "bin": { "id": bin },
                        "files": [{ "filename": "my song.mp3", "bytes": 417 }]
                    })))
                } else if bin == empty.to_string() {
                    Ok(Json(json!({ "bin": { "id": bin }, "files": [] })))
                } else {
                    Err(StatusCode::NOT_FOUND)
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[test]
    fn test_upload_url() {
        let client = FilebinClient::new(FilebinClientConfig::new("https://filebin.net/")).unwrap();
        let id = SoundId::new();
        assert_eq!(client.upload_url(id), format!("https://filebin.net/{}", id));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(FilebinClient::new(FilebinClientConfig::new("not a url")).is_err());
    }

    #[tokio::test]
    async fn test_resolve_download() {
        let filled = SoundId::new();
        let empty = SoundId::new();
        let addr = fake_filebin(filled, empty).await;
        let client = FilebinClient::new(FilebinClientConfig::new(format!("http://{}", addr))).unwrap();

        let url = client.resolve_download(filled).await.unwrap();
        assert_eq!(url, format!("http://{}/{}/my%20song.mp3", addr, filled));

        assert_eq!(
            client.resolve_download(empty).await.unwrap_err(),
            IngestError::NothingUploadedYet
        );
        assert_eq!(
            client.resolve_download(SoundId::new()).await.unwrap_err(),
            IngestError::NothingUploadedYet
        );
    }
}
