//! HTTP Sound Fetcher - 通过 HTTP 下载音频
//!
//! 实现 SoundFetcherPort trait

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::application::ports::{FetchedPayload, IngestError, SoundFetcherPort};

/// HTTP 下载配置
#[derive(Debug, Clone)]
pub struct HttpSoundFetcherConfig {
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 最大下载大小（字节）
    pub max_payload_bytes: u64,
    pub user_agent: String,
}

impl Default for HttpSoundFetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_payload_bytes: 20 * 1024 * 1024,
            user_agent: concat!("audioplayer/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// HTTP 音频下载器
pub struct HttpSoundFetcher {
    client: Client,
    config: HttpSoundFetcherConfig,
}

impl HttpSoundFetcher {
    pub fn new(config: HttpSoundFetcherConfig) -> Result<Self, IngestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| IngestError::IoFailure(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn with_default_config() -> Result<Self, IngestError> {
        Self::new(HttpSoundFetcherConfig::default())
    }

    /// 底层错误分类，原文只进日志
    fn classify_error(url: &str, e: reqwest::Error) -> IngestError {
        if e.is_connect() {
            tracing::warn!(url = %url, error = %e, "Host unreachable");
            let host = reqwest::Url::parse(url)
                .ok()
                .and_then(|u| u.host_str().map(str::to_string))
                .unwrap_or_else(|| url.to_string());
            IngestError::UnreachableHost(host)
        } else if e.is_timeout() {
            tracing::warn!(url = %url, error = %e, "Download timed out");
            IngestError::IoFailure("download timed out".to_string())
        } else if e.is_builder() {
            tracing::warn!(url = %url, error = %e, "Invalid download URL");
            IngestError::UnreachableHost(url.to_string())
        } else {
            tracing::warn!(url = %url, error = %e, "Download failed");
            IngestError::IoFailure(e.to_string())
        }
    }
}

#[async_trait]
impl SoundFetcherPort for HttpSoundFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPayload, IngestError> {
        tracing::debug!(url = %url, "Downloading sound");

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = %status, "Download rejected by remote host");
            return Err(IngestError::DownloadFailed {
                status: status.as_u16(),
            });
        }

        let limit = self.config.max_payload_bytes;
        if let Some(len) = response.content_length() {
            if len > limit {
                return Err(IngestError::PayloadTooLarge { limit_bytes: limit });
            }
        }

        let file_name_hint = response
            .url()
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        // 按块读取，超过上限立即中止
        let mut bytes = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Self::classify_error(url, e))?
        {
            if (bytes.len() + chunk.len()) as u64 > limit {
                return Err(IngestError::PayloadTooLarge { limit_bytes: limit });
            }
            bytes.extend_from_slice(&chunk);
        }

        tracing::info!(
            url = %url,
            size_bytes = bytes.len(),
            file_name = ?file_name_hint,
            "Sound downloaded"
        );

        Ok(FetchedPayload {
            bytes,
            file_name_hint,
        })
    }
}
