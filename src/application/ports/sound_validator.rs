//! Sound Validator Port - 音频格式识别

use thiserror::Error;

use crate::domain::sound::SoundFormat;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Empty payload")]
    Empty,

    #[error("Unrecognized header")]
    UnrecognizedHeader,

    #[error("Probe failed: {0}")]
    ProbeFailed(String),

    #[error("No audio track")]
    NoAudioTrack,
}

/// 识别结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundInfo {
    pub format: SoundFormat,
    pub duration_ms: Option<u64>,
    pub sample_rate: Option<u32>,
    pub channels: Option<u16>,
}

/// Sound Validator Port
///
/// 纯函数：只看内容，不产生副作用
pub trait SoundValidatorPort: Send + Sync {
    /// 由内容头决定格式族，extension_hint 只作为解码器探测的提示
    fn classify(&self, payload: &[u8], extension_hint: Option<&str>)
        -> Result<SoundInfo, FormatError>;
}
