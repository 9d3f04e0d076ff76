//! Sound Context - Value Objects

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::SoundError;

/// 音频唯一标识（128 位，分配后不可变）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoundId(Uuid);

impl SoundId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SoundId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SoundId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SoundId {
    type Err = SoundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| SoundError::InvalidId(s.to_string()))
    }
}

impl From<Uuid> for SoundId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// 支持的音频格式（两个编码族）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundFormat {
    Wav,
    Mp3,
}

impl SoundFormat {
    pub const ALL: [SoundFormat; 2] = [SoundFormat::Wav, SoundFormat::Mp3];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "wav" => Some(Self::Wav),
            "mp3" => Some(Self::Mp3),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
        }
    }
}

impl std::fmt::Display for SoundFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for SoundFormat {
    type Err = SoundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| SoundError::UnknownFormat(s.to_string()))
    }
}

/// 上传目录中的暂存文件名
///
/// 不变量:
/// - 主名只包含 `[a-z0-9_ -]`（不区分大小写）
/// - 扩展名只能是 `.wav` 或 `.mp3`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadFileName {
    name: String,
    format: SoundFormat,
}

impl UploadFileName {
    pub fn parse(name: impl Into<String>) -> Result<Self, SoundError> {
        let name = name.into();

        let (stem, ext) = name
            .rsplit_once('.')
            .ok_or_else(|| SoundError::InvalidFileName(name.clone()))?;

        let format = SoundFormat::from_extension(ext)
            .ok_or_else(|| SoundError::InvalidFileName(name.clone()))?;

        let stem_valid = !stem.is_empty()
            && stem
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ' ' | '-'));
        if !stem_valid {
            return Err(SoundError::InvalidFileName(name));
        }

        Ok(Self { name, format })
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// 由扩展名推断的格式（仅作为提示，实际格式由内容决定）
    pub fn format_hint(&self) -> SoundFormat {
        self.format
    }
}

impl std::fmt::Display for UploadFileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
