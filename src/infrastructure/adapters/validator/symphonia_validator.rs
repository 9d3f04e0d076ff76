//! Symphonia Sound Validator - 基于 symphonia 的音频格式识别
//!
//! 两步:
//! 1. 内容头决定格式族（RIFF/WAVE 或 ID3 / MPEG 帧同步）
//! 2. symphonia 探测容器并确认存在音频轨道

use std::io::Cursor;
use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::{FormatError, SoundInfo, SoundValidatorPort};
use crate::domain::sound::SoundFormat;

/// Symphonia 格式识别器
#[derive(Debug, Clone, Default)]
pub struct SymphoniaSoundValidator;

impl SymphoniaSoundValidator {
    pub fn new() -> Self {
        Self
    }

    /// 根据内容头判断格式族
    pub fn sniff(data: &[u8]) -> Option<SoundFormat> {
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WAVE" {
            return Some(SoundFormat::Wav);
        }

        if data.len() >= 3 && &data[0..3] == b"ID3" {
            return Some(SoundFormat::Mp3);
        }

        // MPEG 音频帧同步: 11 个 1
        if data.len() >= 2 && data[0] == 0xFF && (data[1] & 0xE0) == 0xE0 {
            return Some(SoundFormat::Mp3);
        }

        None
    }

    /// symphonia 探测
    fn probe(
        &self,
        data: &[u8],
        format: SoundFormat,
        extension_hint: Option<&str>,
    ) -> Result<SoundInfo, FormatError> {
        let cursor = Cursor::new(data.to_vec());
        let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

        let mut hint = Hint::new();
        hint.with_extension(extension_hint.unwrap_or(format.extension()));

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| FormatError::ProbeFailed(e.to_string()))?;

        let track = probed
            .format
            .default_track()
            .filter(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or(FormatError::NoAudioTrack)?;

        let params = &track.codec_params;
        let sample_rate = params.sample_rate;
        let duration_ms = match (params.n_frames, sample_rate) {
            (Some(frames), Some(rate)) if rate > 0 => Some(frames * 1000 / rate as u64),
            _ => None,
        };

        Ok(SoundInfo {
            format,
            duration_ms,
            sample_rate,
            channels: params.channels.map(|c| c.count() as u16),
        })
    }
}

impl SoundValidatorPort for SymphoniaSoundValidator {
    fn classify(
        &self,
        payload: &[u8],
        extension_hint: Option<&str>,
    ) -> Result<SoundInfo, FormatError> {
        if payload.is_empty() {
            return Err(FormatError::Empty);
        }

        let format = Self::sniff(payload).ok_or(FormatError::UnrecognizedHeader)?;
        let info = self.probe(payload, format, extension_hint)?;

        tracing::debug!(
            format = %info.format,
            duration_ms = ?info.duration_ms,
            sample_rate = ?info.sample_rate,
            channels = ?info.channels,
            size_bytes = payload.len(),
            "Sound classified"
        );

        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::validator::fixtures::{mp3_bytes, wav_bytes};

    #[test]
    fn test_sniff() {
        assert_eq!(
            SymphoniaSoundValidator::sniff(&wav_bytes(8000, 1, 800)),
            Some(SoundFormat::Wav)
        );
        assert_eq!(
            SymphoniaSoundValidator::sniff(b"ID3\x04\x00"),
            Some(SoundFormat::Mp3)
        );
        assert_eq!(
            SymphoniaSoundValidator::sniff(&[0xFF, 0xFB, 0x90, 0x00]),
            Some(SoundFormat::Mp3)
        );
        assert_eq!(SymphoniaSoundValidator::sniff(b"OggS\x00\x02"), None);
        assert_eq!(SymphoniaSoundValidator::sniff(b"RIFF\x00\x00\x00\x00AVI "), None);
    }

    #[test]
    fn test_classify_wav_reports_duration() {
        let validator = SymphoniaSoundValidator::new();
        // 1 秒单声道 8kHz
        let info = validator.classify(&wav_bytes(8000, 1, 8000), None).unwrap();

        assert_eq!(info.format, SoundFormat::Wav);
        assert_eq!(info.sample_rate, Some(8000));
        assert_eq!(info.channels, Some(1));
        assert_eq!(info.duration_ms, Some(1000));
    }

    #[test]
    fn test_classify_mp3() {
        let validator = SymphoniaSoundValidator::new();
        let info = validator.classify(&mp3_bytes(10), Some("mp3")).unwrap();

        assert_eq!(info.format, SoundFormat::Mp3);
        assert_eq!(info.sample_rate, Some(44100));
    }

    #[test]
    fn test_header_decides_not_extension() {
        let validator = SymphoniaSoundValidator::new();

        // 文本内容，即使扩展名是 wav
        let result = validator.classify(b"hello, this is not audio at all", Some("wav"));
        assert_eq!(result, Err(FormatError::UnrecognizedHeader));

        // WAV 内容配 mp3 扩展名仍然是 WAV
        let info = validator.classify(&wav_bytes(8000, 1, 800), Some("mp3")).unwrap();
        assert_eq!(info.format, SoundFormat::Wav);
    }

    #[test]
    fn test_truncated_wav_is_rejected() {
        let validator = SymphoniaSoundValidator::new();
        let mut data = b"RIFF\x24\x00\x00\x00WAVE".to_vec();
        data.extend_from_slice(b"junkjunkjunk");

        assert!(matches!(
            validator.classify(&data, None),
            Err(FormatError::ProbeFailed(_)) | Err(FormatError::NoAudioTrack)
        ));
    }

    #[test]
    fn test_empty_payload() {
        let validator = SymphoniaSoundValidator::new();
        assert_eq!(validator.classify(&[], None), Err(FormatError::Empty));
    }
}
