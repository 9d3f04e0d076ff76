//! 测试用音频样本

/// 16 位 PCM WAV（静音）
pub(crate) fn wav_bytes(sample_rate: u32, channels: u16, frames: u32) -> Vec<u8> {
    let bits_per_sample: u16 = 16;
    let block_align = channels * (bits_per_sample / 8);
    let byte_rate = sample_rate * block_align as u32;
    let data_size = frames * block_align as u32;

    let mut wav = Vec::with_capacity(44 + data_size as usize);

    // RIFF header
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_size).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt chunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    wav.extend_from_slice(&channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    wav.resize(44 + data_size as usize, 0);

    wav
}

/// 指定大小（近似）的单声道 44.1kHz WAV
pub(crate) fn wav_of_size(total_bytes: usize) -> Vec<u8> {
    let frames = (total_bytes.saturating_sub(44) / 2) as u32;
    wav_bytes(44100, 1, frames)
}

/// MPEG-1 Layer III, 128 kbps, 44.1 kHz 的静音帧序列
///
/// 帧头 FF FB 90 00，每帧 417 字节
pub(crate) fn mp3_bytes(frames: usize) -> Vec<u8> {
    const FRAME_LEN: usize = 417;
    let mut data = Vec::with_capacity(frames * FRAME_LEN);
    for _ in 0..frames {
        data.extend_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);
        data.resize(data.len() + FRAME_LEN - 4, 0);
    }
    data
}
