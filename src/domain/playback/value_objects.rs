//! Playback Context - Value Objects

use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// 语音传输层返回的频道句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelHandle(Uuid);

impl ChannelHandle {
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

impl Default for ChannelHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ChannelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 听众标识（例如发起播放的玩家）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListenerId(Uuid);

impl ListenerId {
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 世界中的三维坐标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// 世界 / 维度标识，由宿主提供
    pub level: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Location {
    pub fn new(level: impl Into<String>, x: f64, y: f64, z: f64) -> Result<Self, &'static str> {
        let level = level.into();
        if level.is_empty() {
            return Err("level must not be empty");
        }
        if !(x.is_finite() && y.is_finite() && z.is_finite()) {
            return Err("coordinates must be finite");
        }
        Ok(Self { level, x, y, z })
    }
}

/// 播放模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackMode {
    /// 锚定在三维坐标，按距离衰减
    Positional,
    /// 非定位广播，与听众位置无关（仍受 range 限制）
    Static,
}

impl PlaybackMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackMode::Positional => "positional",
            PlaybackMode::Static => "static",
        }
    }
}

impl std::fmt::Display for PlaybackMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 播放目标
///
/// 定位模式必须携带坐标；静态模式与听众位置无关
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackTarget {
    Positional(Location),
    Static,
}

impl PlaybackTarget {
    pub fn mode(&self) -> PlaybackMode {
        match self {
            PlaybackTarget::Positional(_) => PlaybackMode::Positional,
            PlaybackTarget::Static => PlaybackMode::Static,
        }
    }

    pub fn location(&self) -> Option<&Location> {
        match self {
            PlaybackTarget::Positional(location) => Some(location),
            PlaybackTarget::Static => None,
        }
    }
}

/// 可听范围（严格为正）
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Range(f32);

impl Range {
    pub fn new(value: f32) -> Result<Self, &'static str> {
        if !value.is_finite() {
            return Err("range must be a finite number");
        }
        if value <= 0.0 {
            return Err("range must be greater than 0");
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 播放时长上限（由传输层执行）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationLimit {
    /// 播放到结束
    #[default]
    Unbounded,
    Limited(Duration),
}

impl DurationLimit {
    /// 0 表示不限制
    pub fn from_secs(secs: u64) -> Self {
        if secs == 0 {
            DurationLimit::Unbounded
        } else {
            DurationLimit::Limited(Duration::from_secs(secs))
        }
    }

    /// 取两者中更严格的上限
    pub fn tighten(self, other: DurationLimit) -> DurationLimit {
        match (self, other) {
            (DurationLimit::Unbounded, other) => other,
            (limit, DurationLimit::Unbounded) => limit,
            (DurationLimit::Limited(a), DurationLimit::Limited(b)) => DurationLimit::Limited(a.min(b)),
        }
    }

    /// 结合音频自身时长计算实际播放时长；两者都未知时返回 None
    pub fn effective(&self, clip: Option<Duration>) -> Option<Duration> {
        match (self, clip) {
            (DurationLimit::Unbounded, clip) => clip,
            (DurationLimit::Limited(limit), Some(clip)) => Some((*limit).min(clip)),
            (DurationLimit::Limited(limit), None) => Some(*limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tighten_keeps_the_stricter_limit() {
        let thirty = DurationLimit::from_secs(30);
        let ten = DurationLimit::from_secs(10);

        assert_eq!(thirty.tighten(ten), ten);
        assert_eq!(ten.tighten(thirty), ten);
        assert_eq!(thirty.tighten(DurationLimit::Unbounded), thirty);
        assert_eq!(DurationLimit::Unbounded.tighten(ten), ten);
        assert_eq!(
            DurationLimit::Unbounded.tighten(DurationLimit::Unbounded),
            DurationLimit::Unbounded
        );
    }

    #[test]
    fn test_range_must_be_positive() {
        assert!(Range::new(48.0).is_ok());
        assert!(Range::new(0.0).is_err());
        assert!(Range::new(-1.0).is_err());
        assert!(Range::new(f32::NAN).is_err());
        assert!(Range::new(f32::INFINITY).is_err());
    }

    #[test]
    fn test_location_validation() {
        assert!(Location::new("minecraft:overworld", 1.0, 64.0, -3.5).is_ok());
        assert!(Location::new("", 0.0, 0.0, 0.0).is_err());
        assert!(Location::new("minecraft:overworld", f64::NAN, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_target_mode() {
        let location = Location::new("minecraft:overworld", 0.0, 0.0, 0.0).unwrap();
        let positional = PlaybackTarget::Positional(location.clone());
        assert_eq!(positional.mode(), PlaybackMode::Positional);
        assert_eq!(positional.location(), Some(&location));
        assert_eq!(PlaybackTarget::Static.mode(), PlaybackMode::Static);
        assert!(PlaybackTarget::Static.location().is_none());
    }

    #[test]
    fn test_duration_limit_effective() {
        let clip = Some(Duration::from_secs(10));
        assert_eq!(DurationLimit::Unbounded.effective(clip), clip);
        assert_eq!(DurationLimit::Unbounded.effective(None), None);
        assert_eq!(
            DurationLimit::from_secs(3).effective(clip),
            Some(Duration::from_secs(3))
        );
        assert_eq!(
            DurationLimit::from_secs(30).effective(clip),
            Some(Duration::from_secs(10))
        );
        assert_eq!(DurationLimit::from_secs(0), DurationLimit::Unbounded);
    }
}
