//! Sound Context - 音频限界上下文
//!
//! 职责:
//! - 音频标识分配
//! - 已验证音频记录（SoundRecord）
//! - 上传文件名规则

mod errors;
mod record;
mod value_objects;

pub use errors::SoundError;
pub use record::SoundRecord;
pub use value_objects::{SoundFormat, SoundId, UploadFileName};
