//! Worker Layer - Background Task Processing
//!
//! 实现 IngestPipeline，在后台执行音频导入

mod ingest_pipeline;
mod spawner;

pub use ingest_pipeline::{IngestPipeline, IngestPipelineConfig};
pub use spawner::TokioTaskSpawner;
