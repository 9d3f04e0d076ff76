//! Ping Handler
//!
//! 健康检查，附带存储与播放概况

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::infrastructure::http::state::AppState;

/// Ping 响应
#[derive(Serialize)]
pub struct PingResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub sounds: u64,
    pub playing: usize,
}

/// Ping endpoint - 健康检查
pub async fn ping(State(state): State<Arc<AppState>>) -> Json<PingResponse> {
    let stats = state.store.stats().await;
    Json(PingResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        sounds: stats.sound_count,
        playing: state.playback.sessions().len(),
    })
}
