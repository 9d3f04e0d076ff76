//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                   GET   健康检查
//! - /api/sound/url              POST  从 URL 导入（异步，通过 status 或 WS 获取结果）
//! - /api/sound/serverfile       POST  从上传目录导入
//! - /api/sound/filebin          POST  投递箱第一阶段，返回上传地址
//! - /api/sound/filebin/confirm  POST  投递箱第二阶段
//! - /api/sound/status           POST  导入任务状态
//! - /api/sound/lookup           POST  查询音频记录
//! - /api/sound/list             GET   列出已存储的音频
//! - /api/playback/play          POST  播放
//! - /api/playback/stop          POST  停止
//! - /api/playback/channel       POST  查询当前频道
//! - /ws/events                  WS    导入与播放事件

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws/events", get(handlers::events_websocket_handler))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/sound", sound_routes())
        .nest("/playback", playback_routes())
}

/// Sound 路由
fn sound_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/url", post(handlers::ingest_url))
        .route("/serverfile", post(handlers::ingest_server_file))
        .route("/filebin", post(handlers::create_filebin_upload))
        .route("/filebin/confirm", post(handlers::confirm_filebin_upload))
        .route("/status", post(handlers::ingest_status))
        .route("/lookup", post(handlers::lookup_sound))
        .route("/list", get(handlers::list_sounds))
}

/// Playback 路由
fn playback_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/play", post(handlers::play))
        .route("/stop", post(handlers::stop))
        .route("/channel", post(handlers::find_channel))
}
