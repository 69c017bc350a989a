//! # ルーター構築
//!
//! ルート定義と横断的なレイヤー（CORS、リクエストトレース、ボディ上限）。

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{GatewayConfig, GatewayState};
use crate::endpoints::{handle_get_download_link, handle_info, handle_upload};

/// ルートのみのルーター（axumのデフォルトボディ上限のまま）。
pub fn build_router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/", get(handle_info))
        .route("/upload", post(handle_upload))
        .route("/get-download-link", get(handle_get_download_link))
        .with_state(state)
}

/// 許可オリジンからCORSレイヤーを構築する。`*` は全オリジン許可。
pub fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if origins.iter().any(|origin| origin == "*") {
        return Ok(cors.allow_origin(Any));
    }

    let origins = origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(cors.allow_origin(origins))
}

/// 設定に従ってレイヤーを付与したアプリケーションを構築する。
///
/// `max_upload_bytes` が無い場合はボディ上限を外す（アップロードサイズは無制限）。
pub fn build_app(state: Arc<GatewayState>, config: &GatewayConfig) -> anyhow::Result<Router> {
    let body_limit = match config.max_upload_bytes {
        Some(max) => DefaultBodyLimit::max(max),
        None => DefaultBodyLimit::disable(),
    };
    let mut app = build_router(state).layer(body_limit);

    if let Some(origins) = &config.cors_allowed_origins {
        app = app.layer(cors_layer(origins)?);
    }

    Ok(app.layer(TraceLayer::new_for_http()))
}
