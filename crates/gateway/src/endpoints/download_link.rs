//! # GET /get-download-link
//!
//! 保存済みオブジェクトの署名付きダウンロードURL発行。

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use file_relay_types::{DownloadLinkQuery, DownloadLinkResponse};

use crate::config::GatewayState;
use crate::error::GatewayError;

/// GET /get-download-link — 署名付きURL発行。
///
/// オブジェクトの存在は確認しない。有効期限は呼び出し元から変更できない。
/// 署名失敗の原因はログにのみ残し、レスポンスには含めない。
pub async fn handle_get_download_link(
    State(state): State<Arc<GatewayState>>,
    query: Result<Query<DownloadLinkQuery>, QueryRejection>,
) -> Result<Json<DownloadLinkResponse>, GatewayError> {
    let file_name = query
        .ok()
        .and_then(|Query(q)| q.file_name)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| GatewayError::BadRequest("Missing file_name parameter".to_string()))?;

    let download_url = state
        .storage
        .presign_get(&file_name, state.download_link_expiry_secs)
        .await
        .map_err(|e| match e {
            GatewayError::Signing(_) => e,
            other => GatewayError::Signing(other.to_string()),
        })?;

    tracing::info!(
        file_name = %file_name,
        expiry_secs = state.download_link_expiry_secs,
        "署名付きダウンロードURLを発行"
    );

    Ok(Json(DownloadLinkResponse { download_url }))
}
