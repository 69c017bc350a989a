//! # POST /upload
//!
//! multipart/form-data で受け取ったファイルをBlob Storeへストリーミングする。
//! ファイル名はそのままオブジェクトキーになり、同名オブジェクトは上書きされる。

use std::io;
use std::sync::{Arc, OnceLock};

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use file_relay_types::UploadResponse;
use futures::TryStreamExt;
use tokio_util::io::StreamReader;

use crate::config::GatewayState;
use crate::error::GatewayError;

/// ファイルパートのフィールド名
pub const FILE_FIELD: &str = "file";

/// パートにContent-Typeが無い場合に使う値
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

fn no_file() -> GatewayError {
    GatewayError::BadRequest("No file provided".to_string())
}

/// multipart読み取りエラーを分類する。ボディ上限超過は413、それ以外は400。
fn multipart_error(status: StatusCode, reason: &str) -> GatewayError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        GatewayError::PayloadTooLarge(reason.to_string())
    } else {
        GatewayError::BadRequest(format!("Invalid multipart body: {reason}"))
    }
}

/// POST /upload — ファイルアップロード。
///
/// `file` フィールドの最初のパートのみを扱い、他のフィールドは読み飛ばす。
/// multipart以外のボディは「ファイルなし」として扱う。
pub async fn handle_upload(
    State(state): State<Arc<GatewayState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, GatewayError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!(rejection = %e, "multipartボディではありません");
        no_file()
    })?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e.status(), &e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(no_file()),
        };
        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        // ボディ読み取り中のクライアント側エラーをストレージエラーと区別する
        let body_error = OnceLock::new();
        let stream = std::pin::pin!(field.map_err(|e| {
            let _ = body_error.set((e.status(), e.body_text()));
            io::Error::other(e)
        }));
        let mut reader = StreamReader::new(stream);

        let result = state
            .storage
            .put_object(&file_name, &content_type, &mut reader)
            .await;

        if let Some((status, reason)) = body_error.get() {
            return Err(multipart_error(*status, reason));
        }
        let stored = result?;

        tracing::info!(
            file_name = %stored.key,
            size = stored.size,
            content_type = %content_type,
            "ファイルをアップロード"
        );

        return Ok(Json(UploadResponse {
            message: "File uploaded successfully".to_string(),
            file_name: stored.key,
        }));
    }

    Err(no_file())
}
