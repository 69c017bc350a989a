//! # Gateway エラー型
//!
//! 全エンドポイントで共通のエラー型とHTTPレスポンスへの変換。
//! 呼び出し元に原因を返すかどうかはバリアントごとに決まる。

use axum::http::StatusCode;
use axum::Json;
use file_relay_types::ErrorResponse;

/// Gatewayエラー型。
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// 不正なリクエスト（ファイル欠落、file_name欠落）
    #[error("{0}")]
    BadRequest(String),
    /// ボディが設定されたサイズ上限を超えた
    #[error("ボディサイズ上限を超過: {0}")]
    PayloadTooLarge(String),
    /// ストレージへの通信失敗、またはストレージ側の拒否
    #[error("ストレージ通信に失敗: {0}")]
    StoreTransport(String),
    /// ストレージの認証情報が無効・欠落
    #[error("ストレージ認証に失敗: {0}")]
    StoreAuth(String),
    /// 署名付きURLの生成に失敗
    #[error("署名付きURL生成に失敗: {0}")]
    Signing(String),
    /// 上記以外の想定外エラー
    #[error("想定外のエラー: {0}")]
    Unexpected(String),
}

impl GatewayError {
    /// 対応するHTTPステータス。
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::StoreTransport(_)
            | GatewayError::StoreAuth(_)
            | GatewayError::Signing(_)
            | GatewayError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 呼び出し元に返すJSONボディ。
    ///
    /// Signingの原因はストレージ内部の情報を含むため返さない。
    pub fn body(&self) -> ErrorResponse {
        match self {
            GatewayError::BadRequest(msg) => ErrorResponse::new(msg.clone()),
            GatewayError::PayloadTooLarge(cause) => {
                ErrorResponse::with_message("File too large", cause.clone())
            }
            GatewayError::StoreTransport(cause) | GatewayError::StoreAuth(cause) => {
                ErrorResponse::with_message("Upload failed", cause.clone())
            }
            GatewayError::Signing(_) => ErrorResponse::new("Could not generate download link"),
            GatewayError::Unexpected(cause) => {
                ErrorResponse::with_message("An unexpected error occurred", cause.clone())
            }
        }
    }
}

impl axum::response::IntoResponse for GatewayError {
    fn into_response(self) -> axum::response::Response {
        match &self {
            GatewayError::BadRequest(msg) => {
                tracing::debug!(reason = %msg, "不正なリクエスト");
            }
            GatewayError::PayloadTooLarge(cause) => {
                tracing::debug!(reason = %cause, "ボディサイズ上限を超過");
            }
            GatewayError::StoreTransport(_) | GatewayError::StoreAuth(_) => {
                tracing::warn!(error = %self, "アップロードに失敗");
            }
            GatewayError::Signing(_) | GatewayError::Unexpected(_) => {
                tracing::error!(error = %self, "リクエスト処理に失敗");
            }
        }
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 各バリアントが期待するステータスに変換されることを確認
    #[test]
    fn test_status_mapping() {
        assert_eq!(
            GatewayError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::PayloadTooLarge("x".into()).status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        for err in [
            GatewayError::StoreTransport("x".into()),
            GatewayError::StoreAuth("x".into()),
            GatewayError::Signing("x".into()),
            GatewayError::Unexpected("x".into()),
        ] {
            assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    /// アップロード失敗は原因を返し、署名失敗は原因を返さないことを確認
    #[test]
    fn test_body_cause_exposure() {
        let body = GatewayError::StoreAuth("no credentials".into()).body();
        assert_eq!(body.error, "Upload failed");
        assert_eq!(body.message.as_deref(), Some("no credentials"));

        let body = GatewayError::Signing("secret internals".into()).body();
        assert_eq!(body.error, "Could not generate download link");
        assert!(body.message.is_none());

        let body = GatewayError::PayloadTooLarge("length limit exceeded".into()).body();
        assert_eq!(body.error, "File too large");
        assert_eq!(body.message.as_deref(), Some("length limit exceeded"));

        let body = GatewayError::Unexpected("boom".into()).body();
        assert_eq!(body.error, "An unexpected error occurred");
        assert_eq!(body.message.as_deref(), Some("boom"));
    }
}
