//! # File Relay 共有型定義
//!
//! Gatewayが受け付けるリクエストと返却するレスポンスのJSON構造を提供する。
//!
//! ## 規則
//! - 全レスポンスはJSONオブジェクト
//! - エラーレスポンスは必ず `error` キーを持つ

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

/// GET / レスポンス。サービスの説明と使い方。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// ウェルカムメッセージ
    pub message: String,
    /// 利用可能なエンドポイント一覧
    pub endpoints: Vec<EndpointInfo>,
}

/// エンドポイントの説明。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointInfo {
    /// HTTPメソッド ("GET", "POST")
    pub method: String,
    /// パス
    pub path: String,
    /// 説明
    pub description: String,
}

// ---------------------------------------------------------------------------
// POST /upload
// ---------------------------------------------------------------------------

/// POST /upload レスポンス。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// 完了メッセージ
    pub message: String,
    /// 保存されたオブジェクト名（/get-download-link にそのまま渡せる）
    pub file_name: String,
}

// ---------------------------------------------------------------------------
// GET /get-download-link
// ---------------------------------------------------------------------------

/// GET /get-download-link のクエリパラメータ。
///
/// 欠落時に400を返すため `Option` で受ける。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadLinkQuery {
    /// オブジェクト名
    #[serde(default)]
    pub file_name: Option<String>,
}

/// GET /get-download-link レスポンス。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadLinkResponse {
    /// 署名付きダウンロードURL
    pub download_url: String,
}

// ---------------------------------------------------------------------------
// エラー
// ---------------------------------------------------------------------------

/// エラーレスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// エラー概要
    pub error: String,
    /// 詳細（原因を呼び出し元に返す場合のみ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    /// 詳細なしのエラーレスポンスを構築する。
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }

    /// 詳細付きのエラーレスポンスを構築する。
    pub fn with_message(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: Some(message.into()),
        }
    }
}
