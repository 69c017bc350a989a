//! # File Relay Gateway
//!
//! マルチパートでアップロードされたファイルを固定バケットのオブジェクト
//! ストレージへ中継し、保存済みオブジェクトの署名付きダウンロードURLを発行する。
//! リクエスト間で状態を持たず、永続状態は外部ストレージのみ。
//!
//! ## API エンドポイント
//! - `GET /` — サービス説明
//! - `POST /upload` — ファイルアップロード（フィールド名 `file`）
//! - `GET /get-download-link?file_name=...` — 署名付きURL発行（有効期限1時間）

pub mod config;
pub mod endpoints;
pub mod error;
pub mod server;
pub mod storage;

pub use config::{ConfigError, GatewayConfig, GatewayState, StorageBackend};
pub use error::GatewayError;
pub use server::{build_app, build_router};
pub use storage::{BlobStore, MemoryBlobStore, S3BlobStore};
