//! # Blob Store
//!
//! Gatewayが依存する外部オブジェクトストレージの抽象インターフェース。
//! 実装は固定の1バケットに束縛され、キーはクライアントのファイル名そのもの。
//!
//! - `s3`: S3互換ストレージ（AWS S3, MinIO, Cloudflare R2等）
//! - `memory`: プロセス内ストレージ（ローカル開発・テスト用）

pub mod memory;
pub mod s3;

pub use memory::MemoryBlobStore;
pub use s3::S3BlobStore;

use tokio::io::AsyncRead;

use crate::error::GatewayError;

/// 署名付きダウンロードURLのデフォルト有効期限（秒）
pub const DEFAULT_LINK_EXPIRY_SECS: u32 = 3600;

/// 保存に成功したオブジェクトの情報。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// オブジェクトキー
    pub key: String,
    /// 書き込んだバイト数
    pub size: u64,
}

/// オブジェクトストレージの抽象インターフェース。
///
/// 起動時に1度だけ構築され、全リクエストから共有される。
/// 同名キーへの書き込みは既存オブジェクトを上書きする。
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// `body` を最後まで読み、`key` に書き込む。
    async fn put_object(
        &self,
        key: &str,
        content_type: &str,
        body: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<StoredObject, GatewayError>;

    /// `key` のオブジェクトを取得する。
    async fn get_object(&self, key: &str) -> Result<Vec<u8>, GatewayError>;

    /// `key` に対する署名付きダウンロードURL（GET）を生成する。
    ///
    /// オブジェクトの存在は確認しない。
    async fn presign_get(&self, key: &str, expiry_secs: u32) -> Result<String, GatewayError>;
}
