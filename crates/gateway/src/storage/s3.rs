//! # S3互換 Blob Store 実装
//!
//! AWS S3, MinIO, Cloudflare R2 等のS3互換APIを使用するBlob Store実装。
//! rust-s3のエラーは `GatewayError` の各バリアントに分類する。

use s3::creds::Credentials;
use s3::error::S3Error;
use s3::{Bucket, Region};
use tokio::io::AsyncRead;

use super::{BlobStore, StoredObject};
use crate::config::S3Settings;
use crate::error::GatewayError;

/// S3互換ストレージによるBlob Store実装。
pub struct S3BlobStore {
    bucket: Box<Bucket>,
}

impl S3BlobStore {
    /// 構築済みバケットから生成する。
    pub fn new(bucket: Box<Bucket>) -> Self {
        Self { bucket }
    }

    /// 設定からバケットを初期化する。
    ///
    /// 認証情報はここで解決する。明示的な上書きが無い場合はSDK標準の
    /// 解決順（環境変数、プロファイル、インスタンスロール）を使う。
    /// 解決できなければ起動を中断する。
    pub fn from_settings(bucket_name: &str, settings: &S3Settings) -> anyhow::Result<Self> {
        let region = match &settings.endpoint {
            Some(endpoint) => Region::Custom {
                region: settings.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => settings.region.parse::<Region>()?,
        };

        let credentials = match &settings.credentials {
            Some(explicit) => Credentials::new(
                Some(explicit.access_key.as_str()),
                Some(explicit.secret_key.as_str()),
                None,
                explicit.session_token.as_deref(),
                None,
            )?,
            None => Credentials::default()?,
        };

        let bucket = Bucket::new(bucket_name, region, credentials)?;
        // カスタムエンドポイント（MinIO等）はパススタイルでアクセスする
        let bucket = if settings.endpoint.is_some() {
            bucket.with_path_style()
        } else {
            bucket
        };

        tracing::info!(
            bucket = %bucket_name,
            region = %settings.region,
            endpoint = settings.endpoint.as_deref().unwrap_or("aws"),
            explicit_credentials = settings.credentials.is_some(),
            "S3バケットを初期化"
        );

        Ok(Self::new(bucket))
    }
}

/// ストレージが返したHTTPステータスを分類する。
fn classify_status(status: u16, body: &str) -> GatewayError {
    let cause = if body.is_empty() {
        format!("object store responded with HTTP {status}")
    } else {
        format!("object store responded with HTTP {status}: {body}")
    };
    match status {
        401 | 403 => GatewayError::StoreAuth(cause),
        _ => GatewayError::StoreTransport(cause),
    }
}

/// rust-s3のエラーを分類する。
fn classify_s3_error(err: S3Error) -> GatewayError {
    match err {
        S3Error::HttpFailWithBody(status, body) => classify_status(status, &body),
        S3Error::Credentials(e) => GatewayError::StoreAuth(e.to_string()),
        S3Error::Hyper(e) => GatewayError::StoreTransport(e.to_string()),
        S3Error::Http(e) => GatewayError::StoreTransport(e.to_string()),
        S3Error::Io(e) => GatewayError::StoreTransport(e.to_string()),
        other => GatewayError::Unexpected(other.to_string()),
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

#[async_trait::async_trait]
impl BlobStore for S3BlobStore {
    async fn put_object(
        &self,
        key: &str,
        content_type: &str,
        body: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<StoredObject, GatewayError> {
        let mut reader = body;
        let response = self
            .bucket
            .put_object_stream_with_content_type(&mut reader, key, content_type)
            .await
            .map_err(classify_s3_error)?;

        let status = response.status_code();
        if !is_success(status) {
            return Err(classify_status(status, ""));
        }

        Ok(StoredObject {
            key: key.to_string(),
            size: response.uploaded_bytes() as u64,
        })
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>, GatewayError> {
        let response = self
            .bucket
            .get_object(key)
            .await
            .map_err(classify_s3_error)?;

        let status = response.status_code();
        if !is_success(status) {
            return Err(classify_status(
                status,
                &String::from_utf8_lossy(response.bytes()),
            ));
        }

        Ok(response.bytes().to_vec())
    }

    async fn presign_get(&self, key: &str, expiry_secs: u32) -> Result<String, GatewayError> {
        self.bucket
            .presign_get(key, expiry_secs, None)
            .await
            .map_err(|e| GatewayError::Signing(e.to_string()))
    }
}
