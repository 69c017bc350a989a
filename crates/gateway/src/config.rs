//! # Gateway設定・共有状態
//!
//! 環境変数からの設定読み込みとGatewayの共有状態の定義。
//! バケット名が無い場合は起動を中断する（リクエスト単位のエラーにはしない）。

use std::fmt;
use std::sync::Arc;

use crate::storage::{BlobStore, DEFAULT_LINK_EXPIRY_SECS};

/// 待ち受けアドレスのデフォルト
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

/// リージョンのデフォルト
pub const DEFAULT_REGION: &str = "us-east-1";

/// 設定読み込みエラー。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 必須の環境変数が未設定
    #[error("環境変数 {0} が設定されていません")]
    MissingVar(&'static str),
    /// アクセスキーとシークレットキーの片方のみ設定
    #[error("S3_ACCESS_KEY と S3_SECRET_KEY は両方設定する必要があります")]
    PartialCredentials,
    /// 値が不正
    #[error("環境変数 {name} の値が不正です: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// ストレージバックエンドの種別。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// S3互換ストレージ
    S3,
    /// プロセス内ストレージ（ローカル開発用）
    Memory,
}

/// 明示的に指定された認証情報。
#[derive(Clone)]
pub struct StaticCredentials {
    pub access_key: String,
    pub secret_key: String,
    pub session_token: Option<String>,
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// S3接続設定。
#[derive(Debug, Clone)]
pub struct S3Settings {
    /// リージョン
    pub region: String,
    /// カスタムエンドポイント（MinIO, R2等）。Noneの場合はAWS
    pub endpoint: Option<String>,
    /// 明示的な認証情報。Noneの場合はSDK標準の解決順に従う
    pub credentials: Option<StaticCredentials>,
}

/// Gateway設定。
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// 待ち受けアドレス
    pub bind_addr: String,
    /// 固定バケット名
    pub bucket_name: String,
    /// ストレージバックエンド
    pub backend: StorageBackend,
    /// S3接続設定
    pub s3: S3Settings,
    /// CORS許可オリジン。Noneの場合はCORSレイヤーを付けない
    pub cors_allowed_origins: Option<Vec<String>>,
    /// リクエストボディ上限（バイト）。Noneの場合は無制限
    pub max_upload_bytes: Option<usize>,
    /// 署名付きURLの有効期限（秒）
    pub download_link_expiry_secs: u32,
}

impl GatewayConfig {
    /// 環境変数から読み込む。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 任意の参照関数から読み込む。空文字列は未設定として扱う。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bucket_name = get("S3_BUCKET_NAME").ok_or(ConfigError::MissingVar("S3_BUCKET_NAME"))?;

        let bind_addr = get("GATEWAY_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let backend = match get("STORAGE_BACKEND").as_deref() {
            None | Some("s3") => StorageBackend::S3,
            Some("memory") => StorageBackend::Memory,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    name: "STORAGE_BACKEND",
                    value: other.to_string(),
                })
            }
        };

        let region = get("AWS_REGION")
            .or_else(|| get("AWS_DEFAULT_REGION"))
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let credentials = match (get("S3_ACCESS_KEY"), get("S3_SECRET_KEY")) {
            (Some(access_key), Some(secret_key)) => Some(StaticCredentials {
                access_key,
                secret_key,
                session_token: get("S3_SESSION_TOKEN"),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::PartialCredentials),
        };

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS").map(|raw| {
            raw.split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect()
        });

        let max_upload_bytes = get("MAX_UPLOAD_BYTES")
            .map(|raw| {
                raw.parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                    name: "MAX_UPLOAD_BYTES",
                    value: raw,
                })
            })
            .transpose()?;

        Ok(Self {
            bind_addr,
            bucket_name,
            backend,
            s3: S3Settings {
                region,
                endpoint: get("S3_ENDPOINT"),
                credentials,
            },
            cors_allowed_origins,
            max_upload_bytes,
            download_link_expiry_secs: DEFAULT_LINK_EXPIRY_SECS,
        })
    }
}

/// Gatewayの共有状態。
pub struct GatewayState {
    /// Blob Store（S3互換等、トレイトで抽象化）
    pub storage: Arc<dyn BlobStore>,
    /// 署名付きURLの有効期限（秒）
    pub download_link_expiry_secs: u32,
}

impl GatewayState {
    pub fn new(storage: Arc<dyn BlobStore>, download_link_expiry_secs: u32) -> Self {
        Self {
            storage,
            download_link_expiry_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    /// バケット名が無い場合は起動前に失敗することを確認
    #[test]
    fn test_missing_bucket_is_fatal() {
        let err = GatewayConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("S3_BUCKET_NAME")));

        let err = GatewayConfig::from_lookup(lookup_from(&[("S3_BUCKET_NAME", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("S3_BUCKET_NAME")));
    }

    /// バケット名のみでデフォルト値が埋まることを確認
    #[test]
    fn test_defaults() {
        let config =
            GatewayConfig::from_lookup(lookup_from(&[("S3_BUCKET_NAME", "uploads")])).unwrap();

        assert_eq!(config.bucket_name, "uploads");
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.backend, StorageBackend::S3);
        assert_eq!(config.s3.region, DEFAULT_REGION);
        assert!(config.s3.endpoint.is_none());
        assert!(config.s3.credentials.is_none());
        assert!(config.cors_allowed_origins.is_none());
        assert!(config.max_upload_bytes.is_none());
        assert_eq!(config.download_link_expiry_secs, 3600);
    }

    /// 認証情報の片方のみの指定は起動エラーになることを確認
    #[test]
    fn test_partial_credentials() {
        let err = GatewayConfig::from_lookup(lookup_from(&[
            ("S3_BUCKET_NAME", "uploads"),
            ("S3_ACCESS_KEY", "AKID"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::PartialCredentials));
    }

    /// 明示的な上書き設定が読み込まれることを確認
    #[test]
    fn test_explicit_overrides() {
        let config = GatewayConfig::from_lookup(lookup_from(&[
            ("S3_BUCKET_NAME", "uploads"),
            ("S3_ACCESS_KEY", "AKID"),
            ("S3_SECRET_KEY", "SECRET"),
            ("S3_ENDPOINT", "http://minio:9000"),
            ("AWS_DEFAULT_REGION", "eu-west-1"),
            ("STORAGE_BACKEND", "memory"),
            ("CORS_ALLOWED_ORIGINS", "http://localhost:3000, https://app.example.com"),
            ("MAX_UPLOAD_BYTES", "1048576"),
        ]))
        .unwrap();

        assert_eq!(config.backend, StorageBackend::Memory);
        assert_eq!(config.s3.region, "eu-west-1");
        assert_eq!(config.s3.endpoint.as_deref(), Some("http://minio:9000"));
        let creds = config.s3.credentials.unwrap();
        assert_eq!(creds.access_key, "AKID");
        assert_eq!(creds.secret_key, "SECRET");
        assert_eq!(
            config.cors_allowed_origins.unwrap(),
            vec!["http://localhost:3000", "https://app.example.com"]
        );
        assert_eq!(config.max_upload_bytes, Some(1_048_576));
    }

    /// 不正な値が拒否されることを確認
    #[test]
    fn test_invalid_values() {
        let err = GatewayConfig::from_lookup(lookup_from(&[
            ("S3_BUCKET_NAME", "uploads"),
            ("STORAGE_BACKEND", "ftp"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "STORAGE_BACKEND", .. }));

        let err = GatewayConfig::from_lookup(lookup_from(&[
            ("S3_BUCKET_NAME", "uploads"),
            ("MAX_UPLOAD_BYTES", "lots"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "MAX_UPLOAD_BYTES", .. }));
    }

    /// Debug出力にシークレットが含まれないことを確認
    #[test]
    fn test_credentials_debug_redacted() {
        let creds = StaticCredentials {
            access_key: "AKID".to_string(),
            secret_key: "SECRET".to_string(),
            session_token: Some("TOKEN".to_string()),
        };
        let debug = format!("{creds:?}");
        assert!(!debug.contains("SECRET"));
        assert!(!debug.contains("TOKEN"));
    }
}
