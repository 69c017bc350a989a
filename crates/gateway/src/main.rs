//! # File Relay Gateway エントリポイント
//!
//! 環境変数から設定を読み込み、Blob Storeを初期化してHTTPサーバーを起動する。
//! 必須設定が欠けている場合はリッスン前に終了する。

use std::sync::Arc;

use file_relay_gateway::{
    build_app, BlobStore, GatewayConfig, GatewayState, MemoryBlobStore, S3BlobStore,
    StorageBackend,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 必須設定が欠けている場合はここで終了する
    let config = GatewayConfig::from_env()?;

    let storage: Arc<dyn BlobStore> = match config.backend {
        StorageBackend::S3 => Arc::new(S3BlobStore::from_settings(&config.bucket_name, &config.s3)?),
        StorageBackend::Memory => {
            tracing::warn!("プロセス内ストレージを使用します（開発環境用）");
            Arc::new(MemoryBlobStore::new(config.bucket_name.clone()))
        }
    };

    let state = Arc::new(GatewayState::new(storage, config.download_link_expiry_secs));
    let app = build_app(state, &config)?;

    tracing::info!(
        bucket = %config.bucket_name,
        "Gatewayを {} で起動します",
        config.bind_addr
    );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
