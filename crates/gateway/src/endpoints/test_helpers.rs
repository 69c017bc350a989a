//! # エンドポイントテスト用共通ヘルパー

use std::sync::Arc;

use tokio::io::AsyncRead;

use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::storage::{BlobStore, StoredObject, DEFAULT_LINK_EXPIRY_SECS};

/// 全操作で同じエラーを返すテスト用ストレージ。
pub struct FailingStore(pub fn() -> GatewayError);

#[async_trait::async_trait]
impl BlobStore for FailingStore {
    async fn put_object(
        &self,
        _key: &str,
        _content_type: &str,
        _body: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<StoredObject, GatewayError> {
        Err((self.0)())
    }

    async fn get_object(&self, _key: &str) -> Result<Vec<u8>, GatewayError> {
        Err((self.0)())
    }

    async fn presign_get(&self, _key: &str, _expiry_secs: u32) -> Result<String, GatewayError> {
        Err((self.0)())
    }
}

/// テスト用Gatewayを起動し、ベースURLを返す。
pub async fn start_gateway(storage: Arc<dyn BlobStore>) -> String {
    let state = Arc::new(GatewayState::new(storage, DEFAULT_LINK_EXPIRY_SECS));
    let app = crate::server::build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    format!("http://127.0.0.1:{port}")
}
