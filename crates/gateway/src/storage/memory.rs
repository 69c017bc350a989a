//! # プロセス内 Blob Store
//!
//! ローカル開発・テスト用。プロセス終了で内容は失われる。

use std::collections::HashMap;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::RwLock;

use super::{BlobStore, StoredObject};
use crate::error::GatewayError;

struct MemoryObject {
    content_type: String,
    data: Vec<u8>,
}

/// HashMapに保持するBlob Store実装。
pub struct MemoryBlobStore {
    bucket: String,
    objects: RwLock<HashMap<String, MemoryObject>>,
}

impl MemoryBlobStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// 保存済みオブジェクト数
    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    #[cfg(test)]
    pub(crate) async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    /// 保存時に渡されたContent-Type
    #[cfg(test)]
    pub(crate) async fn content_type(&self, key: &str) -> Option<String> {
        self.objects
            .read()
            .await
            .get(key)
            .map(|object| object.content_type.clone())
    }
}

#[async_trait::async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put_object(
        &self,
        key: &str,
        content_type: &str,
        body: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<StoredObject, GatewayError> {
        // 全量を読み終えてから書き込む（途中失敗で部分オブジェクトを残さない）
        let mut data = Vec::new();
        body.read_to_end(&mut data)
            .await
            .map_err(|e| GatewayError::StoreTransport(e.to_string()))?;

        let size = data.len() as u64;
        self.objects.write().await.insert(
            key.to_string(),
            MemoryObject {
                content_type: content_type.to_string(),
                data,
            },
        );

        Ok(StoredObject {
            key: key.to_string(),
            size,
        })
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>, GatewayError> {
        let objects = self.objects.read().await;
        let object = objects
            .get(key)
            .ok_or_else(|| GatewayError::StoreTransport(format!("no such key: {key}")))?;
        tracing::debug!(key = %key, content_type = %object.content_type, "メモリから取得");
        Ok(object.data.clone())
    }

    async fn presign_get(&self, key: &str, expiry_secs: u32) -> Result<String, GatewayError> {
        let mut url = reqwest::Url::parse(&format!("memory://{}/", self.bucket))
            .map_err(|e| GatewayError::Signing(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| GatewayError::Signing("bucket is not a valid URL host".to_string()))?
            .pop_if_empty()
            .push(key);
        url.query_pairs_mut()
            .append_pair("X-Expires", &expiry_secs.to_string());
        Ok(url.into())
    }
}
