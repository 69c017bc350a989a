//! # GET /
//!
//! サービス説明エンドポイント。

use axum::Json;
use file_relay_types::{EndpointInfo, ServiceInfo};

fn endpoint(method: &str, path: &str, description: &str) -> EndpointInfo {
    EndpointInfo {
        method: method.to_string(),
        path: path.to_string(),
        description: description.to_string(),
    }
}

/// GET / — サービスの説明と使い方を返す。副作用なし。
pub async fn handle_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Welcome to the File Relay API. Upload files with POST /upload and \
                  request a time-limited download link with GET /get-download-link."
            .to_string(),
        endpoints: vec![
            endpoint("GET", "/", "Describe this service"),
            endpoint(
                "POST",
                "/upload",
                "Upload a file as multipart/form-data under the field name `file`",
            ),
            endpoint(
                "GET",
                "/get-download-link",
                "Get a download link valid for one hour: ?file_name=<name>",
            ),
        ],
    })
}
