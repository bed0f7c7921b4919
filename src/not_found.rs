//! The fallback handler for routes that do not exist.

use axum::{
    Json,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Respond with a JSON 404 error naming the missing route.
pub async fn get_404_not_found(uri: Uri) -> Response {
    tracing::debug!("no route for {uri}");

    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "status": "error",
            "message": format!("Could not find {}", uri.path()),
        })),
    )
        .into_response()
}
