//! Documents API endpoints for programmatic access.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::super::AppState;
use super::helpers::{json_error, ListParams};

/// All documents matching the optional filters, newest upload first.
///
/// Unlike the browse page the result is not paginated.
pub async fn list_documents(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Response {
    match state.doc_repo.list().await {
        Ok(docs) => Json(params.to_query().apply(&docs)).into_response(),
        Err(e) => {
            tracing::error!("Failed to list documents: {}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Delete a document row and its stored file.
///
/// A stored file that cannot be removed does not block deleting the row.
pub async fn delete_document(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Ok(id) = id.trim().parse::<i64>() else {
        return json_error(StatusCode::BAD_REQUEST, "ID không hợp lệ");
    };

    let doc = match state.doc_repo.get(id).await {
        Ok(Some(doc)) => doc,
        Ok(None) => return json_error(StatusCode::NOT_FOUND, "Không tìm thấy"),
        Err(e) => return json_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };

    if !doc.file_path.is_empty() {
        if let Err(e) = state.store.remove(&doc.file_path).await {
            tracing::warn!(id, file = %doc.file_path, "Could not remove stored file: {}", e);
        }
    }

    match state.doc_repo.delete(id).await {
        Ok(_) => {
            tracing::info!(id, number = %doc.number, "Deleted document");
            Json(json!({ "success": true })).into_response()
        }
        Err(e) => json_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}
