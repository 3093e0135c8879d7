//! Upload intake and the filename extraction preview.

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::super::AppState;
use super::helpers::{json_error, json_server_error};
use crate::extract::extract;
use crate::models::{NewDocument, UploadError, UploadRequest};

/// An uploaded file part.
struct FilePart {
    file_name: String,
    content: Bytes,
}

/// Multipart fields of an upload.
#[derive(Default)]
struct UploadForm {
    file: Option<FilePart>,
    request: UploadRequest,
}

/// Read every part of the body. Unknown fields are drained and ignored.
async fn read_upload_form(
    multipart: &mut Multipart,
) -> Result<UploadForm, axum::extract::multipart::MultipartError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content = field.bytes().await?;
                // An empty file input still submits a nameless, empty part.
                if !file_name.is_empty() || !content.is_empty() {
                    form.file = Some(FilePart { file_name, content });
                }
            }
            "number" => form.request.number = Some(field.text().await?),
            "type" => form.request.doc_type = Some(field.text().await?),
            "name" => form.request.name = Some(field.text().await?),
            "issued_date" => form.request.issued_date = Some(field.text().await?),
            _ => {
                field.bytes().await?;
            }
        }
    }

    Ok(form)
}

fn upload_rejected(e: UploadError) -> Response {
    json_error(StatusCode::BAD_REQUEST, e.to_string())
}

/// Accept a file plus its metadata, store both and return the new ID.
pub async fn upload_document(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(m) => m,
        Err(e) => return json_server_error("Lỗi server", e.body_text()),
    };

    let form = match read_upload_form(&mut multipart).await {
        Ok(form) => form,
        Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return json_error(StatusCode::PAYLOAD_TOO_LARGE, e.body_text());
        }
        Err(e) => return json_server_error("Lỗi server", e.body_text()),
    };

    let Some(file) = form.file else {
        return upload_rejected(UploadError::MissingFile);
    };
    let fields = match form.request.validate() {
        Ok(fields) => fields,
        Err(e) => return upload_rejected(e),
    };

    let stored = match state.store.save(&file.file_name, &file.content).await {
        Ok(stored) => stored,
        Err(e) => {
            tracing::error!("Failed to store upload {}: {}", file.file_name, e);
            return json_server_error("Lỗi server", e);
        }
    };

    let doc = NewDocument::from_upload(
        fields,
        stored.file_path.clone(),
        stored.file_size,
        file.file_name,
    );

    match state.doc_repo.insert(&doc).await {
        Ok(id) => {
            tracing::info!(id, number = %doc.number, path = %stored.file_path, "Uploaded document");
            Json(json!({
                "success": true,
                "id": id,
                "file_path": stored.file_path,
            }))
            .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to insert document: {}", e);
            if let Err(cleanup) = state.store.remove(&stored.file_path).await {
                tracing::warn!("Could not remove orphaned upload: {}", cleanup);
            }
            json_server_error("Lỗi server", e)
        }
    }
}

/// Guess type, number and name from an uploaded file's name.
///
/// Nothing is stored; only the part's filename is looked at.
pub async fn extract_metadata(multipart: Result<Multipart, MultipartRejection>) -> Response {
    let Ok(mut multipart) = multipart else {
        return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Lỗi xử lý");
    };

    let form = match read_upload_form(&mut multipart).await {
        Ok(form) => form,
        Err(e) => {
            tracing::debug!("Malformed extract request: {}", e);
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Lỗi xử lý");
        }
    };

    match form.file {
        Some(file) => Json(json!({
            "success": true,
            "auto": extract(&file.file_name),
        }))
        .into_response(),
        None => upload_rejected(UploadError::MissingFile),
    }
}
