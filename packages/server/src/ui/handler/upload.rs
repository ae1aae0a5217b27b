//! File upload handler.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{
        Multipart, State,
        multipart::{Field, MultipartError},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    infrastructure::dto::{ChatMessageDto, ErrorDto},
    ui::state::AppState,
    usecase::UploadError,
};

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "upload failed");
        let error = match self {
            UploadError::Storage(_) => "failed to store file",
            UploadError::Send(_) => "failed to broadcast file",
        };
        error_response(StatusCode::INTERNAL_SERVER_ERROR, error)
    }
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorDto {
            error: error.into(),
        }),
    )
        .into_response()
}

fn rejected(e: MultipartError) -> Response {
    tracing::warn!(error = %e, "rejected upload form");
    error_response(e.status(), e.body_text())
}

/// `POST /upload`: multipart form with a `file` part and an optional `username` part
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ChatMessageDto>), Response> {
    let mut username = String::new();
    let mut file: Option<(String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await.map_err(rejected)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "username" => username = field.text().await.map_err(rejected)?,
            "file" => file = Some(read_file(field).await.map_err(rejected)?),
            _ => {}
        }
    }

    let Some((original_name, contents)) = file else {
        return Err(error_response(StatusCode::BAD_REQUEST, "missing file field"));
    };

    let message = state
        .upload_file_usecase()
        .execute(username, &original_name, &contents)
        .await
        .map_err(IntoResponse::into_response)?;

    Ok((StatusCode::CREATED, Json(ChatMessageDto::from(&message))))
}

async fn read_file(field: Field<'_>) -> Result<(String, Bytes), MultipartError> {
    let original_name = field.file_name().unwrap_or_default().to_string();
    let contents = field.bytes().await?;
    Ok((original_name, contents))
}
