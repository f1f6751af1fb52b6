use crate::pipeline::UploadError;
use crate::storage::StorageError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use serde_json::json;
use utoipa::ToSchema;

// Anyhow error handling with axum
// https://github.com/tokio-rs/axum/blob/d3112a40d55f123bc5e65f995e2068e245f12055/examples/anyhow-error-response/src/main.rs
#[derive(Debug, ToSchema)]
pub enum AppError {
    #[schema(example = "Internal Server Error", value_type = String)]
    InternalServerError(anyhow::Error),
    #[schema(example = "Bad Request", value_type = String)]
    BadRequest(anyhow::Error),
    #[schema(example = "Not Found", value_type = String)]
    NotFound(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InternalServerError(error) => {
                tracing::error!("Internal Server Error: {:#}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(error) => (StatusCode::BAD_REQUEST, error.to_string()),
            AppError::NotFound(error) => (StatusCode::NOT_FOUND, error.to_string()),
        };
        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::InternalServerError(err.into())
    }
}

impl AppError {
    pub fn bad_request(err: impl Into<anyhow::Error>) -> Self {
        Self::BadRequest(err.into())
    }

    pub fn internal_server_error(err: impl Into<anyhow::Error>) -> Self {
        Self::InternalServerError(err.into())
    }

    pub fn not_found(err: impl Into<anyhow::Error>) -> Self {
        Self::NotFound(err.into())
    }

    /// Maps upload failures: request problems are 400, a missing folder is
    /// 404 and everything else is 500.
    pub fn from_upload(error: UploadError) -> Self {
        if error.is_client_error() {
            return Self::bad_request(error);
        }
        match error {
            UploadError::Storage(source) if StorageError::is_not_found(&source) => {
                Self::NotFound(source)
            }
            other => Self::internal_server_error(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importers::ParseError;
    use uuid::Uuid;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_client_errors_are_bad_requests() {
        let response = AppError::from_upload(UploadError::Parse(ParseError::EmptyFile))
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], ParseError::EmptyFile.to_string());
    }

    #[tokio::test]
    async fn test_internal_errors_hide_details() {
        let response = AppError::from_upload(UploadError::Storage(anyhow::anyhow!(
            "password authentication failed"
        )))
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Internal Server Error");
    }

    #[tokio::test]
    async fn test_missing_folder_is_not_found() {
        let error = UploadError::Storage(
            StorageError::FolderNotFound {
                folder_id: Uuid::nil(),
            }
            .into(),
        );
        let response = AppError::from_upload(error).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
