use super::state::HttpServerState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadinessResponse {
    pub status: String,
    pub database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReadinessResponse {
    fn ready() -> Self {
        Self {
            status: "ready".to_string(),
            database: "ok".to_string(),
            error: None,
        }
    }

    fn not_ready(error: &anyhow::Error) -> Self {
        Self {
            status: "not_ready".to_string(),
            database: "error".to_string(),
            error: Some(error.to_string()),
        }
    }
}

/// Liveness check
///
/// Returns 200 OK as long as the server answers.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
        }),
    )
}

/// Readiness check
///
/// Ready when the storage backend answers, uploads cannot be imported otherwise.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadinessResponse),
        (status = 503, description = "Storage is unreachable", body = ReadinessResponse)
    )
)]
pub async fn readiness(State(state): State<HttpServerState>) -> impl IntoResponse {
    match state.storage.health_check().await {
        Ok(()) => (StatusCode::OK, Json(ReadinessResponse::ready())),
        Err(error) => {
            tracing::warn!("Storage health check failed: {:#}", error);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse::not_ready(&error)),
            )
        }
    }
}
