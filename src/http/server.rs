use super::app_error::AppError;
use super::folders::{get_folder, list_collection_folders};
use super::health::{liveness, readiness};
use super::state::HttpServerState;
use super::upload::{analyze_upload, import_upload};
use crate::config;
use anyhow::Result;
use axum::Json;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::extract::State;
use axum::http::header;
use axum::routing::{get, post};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::trace;
use tower_http::{ServiceBuilderExt, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as ScalarServable};

#[derive(OpenApi)]
#[openapi(
    tags(
        (name = "AgroData", description = "AgroData API"),
        (name = "Upload", description = "Spreadsheet analysis and import"),
        (name = "Folders", description = "Imported folders"),
        (name = "Health", description = "Health checks"),
    ),
    paths(
        frontpage,
        super::health::liveness,
        super::health::readiness,
        super::upload::analyze_upload,
        super::upload::import_upload,
        super::folders::get_folder,
        super::folders::list_collection_folders,
    ),
)]
struct ApiDoc;

/// Routes of the application, without the outer middleware.
///
/// Shared by the server and the tests.
pub fn build_app_routes(state: HttpServerState, max_body_layer: DefaultBodyLimit) -> Router {
    Router::new()
        .route("/", get(frontpage))
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
        // Upload wizard
        .route(
            "/api/upload/analyze",
            post(analyze_upload).layer(max_body_layer.clone()),
        )
        .route(
            "/api/upload/import",
            post(import_upload).layer(max_body_layer),
        )
        // Folders
        .route("/api/folders/{folder_id}", get(get_folder))
        .route(
            "/api/collections/{collection_id}/folders",
            get(list_collection_folders),
        )
        .with_state(state)
}

pub async fn run_http_server(state: HttpServerState, address: SocketAddr) -> Result<()> {
    let config = config::get()?;
    let max_body_layer = DefaultBodyLimit::max(config.parse_http_body_limit()?);
    let timeout_seconds = config.http_server_timeout_seconds;

    // List of headers that shouldn't be logged
    let sensitive_headers: Arc<[_]> = vec![header::AUTHORIZATION, header::COOKIE].into();

    // Middleware creation
    let middleware = ServiceBuilder::new()
        .sensitive_request_headers(sensitive_headers.clone())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .sensitive_response_headers(sensitive_headers)
        .layer(TimeoutLayer::new(Duration::from_secs(timeout_seconds)))
        .compression()
        .into_inner();

    let app = build_app_routes(state, max_body_layer).layer(middleware);

    let listener = tokio::net::TcpListener::bind(address).await?;
    tracing::info!("AgroData listening on http://{}", address);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    // Wait for the CTRL+C signal
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install the CTRL+C signal handler: {}", error);
        std::future::pending::<()>().await;
    }
}

#[utoipa::path(
    get,
    path = "/",
    tag = "AgroData",
    responses(
        (status = 200, description = "AgroData Frontpage", body = String)
    )
)]
async fn frontpage(State(state): State<HttpServerState>) -> Result<Json<String>, AppError> {
    let name: String = (*state.name).clone();
    Ok(Json(name))
}
