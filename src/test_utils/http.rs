use crate::http::server::build_app_routes;
use crate::http::state::HttpServerState;
use crate::pipeline::UploadLimits;
use crate::storage::StorageInstance;
/// HTTP testing utilities
use anyhow::Result;
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderMap, Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

const MULTIPART_BOUNDARY: &str = "agrodata-test-boundary";

/// HTTP test client for making requests to our app
pub struct TestApp {
    app: axum::Router,
}

impl TestApp {
    /// Create a new test app with the provided storage and default limits
    pub async fn new(storage: Arc<dyn StorageInstance>) -> Self {
        Self::with_limits(storage, UploadLimits::default()).await
    }

    pub async fn with_limits(storage: Arc<dyn StorageInstance>, limits: UploadLimits) -> Self {
        let state = HttpServerState {
            name: Arc::new("AgroData Test".to_string()),
            storage,
            limits,
        };

        // Same routes as production, with a body limit above the file limit
        let max_body_layer = DefaultBodyLimit::max(32 * 1024 * 1024);
        let app = build_app_routes(state, max_body_layer);

        Self { app }
    }

    /// Send a multipart upload with a single `file` field
    pub async fn post_file(&self, path: &str, file_name: &str, data: &[u8]) -> Result<TestResponse> {
        let mut body = Vec::with_capacity(data.len() + 256);
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            )
            .body(Body::from(body))?;

        let response = self.app.clone().oneshot(request).await?;
        Ok(TestResponse::new(response).await)
    }

    /// Send a multipart request without any `file` field
    pub async fn post_empty_multipart(&self, path: &str) -> Result<TestResponse> {
        let body = format!(
            "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nvalue\r\n--{MULTIPART_BOUNDARY}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            )
            .body(Body::from(body))?;

        let response = self.app.clone().oneshot(request).await?;
        Ok(TestResponse::new(response).await)
    }

    /// Send a POST request with JSON data
    pub async fn post_json(&self, path: &str, json_data: &str) -> Result<TestResponse> {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(json_data.to_string()))?;

        let response = self.app.clone().oneshot(request).await?;
        Ok(TestResponse::new(response).await)
    }

    /// Send a GET request
    pub async fn get(&self, path: &str) -> Result<TestResponse> {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())?;

        let response = self.app.clone().oneshot(request).await?;
        Ok(TestResponse::new(response).await)
    }
}

/// Test response wrapper for easier assertions
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl TestResponse {
    async fn new(response: axum::response::Response) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_default();
        let body = String::from_utf8_lossy(&body_bytes).to_string();

        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Parse response body as JSON
    pub fn json<T>(&self) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_str(&self.body).map_err(Into::into)
    }

    /// Assert status code
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "Expected status {}, got {}. Body: {}",
            expected, self.status, self.body
        );
        self
    }

    /// Assert response body contains text
    pub fn assert_body_contains(&self, text: &str) -> &Self {
        assert!(
            self.body.contains(text),
            "Expected body to contain '{}', but body was: {}",
            text,
            self.body
        );
        self
    }
}
