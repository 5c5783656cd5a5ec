//! HTTP client for the remote post API
//!
//! The editor talks to the backend through the `PostApi` trait so tests can
//! substitute a scripted implementation; `HttpPostApi` is the real client.

use async_trait::async_trait;
use quill_core::config::ApiConfig;
use quill_core::QuillError;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use crate::types::{ApiResponse, PostAddRequest, PostUpdateRequest, PostVo};

/// Remote post API errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level failure: connection refused, timeout, DNS
    #[error("Request failed: {0}")]
    Transport(String),

    /// Response did not match the expected envelope
    #[error("Malformed response: {0}")]
    Decode(String),

    /// Server answered with a non-zero business code
    #[error("Server rejected request: {message} (code {code})")]
    Business { code: i32, message: String },
}

impl ApiError {
    /// Message suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Business { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<ApiError> for QuillError {
    fn from(err: ApiError) -> Self {
        QuillError::Api(err.to_string())
    }
}

/// Operations the editor needs from the backend
#[async_trait]
pub trait PostApi: Send + Sync {
    /// Fetch a post by id
    async fn fetch_post(&self, id: i64) -> Result<PostVo, ApiError>;

    /// Create a new post, returning its id
    async fn create_post(&self, request: &PostAddRequest) -> Result<i64, ApiError>;

    /// Update an existing post
    async fn update_post(&self, request: &PostUpdateRequest) -> Result<(), ApiError>;
}

/// reqwest-backed implementation of `PostApi`
pub struct HttpPostApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPostApi {
    /// Create a client against the given base URL
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Create a client from configuration
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    /// Decode an envelope, mapping non-zero codes to business errors
    async fn decode<T: DeserializeOwned + Default>(response: reqwest::Response) -> Result<T, ApiError> {
        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        if !envelope.is_success() {
            return Err(ApiError::Business {
                code: envelope.code,
                message: envelope
                    .message
                    .unwrap_or_else(|| "request failed".to_string()),
            });
        }

        envelope
            .data
            .ok_or_else(|| ApiError::Decode("missing response data".to_string()))
    }
}

#[async_trait]
impl PostApi for HttpPostApi {
    async fn fetch_post(&self, id: i64) -> Result<PostVo, ApiError> {
        tracing::debug!("Fetching post {}", id);
        let response = self
            .client
            .get(format!("{}/post/get/vo", self.base_url))
            .query(&[("id", id)])
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Self::decode(response).await
    }

    async fn create_post(&self, request: &PostAddRequest) -> Result<i64, ApiError> {
        tracing::debug!("Creating post \"{}\"", request.title);
        let response = self
            .client
            .post(format!("{}/post/add", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Self::decode(response).await
    }

    async fn update_post(&self, request: &PostUpdateRequest) -> Result<(), ApiError> {
        tracing::debug!("Updating post {}", request.id);
        let response = self
            .client
            .post(format!("{}/post/edit", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let _: bool = Self::decode(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base_url: &str) -> HttpPostApi {
        HttpPostApi::new(base_url, Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_post_success() {
        let router = Router::new().route(
            "/post/get/vo",
            get(|| async {
                Json(json!({
                    "code": 0,
                    "data": {
                        "id": 5,
                        "title": "Hello",
                        "content": "# Hello",
                        "tagList": ["rust"],
                        "updateTime": "2024-05-01 10:30:00"
                    }
                }))
            }),
        );
        let base = serve(router).await;

        let post = client(&base).fetch_post(5).await.unwrap();
        assert_eq!(post.id, 5);
        assert_eq!(post.title, "Hello");
        assert!(post.update_time_millis().is_some());
    }

    #[tokio::test]
    async fn test_fetch_post_business_error() {
        let router = Router::new().route(
            "/post/get/vo",
            get(|| async { Json(json!({"code": 40400, "message": "post not found"})) }),
        );
        let base = serve(router).await;

        let err = client(&base).fetch_post(99).await.unwrap_err();
        match err {
            ApiError::Business { code, message } => {
                assert_eq!(code, 40400);
                assert_eq!(message, "post not found");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_post_returns_id() {
        let router = Router::new().route(
            "/post/add",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["title"], "T");
                Json(json!({"code": 0, "data": 123}))
            }),
        );
        let base = serve(router).await;

        let id = client(&base)
            .create_post(&PostAddRequest {
                title: "T".to_string(),
                content: "some content here".to_string(),
                tags: vec!["a".to_string()],
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(id, 123);
    }

    #[tokio::test]
    async fn test_update_post_surfaces_server_message() {
        let router = Router::new().route(
            "/post/edit",
            post(|| async { Json(json!({"code": 40300, "message": "no permission"})) }),
        );
        let base = serve(router).await;

        let err = client(&base)
            .update_post(&PostUpdateRequest {
                id: 5,
                title: "T".to_string(),
                content: "c".to_string(),
                tags: vec![],
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "no permission");
    }

    #[tokio::test]
    async fn test_transport_error_when_server_unreachable() {
        // Port 9 (discard) is never listening locally
        let err = client("http://127.0.0.1:9")
            .fetch_post(1)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
