//! Remote service
//!
//! Every backend call goes through [`RemoteService`], which normalizes
//! failures into [`ApiError`] and reports each one exactly once.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::notify::Notifier;

pub struct RemoteService {
    client: Client,
    base_url: String,
    notifier: Notifier,
}

impl RemoteService {
    pub fn new(config: &ClientConfig, notifier: Notifier) -> Self {
        Self {
            client: Client::builder()
                .timeout(config.request_timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: config.api_base_url.clone(),
            notifier,
        }
    }

    /// Untyped call; the payload is returned as JSON
    pub async fn call(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        self.request(method, endpoint, body).await
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request::<(), T>(Method::GET, endpoint, None).await
    }

    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, endpoint, Some(body)).await
    }

    async fn request<B, T>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let result = match self.send(method.clone(), endpoint, body).await {
            Ok(payload) => serde_json::from_value(payload).map_err(|e| {
                ApiError::malformed(format!("Unexpected shape from {}: {}", endpoint, e))
            }),
            Err(e) => Err(e),
        };

        if let Err(error) = &result {
            warn!(%method, endpoint, "Request failed: {:?}", error);
            self.notifier.error(error.to_string());
        }
        result
    }

    async fn send<B>(&self, method: Method, endpoint: &str, body: Option<&B>) -> Result<Value, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%method, %url, "Sending request");

        let mut request = self
            .client
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(ApiError::Transport)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(ApiError::Transport)?;
        let payload = serde_json::from_slice::<Value>(&bytes);

        if !status.is_success() {
            return Err(rejection(status, payload.ok()));
        }

        payload.map_err(|e| ApiError::malformed(format!("Invalid JSON from {}: {}", endpoint, e)))
    }
}

/// Server `detail` when it is a string, the generic message otherwise
fn rejection(status: StatusCode, payload: Option<Value>) -> ApiError {
    let message = payload
        .as_ref()
        .and_then(|p| p.get("detail"))
        .and_then(Value::as_str)
        .filter(|detail| !detail.trim().is_empty())
        .unwrap_or(ApiError::FALLBACK_MESSAGE)
        .to_string();

    ApiError::Rejected {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{Notice, NoticeLevel};
    use crate::test_support::StubBackend;
    use serde::Deserialize;
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::broadcast;

    #[derive(Debug, Deserialize)]
    struct Stats {
        active_tasks: i64,
    }

    fn service(base_url: &str) -> (RemoteService, broadcast::Receiver<Notice>) {
        let notifier = Notifier::new(Duration::from_millis(3000));
        let rx = notifier.subscribe();
        let config = ClientConfig::default()
            .with_api_base_url(base_url)
            .with_request_timeout(Duration::from_secs(5));
        (RemoteService::new(&config, notifier), rx)
    }

    fn drain(rx: &mut broadcast::Receiver<Notice>) -> Vec<Notice> {
        let mut notices = Vec::new();
        while let Ok(notice) = rx.try_recv() {
            notices.push(notice);
        }
        notices
    }

    #[tokio::test]
    async fn test_success_returns_typed_payload() {
        let backend = StubBackend::new()
            .respond(Method::GET, "/org/stats", 200, json!({"active_tasks": 4, "pending_submissions": 1}))
            .start()
            .await;
        let (remote, mut rx) = service(&backend.base_url);

        let stats: Stats = remote.get("/org/stats?org_id=5").await.unwrap();
        assert_eq!(stats.active_tasks, 4);
        assert!(drain(&mut rx).is_empty());

        let hits = backend.requests();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].query.as_deref(), Some("org_id=5"));
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let backend = StubBackend::new()
            .respond(Method::POST, "/org/join", 200, json!({"status": "success"}))
            .start()
            .await;
        let (remote, _rx) = service(&backend.base_url);

        let reply = remote
            .call(Method::POST, "/org/join", Some(&json!({"org_id": 3})))
            .await
            .unwrap();
        assert_eq!(reply["status"], "success");

        let hits = backend.requests();
        assert_eq!(hits[0].method, "POST");
        assert_eq!(hits[0].body, json!({"org_id": 3}));
        assert_eq!(hits[0].content_type.as_deref(), Some("application/json"));
    }

    #[tokio::test]
    async fn test_rejection_surfaces_detail_once() {
        let backend = StubBackend::new()
            .respond(Method::POST, "/auth/login", 401, json!({"detail": "bad credentials"}))
            .start()
            .await;
        let (remote, mut rx) = service(&backend.base_url);

        let error = remote
            .post::<_, Value>("/auth/login", &json!({"username": "ada", "password": "x"}))
            .await
            .unwrap_err();

        match &error {
            ApiError::Rejected { status, message } => {
                assert_eq!(*status, 401);
                assert_eq!(message, "bad credentials");
            }
            other => panic!("Expected Rejected, got: {:?}", other),
        }

        let notices = drain(&mut rx);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].message, "bad credentials");
    }

    #[tokio::test]
    async fn test_rejection_without_string_detail_uses_fallback() {
        let backend = StubBackend::new()
            .respond(
                Method::POST,
                "/tasks/create",
                422,
                json!({"detail": [{"loc": ["body", "title"], "msg": "field required"}]}),
            )
            .respond_raw(Method::GET, "/leaderboard", 500, "Internal Server Error")
            .start()
            .await;
        let (remote, mut rx) = service(&backend.base_url);

        let error = remote
            .post::<_, Value>("/tasks/create", &json!({}))
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), "API Error");
        assert_eq!(error.status(), Some(422));

        let error = remote.get::<Value>("/leaderboard").await.unwrap_err();
        assert_eq!(error.to_string(), "API Error");
        assert_eq!(error.status(), Some(500));

        assert_eq!(drain(&mut rx).len(), 2);
    }

    #[tokio::test]
    async fn test_non_json_success_is_malformed() {
        let backend = StubBackend::new()
            .respond_raw(Method::GET, "/leaderboard", 200, "<html>oops</html>")
            .start()
            .await;
        let (remote, mut rx) = service(&backend.base_url);

        let error = remote.get::<Value>("/leaderboard").await.unwrap_err();
        assert!(matches!(error, ApiError::Malformed { .. }));

        let notices = drain(&mut rx);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "Unexpected response from server");
    }

    #[tokio::test]
    async fn test_wrong_shape_is_malformed() {
        let backend = StubBackend::new()
            .respond(Method::GET, "/org/stats", 200, json!(["not", "stats"]))
            .start()
            .await;
        let (remote, mut rx) = service(&backend.base_url);

        let error = remote.get::<Stats>("/org/stats").await.unwrap_err();
        assert!(matches!(error, ApiError::Malformed { .. }));
        assert_eq!(drain(&mut rx).len(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_is_normalized() {
        let base_url = StubBackend::unreachable_url().await;
        let (remote, mut rx) = service(&base_url);

        let error = remote.get::<Value>("/leaderboard").await.unwrap_err();
        assert!(matches!(error, ApiError::Transport(_)));
        assert_eq!(error.status(), None);

        let notices = drain(&mut rx);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "Connection to server failed");
    }
}
