//! Pulsed HTTP client
//!
//! One method per agent endpoint. Calls are independent and stateless apart
//! from the optional in-flight sharing enabled by [`PulsedClient::with_coalescing`].

use futures::future::FutureExt;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use url::Url;

use crate::coalesce::InFlight;
use crate::error::{PulsedError, PulsedResult};
use crate::types::{
    AgentHealth, ContainerLogs, DevicePresence, DockerInventory, NetworkReport, RestartAck,
    ServiceHealth, SystemSnapshot,
};

/// Default agent address when nothing is configured
pub const DEFAULT_PULSED_URL: &str = "http://localhost:9876";

/// Maximum number of body bytes kept on a status error
const ERROR_BODY_LIMIT: usize = 200;

/// Client for one pulsed agent
#[derive(Clone)]
pub struct PulsedClient {
    client: Client,
    base_url: Url,
    in_flight: Option<Arc<InFlight>>,
}

impl std::fmt::Debug for PulsedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PulsedClient")
            .field("base_url", &self.base_url.as_str())
            .field("coalescing", &self.in_flight.is_some())
            .finish()
    }
}

impl PulsedClient {
    /// Create a client for the agent at `base_url` with a default HTTP client
    pub fn new(base_url: &str) -> PulsedResult<Self> {
        Self::with_http_client(Client::new(), base_url)
    }

    /// Create a client reusing an existing `reqwest::Client`
    ///
    /// Use this to apply a timeout or user agent configured elsewhere.
    pub fn with_http_client(client: Client, base_url: &str) -> PulsedResult<Self> {
        let parsed = Url::parse(base_url).map_err(|e| PulsedError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        if parsed.cannot_be_a_base() {
            return Err(PulsedError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
            in_flight: None,
        })
    }

    /// Share concurrent identical GET requests
    ///
    /// Useful when several widgets poll the same endpoint on one client.
    pub fn with_coalescing(mut self) -> Self {
        self.in_flight = Some(Arc::new(InFlight::default()));
        self
    }

    /// The agent base URL
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// `GET /health`
    pub async fn health(&self) -> PulsedResult<AgentHealth> {
        self.get(&["health"], None).await
    }

    /// `GET /api/v1/system`
    pub async fn system_metrics(&self) -> PulsedResult<SystemSnapshot> {
        self.get(&["api", "v1", "system"], None).await
    }

    /// `GET /api/v1/docker`
    pub async fn docker_containers(&self) -> PulsedResult<DockerInventory> {
        self.get(&["api", "v1", "docker"], None).await
    }

    /// `GET /api/v1/docker/{id}/logs?lines=N`
    pub async fn docker_logs(&self, container_id: &str, lines: u32) -> PulsedResult<ContainerLogs> {
        let lines = lines.to_string();
        self.get(
            &["api", "v1", "docker", container_id, "logs"],
            Some(("lines", lines.as_str())),
        )
        .await
    }

    /// `POST /api/v1/docker/{id}/restart`
    ///
    /// The acknowledgement only means the agent accepted the request. Poll
    /// [`docker_containers`](Self::docker_containers) afterwards to observe
    /// the restart.
    pub async fn docker_restart(&self, container_id: &str) -> PulsedResult<RestartAck> {
        let url = self.endpoint(&["api", "v1", "docker", container_id, "restart"], None);
        tracing::info!("Requesting restart of container {}", container_id);
        let body = send(self.client.clone(), Method::POST, url.clone()).await?;
        decode(&url, &body)
    }

    /// `GET /api/v1/tailscale`
    pub async fn tailscale_devices(&self) -> PulsedResult<DevicePresence> {
        self.get(&["api", "v1", "tailscale"], None).await
    }

    /// `GET /api/v1/network`
    pub async fn network_interfaces(&self) -> PulsedResult<NetworkReport> {
        self.get(&["api", "v1", "network"], None).await
    }

    /// `GET /api/v1/services`
    pub async fn service_checks(&self) -> PulsedResult<ServiceHealth> {
        self.get(&["api", "v1", "services"], None).await
    }

    /// Build an endpoint URL below the base URL
    ///
    /// Segments are percent-encoded, so container ids cannot escape the path.
    fn endpoint(&self, segments: &[&str], query: Option<(&str, &str)>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if let Some((key, value)) = query {
            url.query_pairs_mut().append_pair(key, value);
        }
        url
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: Option<(&str, &str)>,
    ) -> PulsedResult<T> {
        let url = self.endpoint(segments, query);

        let body = match &self.in_flight {
            Some(in_flight) => {
                let client = self.client.clone();
                let request_url = url.clone();
                in_flight
                    .run(url.as_str(), move || {
                        send(client, Method::GET, request_url).boxed()
                    })
                    .await?
            }
            None => send(self.client.clone(), Method::GET, url.clone()).await?,
        };

        decode(&url, &body)
    }
}

/// Issue one request and return the body of a success response
async fn send(client: Client, method: Method, url: Url) -> PulsedResult<Arc<str>> {
    tracing::debug!("{} {}", method, url);

    let unreachable = |e: reqwest::Error| PulsedError::Unreachable {
        url: url.to_string(),
        source: Arc::new(e),
    };

    let response = client
        .request(method, url.clone())
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .send()
        .await
        .map_err(unreachable)?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let body: String = text.chars().take(ERROR_BODY_LIMIT).collect();
        tracing::warn!("Pulsed returned {} for {}", status, url);
        return Err(PulsedError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let text = response.text().await.map_err(unreachable)?;
    Ok(Arc::from(text))
}

fn decode<T: DeserializeOwned>(url: &Url, body: &str) -> PulsedResult<T> {
    serde_json::from_str(body).map_err(|e| PulsedError::Decode {
        url: url.to_string(),
        source: Arc::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path, Query},
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Serve a fake agent on an ephemeral port and return its base URL
    async fn spawn_agent(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn docker_json() -> serde_json::Value {
        json!({
            "containers": [{
                "id": "abc123",
                "name": "grafana",
                "image": "grafana/grafana",
                "status": "Up 2 hours",
                "state": "running",
                "created": 1704067200,
                "ports": ["3000:3000"]
            }],
            "running": 1,
            "total": 1
        })
    }

    #[test]
    fn test_endpoint_building() {
        let client = PulsedClient::new("http://pulsed.local:9876/").unwrap();
        let url = client.endpoint(&["api", "v1", "docker", "abc", "logs"], Some(("lines", "50")));
        assert_eq!(
            url.as_str(),
            "http://pulsed.local:9876/api/v1/docker/abc/logs?lines=50"
        );
    }

    #[test]
    fn test_endpoint_encodes_container_id() {
        let client = PulsedClient::new("http://pulsed.local:9876").unwrap();
        let url = client.endpoint(&["api", "v1", "docker", "../health", "restart"], None);
        assert!(url.as_str().contains("..%2Fhealth"));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = PulsedClient::new("not a url").unwrap_err();
        assert!(matches!(err, PulsedError::InvalidBaseUrl { .. }));

        let err = PulsedClient::new("mailto:ops@example.com").unwrap_err();
        assert!(matches!(err, PulsedError::InvalidBaseUrl { .. }));
    }

    #[tokio::test]
    async fn test_docker_containers() {
        let router = Router::new().route("/api/v1/docker", get(|| async { Json(docker_json()) }));
        let base = spawn_agent(router).await;

        let client = PulsedClient::new(&base).unwrap();
        let inventory = client.docker_containers().await.unwrap();

        assert_eq!(inventory.total, 1);
        assert_eq!(inventory.containers[0].name, "grafana");
        assert_eq!(inventory.containers[0].ports, vec!["3000:3000"]);
    }

    #[tokio::test]
    async fn test_status_error_carries_code() {
        let router = Router::new().route(
            "/api/v1/docker",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "docker socket down") }),
        );
        let base = spawn_agent(router).await;

        let client = PulsedClient::new(&base).unwrap();
        let err = client.docker_containers().await.unwrap_err();

        assert_eq!(err.status(), Some(503));
        match err {
            PulsedError::Status { body, .. } => assert_eq!(body, "docker socket down"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_decode_error() {
        let router = Router::new().route(
            "/api/v1/system",
            get(|| async { Json(json!({"cpu_usage": "high"})) }),
        );
        let base = spawn_agent(router).await;

        let client = PulsedClient::new(&base).unwrap();
        let err = client.system_metrics().await.unwrap_err();
        assert!(matches!(err, PulsedError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_unreachable() {
        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = PulsedClient::new(&format!("http://{}", addr)).unwrap();
        let err = client.health().await.unwrap_err();
        assert!(matches!(err, PulsedError::Unreachable { .. }));
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_docker_logs_passes_line_count() {
        let router = Router::new().route(
            "/api/v1/docker/{id}/logs",
            get(
                |Path(id): Path<String>, Query(q): Query<HashMap<String, String>>| async move {
                    let n: usize = q.get("lines").and_then(|l| l.parse().ok()).unwrap_or(0);
                    Json(json!({
                        "container": id,
                        "lines": (0..n).map(|i| format!("line {i}")).collect::<Vec<_>>()
                    }))
                },
            ),
        );
        let base = spawn_agent(router).await;

        let client = PulsedClient::new(&base).unwrap();
        let logs = client.docker_logs("abc123", 3).await.unwrap();

        assert_eq!(logs.container, "abc123");
        assert_eq!(logs.lines, vec!["line 0", "line 1", "line 2"]);
    }

    #[tokio::test]
    async fn test_docker_restart_uses_post() {
        let router = Router::new().route(
            "/api/v1/docker/{id}/restart",
            post(|Path(id): Path<String>| async move {
                Json(json!({"status": "restarted", "container": id}))
            }),
        );
        let base = spawn_agent(router).await;

        let client = PulsedClient::new(&base).unwrap();
        let ack = client.docker_restart("abc123").await.unwrap();

        assert_eq!(ack.status, "restarted");
        assert_eq!(ack.container, "abc123");
    }

    #[tokio::test]
    async fn test_coalescing_shares_concurrent_gets() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/api/v1/docker",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    Json(docker_json())
                }
            }),
        );
        let base = spawn_agent(router).await;

        let client = PulsedClient::new(&base).unwrap().with_coalescing();
        let other = client.clone();

        let (a, b) = tokio::join!(client.docker_containers(), other.docker_containers());
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_without_coalescing_each_call_hits_agent() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/api/v1/docker",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Json(docker_json())
                }
            }),
        );
        let base = spawn_agent(router).await;

        let client = PulsedClient::new(&base).unwrap();
        let (a, b) = tokio::join!(client.docker_containers(), client.docker_containers());
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
