//! # Upstream Client
//!
//! HTTP client for the casino data provider. Every outcome of a fetch is an
//! explicit [`UpstreamError`] variant so the handler can map it to a status.

use std::time::Duration;

use casino_domain::CasinoId;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use crate::config::UpstreamConfig;

/// Upstream fetch failures
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Upstream answered with a non-2xx status
    #[error("{body}")]
    Status { status: u16, body: String },

    /// Connection, DNS or timeout failure reaching upstream
    #[error("{0}")]
    Transport(String),

    /// Upstream answered 2xx with a body that is not JSON
    #[error("invalid JSON in upstream response: {0}")]
    InvalidBody(String),
}

impl UpstreamError {
    fn transport(err: &reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("request timed out after {}s", timeout.as_secs_f32()))
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Client for `GET {base}/api/v1/get-data-casino/{id}/`
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl UpstreamClient {
    /// Create a new upstream client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (TLS backend
    /// initialisation failure).
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("casino-proxy/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
        })
    }

    /// Upstream URL for a casino
    pub fn url_for(&self, id: &CasinoId) -> String {
        format!("{}/api/v1/get-data-casino/{id}/", self.base_url)
    }

    /// Fetch the casino document from upstream
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::Status`] with the upstream status and body text
    /// - [`UpstreamError::Transport`] if upstream is unreachable, times out,
    ///   or drops the connection while sending a body
    /// - [`UpstreamError::InvalidBody`] if a 2xx body is not JSON
    pub async fn fetch(&self, id: &CasinoId) -> Result<Value, UpstreamError> {
        let url = self.url_for(id);
        tracing::debug!(%url, "Fetching from upstream");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| UpstreamError::transport(&e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| UpstreamError::transport(&e, self.timeout))?;
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::transport(&e, self.timeout))?;

        serde_json::from_slice(&bytes).map_err(|e| UpstreamError::InvalidBody(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use serde_json::json;

    fn client_for(base_url: &str, timeout: Duration) -> UpstreamClient {
        UpstreamClient::new(&UpstreamConfig {
            base_url: base_url.to_string(),
            timeout,
        })
        .unwrap()
    }

    fn id(raw: &str) -> CasinoId {
        CasinoId::parse(raw).unwrap()
    }

    #[test]
    fn test_url_for() {
        let client = client_for("https://adm.incasinowetrust.com/", Duration::from_secs(10));
        assert_eq!(
            client.url_for(&id("42")),
            "https://adm.incasinowetrust.com/api/v1/get-data-casino/42/"
        );
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/get-data-casino/42/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"bonus": 100}"#)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server.url(), Duration::from_secs(10));
        let doc = tokio_test::assert_ok!(client.fetch(&id("42")).await);

        assert_eq!(doc, json!({"bonus": 100}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_propagates_status_and_body() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v1/get-data-casino/999/")
            .with_status(404)
            .with_body(r#"{"detail":"No Casino matches the given query."}"#)
            .create_async()
            .await;

        let client = client_for(&server.url(), Duration::from_secs(10));
        let err = client.fetch(&id("999")).await.unwrap_err();

        match err {
            UpstreamError::Status { status, body } => {
                assert_eq!(status, 404);
                assert!(body.contains("No Casino matches"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_invalid_json() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v1/get-data-casino/42/")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let client = client_for(&server.url(), Duration::from_secs(10));
        let err = client.fetch(&id("42")).await.unwrap_err();

        assert!(matches!(err, UpstreamError::InvalidBody(_)));
    }

    #[tokio::test]
    async fn test_fetch_unreachable() {
        // Nothing listens on port 1
        let client = client_for("http://127.0.0.1:1", Duration::from_secs(10));
        let err = client.fetch(&id("42")).await.unwrap_err();

        assert!(matches!(err, UpstreamError::Transport(_)));
    }

    #[tokio::test]
    async fn test_fetch_truncated_error_body_is_transport() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Promise a 100 byte body, send 5 bytes, then hang up
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(b"HTTP/1.1 500 Internal Server Error\r\ncontent-length: 100\r\n\r\nshort")
                .await;
        });

        let client = client_for(&format!("http://{addr}"), Duration::from_secs(10));
        let err = client.fetch(&id("42")).await.unwrap_err();

        assert!(matches!(err, UpstreamError::Transport(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept and hold connections without ever answering
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client = client_for(&format!("http://{addr}"), Duration::from_millis(200));
        let err = client.fetch(&id("42")).await.unwrap_err();

        match err {
            UpstreamError::Transport(message) => assert!(message.contains("timed out")),
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
