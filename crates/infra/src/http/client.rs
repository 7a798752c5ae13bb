//! HTTP transport for fetching JSON collections from a peer service.
//!
//! The transport performs exactly one request per call. Retries, timeouts
//! and circuit breaking are layered on by
//! [`ResilientClient`](super::resilient::ResilientClient).

use std::time::Duration;

use async_trait::async_trait;
use play_domain::PlayError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client as ReqwestClient;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::errors::InfraError;

/// Why a single transport attempt failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failure: {0}")]
    Connect(String),
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return TransportError::Timeout;
        }
        if err.is_decode() {
            return TransportError::Malformed(err.to_string());
        }
        if let Some(status) = err.status() {
            return TransportError::Status {
                status: status.as_u16(),
                url: err.url().map(ToString::to_string).unwrap_or_default(),
            };
        }
        TransportError::Connect(err.to_string())
    }
}

/// "GET a route, decode a JSON array" against one peer.
#[async_trait]
pub trait CollectionTransport<T>: Send + Sync {
    async fn get_collection(&self, route: &str) -> Result<Vec<T>, TransportError>;
}

/// reqwest-backed [`CollectionTransport`] rooted at a base address.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: ReqwestClient,
    base_url: Url,
}

impl HttpTransport {
    /// Start building a transport for `base_url`.
    pub fn builder(base_url: impl Into<String>) -> HttpTransportBuilder {
        HttpTransportBuilder::new(base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn resolve(&self, route: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(route.trim_start_matches('/'))
            .map_err(|e| TransportError::Malformed(format!("invalid route '{route}': {e}")))
    }
}

#[async_trait]
impl<T> CollectionTransport<T> for HttpTransport
where
    T: DeserializeOwned + Send + 'static,
{
    async fn get_collection(&self, route: &str) -> Result<Vec<T>, TransportError> {
        let url = self.resolve(route)?;
        debug!(%url, "sending collection request");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        debug!(%url, %status, "received collection response");

        if !status.is_success() {
            return Err(TransportError::Status { status: status.as_u16(), url: url.to_string() });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| TransportError::Malformed(e.to_string()))
    }
}

/// Builder for [`HttpTransport`].
#[derive(Debug)]
pub struct HttpTransportBuilder {
    base_url: String,
    connect_timeout: Duration,
    user_agent: Option<String>,
}

impl HttpTransportBuilder {
    fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), connect_timeout: Duration::from_secs(5), user_agent: None }
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> Result<HttpTransport, PlayError> {
        let mut base_url = Url::parse(&self.base_url).map_err(|e| {
            PlayError::Config(format!("invalid service url '{}': {e}", self.base_url))
        })?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = ReqwestClient::builder()
            .connect_timeout(self.connect_timeout)
            .default_headers(headers)
            .no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder.build().map_err(|err| PlayError::from(InfraError::from(err)))?;

        Ok(HttpTransport { client, base_url })
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use serde::Deserialize;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    fn transport(base: &str) -> HttpTransport {
        HttpTransport::builder(base).build().expect("http transport")
    }

    async fn fetch(transport: &HttpTransport, route: &str) -> Result<Vec<Named>, TransportError> {
        transport.get_collection(route).await
    }

    #[tokio::test]
    async fn decodes_json_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .and(header("accept", "application/json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{ "name": "Potion" }, { "name": "Ether" }])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let items = fetch(&transport(&server.uri()), "items").await.expect("collection");

        assert_eq!(items, vec![Named { name: "Potion".into() }, Named { name: "Ether".into() }]);
    }

    #[tokio::test]
    async fn keeps_base_path_prefix() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let transport = transport(&format!("{}/api", server.uri()));
        assert!(fetch(&transport, "/items").await.expect("collection").is_empty());
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        match fetch(&transport(&server.uri()), "items").await {
            Err(TransportError::Status { status, url }) => {
                assert_eq!(status, 503);
                assert!(url.ends_with("/items"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn wrong_shape_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"not\":\"an array\"}"))
            .mount(&server)
            .await;

        let result = fetch(&transport(&server.uri()), "items").await;
        assert!(matches!(result, Err(TransportError::Malformed(_))));
    }

    #[tokio::test]
    async fn refused_connection_is_connect_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener); // release the port so that requests fail with ECONNREFUSED

        let result = fetch(&transport(&format!("http://{addr}")), "items").await;
        assert!(matches!(result, Err(TransportError::Connect(_))), "got {result:?}");
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        let err = HttpTransport::builder("not a url").build().unwrap_err();
        assert!(matches!(err, PlayError::Config(_)));
    }
}
