//! Fetch transport seam.
//!
//! The cache never talks to the network directly: every entry fetches its
//! canonical key through a [`Transport`]. [`HttpTransport`] is the production
//! implementation over `reqwest`; tests plug in scripted transports instead.

use crate::config::GraphConfig;
use crate::core::GraphError;
use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::header::ACCEPT;
use serde_json::Value as Json;
use thiserror::Error;
use url::Url;

/// Failure of a single fetch.
///
/// Stored frozen in failed entries and surfaced through
/// [`Probe::on_error`](super::Probe::on_error); never thrown across the
/// cache boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request could not be sent or the connection failed
    #[error("Network error fetching {url}: {reason}")]
    Network {
        /// Requested URL
        url: String,
        /// Underlying failure
        reason: String,
    },

    /// The server answered with a non-success status
    #[error("Server returned status {status} for {url}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// The response body was not the JSON object expected
    #[error("Malformed response from {url}: {reason}")]
    Malformed {
        /// Requested URL
        url: String,
        /// What was wrong with the body
        reason: String,
    },

    /// The fetch was cancelled before completing
    #[error("Fetch of {url} was aborted")]
    Aborted {
        /// Requested URL
        url: String,
    },
}

/// Generic fetch-style transport returning JSON documents.
///
/// `url` is a canonical cache key: a resource id, optionally followed by
/// `?` and a percent-encoded JSON query.
pub trait Transport: Send + Sync + 'static {
    /// Fetch the document at `url`.
    fn fetch(&self, url: &str) -> BoxFuture<'static, Result<Json, TransportError>>;
}

/// HTTP transport over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base: Option<Url>,
}

impl HttpTransport {
    /// Build a transport from configuration (base URL and timeout).
    pub fn new(config: &GraphConfig) -> Result<Self, GraphError> {
        let base = config
            .base
            .as_deref()
            .map(Url::parse)
            .transpose()
            .map_err(|e| GraphError::ConfigError {
                message: format!("invalid base URL: {e}"),
            })?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| GraphError::ConfigError {
                message: format!("cannot build HTTP client: {e}"),
            })?;

        Ok(Self { client, base })
    }

    fn resolve(&self, url: &str) -> Result<Url, TransportError> {
        let resolved = match &self.base {
            Some(base) => base.join(url),
            None => Url::parse(url),
        };

        resolved.map_err(|e| TransportError::Network {
            url: url.to_string(),
            reason: format!("cannot resolve URL: {e}"),
        })
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &str) -> BoxFuture<'static, Result<Json, TransportError>> {
        let client = self.client.clone();
        let resolved = self.resolve(url);
        let url = url.to_string();

        async move {
            let target = resolved?;

            tracing::debug!("GET {}", target);

            let response = client
                .get(target)
                .header(ACCEPT, "application/json")
                .send()
                .await
                .map_err(|e| TransportError::Network {
                    url: url.clone(),
                    reason: e.to_string(),
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(TransportError::Status {
                    url,
                    status: status.as_u16(),
                });
            }

            response.json::<Json>().await.map_err(|e| TransportError::Malformed {
                url,
                reason: e.to_string(),
            })
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_against_base() {
        let config = GraphConfig {
            base: Some("https://example.org/api/".to_string()),
            ..GraphConfig::default()
        };
        let transport = HttpTransport::new(&config).unwrap();

        assert_eq!(
            transport.resolve("/items?%7B%7D").unwrap().as_str(),
            "https://example.org/items?%7B%7D"
        );
        assert_eq!(
            transport.resolve("items").unwrap().as_str(),
            "https://example.org/api/items"
        );
    }

    #[test]
    fn test_resolve_without_base() {
        let transport = HttpTransport::new(&GraphConfig::default()).unwrap();

        assert!(transport.resolve("https://example.org/items").is_ok());
        assert!(matches!(
            transport.resolve("/items"),
            Err(TransportError::Network { .. })
        ));
    }

    #[test]
    fn test_invalid_base_is_a_config_error() {
        let config = GraphConfig {
            base: Some("not a url".to_string()),
            ..GraphConfig::default()
        };

        assert!(matches!(
            HttpTransport::new(&config),
            Err(GraphError::ConfigError { .. })
        ));
    }
}
