//! Relay client.
//!
//! Every outbound call goes through the CORS relay: the upstream URL is
//! passed as a query parameter and the relay answers with the upstream body.

use crate::error::LookupError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// HTTP method of a relayed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A call to an upstream URL, to be sent through the relay.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyRequest {
    pub method: Method,
    pub target_url: String,
    pub body: Option<Value>,
}

impl ProxyRequest {
    pub fn get(target_url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            target_url: target_url.into(),
            body: None,
        }
    }

    pub fn post(target_url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            target_url: target_url.into(),
            body: Some(body),
        }
    }
}

/// Relays a request and returns the decoded JSON body.
///
/// A non-success status or a body that is not JSON is an error.
#[async_trait]
pub trait ProxyFetcher: Send + Sync {
    async fn fetch(&self, request: &ProxyRequest) -> Result<Value, LookupError>;
}

/// Configuration for the HTTP relay client.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Relay endpoint, e.g. `https://relay.example.workers.dev/`.
    pub base_url: String,
    /// Query parameter carrying the upstream URL.
    pub url_param: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://backendquickbgc.kubo-lanco.workers.dev/".to_string(),
            url_param: "url".to_string(),
            timeout_seconds: 30,
            user_agent: format!("quickbgc/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// `ProxyFetcher` backed by reqwest.
pub struct HttpProxyFetcher {
    config: RelayConfig,
    base: Url,
    http_client: reqwest::Client,
}

impl HttpProxyFetcher {
    pub fn new(config: RelayConfig) -> Result<Self> {
        info!("Using relay at {}", config.base_url);

        let base = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid relay URL: {}", config.base_url))?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            config,
            base,
            http_client,
        })
    }

    /// Relay URL for an upstream target. Existing query pairs on the base are kept.
    pub fn relay_url(&self, target_url: &str) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair(&self.config.url_param, target_url);
        url
    }
}

#[async_trait]
impl ProxyFetcher for HttpProxyFetcher {
    async fn fetch(&self, request: &ProxyRequest) -> Result<Value, LookupError> {
        let url = self.relay_url(&request.target_url);
        debug!("{:?} {} via relay", request.method, request.target_url);

        let builder = match request.method {
            Method::Get => self.http_client.get(url),
            Method::Post => {
                let builder = self.http_client.post(url);
                match request.body {
                    Some(ref body) => builder.json(body),
                    None => builder,
                }
            }
        };

        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            debug!("Relay returned {} for {}", status, request.target_url);
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
