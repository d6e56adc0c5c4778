//! HTTP client for the Elasticsearch search API

use super::gateway::{GatewayError, SearchGateway};
use crate::config::ElasticsearchSettings;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Elasticsearch client holding one pooled connection set for the process
#[derive(Clone)]
pub struct EsClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl EsClient {
    /// Build the client from settings. The API key is attached to every request.
    pub fn with_settings(settings: &ElasticsearchSettings) -> Result<Self> {
        let base = url::Url::parse(&settings.url)
            .with_context(|| format!("invalid Elasticsearch URL '{}'", settings.url))?;

        let mut headers = HeaderMap::new();
        if !settings.api_key.is_empty() {
            let mut auth = HeaderValue::from_str(&format!("ApiKey {}", settings.api_key))
                .context("API key contains characters not allowed in a header")?;
            auth.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth);
        }

        let timeout = settings.timeout()?;
        let mut builder = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(settings.pool_maxsize)
            .default_headers(headers)
            .gzip(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().context("building HTTP client")?;

        Ok(Self {
            client,
            base_url: base.as_str().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check that the cluster answers. Success does not imply the index exists.
    pub async fn ping(&self) -> Result<(), GatewayError> {
        let response = self
            .client
            .get(&self.base_url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(GatewayError::Protocol {
                status: status.as_u16(),
                reason: "ping failed".to_string(),
            })
        }
    }

    fn search_url(&self, index: &str) -> String {
        format!("{}/{}/_search", self.base_url, urlencoding::encode(index))
    }

    fn transport_error(&self, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout(self.timeout)
        } else {
            GatewayError::Transport(err.to_string())
        }
    }

    /// Decode the body, turning engine-side errors into `Protocol`
    async fn parse_response(&self, response: Response) -> Result<Value, GatewayError> {
        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;

        debug!("Search responded with HTTP {} ({} bytes)", status, text.len());

        if !status.is_success() {
            return Err(GatewayError::Protocol {
                status: status.as_u16(),
                reason: error_reason(&text),
            });
        }

        serde_json::from_str(&text).map_err(|e| GatewayError::Protocol {
            status: status.as_u16(),
            reason: format!("response body is not JSON: {}", e),
        })
    }
}

#[async_trait]
impl SearchGateway for EsClient {
    async fn execute(&self, index: &str, query: &Value) -> Result<Value, GatewayError> {
        debug!("Sending search to index {}: {}", index, query);

        let response = self
            .client
            .post(self.search_url(index))
            .json(query)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.parse_response(response).await
    }
}

/// Pull `error.type: error.reason` out of an Elasticsearch error body
fn error_reason(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let error = parsed.as_ref().and_then(|v| v.get("error"));

    match error {
        Some(Value::String(s)) => s.clone(),
        Some(e) => {
            let kind = e.get("type").and_then(Value::as_str).unwrap_or("error");
            let reason = e.get("reason").and_then(Value::as_str).unwrap_or("unknown");
            format!("{}: {}", kind, reason)
        }
        None => body.chars().take(200).collect(),
    }
}
