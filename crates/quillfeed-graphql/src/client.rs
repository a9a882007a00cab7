//! GraphQL HTTP transport.
//!
//! Executes exactly one request/response cycle per call. Retries, if
//! desired, belong to the caller (see [`crate::retry`]).

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::debug;

use crate::cache::{ResponseCache, cache_key};
use crate::error::ClientError;
use crate::operation::{GraphqlOperation, GraphqlResponse};

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default cache entry lifetime.
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Default)]
struct GraphqlClientMetrics {
    requests_total: AtomicU64,
    cache_hits: AtomicU64,
}

/// Metrics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphqlClientMetricsSnapshot {
    /// Network requests issued.
    pub requests_total: u64,
    /// Requests served from the response cache.
    pub cache_hits: u64,
}

/// GraphQL client builder.
#[derive(Debug, Clone)]
pub struct GraphqlClientBuilder {
    endpoint: String,
    timeout: Duration,
    bearer_token: Option<String>,
    cache_ttl: Option<Duration>,
    cache_namespace: String,
}

impl GraphqlClientBuilder {
    /// Create a new builder for the given endpoint.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: DEFAULT_TIMEOUT,
            bearer_token: None,
            cache_ttl: None,
            cache_namespace: "default".to_string(),
        }
    }

    /// Set the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Attach a bearer token. The authorization header is only ever
    /// sent when a token is configured; it is never sent empty.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Enable the response cache with the given entry lifetime.
    /// Without this call every request is a live fetch.
    #[must_use]
    pub const fn with_cache(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Enable the response cache with the default 5 minute lifetime.
    #[must_use]
    pub const fn with_default_cache(self) -> Self {
        self.with_cache(DEFAULT_CACHE_TTL)
    }

    /// Set the cache key namespace (typically the publication host).
    #[must_use]
    pub fn with_cache_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.cache_namespace = namespace.into();
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<GraphqlClient, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = &self.bearer_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                ClientError::Protocol {
                    message: "bearer token contains invalid header characters".to_string(),
                }
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(self.timeout)
            .build()
            .map_err(|err| ClientError::from_reqwest(&err, self.timeout))?;

        Ok(GraphqlClient {
            endpoint: self.endpoint,
            http,
            timeout: self.timeout,
            cache: self.cache_ttl.map(|_| ResponseCache::new()),
            cache_ttl: self.cache_ttl.unwrap_or(DEFAULT_CACHE_TTL),
            cache_namespace: self.cache_namespace,
            metrics: Arc::new(GraphqlClientMetrics::default()),
        })
    }
}

/// GraphQL client.
///
/// Owns its response cache exclusively; nothing is shared across
/// client instances.
#[derive(Debug)]
pub struct GraphqlClient {
    endpoint: String,
    http: reqwest::Client,
    timeout: Duration,
    cache: Option<ResponseCache>,
    cache_ttl: Duration,
    cache_namespace: String,
    metrics: Arc<GraphqlClientMetrics>,
}

impl GraphqlClient {
    /// Return a metrics snapshot.
    #[must_use]
    pub fn metrics(&self) -> GraphqlClientMetricsSnapshot {
        GraphqlClientMetricsSnapshot {
            requests_total: self.metrics.requests_total.load(Ordering::Relaxed),
            cache_hits: self.metrics.cache_hits.load(Ordering::Relaxed),
        }
    }

    /// Drop all cached responses, e.g. between build runs.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    /// Execute a typed query and return its data payload.
    ///
    /// The cache is consulted before issuing the network call; a hit
    /// short-circuits the network entirely. A successful response is
    /// offered to the cache before being returned.
    pub async fn execute<O: GraphqlOperation>(
        &self,
        variables: O::Variables,
    ) -> Result<O::ResponseData, ClientError> {
        let variables = serde_json::to_value(&variables)?;
        let key = cache_key(&self.cache_namespace, O::QUERY, &variables);

        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&key) {
                self.metrics.cache_hits.fetch_add(1, Ordering::Relaxed);
                debug!(operation = O::OPERATION_NAME, "response cache hit");
                return Ok(serde_json::from_value(hit)?);
            }
        }

        let data = self.fetch(O::QUERY, O::OPERATION_NAME, variables).await?;

        if let Some(cache) = &self.cache {
            cache.set(&key, data.clone(), self.cache_ttl);
        }
        Ok(serde_json::from_value(data)?)
    }

    async fn fetch(
        &self,
        query: &str,
        operation_name: &str,
        variables: Value,
    ) -> Result<Value, ClientError> {
        let mut body = serde_json::Map::new();
        body.insert("query".to_string(), Value::String(query.to_string()));
        body.insert("variables".to_string(), variables);
        body.insert(
            "operationName".to_string(),
            Value::String(operation_name.to_string()),
        );

        self.metrics.requests_total.fetch_add(1, Ordering::Relaxed);
        debug!(operation = operation_name, "issuing GraphQL request");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&Value::Object(body))
            .send()
            .await
            .map_err(|err| ClientError::from_reqwest(&err, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Http {
                status,
                status_text: status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| ClientError::from_reqwest(&err, self.timeout))?;
        let parsed: GraphqlResponse<Value> = serde_json::from_slice(&bytes)?;

        if !parsed.errors.is_empty() {
            let messages = parsed
                .errors
                .iter()
                .map(|err| err.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ClientError::Graphql { messages });
        }

        parsed.data.ok_or_else(|| ClientError::Protocol {
            message: "no data returned".to_string(),
        })
    }
}
