//! Loader configuration.

use std::time::Duration;

use quillfeed_graphql::{GraphqlClient, GraphqlClientBuilder, RetryPolicy};
use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Configuration for a Hashnode publication loader.
///
/// One loader owns one client and one response cache; nothing is
/// shared across loader instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Publication host, e.g. `blog.example.com`. Identifies the
    /// publication remotely and namespaces the response cache.
    pub host: String,

    /// Personal access token. Required for draft content; when absent
    /// requests are sent without an authorization header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// GraphQL endpoint (default: <https://gql.hashnode.com>).
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,

    /// Whether the response cache participates. When disabled every
    /// request is a live fetch.
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,

    /// Cache entry lifetime.
    #[serde(default = "default_cache_ttl", with = "duration_secs")]
    pub cache_ttl: Duration,

    /// Cap on total items yielded by pagination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,

    /// Retry configuration for top-level fetches.
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_api_url() -> String {
    "https://gql.hashnode.com".into()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

const fn default_cache_enabled() -> bool {
    true
}

fn default_cache_ttl() -> Duration {
    Duration::from_secs(300)
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl LoaderConfig {
    /// Create a configuration with defaults for the given host.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            token: None,
            api_url: default_api_url(),
            timeout: default_timeout(),
            cache_enabled: default_cache_enabled(),
            cache_ttl: default_cache_ttl(),
            max_items: None,
            retry: RetryConfig::default(),
        }
    }

    /// Build the GraphQL client for this configuration.
    pub fn client(&self) -> Result<GraphqlClient, LoadError> {
        if self.host.is_empty() {
            return Err(LoadError::Config("publication host is required".into()));
        }

        let mut builder = GraphqlClientBuilder::new(&self.api_url)
            .with_timeout(self.timeout)
            .with_cache_namespace(&self.host);
        if let Some(token) = &self.token {
            builder = builder.with_bearer_token(token);
        }
        if self.cache_enabled {
            builder = builder.with_cache(self.cache_ttl);
        }
        builder.build().map_err(LoadError::Fetch)
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::new(String::new())
    }
}

/// Retry configuration for top-level fetches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum attempts, including the initial one.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Initial delay between retries in milliseconds.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay between retries in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Maximum jitter added to delays in milliseconds.
    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,
}

const fn default_max_attempts() -> usize {
    3
}

const fn default_initial_delay_ms() -> u64 {
    200
}

const fn default_max_delay_ms() -> u64 {
    5_000
}

const fn default_jitter_ms() -> u64 {
    150
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            jitter_ms: default_jitter_ms(),
        }
    }
}

impl RetryConfig {
    /// Convert into the transport crate's retry policy.
    #[must_use]
    pub const fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.initial_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            max_jitter: Duration::from_millis(self.jitter_ms),
        }
    }
}
