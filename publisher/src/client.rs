//! KM server client.
//!
//! The scheduler talks to the knowledge base through the [`KmClient`] trait.
//! [`HttpKmClient`] is the production implementation: it POSTs each
//! expression as JSON and retries transient failures with exponential
//! backoff.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ClientError, Result};

/// Detail text reported for every dry-run publish.
pub const DRY_RUN_DETAIL: &str = "Dry-run: Skipped sending to KM server.";

/// Result of one publish call that reached a verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Whether the server accepted the expression.
    pub success: bool,
    /// Server response text or rejection reason.
    pub detail: String,
}

impl PublishOutcome {
    /// An accepted expression.
    #[must_use]
    pub fn accepted(detail: impl Into<String>) -> Self {
        Self {
            success: true,
            detail: detail.into(),
        }
    }

    /// A rejected expression.
    #[must_use]
    pub fn rejected(detail: impl Into<String>) -> Self {
        Self {
            success: false,
            detail: detail.into(),
        }
    }

    /// The outcome of a dry run.
    #[must_use]
    pub fn dry_run() -> Self {
        Self::accepted(DRY_RUN_DETAIL)
    }
}

/// Submits one expression to a knowledge base.
#[async_trait]
pub trait KmClient: Send + Sync {
    /// Publishes `expression`. With `dry_run` set no I/O happens and the
    /// outcome is always a success.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when no verdict could be obtained.
    async fn publish(&self, expression: &str, dry_run: bool) -> Result<PublishOutcome>;
}

/// Settings for [`HttpKmClient`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpClientConfig {
    /// Endpoint that accepts `{"expr", "fail_mode"}` POSTs.
    pub url: String,
    /// Value of the `fail_mode` field sent with every expression.
    pub fail_mode: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Attempts per expression, including the first.
    pub max_attempts: u32,
    /// Lower bound of the retry delay in milliseconds.
    pub backoff_min_ms: u64,
    /// Upper bound of the retry delay in milliseconds.
    pub backoff_max_ms: u64,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080/km".to_owned(),
            fail_mode: "fail".to_owned(),
            timeout_ms: 10_000,
            max_attempts: 3,
            backoff_min_ms: 2_000,
            backoff_max_ms: 10_000,
        }
    }
}

impl HttpClientConfig {
    /// Delay before retry number `retry` (1-based): `2^retry` seconds,
    /// clamped to the configured bounds.
    #[must_use]
    pub fn backoff(&self, retry: u32) -> Duration {
        let exp = 1_000u64.saturating_mul(1u64 << retry.min(20));
        let ms = exp.clamp(self.backoff_min_ms, self.backoff_max_ms.max(self.backoff_min_ms));
        Duration::from_millis(ms)
    }
}

#[derive(Serialize)]
struct PublishRequest<'a> {
    expr: &'a str,
    fail_mode: &'a str,
}

/// What one HTTP attempt produced.
enum Attempt {
    Verdict(PublishOutcome),
    Transient(String),
}

/// HTTP implementation of [`KmClient`].
#[derive(Debug, Clone)]
pub struct HttpKmClient {
    client: Client,
    url: Url,
    config: HttpClientConfig,
}

impl HttpKmClient {
    /// Creates a client for `config.url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Build`] if the URL does not parse or the HTTP
    /// client cannot be built.
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let url = Url::parse(&config.url)
            .map_err(|e| ClientError::Build(format!("invalid KM url `{}`: {e}", config.url)))?;
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;
        Ok(Self {
            client,
            url,
            config,
        })
    }

    /// The endpoint this client posts to.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn attempt(&self, expression: &str) -> Result<Attempt> {
        let body = PublishRequest {
            expr: expression,
            fail_mode: &self.config.fail_mode,
        };
        let response = match self.client.post(self.url.clone()).json(&body).send().await {
            Ok(response) => response,
            Err(e) if e.is_connect() || e.is_timeout() || e.is_request() => {
                return Ok(Attempt::Transient(e.to_string()));
            }
            Err(e) => return Err(ClientError::Network(e.to_string())),
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) if e.is_timeout() => return Ok(Attempt::Transient(e.to_string())),
            Err(e) => return Err(ClientError::Decode(e.to_string())),
        };

        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Ok(Attempt::Transient(format!("KM server error: {status} - {text}")));
        }
        if !status.is_success() {
            return Ok(Attempt::Verdict(PublishOutcome::rejected(format!(
                "KM server rejected expression: {status} - {text}"
            ))));
        }

        let rejected = serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|body| body.get("success").and_then(serde_json::Value::as_bool))
            == Some(false);
        Ok(Attempt::Verdict(if rejected {
            PublishOutcome::rejected(text)
        } else {
            PublishOutcome::accepted(text)
        }))
    }
}

#[async_trait]
impl KmClient for HttpKmClient {
    async fn publish(&self, expression: &str, dry_run: bool) -> Result<PublishOutcome> {
        let preview: String = expression.chars().take(100).collect();
        if dry_run {
            info!(expression = %preview, "Dry-run: skipped sending");
            return Ok(PublishOutcome::dry_run());
        }

        let attempts = self.config.max_attempts.max(1);
        let mut last_error = String::new();
        for attempt in 1..=attempts {
            debug!(attempt, expression = %preview, "Sending expression");
            match self.attempt(expression).await? {
                Attempt::Verdict(outcome) => {
                    if outcome.success {
                        info!(expression = %preview, "Expression accepted");
                    } else {
                        warn!(expression = %preview, detail = %outcome.detail, "Expression rejected");
                    }
                    return Ok(outcome);
                }
                Attempt::Transient(message) => {
                    warn!(attempt, max_attempts = attempts, error = %message, "Transient KM failure");
                    last_error = message;
                    if attempt < attempts {
                        tokio::time::sleep(self.config.backoff(attempt)).await;
                    }
                }
            }
        }
        Err(ClientError::Network(format!(
            "gave up after {attempts} attempts: {last_error}"
        )))
    }
}
