//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building the HTTP client from the registry configuration
//! - Structured (JSON) fetches against the `/rekap` endpoints
//! - Raw document fetches for school profile pages
//! - Retrying failed attempts according to a [`RetryPolicy`]
//! - Detecting anti-bot HTML substituted for JSON

use crate::config::RegistryConfig;
use crate::crawler::query::RegistryQuery;
use crate::crawler::retry::RetryPolicy;
use crate::{HarvestError, Result};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Why a single attempt did not produce a usable response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    /// Connection refused, reset, DNS failure, body read error
    Transport(String),

    /// Request timed out
    Timeout,

    /// Any status other than 200
    Status(u16),

    /// An HTML page came back where JSON was expected
    AntiBot,

    /// Body was not valid JSON
    InvalidJson(String),
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport error: {}", e),
            Self::Timeout => write!(f, "request timed out"),
            Self::Status(code) => write!(f, "HTTP {}", code),
            Self::AntiBot => write!(f, "HTML response (anti-bot)"),
            Self::InvalidJson(e) => write!(f, "invalid JSON: {}", e),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use dapo_harvest::config::RegistryConfig;
/// use dapo_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&RegistryConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &RegistryConfig) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.request_timeout_secs))
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Returns true when a body that should be JSON is really an HTML page
///
/// The registry's anti-bot layer answers with `200 OK` and a challenge page,
/// so status alone is not enough.
pub fn is_html_document(body: &str) -> bool {
    let head: String = body
        .trim_start()
        .chars()
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase();
    head.starts_with("<!doctype html") || head.starts_with("<html")
}

/// Resilient fetcher for the registry's JSON endpoints and profile pages
///
/// Every request is retried under the configured [`RetryPolicy`]. With the
/// default unbounded policy the fetch methods only return once a usable
/// response arrives.
pub struct Fetcher {
    client: Client,
    policy: RetryPolicy,
    base_url: String,
    semester_id: String,
}

impl Fetcher {
    /// Creates a fetcher with a freshly built client
    pub fn new(config: &RegistryConfig, policy: RetryPolicy) -> Result<Self> {
        let client = build_http_client(config)?;
        Ok(Self::with_client(client, config, policy))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, config: &RegistryConfig, policy: RetryPolicy) -> Self {
        Self {
            client,
            policy,
            base_url: config.base_url.clone(),
            semester_id: config.semester_id.clone(),
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetches a structured query and returns the decoded JSON payload
    ///
    /// Retries on transport errors, non-200 statuses, HTML bodies and
    /// undecodable JSON.
    pub async fn fetch_structured(&self, query: &RegistryQuery) -> Result<Value> {
        let url = query.to_url(&self.base_url, &self.semester_id)?;
        tracing::trace!("GET {}", url);

        self.get_with_retry(&url, |body| {
            if is_html_document(&body) {
                return Err(AttemptFailure::AntiBot);
            }
            serde_json::from_str(body.trim())
                .map_err(|e| AttemptFailure::InvalidJson(e.to_string()))
        })
        .await
    }

    /// Fetches a raw document (a school profile page)
    pub async fn fetch_document(&self, url: &str) -> Result<String> {
        let url = Url::parse(url)?;
        tracing::trace!("GET {}", url);

        self.get_with_retry(&url, Ok).await
    }

    /// Issues the same GET until `accept` takes the body or the policy gives up
    async fn get_with_retry<T, F>(&self, url: &Url, accept: F) -> Result<T>
    where
        F: Fn(String) -> std::result::Result<T, AttemptFailure>,
    {
        let mut attempts: u32 = 0;

        loop {
            attempts = attempts.saturating_add(1);

            let failure = match self.get_once(url).await {
                Ok(body) => match accept(body) {
                    Ok(value) => {
                        if attempts > 1 {
                            tracing::debug!("{} succeeded after {} attempts", url, attempts);
                        }
                        return Ok(value);
                    }
                    Err(failure) => failure,
                },
                Err(failure) => failure,
            };

            if !self.policy.allows_retry(attempts) {
                return Err(HarvestError::RetriesExhausted {
                    url: url.to_string(),
                    attempts,
                    last_error: failure.to_string(),
                });
            }

            let delay = self.policy.delay_after(attempts);
            tracing::warn!(
                "[{}] {}, retrying in {}ms (attempt {})",
                url.path(),
                failure,
                delay.as_millis(),
                attempts
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// One GET, classified
    async fn get_once(&self, url: &Url) -> std::result::Result<String, AttemptFailure> {
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                AttemptFailure::Timeout
            } else {
                AttemptFailure::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AttemptFailure::Status(status.as_u16()));
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                AttemptFailure::Timeout
            } else {
                AttemptFailure::Transport(e.to_string())
            }
        })
    }
}
