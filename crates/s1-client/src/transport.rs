//! Authenticated transport for the management REST API.
//!
//! [`S1Client::execute`] issues one call, classifies the HTTP status, decodes
//! the common [`Envelope`] and turns platform-reported errors into a single
//! [`S1Error::ApiReported`]. Every failure is logged here, once, with the
//! method and URL; callers propagate it unchanged.
//!
//! The client keeps no session or cache state between calls.

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::Serialize;
use tracing::{debug, error};

use crate::config::ClientConfig;
use crate::envelope::Envelope;
use crate::error::{S1Error, S1Result};
use crate::retry::{with_retry_if, RetryConfig};

/// User-Agent sent with every request.
pub const USER_AGENT: &str = concat!("s1cli/", env!("CARGO_PKG_VERSION"));

/// No query parameters.
pub const NO_QUERY: &[(&str, &str)] = &[];

/// Management API client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct S1Client {
    /// HTTP client instance.
    client: Client,

    /// Console URL, token and transport settings.
    config: ClientConfig,

    /// Retry policy for lookups.
    retry: RetryConfig,
}

impl S1Client {
    /// Create a new client for the configured console.
    pub fn new(config: ClientConfig) -> S1Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(S1Error::ClientBuild)?;
        let retry = config.retry_config();

        Ok(Self {
            client,
            config,
            retry,
        })
    }

    /// The configuration this client was built from.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Execute a call with an optional JSON body and query parameters.
    ///
    /// `GET` calls are retried according to the configured policy when they
    /// fail with a transport error or a 5xx status. Every other method is
    /// issued exactly once.
    pub async fn execute<B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        query: &[(&str, &str)],
    ) -> S1Result<Envelope>
    where
        B: Serialize + ?Sized,
    {
        if method != Method::GET {
            return self.execute_once(method, endpoint, body, query).await;
        }

        with_retry_if(
            &self.retry,
            move || self.execute_once(method.clone(), endpoint, body, query),
            S1Error::is_retryable,
        )
        .await
    }

    /// Issue a `GET` with query parameters.
    pub async fn get(&self, endpoint: &str, query: &[(&str, &str)]) -> S1Result<Envelope> {
        self.execute::<()>(Method::GET, endpoint, None, query).await
    }

    /// Issue a `POST` with a JSON body.
    pub async fn post<B>(&self, endpoint: &str, body: &B) -> S1Result<Envelope>
    where
        B: Serialize + ?Sized,
    {
        self.execute(Method::POST, endpoint, Some(body), NO_QUERY).await
    }

    /// Issue a `PUT` with a JSON body.
    pub async fn put<B>(&self, endpoint: &str, body: &B) -> S1Result<Envelope>
    where
        B: Serialize + ?Sized,
    {
        self.execute(Method::PUT, endpoint, Some(body), NO_QUERY).await
    }

    async fn execute_once<B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        query: &[(&str, &str)],
    ) -> S1Result<Envelope>
    where
        B: Serialize + ?Sized,
    {
        let url = self.config.api_url(endpoint);
        debug!(method = %method, url = %url, "executing request");

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("ApiToken {}", self.config.api_key));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|source| {
            logged(S1Error::Transport {
                method: method.to_string(),
                url: url.clone(),
                source,
            })
        })?;

        let status = response.status().as_u16();
        if status >= 500 {
            return Err(logged(S1Error::ServerError {
                method: method.to_string(),
                url,
                status,
            }));
        }
        if status >= 405 {
            return Err(logged(S1Error::NotPermitted {
                method: method.to_string(),
                url,
                status,
            }));
        }

        let bytes = response.bytes().await.map_err(|source| {
            logged(S1Error::Transport {
                method: method.to_string(),
                url: url.clone(),
                source,
            })
        })?;
        let envelope: Envelope = serde_json::from_slice(&bytes).map_err(|e| {
            logged(S1Error::decode(
                format!("response from {} {}", method, url),
                e,
            ))
        })?;

        if envelope.has_errors() {
            for entry in &envelope.errors {
                error!(
                    method = %method,
                    url = %url,
                    error_code = entry.code,
                    "{}",
                    entry
                );
            }
            return Err(logged(S1Error::ApiReported {
                method: method.to_string(),
                url,
                count: envelope.errors.len(),
            }));
        }

        Ok(envelope)
    }
}

/// Log an error at the point it is detected and hand it back.
pub(crate) fn logged(err: S1Error) -> S1Error {
    error!(error_code = err.error_code(), "{}", err);
    err
}
