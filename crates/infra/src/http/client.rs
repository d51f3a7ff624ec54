//! Blocking HTTP client shared by the platform adapters

use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::{Client as ReqwestClient, RequestBuilder, Response};
use reqwest::cookie::Jar;
use reqwest::redirect::Policy;
use reqwest::{IntoUrl, Method};
use ticketmail_domain::TicketMailError;

use crate::errors::to_domain;

// Backoff doubles per retry up to this many times
const MAX_BACKOFF_DOUBLINGS: u32 = 8;

/// Blocking HTTP client that retries transient failures
///
/// Connection errors, timeouts and 5xx responses are retried with
/// exponential backoff. Other responses are returned to the caller as is.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    pub fn request<U: IntoUrl>(&self, method: Method, url: U) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Send the request, retrying transient failures. After the last
    /// attempt a 5xx response is returned rather than an error.
    ///
    /// # Errors
    /// `TicketMailError::ExternalService` when the request fails for good,
    /// `TicketMailError::Internal` when a streaming body prevents retries.
    pub fn send(&self, builder: RequestBuilder) -> Result<Response, TicketMailError> {
        let mut attempt = 1;
        loop {
            let request = builder
                .try_clone()
                .ok_or_else(|| TicketMailError::Internal("request body cannot be retried".into()))?
                .build()
                .map_err(to_domain)?;
            let (method, url) = (request.method().clone(), request.url().clone());
            let last = attempt >= self.max_attempts;

            match self.client.execute(request) {
                Ok(response) if response.status().is_server_error() && !last => {
                    tracing::debug!(attempt, %method, %url, status = %response.status(), "http.retrying");
                }
                Ok(response) => {
                    tracing::debug!(attempt, %method, %url, status = %response.status(), "http.response");
                    return Ok(response);
                }
                Err(err) if (err.is_timeout() || err.is_connect()) && !last => {
                    tracing::debug!(attempt, %method, %url, error = %err, "http.retrying");
                }
                Err(err) => return Err(to_domain(err)),
            }

            std::thread::sleep(self.backoff(attempt));
            attempt += 1;
        }
    }

    fn backoff(&self, attempt: usize) -> Duration {
        let doublings = u32::try_from(attempt.saturating_sub(1)).unwrap_or(u32::MAX).min(MAX_BACKOFF_DOUBLINGS);
        self.base_backoff.saturating_mul(1 << doublings)
    }
}

/// Builder for [`HttpClient`]
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: Option<String>,
    cookie_jar: Option<Arc<Jar>>,
    follow_redirects: bool,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            base_backoff: Duration::from_millis(200),
            user_agent: None,
            cookie_jar: None,
            follow_redirects: true,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total attempts including the first one; at least 1.
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Keep session cookies in `jar`.
    pub fn cookie_jar(mut self, jar: Arc<Jar>) -> Self {
        self.cookie_jar = Some(jar);
        self
    }

    /// Hand redirects back to the caller. The platform login answers a
    /// successful form post with a 302.
    pub fn no_redirects(mut self) -> Self {
        self.follow_redirects = false;
        self
    }

    /// # Errors
    /// `TicketMailError::ExternalService` when reqwest cannot build the
    /// client, e.g. without a TLS backend.
    pub fn build(self) -> Result<HttpClient, TicketMailError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();
        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }
        if let Some(jar) = self.cookie_jar {
            builder = builder.cookie_provider(jar);
        }
        if !self.follow_redirects {
            builder = builder.redirect(Policy::none());
        }

        Ok(HttpClient {
            client: builder.build().map_err(to_domain)?,
            max_attempts: self.max_attempts,
            base_backoff: self.base_backoff,
        })
    }
}
