//! Blocking client for the safeticket admin API

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::blocking::Response;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use ticketmail_core::TicketPlatform;
use ticketmail_domain::{Event, PlatformConfig, Result, TicketMailError, TicketType};
use url::Url;

use super::session::SessionCache;
use super::wire::{ApiResult, EventList, EventTickets};
use crate::errors::to_domain;
use crate::http::HttpClient;

const LOGIN_PATH: &str = "/admin/login";
const EVENTS_PATH: &str = "/admin/api/event";
const FINANCIAL_PATH: &str = "/admin/api/financial";
const EXPORT_PATH: &str = "/admin/eventexportcsv";

/// Platform client holding one cookie session
///
/// Redirects are never followed: a successful login answers `302`, and any
/// other answer means the credentials were refused.
pub struct SafeTicketClient {
    http: HttpClient,
    jar: Arc<Jar>,
    base_url: Url,
    username: String,
    password: String,
    session_cache: Option<SessionCache>,
}

impl SafeTicketClient {
    /// Build a client for the configured organisation.
    ///
    /// # Errors
    /// Returns `TicketMailError::Config` when the base URL is not a valid URL.
    pub fn new(config: &PlatformConfig) -> Result<Self> {
        let raw = config.base_url();
        let base_url = Url::parse(raw.trim_end_matches('/')).map_err(|err| {
            TicketMailError::Config(format!("invalid platform base URL '{raw}': {err}"))
        })?;

        let jar = Arc::new(Jar::default());
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("ticketmail/", env!("CARGO_PKG_VERSION")))
            .cookie_jar(Arc::clone(&jar))
            .no_redirects()
            .build()?;

        Ok(Self {
            http,
            jar,
            base_url,
            username: config.username.clone(),
            password: config.password.clone(),
            session_cache: None,
        })
    }

    pub fn with_session_cache(mut self, cache: Option<SessionCache>) -> Self {
        self.session_cache = cache;
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|err| TicketMailError::Internal(format!("cannot build URL for {path}: {err}")))
    }

    fn site_key(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    fn restore_cookies(&self, header: &str) {
        for pair in header.split(';').map(str::trim).filter(|pair| !pair.is_empty()) {
            self.jar.add_cookie_str(pair, &self.base_url);
        }
    }

    fn remember_session(&self) {
        let Some(cache) = &self.session_cache else {
            return;
        };
        let Some(header) = self.jar.cookies(&self.base_url) else {
            tracing::debug!("platform.login_without_cookies");
            return;
        };
        match header.to_str() {
            Ok(cookies) => {
                if let Err(err) = cache.store(self.site_key(), &self.username, cookies, Utc::now()) {
                    tracing::warn!(error = %err, "session_cache.store_failed");
                }
            }
            Err(err) => tracing::warn!(error = %err, "session_cache.cookie_not_text"),
        }
    }

    /// Map the platform's error answers onto domain errors.
    fn check_status(&self, response: Response, operation: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        tracing::debug!(%status, operation, "platform.request_failed");
        match status {
            StatusCode::FORBIDDEN => {
                if let Some(cache) = &self.session_cache {
                    cache.clear();
                }
                Err(TicketMailError::Auth(format!(
                    "{operation} was refused with HTTP 403, the session is not logged in"
                )))
            }
            StatusCode::INTERNAL_SERVER_ERROR => Err(TicketMailError::ExternalService(format!(
                "{operation} failed with HTTP 500, this normally happens for an invalid event id"
            ))),
            other => {
                Err(TicketMailError::ExternalService(format!("{operation} answered HTTP {other}")))
            }
        }
    }

    fn read_json<T: DeserializeOwned>(&self, response: Response, operation: &str) -> Result<T> {
        let response = self.check_status(response, operation)?;
        let body = response.text().map_err(to_domain)?;
        let result: ApiResult<T> = serde_json::from_str(&body).map_err(to_domain)?;
        result.into_data(operation)
    }
}

impl TicketPlatform for SafeTicketClient {
    fn login(&self) -> Result<bool> {
        if let Some(cache) = &self.session_cache {
            if let Some(cookies) = cache.load(self.site_key(), &self.username, Utc::now()) {
                self.restore_cookies(&cookies);
                tracing::info!(path = %cache.path().display(), "platform.session_reused");
                return Ok(true);
            }
        }

        let form = [
            ("conturl", "/admin/"),
            ("email", self.username.as_str()),
            ("password", self.password.as_str()),
        ];
        let request = self.http.request(Method::POST, self.endpoint(LOGIN_PATH)?).form(&form);
        let response = self.http.send(request)?;

        if response.status() != StatusCode::FOUND {
            tracing::warn!(status = %response.status(), user = %self.username, "platform.login_refused");
            return Ok(false);
        }

        tracing::info!(user = %self.username, "platform.login_succeeded");
        self.remember_session();
        Ok(true)
    }

    fn get_events(&self, past: bool) -> Result<Vec<Event>> {
        let mut url = self.endpoint(EVENTS_PATH)?;
        url.query_pairs_mut()
            .append_pair("operation", "list")
            .append_pair("view", "financial")
            .append_pair("past", if past { "1" } else { "0" });

        let request =
            self.http.request(Method::GET, url).header("X-Requested-With", "XMLHttpRequest");
        let response = self.http.send(request)?;
        let listing: EventList = self.read_json(response, "Listing events")?;

        let events = listing.events.into_iter().map(Event::try_from).collect::<Result<Vec<_>>>()?;
        tracing::debug!(count = events.len(), past, "platform.events_listed");
        Ok(events)
    }

    fn get_event_tickets(&self, event_id: i64) -> Result<Vec<TicketType>> {
        let id = event_id.to_string();
        let form = [("operation", "eventexport"), ("id", id.as_str())];
        let request = self
            .http
            .request(Method::GET, self.endpoint(FINANCIAL_PATH)?)
            .header("X-Requested-With", "XMLHttpRequest")
            .form(&form);
        let response = self.http.send(request)?;
        let tickets: EventTickets = self.read_json(response, "Listing ticket types")?;

        Ok(tickets.tickets.into_iter().map(TicketType::from).collect())
    }

    fn export_tickets_stats(&self, event_id: i64, ticket_type_ids: &[i64]) -> Result<String> {
        let mut form: Vec<(String, String)> = vec![
            ("submitted".into(), "1".into()),
            ("id".into(), event_id.to_string()),
            ("csv".into(), "Start+eksport+(CSV)".into()),
        ];
        form.extend(ticket_type_ids.iter().map(|id| (format!("ticket{id}"), "1".to_string())));

        let request = self.http.request(Method::POST, self.endpoint(EXPORT_PATH)?).form(&form);
        let response = self.http.send(request)?;
        let response = self.check_status(response, "Exporting tickets")?;
        let text = response.text().map_err(to_domain)?;

        tracing::debug!(bytes = text.len(), event_id, "platform.tickets_exported");
        Ok(text)
    }
}
