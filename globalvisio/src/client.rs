//! The session object: credentials, cached bearer token, quota gauge, and
//! the request plumbing every operation goes through.

use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use reqwest::blocking::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use globalvisio_core::{GvError, PROVIDER_TZ, parse_provider_ts};

use crate::wire::{AuthPayload, AuthRequest, Envelope, ErrorBody};

/// Production endpoint of the provider.
pub const DEFAULT_BASE_URL: &str = "https://global-visio.com";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Cached bearer token with its expiration instant.
#[derive(Debug, Clone)]
struct Token {
    value: String,
    expires_at: DateTime<Tz>,
}

/// A session against the provider's API.
///
/// Owns the credentials, the cached token, and the remaining-daily-requests
/// gauge — there is no process-wide state, so independent sessions can
/// coexist. I/O is synchronous and blocking throughout; the interior
/// mutexes only make the shared caches safe to touch through `&self`, they
/// do not serialize refreshes across threads.
pub struct GvClient {
    base_url: String,
    username: String,
    password: String,
    api_key: Option<String>,
    http: Client,
    token: Mutex<Option<Token>>,
    remaining_day_requests: Mutex<Option<u32>>,
}

impl std::fmt::Debug for GvClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Credentials stay out of debug output.
        f.debug_struct("GvClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("api_key", &self.api_key.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for [`GvClient`].
#[derive(Clone)]
pub struct GvClientBuilder {
    base_url: String,
    username: String,
    password: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl GvClientBuilder {
    /// Override the provider endpoint (tests point this at a mock server).
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set an API key. When present it is preferred over the token flow for
    /// data requests.
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the per-request timeout (default 30 s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the session.
    ///
    /// # Errors
    /// Returns `GvError::Transport` when the underlying HTTP client cannot
    /// be constructed.
    pub fn build(self) -> Result<GvClient, GvError> {
        let http = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(GvError::transport)?;
        Ok(GvClient {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            username: self.username,
            password: self.password,
            api_key: self.api_key,
            http,
            token: Mutex::new(None),
            remaining_day_requests: Mutex::new(None),
        })
    }
}

impl GvClient {
    /// Start building a session with username/password credentials.
    #[must_use]
    pub fn builder(username: impl Into<String>, password: impl Into<String>) -> GvClientBuilder {
        GvClientBuilder {
            base_url: DEFAULT_BASE_URL.to_string(),
            username: username.into(),
            password: password.into(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// The remaining daily request count, as last reported by the provider
    /// in an `X-RateLimit-Remaining` header. `None` until any request has
    /// been made (or if the provider stops sending the header).
    pub fn remaining_day_requests(&self) -> Option<u32> {
        *self.remaining_day_requests.lock().expect("quota lock")
    }

    /// Return a valid bearer token, reusing the cached one while its
    /// expiration (compared in the provider's timezone) is strictly in the
    /// future. Otherwise POST the credentials to the auth endpoint and
    /// replace the cache atomically.
    ///
    /// # Errors
    /// Returns `GvError::Auth` carrying the provider's error message (or the
    /// transport error text). The cache is left untouched on failure.
    pub fn get_token(&self) -> Result<String, GvError> {
        let now = Utc::now().with_timezone(&PROVIDER_TZ);
        {
            let cached = self.token.lock().expect("token lock");
            if let Some(t) = cached.as_ref() {
                if t.expires_at > now {
                    return Ok(t.value.clone());
                }
            }
        }

        let payload = self.request_auth()?;
        let expires_at = parse_provider_ts(&payload.expiration)
            .map_err(|e| GvError::auth(format!("bad expiration in auth response: {e}")))?;
        debug!(%expires_at, "bearer token refreshed");

        let token = Token {
            value: payload.token,
            expires_at,
        };
        let value = token.value.clone();
        *self.token.lock().expect("token lock") = Some(token);
        Ok(value)
    }

    /// Probe the auth endpoint with the configured credentials without
    /// touching the token cache.
    ///
    /// # Errors
    /// Returns `GvError::Auth` when the credentials are refused or the
    /// endpoint is unreachable.
    pub fn check_credentials(&self) -> Result<(), GvError> {
        self.request_auth().map(|_| ())
    }

    fn request_auth(&self) -> Result<AuthPayload, GvError> {
        let url = format!("{}/api/auth/token", self.base_url);
        let body = AuthRequest {
            username: &self.username,
            password: &self.password,
        };
        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| GvError::auth(e.to_string()))?;
        self.note_rate_limit(&resp);

        let status = resp.status();
        let text = resp.text().map_err(|e| GvError::auth(e.to_string()))?;
        if !status.is_success() {
            let message = provider_message(&text)
                .unwrap_or_else(|| format!("auth endpoint returned status {status}"));
            error!(%status, message, "authentication request failed");
            return Err(GvError::auth(message));
        }

        let envelope: Envelope<AuthPayload> =
            serde_json::from_str(&text).map_err(|e| GvError::auth(e.to_string()))?;
        envelope
            .response
            .ok_or_else(|| GvError::auth("auth response carried no payload"))
    }

    /// The `Authorization` bearer value for data requests: the API key when
    /// one is configured, else a (possibly refreshed) token.
    fn bearer(&self) -> Result<String, GvError> {
        match &self.api_key {
            Some(key) => Ok(key.clone()),
            None => self.get_token(),
        }
    }

    /// Authenticated GET returning the decoded envelope payload.
    ///
    /// `context` names the operation for diagnostics, e.g. `"sites index"`.
    pub(crate) fn get_payload<T: DeserializeOwned>(
        &self,
        path_and_query: &str,
        context: &str,
    ) -> Result<T, GvError> {
        let bearer = self.bearer()?;
        let url = format!("{}{}", self.base_url, path_and_query);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(bearer)
            .send()
            .map_err(GvError::transport)?;
        self.decode_payload(resp, context)
    }

    /// Authenticated POST with a JSON body, returning the decoded envelope
    /// payload.
    pub(crate) fn post_payload<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        context: &str,
    ) -> Result<T, GvError> {
        let bearer = self.bearer()?;
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(bearer)
            .json(body)
            .send()
            .map_err(GvError::transport)?;
        self.decode_payload(resp, context)
    }

    /// Authenticated POST whose response body is not inspected beyond the
    /// provider's error `message`; only the status code matters (the write
    /// endpoint returns no payload worth decoding).
    pub(crate) fn post_status<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        context: &str,
    ) -> Result<(), GvError> {
        let bearer = self.bearer()?;
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(bearer)
            .json(body)
            .send()
            .map_err(GvError::transport)?;
        self.note_rate_limit(&resp);

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let text = resp.text().map_err(GvError::transport)?;
        let message = provider_message(&text).unwrap_or_else(|| text.clone());
        error!(%status, context, message, "provider refused the write");
        Err(GvError::api(status.as_u16(), message))
    }

    fn decode_payload<T: DeserializeOwned>(
        &self,
        resp: Response,
        context: &str,
    ) -> Result<T, GvError> {
        self.note_rate_limit(&resp);
        let status = resp.status();
        let text = resp.text().map_err(GvError::transport)?;

        if !status.is_success() {
            let message = provider_message(&text).unwrap_or_else(|| text.clone());
            error!(%status, context, message, "provider returned an error");
            return Err(GvError::api(status.as_u16(), message));
        }

        let envelope: Envelope<T> = serde_json::from_str(&text).map_err(|e| {
            error!(context, %e, "undecodable provider response");
            GvError::decode(format!("{context}: {e}"))
        })?;
        envelope.response.ok_or_else(|| {
            error!(context, "provider response carried no payload");
            GvError::schema(format!("{context}: empty response payload"))
        })
    }

    /// Record the `X-RateLimit-Remaining` header whenever the provider sends
    /// one, on success and failure alike.
    fn note_rate_limit(&self, resp: &Response) {
        let remaining = resp
            .headers()
            .get("X-RateLimit-Remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u32>().ok());
        if let Some(remaining) = remaining {
            *self.remaining_day_requests.lock().expect("quota lock") = Some(remaining);
        }
    }
}

/// Extract the provider's `message` field from an error body, if any.
fn provider_message(text: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(text)
        .ok()
        .and_then(|b| b.message)
}
