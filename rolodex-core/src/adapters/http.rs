//! HTTP user-record API client
//!
//! Talks to the remote user-record service over JSON HTTP:
//! - POST /users          create a record
//! - GET  /users/{id}     fetch a record
//! - PUT  /users/{id}     replace a record's fields

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use url::Url;

use crate::domain::result::{Error, Result};
use crate::domain::{User, UserDraft};
use crate::ports::UserService;

/// Request timeout for all calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable to override the user-record API base URL.
/// Set this to point at a staging environment or a local mock server.
pub const ROLODEX_BASE_URL_ENV: &str = "ROLODEX_BASE_URL";

/// HTTP implementation of the user-record service
#[derive(Debug, Clone)]
pub struct HttpUserService {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl HttpUserService {
    /// Create a new client for the given base URL.
    ///
    /// The `ROLODEX_BASE_URL` environment variable, when set, takes
    /// precedence over the argument.
    pub fn new(base_url: &str) -> Result<Self> {
        let url = std::env::var(ROLODEX_BASE_URL_ENV).unwrap_or_else(|_| base_url.to_string());
        Self::new_with_base_url(&url)
    }

    /// Create a new client for an explicit base URL, ignoring the environment.
    pub fn new_with_base_url(base_url: &str) -> Result<Self> {
        if base_url.is_empty() {
            return Err(Error::Config("API base URL cannot be empty".to_string()));
        }
        let url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| Error::Config(format!("Invalid API base URL '{}': {}", base_url, e)))?;
        if url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "Invalid API base URL '{}': cannot be used as a base",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: url,
            api_key: None,
        })
    }

    /// Attach an API key, sent as the `x-api-key` header on every request
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let key = api_key.into();
        if !key.is_empty() {
            self.api_key = Some(key);
        }
        self
    }

    #[cfg(test)]
    pub(crate) fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn users_url(&self) -> Url {
        let mut url = self.base_url.clone();
        // Construction rejects cannot-be-a-base URLs
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("users");
        }
        url
    }

    /// Build the record URL; the identifier is percent-encoded as a single
    /// path segment, so ids containing `/` or `?` cannot change the target
    fn user_url(&self, id: &str) -> Url {
        let mut url = self.users_url();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id);
        }
        url
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("x-api-key", key),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self
            .apply_auth(request)
            .send()
            .await
            .map_err(map_request_error)?;
        check_response_status(&response)?;
        Ok(response)
    }

    async fn decode_user(response: Response) -> Result<User> {
        response
            .json::<User>()
            .await
            .map_err(|e| Error::decode(format!("Failed to parse user record response: {}", e)))
    }
}

#[async_trait]
impl UserService for HttpUserService {
    async fn create(&self, draft: &UserDraft) -> Result<User> {
        let request = self.client.post(self.users_url()).json(draft);
        let response = self.send(request).await?;
        Self::decode_user(response).await
    }

    async fn get_by_id(&self, id: &str) -> Result<User> {
        let request = self.client.get(self.user_url(id));
        let response = self.send(request).await?;
        Self::decode_user(response).await
    }

    async fn update(&self, id: &str, draft: &UserDraft) -> Result<User> {
        let request = self.client.put(self.user_url(id)).json(draft);
        let response = self.send(request).await?;
        Self::decode_user(response).await
    }
}

/// Map request errors to user-friendly messages
fn map_request_error(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::transport(format!(
            "Connection timed out after {} seconds",
            REQUEST_TIMEOUT.as_secs()
        ))
    } else if error.is_connect() {
        Error::transport("Unable to connect to the user-record service")
    } else {
        Error::transport(format!("Request failed: {}", error))
    }
}

/// Check response status and return appropriate errors
fn check_response_status(response: &Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    match status {
        StatusCode::UNAUTHORIZED => Err(Error::api(
            401,
            "Authentication failed. Your API key may be invalid or revoked.",
        )),
        StatusCode::FORBIDDEN => Err(Error::api(
            403,
            "Access denied. Please check your API key permissions.",
        )),
        StatusCode::NOT_FOUND => Err(Error::not_found(format!(
            "No user record at {}",
            response.url().path()
        ))),
        StatusCode::TOO_MANY_REQUESTS => Err(Error::api(
            429,
            "Rate limit exceeded. Please wait a moment and try again.",
        )),
        _ => Err(Error::api(
            status.as_u16(),
            format!("User-record API error: HTTP {}", status.as_u16()),
        )),
    }
}
