//! HTTP client for the job-board service.
//!
//! Every call goes through [`ApiClient::execute`], which attaches the bearer
//! token when one is given and turns any non-2xx response into
//! [`AppError::Api`] with a normalized message.

pub mod auth;
pub mod envelope;
pub mod jobs;
pub mod users;

#[cfg(test)]
mod mock_backend;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::errors::AppError;

pub use jobs::SuggestionKind;

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// No timeout is configured: a hung call blocks only the command that made it.
    pub fn new(base_url: impl Into<String>) -> Result<Self, AppError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, endpoint: &str, token: Option<&str>) -> RequestBuilder {
        let mut request = self
            .client
            .request(method, format!("{}{}", self.base_url, endpoint))
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        request
    }

    async fn execute(&self, request: RequestBuilder, endpoint: &str) -> Result<Response, AppError> {
        let response = request.send().await?;
        let status = response.status();
        debug!("{} -> {}", endpoint, status);

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = envelope::normalize_error(&body, status);
        warn!("API error ({}) on {}: {}", status.as_u16(), endpoint, message);

        Err(AppError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
        Ok(response.json::<T>().await?)
    }

    /// Drains a success response that carries no payload (204 or ignored body).
    async fn read_empty(response: Response) -> Result<(), AppError> {
        if response.status() != StatusCode::NO_CONTENT {
            let _ = response.bytes().await?;
        }
        Ok(())
    }
}

/// Fails before any network call when there is no usable token.
pub(crate) fn require_token<'a>(
    token: Option<&'a str>,
    action: &'static str,
) -> Result<&'a str, AppError> {
    match token {
        Some(token) if !token.trim().is_empty() => Ok(token),
        _ => Err(AppError::AuthRequired(action)),
    }
}
