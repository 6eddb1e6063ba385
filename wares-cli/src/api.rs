//! HTTP client for the wares server API.

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use wares_core::{
    AuthResponse, CreateProductRequest, ErrorBody, LoginRequest, Product, SignupRequest, UserInfo,
};

/// Request timeout. Generous for a demo server, short enough that a dead
/// server doesn't hang the CLI.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Longest error body fragment quoted back to the user
const MAX_ERROR_BODY_LENGTH: usize = 300;

/// Errors from talking to the server
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Not logged in or token rejected - try `wares login`")]
    Unauthorized,

    #[error("An account with this email already exists")]
    EmailTaken,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response from server: {0}")]
    InvalidResponse(String),
}

fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }

    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

impl ApiError {
    /// Map an error status and body to a user-facing error
    fn from_status(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|e| e.message)
            .unwrap_or_else(|_| truncate_body(body));

        match status.as_u16() {
            401 => ApiError::Unauthorized,
            409 => ApiError::EmailTaken,
            400 | 422 => ApiError::BadRequest(message),
            500..=599 => ApiError::Server(message),
            _ => ApiError::InvalidResponse(format!("{}: {}", status, message)),
        }
    }
}

/// Client for the wares HTTP API.
///
/// Clone is cheap - `reqwest::Client` uses an `Arc` internally.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<UserInfo, ApiError> {
        let response = self
            .client
            .post(self.url("/api/auth/signup"))
            .json(request)
            .send()
            .await?;

        Self::parse(response).await
    }

    /// Log in and obtain a token.
    ///
    /// A 401 here means the credentials were wrong, not that a token
    /// expired, so it surfaces as [`ApiError::InvalidCredentials`].
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let response = self
            .client
            .post(self.url("/api/auth/login"))
            .json(request)
            .send()
            .await?;

        match Self::parse(response).await {
            Err(ApiError::Unauthorized) => Err(ApiError::InvalidCredentials),
            other => other,
        }
    }

    pub async fn me(&self, token: &str) -> Result<UserInfo, ApiError> {
        let response = self
            .client
            .get(self.url("/api/auth/me"))
            .bearer_auth(token)
            .send()
            .await?;

        Self::parse(response).await
    }

    pub async fn products(&self, token: &str) -> Result<Vec<Product>, ApiError> {
        let response = self
            .client
            .get(self.url("/api/products"))
            .bearer_auth(token)
            .send()
            .await?;

        Self::parse(response).await
    }

    pub async fn create_product(
        &self,
        token: &str,
        request: &CreateProductRequest,
    ) -> Result<Product, ApiError> {
        let response = self
            .client
            .post(self.url("/api/products"))
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;

        Self::parse(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| ApiError::InvalidResponse(e.to_string()))
        } else {
            let body = response.text().await.unwrap_or_default();
            debug!(%status, "API request failed");
            Err(ApiError::from_status(status, &body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::CONFLICT, ""),
            ApiError::EmailTaken
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            ApiError::Server(_)
        ));

        let err = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"error": "empty_name", "message": "Product name must not be empty"}"#,
        );
        match err {
            ApiError::BadRequest(msg) => assert_eq!(msg, "Product name must not be empty"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_long_bodies_are_truncated() {
        let body = "x".repeat(1000);
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, &body);
        match err {
            ApiError::BadRequest(msg) => {
                assert!(msg.len() < body.len());
                assert!(msg.ends_with("..."));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
