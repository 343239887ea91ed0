//! Backend REST API client.
//!
//! # Architecture
//!
//! - Plain JSON over `reqwest`; every response is an [`Envelope`]
//! - Paths are scoped by role: `/user/...`, `/owner/...`
//! - Duplicate checks treat HTTP 409 as "duplicate" so both backend styles work
//!
//! # Example
//!
//! ```rust,ignore
//! use brewline_storefront::backend::BackendClient;
//!
//! let client = BackendClient::new(&config.backend)?;
//! let taken = client.check_email_duplicate("kim@brewline.kr").await?;
//! ```

pub mod types;

use std::sync::Arc;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use crate::config::BackendConfig;

pub use types::{
    DuplicateCheck, Envelope, OwnerLoginRequest, OwnerLoginResponse, RegisteredStore,
    StoreRegistration,
};

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Non-success HTTP status.
    #[error("Backend returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Envelope carried an error result code.
    #[error("Backend rejected request ({code}): {message}")]
    Rejected { code: String, message: String },

    /// Success envelope without a `data` payload.
    #[error("Backend response is missing data")]
    MissingData,
}

impl ApiError {
    /// Message safe to show in a toast.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message, .. } if !message.is_empty() => message.clone(),
            Self::Status { status: 401 | 403, .. } => "인증이 필요합니다.".to_owned(),
            _ => "서버와 통신 중 오류가 발생했습니다.".to_owned(),
        }
    }
}

/// Role prefix of an endpoint path.
///
/// The backend also serves `/admin`. No admin endpoint is called: the admin
/// console reads the mock catalog and user list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    User,
    Owner,
}

impl Scope {
    const fn prefix(self) -> &'static str {
        match self {
            Self::User => "/user",
            Self::Owner => "/owner",
        }
    }
}

// =============================================================================
// BackendClient
// =============================================================================

/// Client for the backend REST API.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_owned(),
            }),
        })
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn url(&self, scope: Scope, path: &str) -> String {
        format!("{}{}{}", self.inner.base_url, scope.prefix(), path)
    }

    // =========================================================================
    // User endpoints
    // =========================================================================

    /// Check whether an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status, or envelope failures.
    #[instrument(skip(self))]
    pub async fn check_email_duplicate(&self, email: &str) -> Result<bool, ApiError> {
        let request = self
            .inner
            .client
            .get(self.url(Scope::User, "/email/check"))
            .query(&[("email", email)]);
        self.duplicate_check(request).await
    }

    // =========================================================================
    // Owner endpoints
    // =========================================================================

    /// Check whether a store name is taken.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status, or envelope failures.
    #[instrument(skip(self))]
    pub async fn check_store_name_duplicate(&self, store_name: &str) -> Result<bool, ApiError> {
        let request = self
            .inner
            .client
            .get(self.url(Scope::Owner, "/stores/check-name"))
            .query(&[("storeName", store_name)]);
        self.duplicate_check(request).await
    }

    /// Check whether a store code is taken.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status, or envelope failures.
    #[instrument(skip(self))]
    pub async fn check_store_code_duplicate(&self, store_code: &str) -> Result<bool, ApiError> {
        let request = self
            .inner
            .client
            .get(self.url(Scope::Owner, "/stores/check-code"))
            .query(&[("storeCode", store_code)]);
        self.duplicate_check(request).await
    }

    /// Sign an owner in.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status, or envelope failures.
    #[instrument(skip(self, password))]
    pub async fn owner_login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<OwnerLoginResponse, ApiError> {
        let request = self
            .inner
            .client
            .post(self.url(Scope::Owner, "/login"))
            .json(&OwnerLoginRequest { email, password });
        self.execute(request).await
    }

    /// Register the signed-in owner's store.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status, or envelope failures.
    #[instrument(skip(self, access_token, registration), fields(store_code = %registration.store_code))]
    pub async fn register_store(
        &self,
        access_token: &str,
        registration: &StoreRegistration,
    ) -> Result<RegisteredStore, ApiError> {
        let request = self
            .inner
            .client
            .post(self.url(Scope::Owner, "/stores"))
            .bearer_auth(access_token)
            .json(registration);
        self.execute(request).await
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    /// Send a request and unwrap the envelope's `data`.
    async fn execute<T>(&self, request: reqwest::RequestBuilder) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %body.chars().take(200).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })?;

        if !envelope.is_success() {
            return Err(ApiError::Rejected {
                code: envelope.result_code,
                message: envelope.msg,
            });
        }

        envelope.data.ok_or(ApiError::MissingData)
    }

    /// Duplicate checks answer either `{ isDuplicate }` or HTTP 409.
    async fn duplicate_check(&self, request: reqwest::RequestBuilder) -> Result<bool, ApiError> {
        match self.execute::<DuplicateCheck>(request).await {
            Ok(check) => Ok(check.is_duplicate),
            Err(ApiError::Status { status, .. }) if status == StatusCode::CONFLICT.as_u16() => {
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }
}

/// Best-effort `msg` from an error body.
fn error_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        msg: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.msg)
        .unwrap_or_default()
}
