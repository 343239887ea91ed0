//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Every error response also carries an `HX-Trigger` toast so HTMX actions
//! surface the failure without swapping content.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use brewline_core::cart::{CartError, MAX_LINE_QUANTITY};
use brewline_core::checkout::CheckoutError;

use crate::backend::ApiError;
use crate::client_state::ClientStateError;
use crate::middleware::HxTrigger;
use crate::persistence::PersistError;
use crate::services::AuthError;
use crate::validation::ValidationErrors;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Client state could not be read or written.
    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Backend API call failed.
    #[error("Backend error: {0}")]
    Backend(#[from] ApiError),

    /// Cart operation rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout rejected.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Sign-in or signup failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Form fields failed validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User lacks the required role.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ClientStateError> for AppError {
    fn from(err: ClientStateError) -> Self {
        match err {
            ClientStateError::Persist(e) => Self::Persist(e),
            ClientStateError::Cart(e) => Self::Cart(e),
        }
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Persist(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Backend(ApiError::Rejected { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Backend(ApiError::Status { status: 401 | 403, .. }) => StatusCode::UNAUTHORIZED,
            Self::Backend(_) => StatusCode::BAD_GATEWAY,
            Self::Cart(CartError::LineNotFound(_)) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Cart(_) | Self::Checkout(_) | Self::Validation(_) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Auth(AuthError::InvalidCredentials) | Self::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Auth(AuthError::UserAlreadyExists) => StatusCode::CONFLICT,
            Self::Auth(AuthError::InvalidEmail(_)) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    /// Message safe to show to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            // Don't expose internal error details to clients
            Self::Persist(_) | Self::Session(_) | Self::Internal(_) => {
                "일시적인 오류가 발생했습니다. 잠시 후 다시 시도해주세요.".to_owned()
            }
            Self::Backend(err) => err.user_message(),
            Self::Cart(err) => match err {
                CartError::InvalidQuantity(_) => "수량은 1개 이상이어야 합니다.".to_owned(),
                CartError::QuantityTooLarge(_) => {
                    format!("한 번에 최대 {MAX_LINE_QUANTITY}개까지 담을 수 있습니다.")
                }
                CartError::UnknownOption { .. } => "선택할 수 없는 옵션입니다.".to_owned(),
                CartError::LineNotFound(_) => "장바구니에 없는 상품입니다.".to_owned(),
            },
            Self::Checkout(err) => match err {
                CheckoutError::EmptyCart => "장바구니가 비어 있습니다.".to_owned(),
                CheckoutError::NoStoreSelected => "주문할 매장을 선택해주세요.".to_owned(),
                CheckoutError::CouponExpired(_) => "만료된 쿠폰입니다.".to_owned(),
                CheckoutError::BelowMinimumOrder { minimum } => {
                    format!("{} 이상 주문 시 사용할 수 있는 쿠폰입니다.", minimum.display())
                }
                CheckoutError::UnsupportedCoupon(_) => {
                    "결제 시 사용할 수 없는 쿠폰입니다.".to_owned()
                }
            },
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_) => "올바른 이메일 형식이 아닙니다.".to_owned(),
                AuthError::InvalidCredentials => {
                    "이메일 또는 비밀번호가 올바르지 않습니다.".to_owned()
                }
                AuthError::UserAlreadyExists => "이미 가입된 이메일입니다.".to_owned(),
            },
            Self::Validation(errors) => errors.iter().next().map_or_else(
                || "입력값을 확인해주세요.".to_owned(),
                |(_, message)| message.to_owned(),
            ),
            Self::NotFound(_) => "요청한 페이지를 찾을 수 없습니다.".to_owned(),
            Self::Unauthorized(_) => "로그인이 필요합니다.".to_owned(),
            Self::Forbidden(_) => "접근 권한이 없습니다.".to_owned(),
            Self::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        let message = self.user_message();
        (status, HxTrigger::error(message.clone()), message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
