//! JSON duplicate-check endpoints.
//!
//! These proxy the backend so the signup and store registration forms can
//! check a value as the user types. Responses use the backend's envelope.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use brewline_core::Email;

use crate::backend::{ApiError, DuplicateCheck, Envelope};
use crate::state::AppState;

/// Query for the email check.
#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    #[serde(default)]
    pub email: String,
}

/// Query for the store name check.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreNameQuery {
    #[serde(default)]
    pub store_name: String,
}

/// Query for the store code check.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreCodeQuery {
    #[serde(default)]
    pub store_code: String,
}

fn invalid(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(Envelope::<DuplicateCheck>::failure("INVALID_PARAMETER", message)),
    )
        .into_response()
}

fn answer(result: Result<bool, ApiError>) -> Response {
    match result {
        Ok(is_duplicate) => Json(Envelope::success(DuplicateCheck { is_duplicate })).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "Duplicate check failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(Envelope::<DuplicateCheck>::failure(
                    "BACKEND_UNAVAILABLE",
                    err.user_message(),
                )),
            )
                .into_response()
        }
    }
}

/// `GET /api/user/email/check?email=`
#[instrument(skip(state))]
pub async fn check_email(State(state): State<AppState>, Query(query): Query<EmailQuery>) -> Response {
    let Ok(email) = Email::parse(&query.email) else {
        return invalid("올바른 이메일 형식이 아닙니다.");
    };
    answer(state.backend().check_email_duplicate(email.as_str()).await)
}

/// `GET /api/owner/stores/check-name?storeName=`
#[instrument(skip(state))]
pub async fn check_store_name(
    State(state): State<AppState>,
    Query(query): Query<StoreNameQuery>,
) -> Response {
    let name = query.store_name.trim();
    if name.is_empty() {
        return invalid("매장명을 입력해주세요.");
    }
    answer(state.backend().check_store_name_duplicate(name).await)
}

/// `GET /api/owner/stores/check-code?storeCode=`
#[instrument(skip(state))]
pub async fn check_store_code(
    State(state): State<AppState>,
    Query(query): Query<StoreCodeQuery>,
) -> Response {
    let code = query.store_code.trim();
    if code.is_empty() {
        return invalid("매장 코드를 입력해주세요.");
    }
    answer(state.backend().check_store_code_duplicate(code).await)
}
