//! Route guards.
//!
//! Guards are extractors: a handler that takes [`RequireAuth`],
//! [`RequireAdmin`], or [`RequireOwner`] only runs for the right visitor.
//! Page requests are redirected to the matching login page; `/api/`
//! requests get a bare 401 instead.

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tracing::Span;

use brewline_core::UserRole;
use brewline_core::catalog::User;

use crate::client_state::{ClientStores, OwnerSession};
use crate::error::AppError;
use crate::state::AppState;

/// Customer and admin login page.
pub const LOGIN_PATH: &str = "/login";

/// Owner login page.
pub const OWNER_LOGIN_PATH: &str = "/owner/login";

/// Where owners without a store are sent on first login.
pub const OWNER_REGISTER_PATH: &str = "/owner/stores/register";

/// Why a guard turned the request away.
#[derive(Debug)]
pub enum AuthRejection {
    /// Send the browser to a login or setup page.
    Redirect(&'static str),
    /// Signed out on an API route.
    Unauthorized,
    /// Signed in without the required role.
    Forbidden,
    /// The client stores could not be read.
    Failed(AppError),
}

impl From<AppError> for AuthRejection {
    fn from(err: AppError) -> Self {
        Self::Failed(err)
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Redirect(to) => Redirect::to(to).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => {
                AppError::Forbidden("admin role required".to_owned()).into_response()
            }
            Self::Failed(err) => err.into_response(),
        }
    }
}

fn request_path(parts: &Parts) -> &str {
    parts
        .extensions
        .get::<OriginalUri>()
        .map_or_else(|| parts.uri.path(), |uri| uri.0.path())
}

fn signed_out(parts: &Parts, login: &'static str) -> AuthRejection {
    if request_path(parts).starts_with("/api/") {
        AuthRejection::Unauthorized
    } else {
        AuthRejection::Redirect(login)
    }
}

async fn signed_in_user(
    parts: &mut Parts,
    state: &AppState,
) -> Result<(Option<User>, ClientStores), AppError> {
    let stores = ClientStores::from_request_parts(parts, state).await?;
    let user = stores.auth.current_user().await?;
    Ok((user, stores))
}

/// Extractor that requires a signed-in customer or admin.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(user, _stores): RequireAuth) -> impl IntoResponse {
///     format!("안녕하세요, {}님", user.name)
/// }
/// ```
pub struct RequireAuth(pub User, pub ClientStores);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (user, stores) = signed_in_user(parts, state).await?;
        let user = user.ok_or_else(|| signed_out(parts, LOGIN_PATH))?;
        Span::current().record("user_id", user.id.get());
        Ok(Self(user, stores))
    }
}

/// Extractor that requires the admin role.
///
/// Signed-out visitors go to the login page; other roles get 403.
pub struct RequireAdmin(pub User, pub ClientStores);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (user, stores) = signed_in_user(parts, state).await?;
        let user = user.ok_or_else(|| signed_out(parts, LOGIN_PATH))?;
        if user.role != UserRole::Admin {
            tracing::warn!(user_id = %user.id, role = %user.role, "Admin page refused");
            return Err(AuthRejection::Forbidden);
        }
        Span::current().record("user_id", user.id.get());
        Ok(Self(user, stores))
    }
}

/// Extractor that requires an owner session from the backend.
///
/// With `STOREFRONT_OWNER_FIRST_LOGIN_REDIRECT` on, an owner on first
/// login without a store is sent to store registration from every owner
/// page but that one.
pub struct RequireOwner(pub OwnerSession, pub ClientStores);

impl FromRequestParts<AppState> for RequireOwner {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let stores = ClientStores::from_request_parts(parts, state).await?;
        let owner = stores
            .owner
            .current()
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| signed_out(parts, OWNER_LOGIN_PATH))?;

        if state.config().owner_first_login_redirect
            && owner.first_login
            && owner.needs_store()
            && request_path(parts) != OWNER_REGISTER_PATH
        {
            return Err(AuthRejection::Redirect(OWNER_REGISTER_PATH));
        }

        Span::current().record("owner_id", owner.owner_id.get());
        Ok(Self(owner, stores))
    }
}

/// Extractor that optionally gets the signed-in user.
///
/// Unlike [`RequireAuth`], this does not reject signed-out visitors.
pub struct OptionalUser(pub Option<User>, pub ClientStores);

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (user, stores) = signed_in_user(parts, state).await?;
        Ok(Self(user, stores))
    }
}
