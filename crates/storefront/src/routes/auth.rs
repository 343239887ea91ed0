//! Customer and admin authentication route handlers.
//!
//! Sign-in checks the mock accounts; signup validates the form, asks the
//! backend whether the email is taken, and signs the new customer in.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use brewline_core::UserRole;

use crate::client_state::ClientStores;
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::OptionalUser;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;
use crate::validation::{LoginForm, SignupForm, ValidationErrors};

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub errors: ValidationErrors,
    pub error: Option<String>,
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub form: SignupForm,
    pub errors: ValidationErrors,
    pub error: Option<String>,
}

fn landing_for(role: UserRole) -> &'static str {
    match role {
        UserRole::Admin => "/admin",
        _ => "/",
    }
}

/// Display login page.
#[instrument(skip_all)]
pub async fn login_page(OptionalUser(user, _): OptionalUser) -> Response {
    if let Some(user) = user {
        return Redirect::to(landing_for(user.role)).into_response();
    }
    LoginTemplate {
        email: String::new(),
        errors: ValidationErrors::new(),
        error: None,
    }
    .into_response()
}

/// Handle login form submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    stores: ClientStores,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    if let Err(errors) = form.validate() {
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            LoginTemplate {
                email: form.email,
                errors,
                error: None,
            },
        )
            .into_response());
    }

    let auth = AuthService::new(state.catalog(), state.latency());
    match auth.login(&form.email, &form.password).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, role = %user.role, "User signed in");
            set_sentry_user(&user.id, Some(user.email.as_str()));
            let landing = landing_for(user.role);
            stores.auth.sign_in(user).await?;
            Ok(Redirect::to(landing).into_response())
        }
        Err(err @ (AuthError::InvalidCredentials | AuthError::InvalidEmail(_))) => {
            tracing::info!(error = %err, "Sign-in refused");
            Ok((
                StatusCode::UNAUTHORIZED,
                LoginTemplate {
                    email: form.email,
                    errors: ValidationErrors::new(),
                    error: Some("이메일 또는 비밀번호가 올바르지 않습니다.".to_owned()),
                },
            )
                .into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// Display signup page.
#[instrument(skip_all)]
pub async fn signup_page(OptionalUser(user, _): OptionalUser) -> Response {
    if user.is_some() {
        return Redirect::to("/").into_response();
    }
    SignupTemplate {
        form: SignupForm::default(),
        errors: ValidationErrors::new(),
        error: None,
    }
    .into_response()
}

/// Handle signup form submission.
///
/// If the backend cannot be reached the duplicate check falls back to the
/// seeded accounts.
#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    stores: ClientStores,
    Form(mut form): Form<SignupForm>,
) -> Result<Response> {
    // Never echo passwords back into the page.
    let rerender = |mut form: SignupForm, errors: ValidationErrors, error: Option<String>| {
        form.password.clear();
        form.password_confirm.clear();
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            SignupTemplate {
                form,
                errors,
                error,
            },
        )
            .into_response()
    };

    if let Err(errors) = form.validate() {
        return Ok(rerender(form, errors, None));
    }

    form.email = form.email.trim().to_owned();
    match state.backend().check_email_duplicate(&form.email).await {
        Ok(true) => {
            let mut errors = ValidationErrors::new();
            errors.add("email", "이미 사용 중인 이메일입니다.");
            return Ok(rerender(form, errors, None));
        }
        Ok(false) => {}
        Err(err) => {
            tracing::warn!(error = %err, "Email duplicate check failed, using local accounts");
        }
    }

    let auth = AuthService::new(state.catalog(), state.latency());
    let user = match auth.signup(&form.email, &form.name).await {
        Ok(user) => user,
        Err(AuthError::UserAlreadyExists) => {
            let mut errors = ValidationErrors::new();
            errors.add("email", "이미 가입된 이메일입니다.");
            return Ok(rerender(form, errors, None));
        }
        Err(err) => return Err(err.into()),
    };

    set_sentry_user(&user.id, Some(user.email.as_str()));
    stores.auth.sign_in(user).await?;
    Ok(Redirect::to("/").into_response())
}

/// Handle logout.
#[instrument(skip_all)]
pub async fn logout(stores: ClientStores) -> Result<Redirect> {
    stores.auth.sign_out().await?;
    clear_sentry_user();
    tracing::info!(scope = %stores.scope(), "User signed out");
    Ok(Redirect::to("/"))
}
