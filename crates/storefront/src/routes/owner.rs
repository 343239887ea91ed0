//! Owner console route handlers.
//!
//! Owners authenticate against the backend. The returned session (token,
//! store id, first-login flag) is kept in the `owner-storage` client store.
//! Dashboard figures come from the mock catalog.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use brewline_core::{OrderStatus, Price};

use crate::backend::ApiError;
use crate::client_state::{ClientStores, OwnerSession};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireOwner;
use crate::middleware::auth::{OWNER_LOGIN_PATH, OWNER_REGISTER_PATH};
use crate::routes::views::{MenuCardView, OrderView, StoreView};
use crate::state::AppState;
use crate::validation::{LoginForm, StoreRegistrationForm, ValidationErrors};

/// Owner login page template.
#[derive(Template, WebTemplate)]
#[template(path = "owner/login.html")]
pub struct OwnerLoginTemplate {
    pub email: String,
    pub errors: ValidationErrors,
    pub error: Option<String>,
}

/// Display owner login page.
#[instrument(skip_all)]
pub async fn login_page(stores: ClientStores) -> Result<Response> {
    if stores.owner.current().await?.is_some() {
        return Ok(Redirect::to("/owner").into_response());
    }
    Ok(OwnerLoginTemplate {
        email: String::new(),
        errors: ValidationErrors::new(),
        error: None,
    }
    .into_response())
}

/// Handle owner login against the backend.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    stores: ClientStores,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    if let Err(errors) = form.validate() {
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            OwnerLoginTemplate {
                email: form.email,
                errors,
                error: None,
            },
        )
            .into_response());
    }

    let response = match state
        .backend()
        .owner_login(form.email.trim(), &form.password)
        .await
    {
        Ok(response) => response,
        Err(err) => {
            let status = match err {
                ApiError::Rejected { .. } | ApiError::Status { status: 401 | 403, .. } => {
                    tracing::info!(error = %err, "Owner sign-in refused");
                    StatusCode::UNAUTHORIZED
                }
                _ => {
                    tracing::error!(error = %err, "Owner sign-in failed");
                    StatusCode::BAD_GATEWAY
                }
            };
            return Ok((
                status,
                OwnerLoginTemplate {
                    email: form.email,
                    errors: ValidationErrors::new(),
                    error: Some(err.user_message()),
                },
            )
                .into_response());
        }
    };

    let session = OwnerSession::from(response);
    tracing::info!(owner_id = %session.owner_id, first_login = session.first_login, "Owner signed in");

    let landing = if state.config().owner_first_login_redirect
        && session.first_login
        && session.needs_store()
    {
        OWNER_REGISTER_PATH
    } else {
        "/owner"
    };
    stores.owner.sign_in(session).await?;
    Ok(Redirect::to(landing).into_response())
}

/// Handle owner logout.
#[instrument(skip_all)]
pub async fn logout(stores: ClientStores) -> Result<Redirect> {
    stores.owner.sign_out().await?;
    Ok(Redirect::to(OWNER_LOGIN_PATH))
}

/// Headline numbers for the dashboard.
#[derive(Clone)]
pub struct DashboardStats {
    pub order_count: usize,
    pub pending_count: usize,
    pub revenue: String,
    pub menu_count: usize,
}

/// Owner dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "owner/dashboard.html")]
pub struct OwnerDashboardTemplate {
    pub owner_name: String,
    pub store: Option<StoreView>,
    pub stats: Option<DashboardStats>,
    pub recent_orders: Vec<OrderView>,
}

/// Display owner dashboard.
#[instrument(skip_all)]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireOwner(owner, _): RequireOwner,
) -> impl IntoResponse {
    let catalog = state.catalog();
    let store = owner.store_id.and_then(|id| catalog.store(id));

    let (stats, recent_orders) = store.map_or_else(
        || (None, Vec::new()),
        |store| {
            let orders = catalog.orders_for_store(store.id);
            let revenue: Price = orders
                .iter()
                .filter(|order| order.status != OrderStatus::Cancelled)
                .map(|order| order.total_price)
                .sum();
            let stats = DashboardStats {
                order_count: orders.len(),
                pending_count: orders
                    .iter()
                    .filter(|order| !order.status.is_terminal())
                    .count(),
                revenue: revenue.display(),
                menu_count: store.menu_ids.len(),
            };
            let recent = orders
                .into_iter()
                .take(5)
                .map(|order| OrderView::new(order, Some(store)))
                .collect();
            (Some(stats), recent)
        },
    );

    OwnerDashboardTemplate {
        owner_name: owner.name,
        store: store.map(|store| StoreView::new(store, true)),
        stats,
        recent_orders,
    }
}

/// Store orders template.
#[derive(Template, WebTemplate)]
#[template(path = "owner/orders.html")]
pub struct OwnerOrdersTemplate {
    pub store_name: Option<String>,
    pub orders: Vec<OrderView>,
}

/// Display orders for the owner's store.
#[instrument(skip_all)]
pub async fn orders(
    State(state): State<AppState>,
    RequireOwner(owner, _): RequireOwner,
) -> impl IntoResponse {
    let catalog = state.catalog();
    let store = owner.store_id.and_then(|id| catalog.store(id));

    OwnerOrdersTemplate {
        store_name: store.map(|store| store.name.clone()),
        orders: store
            .map(|store| {
                catalog
                    .orders_for_store(store.id)
                    .into_iter()
                    .map(|order| OrderView::new(order, Some(store)))
                    .collect()
            })
            .unwrap_or_default(),
    }
}

/// Store menu template.
#[derive(Template, WebTemplate)]
#[template(path = "owner/menu.html")]
pub struct OwnerMenuTemplate {
    pub store_name: Option<String>,
    pub items: Vec<MenuCardView>,
}

/// Display the menu carried by the owner's store.
#[instrument(skip_all)]
pub async fn menu(
    State(state): State<AppState>,
    RequireOwner(owner, _): RequireOwner,
) -> impl IntoResponse {
    let catalog = state.catalog();
    let store = owner.store_id.and_then(|id| catalog.store(id));

    OwnerMenuTemplate {
        store_name: store.map(|store| store.name.clone()),
        items: store
            .map(|store| {
                catalog
                    .menu_for(None, Some(store))
                    .map(MenuCardView::from)
                    .collect()
            })
            .unwrap_or_default(),
    }
}

/// Store registration page template.
#[derive(Template, WebTemplate)]
#[template(path = "owner/register_store.html")]
pub struct RegisterStoreTemplate {
    pub owner_name: String,
    pub has_store: bool,
    pub form: StoreRegistrationForm,
    pub errors: ValidationErrors,
    pub error: Option<String>,
}

/// Display store registration form.
#[instrument(skip_all)]
pub async fn register_store_page(RequireOwner(owner, _): RequireOwner) -> impl IntoResponse {
    RegisterStoreTemplate {
        has_store: !owner.needs_store(),
        owner_name: owner.name,
        form: StoreRegistrationForm::default(),
        errors: ValidationErrors::new(),
        error: None,
    }
}

/// Register a store with the backend.
#[instrument(skip_all)]
pub async fn register_store(
    State(state): State<AppState>,
    RequireOwner(owner, stores): RequireOwner,
    Form(form): Form<StoreRegistrationForm>,
) -> Result<Response> {
    let rerender = |form: StoreRegistrationForm,
                    errors: ValidationErrors,
                    error: Option<String>,
                    status: StatusCode| {
        (
            status,
            RegisterStoreTemplate {
                owner_name: owner.name.clone(),
                has_store: !owner.needs_store(),
                form,
                errors,
                error,
            },
        )
            .into_response()
    };

    let registration = match form.validate() {
        Ok(registration) => registration,
        Err(errors) => {
            return Ok(rerender(form, errors, None, StatusCode::UNPROCESSABLE_ENTITY));
        }
    };

    match state
        .backend()
        .register_store(&owner.access_token, &registration)
        .await
    {
        Ok(registered) => {
            tracing::info!(
                owner_id = %owner.owner_id,
                store_id = %registered.store_id,
                "Store registered"
            );
            stores.owner.set_store(registered.store_id).await?;
            Ok(Redirect::to("/owner").into_response())
        }
        Err(err) => {
            let status = if matches!(err, ApiError::Rejected { .. }) {
                tracing::info!(error = %err, "Store registration rejected");
                StatusCode::UNPROCESSABLE_ENTITY
            } else {
                tracing::error!(error = %err, "Store registration failed");
                StatusCode::BAD_GATEWAY
            };
            Ok(rerender(form, ValidationErrors::new(), Some(err.user_message()), status))
        }
    }
}
