//! Account route handlers.
//!
//! These routes require a signed-in user (see [`RequireAuth`]).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::instrument;

use brewline_core::catalog::STAMPS_PER_REWARD;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{HxTrigger, RequireAuth};
use crate::routes::views::{CouponView, OrderView, UserView};
use crate::state::AppState;
use crate::validation::ProfileForm;

/// Orders shown on the overview.
const RECENT_ORDERS: usize = 3;

/// Account overview page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/index.html")]
pub struct AccountIndexTemplate {
    pub user: UserView,
    pub stamp_goal: u32,
    pub recent_orders: Vec<OrderView>,
    pub usable_coupons: usize,
}

/// Display account overview page.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user, _): RequireAuth,
) -> impl IntoResponse {
    let catalog = state.catalog();
    let now = Utc::now();

    AccountIndexTemplate {
        user: UserView::from(&user),
        stamp_goal: STAMPS_PER_REWARD,
        recent_orders: catalog
            .orders_for_user(user.id)
            .into_iter()
            .take(RECENT_ORDERS)
            .map(|order| OrderView::new(order, catalog.store(order.store_id)))
            .collect(),
        usable_coupons: catalog
            .coupons()
            .iter()
            .filter(|coupon| !coupon.is_expired(now))
            .count(),
    }
}

/// Order history page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/orders.html")]
pub struct OrdersTemplate {
    pub orders: Vec<OrderView>,
}

/// Display order history.
#[instrument(skip_all)]
pub async fn orders(
    State(state): State<AppState>,
    RequireAuth(user, _): RequireAuth,
) -> impl IntoResponse {
    let catalog = state.catalog();
    OrdersTemplate {
        orders: catalog
            .orders_for_user(user.id)
            .into_iter()
            .map(|order| OrderView::new(order, catalog.store(order.store_id)))
            .collect(),
    }
}

/// Coupon wallet page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/coupons.html")]
pub struct CouponsTemplate {
    pub usable: Vec<CouponView>,
    pub expired: Vec<CouponView>,
}

/// Display the coupon wallet.
#[instrument(skip_all)]
pub async fn coupons(
    State(state): State<AppState>,
    RequireAuth(_, _): RequireAuth,
) -> impl IntoResponse {
    let now = Utc::now();
    let (expired, usable) = state
        .catalog()
        .coupons()
        .iter()
        .map(|coupon| CouponView::new(coupon, now))
        .partition(|coupon| coupon.expired);

    CouponsTemplate { usable, expired }
}

/// Simulated profile update (HTMX).
///
/// Only the name in the browser's auth store changes.
#[instrument(skip_all)]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(user, stores): RequireAuth,
    Form(form): Form<ProfileForm>,
) -> Result<impl IntoResponse> {
    let name = form.validate()?;

    state.latency().wait().await;

    if !stores.auth.update_name(&name).await? {
        return Err(AppError::Unauthorized("signed out during update".to_owned()));
    }
    tracing::info!(user_id = %user.id, "Profile updated");

    Ok((
        HxTrigger::success("프로필이 수정되었습니다.").event("profile-updated"),
        name,
    ))
}
