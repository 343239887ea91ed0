//! Admin console route handlers.
//!
//! Read-only views over the mock catalog. Every handler takes
//! [`RequireAdmin`], so non-admins get 403.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use chrono::Utc;
use tracing::instrument;

use brewline_core::UserRole;

use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::views::{CouponView, StoreView, UserView};
use crate::state::AppState;

/// Entity counts for the dashboard.
#[derive(Clone)]
pub struct AdminCounts {
    pub customers: usize,
    pub owners: usize,
    pub stores: usize,
    pub menu_items: usize,
    pub coupons: usize,
    pub orders: usize,
}

/// Admin dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct AdminDashboardTemplate {
    pub admin_name: String,
    pub counts: AdminCounts,
}

/// Display admin dashboard.
#[instrument(skip_all)]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(admin, _): RequireAdmin,
) -> impl IntoResponse {
    let catalog = state.catalog();
    let with_role = |role: UserRole| catalog.users().filter(|user| user.role == role).count();

    AdminDashboardTemplate {
        admin_name: admin.name,
        counts: AdminCounts {
            customers: with_role(UserRole::Customer),
            owners: with_role(UserRole::Owner),
            stores: catalog.stores().len(),
            menu_items: catalog.menu().len(),
            coupons: catalog.coupons().len(),
            orders: catalog.orders().len(),
        },
    }
}

/// User list template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/users.html")]
pub struct AdminUsersTemplate {
    pub users: Vec<UserView>,
}

/// Display all users.
#[instrument(skip_all)]
pub async fn users(State(state): State<AppState>, _admin: RequireAdmin) -> impl IntoResponse {
    AdminUsersTemplate {
        users: state.catalog().users().map(UserView::from).collect(),
    }
}

/// Store list template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/stores.html")]
pub struct AdminStoresTemplate {
    pub stores: Vec<StoreView>,
}

/// Display all stores.
#[instrument(skip_all)]
pub async fn stores(State(state): State<AppState>, _admin: RequireAdmin) -> impl IntoResponse {
    AdminStoresTemplate {
        stores: state
            .catalog()
            .stores()
            .iter()
            .map(|store| StoreView::new(store, false))
            .collect(),
    }
}

/// Coupon list template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/coupons.html")]
pub struct AdminCouponsTemplate {
    pub coupons: Vec<CouponView>,
}

/// Display all coupons.
#[instrument(skip_all)]
pub async fn coupons(State(state): State<AppState>, _admin: RequireAdmin) -> impl IntoResponse {
    let now = Utc::now();
    AdminCouponsTemplate {
        coupons: state
            .catalog()
            .coupons()
            .iter()
            .map(|coupon| CouponView::new(coupon, now))
            .collect(),
    }
}
