//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Liveness
//! GET  /health/ready           - Readiness (persistence adapter)
//!
//! # Menu and stores
//! GET  /menu                   - Menu list (?category=, filtered by selected store)
//! GET  /menu/{id}              - Menu detail with options
//! GET  /stores                 - Store list
//! POST /stores/select          - Select store (selection store, then cart pointer)
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (count badge, triggers cart-updated)
//! POST /cart/update            - Update quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove item (returns cart_items fragment)
//! POST /cart/clear             - Clear cart (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout (requires login)
//! GET  /checkout               - Checkout page
//! POST /checkout               - Place order, render completion page
//!
//! # Auth
//! GET  /login                  - Login page
//! POST /login                  - Login action (mock accounts)
//! GET  /signup                 - Signup page
//! POST /signup                 - Signup action
//! POST /logout                 - Logout action
//!
//! # Account (requires login)
//! GET  /account                - Profile, points, level, stamps
//! GET  /account/orders         - Order history
//! GET  /account/coupons        - Coupon wallet
//! POST /account/profile        - Simulated profile update (toast)
//!
//! # Owner console
//! GET  /owner/login            - Owner login page
//! POST /owner/login            - Owner login (backend)
//! POST /owner/logout           - Owner logout
//! GET  /owner                  - Dashboard
//! GET  /owner/orders           - Orders for the owner's store
//! GET  /owner/menu             - Menu carried by the owner's store
//! GET  /owner/stores/register  - Store registration form
//! POST /owner/stores/register  - Store registration (backend)
//!
//! # Admin console (requires admin role)
//! GET  /admin                  - Dashboard counts
//! GET  /admin/users            - Users
//! GET  /admin/stores           - Stores
//! GET  /admin/coupons          - Coupons
//!
//! # JSON API (backend envelope)
//! GET  /api/user/email/check          - Email duplicate check
//! GET  /api/owner/stores/check-name   - Store name duplicate check
//! GET  /api/owner/stores/check-code   - Store code duplicate check
//! ```

pub mod account;
pub mod admin;
pub mod api;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod health;
pub mod home;
pub mod menu;
pub mod owner;
pub mod stores;
pub mod views;

use axum::{
    Router,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};

use crate::middleware::HxTrigger;
use crate::state::AppState;

/// Request header set by htmx.
const HX_REQUEST: &str = "hx-request";

/// Response header telling htmx to navigate.
const HX_REDIRECT: &str = "hx-redirect";

/// Redirect after an action.
///
/// htmx follows plain 3xx responses inside its XHR, which would drop the
/// toast, so htmx requests get `HX-Redirect` and the trigger instead.
pub fn redirect(headers: &HeaderMap, to: &'static str, trigger: HxTrigger) -> Response {
    if headers.contains_key(HX_REQUEST) {
        (
            StatusCode::OK,
            trigger,
            [(HX_REDIRECT, HeaderValue::from_static(to))],
        )
            .into_response()
    } else {
        Redirect::to(to).into_response()
    }
}

/// Create the menu routes router.
pub fn menu_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(menu::index))
        .route("/{id}", get(menu::show))
}

/// Create the store routes router.
pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(stores::index))
        .route("/select", post(stores::select))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::index))
        .route("/orders", get(account::orders))
        .route("/coupons", get(account::coupons))
        .route("/profile", post(account::update_profile))
}

/// Create the owner console router.
pub fn owner_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(owner::dashboard))
        .route("/login", get(owner::login_page).post(owner::login))
        .route("/logout", post(owner::logout))
        .route("/orders", get(owner::orders))
        .route("/menu", get(owner::menu))
        .route(
            "/stores/register",
            get(owner::register_store_page).post(owner::register_store),
        )
}

/// Create the admin console router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::dashboard))
        .route("/users", get(admin::users))
        .route("/stores", get(admin::stores))
        .route("/coupons", get(admin::coupons))
}

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/user/email/check", get(api::check_email))
        .route("/owner/stores/check-name", get(api::check_store_name))
        .route("/owner/stores/check-code", get(api::check_store_code))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/menu", menu_routes())
        .nest("/stores", store_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", get(checkout::show).post(checkout::place))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/logout", post(auth::logout))
        .nest("/account", account_routes())
        .nest("/owner", owner_routes())
        .nest("/admin", admin_routes())
        .nest("/api", api_routes())
}
