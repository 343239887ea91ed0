//! Checkout route handlers.
//!
//! Checkout needs a signed-in customer, a non-empty cart, and a selected
//! store. Points are spent first, then a flat coupon; placing the order
//! clears the cart and renders the completion page directly.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use tracing::instrument;

use brewline_core::cart::Cart;
use brewline_core::catalog::{Coupon, User};
use brewline_core::checkout::{self, POINT_SPEND_CAP, PlaceOrder};
use brewline_core::{PaymentMethod, Points};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::routes::views::{CartView, CouponView, OrderView};
use crate::state::AppState;
use crate::validation::{CheckoutForm, ValidationErrors};

/// A coupon in the checkout picker.
#[derive(Clone)]
pub struct CouponChoice {
    pub coupon: CouponView,
    pub usable: bool,
    /// Why the coupon cannot be used, when it cannot.
    pub reason: String,
    pub selected: bool,
}

/// A payment method radio button.
#[derive(Clone)]
pub struct PaymentChoice {
    pub code: &'static str,
    pub label: &'static str,
    pub checked: bool,
}

/// Price breakdown as shown.
#[derive(Clone)]
pub struct QuoteView {
    pub subtotal: String,
    pub points: String,
    pub coupon: String,
    pub total: String,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub cart: CartView,
    pub store_name: Option<String>,
    pub available_points: u32,
    pub point_cap: u32,
    pub points: String,
    pub coupons: Vec<CouponChoice>,
    pub payment_methods: Vec<PaymentChoice>,
    pub quote: QuoteView,
    pub errors: ValidationErrors,
    pub error: Option<String>,
}

/// Order completion page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/complete.html")]
pub struct OrderCompleteTemplate {
    pub order: OrderView,
}

/// What the customer has entered so far.
struct Entered<'a> {
    payment_method: Option<PaymentMethod>,
    points: Points,
    points_raw: String,
    coupon: Option<&'a Coupon>,
}

impl Entered<'_> {
    fn blank() -> Self {
        Self {
            payment_method: None,
            points: Points::ZERO,
            points_raw: String::new(),
            coupon: None,
        }
    }
}

fn checkout_page(
    state: &AppState,
    user: &User,
    cart: &Cart,
    entered: &Entered<'_>,
    errors: ValidationErrors,
    error: Option<String>,
) -> CheckoutTemplate {
    let catalog = state.catalog();
    let now = Utc::now();
    let subtotal = cart.subtotal();

    let quote = checkout::quote(cart, user, entered.points, entered.coupon, now)
        .or_else(|_| checkout::quote(cart, user, entered.points, None, now))
        .ok();

    CheckoutTemplate {
        cart: CartView::from(cart),
        store_name: cart
            .store_id
            .and_then(|id| catalog.store(id))
            .map(|store| store.name.clone()),
        available_points: user.points.get(),
        point_cap: POINT_SPEND_CAP.get(),
        points: entered.points_raw.clone(),
        coupons: catalog
            .coupons()
            .iter()
            .map(|coupon| {
                let reason = checkout::coupon_discount(coupon, subtotal, now)
                    .err()
                    .map(|err| AppError::from(err).user_message());
                CouponChoice {
                    coupon: CouponView::new(coupon, now),
                    usable: reason.is_none(),
                    reason: reason.unwrap_or_default(),
                    selected: entered.coupon.is_some_and(|c| c.id == coupon.id),
                }
            })
            .collect(),
        payment_methods: PaymentMethod::ALL
            .into_iter()
            .enumerate()
            .map(|(index, method)| PaymentChoice {
                code: method.code(),
                label: method.label(),
                checked: entered
                    .payment_method
                    .map_or(index == 0, |chosen| chosen == method),
            })
            .collect(),
        quote: quote.map_or_else(
            || QuoteView {
                subtotal: subtotal.display(),
                points: "0원".to_owned(),
                coupon: "0원".to_owned(),
                total: subtotal.display(),
            },
            |quote| QuoteView {
                subtotal: quote.subtotal.display(),
                points: quote.points_applied.as_price().display(),
                coupon: quote.coupon_discount.display(),
                total: quote.total.display(),
            },
        ),
        errors,
        error,
    }
}

/// Display the checkout page.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user, stores): RequireAuth,
) -> Result<Response> {
    let cart = stores.cart.cart().await?;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    Ok(checkout_page(
        &state,
        &user,
        &cart,
        &Entered::blank(),
        ValidationErrors::new(),
        None,
    )
    .into_response())
}

/// Place the order.
///
/// Field errors and rejected discounts re-render the checkout page.
#[instrument(skip_all)]
pub async fn place(
    State(state): State<AppState>,
    RequireAuth(user, stores): RequireAuth,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let catalog = state.catalog();
    let cart = stores.cart.cart().await?;
    if cart.is_empty() {
        return Err(AppError::Checkout(checkout::CheckoutError::EmptyCart));
    }

    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            let entered = Entered {
                points_raw: form.points.clone(),
                ..Entered::blank()
            };
            let page = checkout_page(&state, &user, &cart, &entered, errors, None);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    let coupon = match input.coupon_id {
        Some(id) => Some(catalog.coupon(id).ok_or_else(|| {
            AppError::BadRequest("존재하지 않는 쿠폰입니다.".to_owned())
        })?),
        None => None,
    };
    let entered = Entered {
        payment_method: Some(input.payment_method),
        points: input.points,
        points_raw: form.points.clone(),
        coupon,
    };

    state.latency().wait().await;

    let request = PlaceOrder {
        order_id: catalog.next_order_id(),
        user: &user,
        payment_method: input.payment_method,
        points_requested: input.points,
        coupon,
        now: Utc::now(),
    };
    let order = match checkout::place_order(&cart, &request) {
        Ok(order) => order,
        Err(err) => {
            tracing::info!(error = %err, "Checkout rejected");
            let message = AppError::from(err).user_message();
            let page = checkout_page(
                &state,
                &user,
                &cart,
                &entered,
                ValidationErrors::new(),
                Some(message),
            );
            return Ok((StatusCode::BAD_REQUEST, page).into_response());
        }
    };

    stores.cart.clear().await?;

    tracing::info!(
        order_id = %order.id,
        store_id = %order.store_id,
        total = %order.total_price,
        used_points = order.used_points.get(),
        "Order placed"
    );

    let store = catalog.store(order.store_id);
    Ok(OrderCompleteTemplate {
        order: OrderView::new(&order, store),
    }
    .into_response())
}
