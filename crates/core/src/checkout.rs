//! Checkout: point and coupon discounts, and turning a cart into an order.
//!
//! ```text
//! points  = min(requested, balance, POINT_SPEND_CAP)
//! total   = max(0, subtotal - points - flat coupon value)
//! ```
//!
//! Only flat (`Fixed`) coupons are applied. Percentage and free-menu coupons
//! are refused until their base is defined.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::{Cart, CartItem};
use crate::catalog::{Coupon, CouponKind, User};
use crate::types::{
    CouponId, MenuItemId, OrderId, OrderStatus, PaymentMethod, Points, Price, StoreId, UserId,
};

/// Most points a single order may spend.
pub const POINT_SPEND_CAP: Points = Points::new(5_000);

/// Errors from pricing or placing an order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("no store selected for this order")]
    NoStoreSelected,

    #[error("coupon {0} has expired")]
    CouponExpired(String),

    #[error("order must be at least {minimum} to use this coupon")]
    BelowMinimumOrder { minimum: Price },

    /// Percentage and free-menu coupons have no agreed discount base.
    #[error("{0:?} coupons cannot be applied at checkout")]
    UnsupportedCoupon(CouponKind),
}

/// Price breakdown shown on the checkout page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub subtotal: Price,
    /// Points that will actually be deducted.
    pub points_applied: Points,
    pub coupon_id: Option<CouponId>,
    pub coupon_discount: Price,
    pub total: Price,
}

/// Points a user may spend: `min(requested, balance, cap)`.
#[must_use]
pub fn spendable_points(requested: Points, balance: Points) -> Points {
    requested.min(balance).min(POINT_SPEND_CAP)
}

/// The flat discount a coupon gives on `subtotal` at `now`.
///
/// # Errors
///
/// Returns an error for expired coupons, subtotals below the coupon minimum,
/// and coupon kinds other than [`CouponKind::Fixed`].
pub fn coupon_discount(
    coupon: &Coupon,
    subtotal: Price,
    now: DateTime<Utc>,
) -> Result<Price, CheckoutError> {
    if coupon.is_expired(now) {
        return Err(CheckoutError::CouponExpired(coupon.code.clone()));
    }
    if subtotal < coupon.min_order_amount {
        return Err(CheckoutError::BelowMinimumOrder {
            minimum: coupon.min_order_amount,
        });
    }
    match coupon.kind {
        CouponKind::Fixed => Ok(Price::won(i64::from(coupon.value))),
        kind @ (CouponKind::Percentage | CouponKind::FreeMenu) => {
            Err(CheckoutError::UnsupportedCoupon(kind))
        }
    }
}

/// Apply points then a flat coupon, flooring the total at zero.
///
/// Points that would only push the total below zero are not spent.
#[must_use]
pub fn apply_discounts(subtotal: Price, points: Points, coupon_discount: Price) -> (Points, Price) {
    let after_coupon = subtotal.saturating_sub(coupon_discount);
    let total = subtotal
        .saturating_sub(points.as_price())
        .saturating_sub(coupon_discount);

    let usable = after_coupon.amount().floor().to_u32().unwrap_or(u32::MAX);
    let spent = Points::new(points.get().min(usable));
    (spent, total)
}

/// Price a cart for a user.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] for an empty cart, or any error from
/// [`coupon_discount`].
pub fn quote(
    cart: &Cart,
    user: &User,
    points_requested: Points,
    coupon: Option<&Coupon>,
    now: DateTime<Utc>,
) -> Result<Quote, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let subtotal = cart.subtotal();
    let points = spendable_points(points_requested, user.points);
    let discount = coupon
        .map(|coupon| coupon_discount(coupon, subtotal, now))
        .transpose()?
        .unwrap_or(Price::ZERO);
    let (points_applied, total) = apply_discounts(subtotal, points, discount);

    Ok(Quote {
        subtotal,
        points_applied,
        coupon_id: coupon.map(|coupon| coupon.id),
        coupon_discount: discount,
        total,
    })
}

/// An item as it was ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub options: String,
    pub quantity: u32,
    pub total_price: Price,
}

impl From<&CartItem> for OrderLine {
    fn from(line: &CartItem) -> Self {
        Self {
            menu_item_id: line.menu_item_id,
            name: line.name.clone(),
            options: line.options_summary(),
            quantity: line.quantity,
            total_price: line.total_price,
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub store_id: StoreId,
    pub user_id: UserId,
    pub lines: Vec<OrderLine>,
    pub subtotal: Price,
    pub coupon_id: Option<CouponId>,
    pub coupon_discount: Price,
    pub total_price: Price,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub used_points: Points,
    pub earned_points: Points,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Σ line quantities.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// First line name plus how many others, e.g. `아메리카노 외 2개`.
    #[must_use]
    pub fn title(&self) -> String {
        match self.lines.split_first() {
            None => String::new(),
            Some((first, [])) => first.name.clone(),
            Some((first, rest)) => format!("{} 외 {}개", first.name, rest.len()),
        }
    }
}

/// Points earned on a paid total at the user's level rate, rounded down.
#[must_use]
pub fn earned_points(total: Price, user: &User) -> Points {
    let rate = Decimal::from(user.level.earn_rate_percent());
    let earned = (total.amount() * rate / Decimal::ONE_HUNDRED).floor();
    Points::new(earned.to_u32().unwrap_or(0))
}

/// Everything needed to place an order besides the cart.
#[derive(Debug, Clone)]
pub struct PlaceOrder<'a> {
    pub order_id: OrderId,
    pub user: &'a User,
    pub payment_method: PaymentMethod,
    pub points_requested: Points,
    pub coupon: Option<&'a Coupon>,
    pub now: DateTime<Utc>,
}

/// Turn a cart into a pending order.
///
/// The cart is left untouched; clearing it is the caller's job.
///
/// # Errors
///
/// Returns [`CheckoutError::NoStoreSelected`] when the cart has no store, or
/// any error from [`quote`].
pub fn place_order(cart: &Cart, request: &PlaceOrder<'_>) -> Result<Order, CheckoutError> {
    let store_id = cart.store_id.ok_or(CheckoutError::NoStoreSelected)?;
    let quote = quote(
        cart,
        request.user,
        request.points_requested,
        request.coupon,
        request.now,
    )?;

    Ok(Order {
        id: request.order_id,
        store_id,
        user_id: request.user.id,
        lines: cart.items.iter().map(OrderLine::from).collect(),
        subtotal: quote.subtotal,
        coupon_id: quote.coupon_id,
        coupon_discount: quote.coupon_discount,
        total_price: quote.total,
        payment_method: request.payment_method,
        status: OrderStatus::Pending,
        used_points: quote.points_applied,
        earned_points: earned_points(quote.total, request.user),
        created_at: request.now,
    })
}
