//! Price a single menu line, optionally with points and a coupon.

use brewline_core::cart::{Cart, Selection};
use brewline_core::checkout::{self, Quote};
use brewline_core::{CouponId, MenuItemId, Points, Price, UserId};
use brewline_storefront::catalog::Catalog;
use chrono::Utc;

use super::CliError;

/// What to price.
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub item: MenuItemId,
    pub selection: Selection,
    pub quantity: u32,
    /// Customer whose balance and level apply to discounts.
    pub user: UserId,
    pub points: Option<u32>,
    pub coupon: Option<CouponId>,
}

/// Line total and, when discounts were requested, the checkout breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Priced {
    pub name: String,
    pub line_total: Price,
    pub checkout: Option<Quote>,
}

/// Price a request against the seeded catalog.
///
/// # Errors
///
/// Returns an error for unknown items, options, users, or coupons, for a
/// zero quantity, and for coupons that cannot be applied.
pub fn price(catalog: &Catalog, request: QuoteRequest) -> Result<Priced, CliError> {
    let item = catalog
        .menu_item(request.item)
        .ok_or_else(|| CliError::InvalidArgument(format!("unknown menu item {}", request.item)))?;

    let mut cart = Cart::default();
    cart.add(item, request.selection, request.quantity)?;
    let line_total = cart.subtotal();

    let checkout = if request.points.is_some() || request.coupon.is_some() {
        let user = catalog
            .user(request.user)
            .ok_or_else(|| CliError::InvalidArgument(format!("unknown user {}", request.user)))?;
        let coupon = request
            .coupon
            .map(|id| {
                catalog
                    .coupon(id)
                    .ok_or_else(|| CliError::InvalidArgument(format!("unknown coupon {id}")))
            })
            .transpose()?;
        let points = Points::new(request.points.unwrap_or(0));
        Some(checkout::quote(&cart, user, points, coupon, Utc::now())?)
    } else {
        None
    };

    Ok(Priced {
        name: item.name.clone(),
        line_total,
        checkout,
    })
}

/// Price a request and print the breakdown.
///
/// # Errors
///
/// See [`price`].
#[allow(clippy::print_stdout)]
pub fn run(request: QuoteRequest) -> Result<(), CliError> {
    let quantity = request.quantity;
    let priced = price(&Catalog::seeded(), request)?;

    println!("{} x{quantity}: {}", priced.name, priced.line_total);
    if let Some(quote) = priced.checkout {
        println!("  points    -{}", quote.points_applied.as_price());
        println!("  coupon    -{}", quote.coupon_discount);
        println!("  total      {}", quote.total);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use brewline_core::cart::CartError;
    use brewline_core::checkout::CheckoutError;

    use super::*;

    fn americano() -> QuoteRequest {
        QuoteRequest {
            item: MenuItemId::new(1),
            selection: Selection::default(),
            quantity: 1,
            user: UserId::new(1),
            points: None,
            coupon: None,
        }
    }

    #[test]
    fn test_grande_with_shot_times_two() {
        let request = QuoteRequest {
            selection: Selection {
                size: Some("grande".to_owned()),
                temperature: Some("iced".to_owned()),
                extras: vec!["shot".to_owned()],
            },
            quantity: 2,
            ..americano()
        };
        let priced = price(&Catalog::seeded(), request).unwrap();
        assert_eq!(priced.line_total, Price::won(11_000));
        assert!(priced.checkout.is_none());
    }

    #[test]
    fn test_points_and_coupon_are_applied() {
        let request = QuoteRequest {
            selection: Selection {
                size: Some("grande".to_owned()),
                ..Selection::default()
            },
            quantity: 2,
            points: Some(3000),
            coupon: Some(CouponId::new(1)),
            ..americano()
        };
        let quote = price(&Catalog::seeded(), request).unwrap().checkout.unwrap();
        assert_eq!(quote.subtotal, Price::won(10_000));
        assert_eq!(quote.points_applied, Points::new(3000));
        assert_eq!(quote.coupon_discount, Price::won(3000));
        assert_eq!(quote.total, Price::won(4000));
    }

    #[test]
    fn test_zero_quantity_is_rejected() {
        let request = QuoteRequest {
            quantity: 0,
            ..americano()
        };
        let err = price(&Catalog::seeded(), request).unwrap_err();
        assert!(matches!(err, CliError::Cart(CartError::InvalidQuantity(0))));
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let request = QuoteRequest {
            selection: Selection {
                size: Some("trenta".to_owned()),
                ..Selection::default()
            },
            ..americano()
        };
        let err = price(&Catalog::seeded(), request).unwrap_err();
        assert!(matches!(err, CliError::Cart(CartError::UnknownOption { .. })));
    }

    #[test]
    fn test_percentage_coupon_is_refused() {
        let request = QuoteRequest {
            quantity: 3,
            coupon: Some(CouponId::new(3)),
            ..americano()
        };
        let err = price(&Catalog::seeded(), request).unwrap_err();
        assert!(matches!(
            err,
            CliError::Checkout(CheckoutError::UnsupportedCoupon(_))
        ));
    }

    #[test]
    fn test_unknown_item() {
        let request = QuoteRequest {
            item: MenuItemId::new(999),
            ..americano()
        };
        assert!(matches!(
            price(&Catalog::seeded(), request),
            Err(CliError::InvalidArgument(_))
        ));
    }
}
