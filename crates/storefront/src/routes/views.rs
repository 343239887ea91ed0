//! Display data shared by several pages.
//!
//! Views hold preformatted strings so templates stay free of logic.

use brewline_core::Price;
use brewline_core::cart::{Cart, CartItem};
use brewline_core::catalog::{Coupon, MenuItem, Store, User};
use brewline_core::checkout::Order;
use chrono::{DateTime, Utc};

/// Image shown when a menu item has none.
const PLACEHOLDER_IMAGE: &str = "/static/images/menu/placeholder.svg";

/// Timestamps as shown to customers.
#[must_use]
pub fn format_datetime(at: DateTime<Utc>) -> String {
    at.format("%Y.%m.%d %H:%M").to_string()
}

/// A menu item in a grid.
#[derive(Clone)]
pub struct MenuCardView {
    pub id: u32,
    pub name: String,
    pub name_en: String,
    pub price: String,
    pub image_url: String,
    pub badges: Vec<&'static str>,
}

impl From<&MenuItem> for MenuCardView {
    fn from(item: &MenuItem) -> Self {
        let mut badges = Vec::new();
        if item.flags.is_new {
            badges.push("NEW");
        }
        if item.flags.is_best_seller {
            badges.push("BEST");
        }
        Self {
            id: item.id.get(),
            name: item.name.clone(),
            name_en: item.name_en.clone(),
            price: item.base_price.display(),
            image_url: item
                .main_image()
                .map_or_else(|| PLACEHOLDER_IMAGE.to_owned(), |image| image.url.clone()),
            badges,
        }
    }
}

/// One cart line.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub menu_item_id: u32,
    pub name: String,
    pub options: String,
    pub image_url: String,
    pub quantity: u32,
    pub unit_price: String,
    pub total_price: String,
}

impl From<&CartItem> for CartItemView {
    fn from(line: &CartItem) -> Self {
        Self {
            id: line.id.to_string(),
            menu_item_id: line.menu_item_id.get(),
            name: line.name.clone(),
            options: line.options_summary(),
            image_url: line
                .image_url
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_owned()),
            quantity: line.quantity,
            unit_price: line.unit_price().display(),
            total_price: line.total_price.display(),
        }
    }
}

/// The whole cart.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items.iter().map(CartItemView::from).collect(),
            subtotal: cart.subtotal().display(),
            item_count: cart.item_count(),
        }
    }
}

/// A store card.
#[derive(Clone)]
pub struct StoreView {
    pub id: u32,
    pub name: String,
    pub address: String,
    pub distance: String,
    pub business_hours: String,
    pub phone: String,
    pub facilities: Vec<&'static str>,
    pub menu_count: usize,
    pub selected: bool,
}

impl StoreView {
    #[must_use]
    pub fn new(store: &Store, selected: bool) -> Self {
        let flags = [
            (store.facilities.parking, "주차"),
            (store.facilities.drive_thru, "드라이브 스루"),
            (store.facilities.wifi, "와이파이"),
            (store.facilities.pet_friendly, "반려동물 동반"),
            (store.facilities.delivery, "배달"),
        ];
        Self {
            id: store.id.get(),
            name: store.name.clone(),
            address: store.address.clone(),
            distance: store.distance.clone(),
            business_hours: store.business_hours.clone(),
            phone: store.phone.clone(),
            facilities: flags
                .into_iter()
                .filter_map(|(on, label)| on.then_some(label))
                .collect(),
            menu_count: store.menu_ids.len(),
            selected,
        }
    }
}

/// An order row.
#[derive(Clone)]
pub struct OrderView {
    pub id: u32,
    pub title: String,
    pub store_name: String,
    pub item_count: u32,
    pub subtotal: String,
    pub discount: String,
    pub total_price: String,
    pub payment_method: &'static str,
    pub status: &'static str,
    pub used_points: u32,
    pub earned_points: u32,
    pub created_at: String,
    pub lines: Vec<OrderLineView>,
}

/// One line of an order.
#[derive(Clone)]
pub struct OrderLineView {
    pub name: String,
    pub options: String,
    pub quantity: u32,
    pub total_price: String,
}

impl OrderView {
    #[must_use]
    pub fn new(order: &Order, store: Option<&Store>) -> Self {
        let discount = order.coupon_discount + order.used_points.as_price();
        Self {
            id: order.id.get(),
            title: order.title(),
            store_name: store.map_or_else(|| "알 수 없는 매장".to_owned(), |s| s.name.clone()),
            item_count: order.item_count(),
            subtotal: order.subtotal.display(),
            discount: discount.display(),
            total_price: order.total_price.display(),
            payment_method: order.payment_method.label(),
            status: order.status.label(),
            used_points: order.used_points.get(),
            earned_points: order.earned_points.get(),
            created_at: format_datetime(order.created_at),
            lines: order
                .lines
                .iter()
                .map(|line| OrderLineView {
                    name: line.name.clone(),
                    options: line.options.clone(),
                    quantity: line.quantity,
                    total_price: line.total_price.display(),
                })
                .collect(),
        }
    }
}

/// A coupon in the wallet or the checkout picker.
#[derive(Clone)]
pub struct CouponView {
    pub id: u32,
    pub code: String,
    pub name: String,
    pub benefit: String,
    pub min_order: String,
    pub expires_at: String,
    pub expired: bool,
}

impl CouponView {
    #[must_use]
    pub fn new(coupon: &Coupon, now: DateTime<Utc>) -> Self {
        Self {
            id: coupon.id.get(),
            code: coupon.code.clone(),
            name: coupon.name.clone(),
            benefit: coupon.benefit(),
            min_order: if coupon.min_order_amount == Price::ZERO {
                "최소 주문 금액 없음".to_owned()
            } else {
                format!("{} 이상 주문 시", coupon.min_order_amount.display())
            },
            expires_at: coupon.expires_at.format("%Y.%m.%d").to_string(),
            expired: coupon.is_expired(now),
        }
    }
}

/// A user row or profile header.
#[derive(Clone)]
pub struct UserView {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub level: &'static str,
    pub points: u32,
    pub stamps: u32,
    pub verified: bool,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.get(),
            name: user.name.clone(),
            email: user.email.to_string(),
            role: user.role.to_string(),
            level: user.level.label(),
            points: user.points.get(),
            stamps: user.stamps,
            verified: user.verified,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use brewline_core::cart::Selection;
    use brewline_core::{MenuItemId, StoreId};

    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn test_cart_view_formats_prices() {
        let catalog = Catalog::seeded();
        let americano = catalog.menu_item(MenuItemId::new(1)).unwrap();
        let mut cart = Cart::default();
        cart.add(
            americano,
            Selection {
                size: Some("grande".to_owned()),
                temperature: Some("hot".to_owned()),
                extras: vec!["shot".to_owned()],
            },
            2,
        )
        .unwrap();

        let view = CartView::from(&cart);
        assert_eq!(view.item_count, 2);
        assert_eq!(view.subtotal, "11,000원");
        assert_eq!(view.items.first().unwrap().unit_price, "5,500원");
    }

    #[test]
    fn test_store_view_lists_facilities() {
        let catalog = Catalog::seeded();
        let store = catalog.store(StoreId::new(1)).unwrap();
        let view = StoreView::new(store, true);
        assert!(view.selected);
        assert_eq!(view.menu_count, store.menu_ids.len());
        assert!(view.facilities.len() <= 5);
    }
}
