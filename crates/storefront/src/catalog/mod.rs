//! In-process catalog: menu, stores, accounts, coupons, and orders.
//!
//! Everything here is read-only mock data seeded at startup. Placed orders
//! get fresh ids from [`Catalog::next_order_id`] but are not stored back.

mod seed;

use std::sync::atomic::{AtomicU32, Ordering};

use brewline_core::catalog::{Category, Coupon, MenuItem, Store, User};
use brewline_core::checkout::Order;
use brewline_core::{CouponId, Email, MenuItemId, OrderId, StoreId, UserId, UserRole};

/// A sign-in identity backed by a mock password.
#[derive(Debug, Clone)]
pub struct Account {
    pub user: User,
    pub password: &'static str,
}

/// Mock catalog shared by all requests.
#[derive(Debug)]
pub struct Catalog {
    menu: Vec<MenuItem>,
    stores: Vec<Store>,
    accounts: Vec<Account>,
    coupons: Vec<Coupon>,
    orders: Vec<Order>,
    next_order_id: AtomicU32,
    next_user_id: AtomicU32,
}

impl Catalog {
    /// Build the catalog from seed data.
    #[must_use]
    pub fn seeded() -> Self {
        let orders = seed::orders();
        let accounts = seed::accounts();
        let next_order = orders.iter().map(|order| order.id.get()).max().unwrap_or(1000) + 1;
        let next_user = accounts
            .iter()
            .map(|account| account.user.id.get())
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            menu: seed::menu(),
            stores: seed::stores(),
            accounts,
            coupons: seed::coupons(),
            orders,
            next_order_id: AtomicU32::new(next_order),
            next_user_id: AtomicU32::new(next_user),
        }
    }

    // =========================================================================
    // Menu
    // =========================================================================

    /// Every menu item.
    #[must_use]
    pub fn menu(&self) -> &[MenuItem] {
        &self.menu
    }

    /// Menu items filtered by category and by what a store carries.
    pub fn menu_for<'a>(
        &'a self,
        category: Option<Category>,
        store: Option<&'a Store>,
    ) -> impl Iterator<Item = &'a MenuItem> + 'a {
        self.menu.iter().filter(move |item| {
            category.is_none_or(|category| item.category == category)
                && store.is_none_or(|store| store.carries(item.id))
        })
    }

    #[must_use]
    pub fn menu_item(&self, id: MenuItemId) -> Option<&MenuItem> {
        self.menu.iter().find(|item| item.id == id)
    }

    /// Recommended items for the home page.
    pub fn recommended(&self) -> impl Iterator<Item = &MenuItem> {
        self.menu.iter().filter(|item| item.flags.is_recommended)
    }

    /// New items for the home page.
    pub fn new_arrivals(&self) -> impl Iterator<Item = &MenuItem> {
        self.menu.iter().filter(|item| item.flags.is_new)
    }

    /// Best sellers for the home page.
    pub fn best_sellers(&self) -> impl Iterator<Item = &MenuItem> {
        self.menu.iter().filter(|item| item.flags.is_best_seller)
    }

    // =========================================================================
    // Stores
    // =========================================================================

    #[must_use]
    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    #[must_use]
    pub fn store(&self, id: StoreId) -> Option<&Store> {
        self.stores.iter().find(|store| store.id == id)
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Every user, for the admin console.
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.accounts.iter().map(|account| &account.user)
    }

    #[must_use]
    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users().find(|user| user.id == id)
    }

    /// Match an email and mock password. Owners sign in through the backend.
    #[must_use]
    pub fn authenticate(&self, email: &Email, password: &str) -> Option<&User> {
        self.accounts
            .iter()
            .find(|account| {
                account.user.email == *email
                    && account.password == password
                    && account.user.role != UserRole::Owner
            })
            .map(|account| &account.user)
    }

    /// Allocate an id for a newly signed-up user.
    pub fn next_user_id(&self) -> UserId {
        UserId::new(self.next_user_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Whether an email belongs to a seeded account.
    #[must_use]
    pub fn email_registered(&self, email: &Email) -> bool {
        self.users().any(|user| user.email == *email)
    }

    // =========================================================================
    // Coupons
    // =========================================================================

    #[must_use]
    pub fn coupons(&self) -> &[Coupon] {
        &self.coupons
    }

    #[must_use]
    pub fn coupon(&self, id: CouponId) -> Option<&Coupon> {
        self.coupons.iter().find(|coupon| coupon.id == id)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// A user's orders, newest first.
    #[must_use]
    pub fn orders_for_user(&self, user_id: UserId) -> Vec<&Order> {
        let mut orders: Vec<_> = self
            .orders
            .iter()
            .filter(|order| order.user_id == user_id)
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }

    /// A store's orders, newest first.
    #[must_use]
    pub fn orders_for_store(&self, store_id: StoreId) -> Vec<&Order> {
        let mut orders: Vec<_> = self
            .orders
            .iter()
            .filter(|order| order.store_id == store_id)
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }

    /// Allocate an id for a newly placed order.
    pub fn next_order_id(&self) -> OrderId {
        OrderId::new(self.next_order_id.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use brewline_core::catalog::{ItemType, OptionKind};

    use super::*;

    #[test]
    fn test_seed_ids_are_unique() {
        let catalog = Catalog::seeded();
        let menu_ids: HashSet<_> = catalog.menu().iter().map(|item| item.id).collect();
        assert_eq!(menu_ids.len(), catalog.menu().len());
        let store_ids: HashSet<_> = catalog.stores().iter().map(|store| store.id).collect();
        assert_eq!(store_ids.len(), catalog.stores().len());
    }

    #[test]
    fn test_every_item_has_one_main_image() {
        for item in Catalog::seeded().menu() {
            let mains = item.images.iter().filter(|image| image.is_main).count();
            assert_eq!(mains, 1, "{} should have one main image", item.name_en);
        }
    }

    #[test]
    fn test_americano_prices_match_pricing_example() {
        let catalog = Catalog::seeded();
        let americano = catalog.menu_item(MenuItemId::new(1)).unwrap();
        assert_eq!(americano.base_price.display(), "4,500원");
        let grande = americano.find_option(OptionKind::Size, "grande").unwrap();
        let shot = americano.find_option(OptionKind::Extra, "shot").unwrap();
        assert_eq!(grande.price_delta().display(), "500원");
        assert_eq!(shot.price_delta().display(), "500원");
    }

    #[test]
    fn test_food_has_no_options() {
        let catalog = Catalog::seeded();
        for item in catalog.menu().iter().filter(|item| item.item_type == ItemType::Food) {
            assert!(item.options.is_empty());
        }
    }

    #[test]
    fn test_menu_for_filters_by_store_and_category() {
        let catalog = Catalog::seeded();
        let drive_thru = catalog.store(StoreId::new(3)).unwrap();
        let desserts: Vec<_> = catalog
            .menu_for(Some(Category::Dessert), Some(drive_thru))
            .map(|item| item.id)
            .collect();
        assert_eq!(desserts, vec![MenuItemId::new(10)]);
        assert_eq!(catalog.menu_for(None, None).count(), catalog.menu().len());
    }

    #[test]
    fn test_authenticate() {
        let catalog = Catalog::seeded();
        let email = Email::parse("Customer@Brewline.kr").unwrap();
        assert_eq!(
            catalog.authenticate(&email, "customer1234!").unwrap().id,
            UserId::new(1)
        );
        assert!(catalog.authenticate(&email, "wrong").is_none());

        let owner = Email::parse("owner@brewline.kr").unwrap();
        assert!(catalog.authenticate(&owner, "owner1234!").is_none());
        assert!(catalog.email_registered(&owner));
    }

    #[test]
    fn test_orders_newest_first() {
        let catalog = Catalog::seeded();
        let orders = catalog.orders_for_user(UserId::new(1));
        assert!(!orders.is_empty());
        assert!(orders.windows(2).all(|w| w[0].created_at >= w[1].created_at));
        assert!(orders.iter().all(|order| order.user_id == UserId::new(1)));
    }

    #[test]
    fn test_next_order_id_increments_past_seed() {
        let catalog = Catalog::seeded();
        let first = catalog.next_order_id();
        let second = catalog.next_order_id();
        assert!(catalog.orders().iter().all(|order| order.id < first));
        assert_eq!(second.get(), first.get() + 1);
    }
}
