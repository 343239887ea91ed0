//! Cart store (`cart-storage`).

use brewline_core::cart::{Cart, CartItem, Selection};
use brewline_core::catalog::MenuItem;
use brewline_core::{CartLineId, StoreId};

use super::ClientStateError;
use crate::persistence::{ClientScope, Namespace, PersistedStore, SharedKeyValueStore};

/// The cart lines and the store they will be ordered from.
#[derive(Clone)]
pub struct CartStore {
    inner: PersistedStore<Cart>,
}

impl CartStore {
    #[must_use]
    pub fn new(backend: SharedKeyValueStore, scope: ClientScope) -> Self {
        Self {
            inner: PersistedStore::new(backend, scope, Namespace::Cart),
        }
    }

    /// Current cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read.
    pub async fn cart(&self) -> Result<Cart, ClientStateError> {
        Ok(self.inner.get().await?)
    }

    /// Add units of a menu item, merging with a matching line.
    ///
    /// # Errors
    ///
    /// Returns `ClientStateError::Cart` for invalid quantities or options.
    pub async fn add_item(
        &self,
        item: &MenuItem,
        selection: Selection,
        quantity: u32,
    ) -> Result<CartLineId, ClientStateError> {
        self.inner
            .try_update(|cart| Ok(cart.add(item, selection, quantity)?))
            .await
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns `ClientStateError::Cart` if the line does not exist.
    pub async fn remove_item(&self, line_id: CartLineId) -> Result<CartItem, ClientStateError> {
        self.inner
            .try_update(|cart| Ok(cart.remove(line_id)?))
            .await
    }

    /// Change a line's quantity.
    ///
    /// # Errors
    ///
    /// Returns `ClientStateError::Cart` for zero or an unknown line.
    pub async fn update_quantity(
        &self,
        line_id: CartLineId,
        quantity: u32,
    ) -> Result<CartItem, ClientStateError> {
        self.inner
            .try_update(|cart| Ok(cart.update_quantity(line_id, quantity)?.clone()))
            .await
    }

    /// Drop every line, keeping the store pointer.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    pub async fn clear(&self) -> Result<(), ClientStateError> {
        self.inner
            .try_update(|cart| {
                cart.clear();
                Ok(())
            })
            .await
    }

    /// Point the cart at a store.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    pub async fn set_store(&self, store_id: Option<StoreId>) -> Result<(), ClientStateError> {
        self.inner
            .try_update(|cart| {
                cart.set_store(store_id);
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use brewline_core::MenuItemId;
    use brewline_core::cart::CartError;

    use super::*;
    use crate::catalog::Catalog;
    use crate::persistence::MemoryKeyValueStore;

    fn store() -> CartStore {
        CartStore::new(Arc::new(MemoryKeyValueStore::new()), ClientScope::generate())
    }

    fn grande_shot() -> Selection {
        Selection {
            size: Some("grande".to_owned()),
            temperature: Some("iced".to_owned()),
            extras: vec!["shot".to_owned()],
        }
    }

    #[tokio::test]
    async fn test_add_persists_and_merges() {
        let catalog = Catalog::seeded();
        let americano = catalog.menu_item(MenuItemId::new(1)).unwrap();
        let carts = store();

        let first = carts.add_item(americano, grande_shot(), 1).await.unwrap();
        let second = carts.add_item(americano, grande_shot(), 1).await.unwrap();
        assert_eq!(first, second);

        let cart = carts.cart().await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 2);
        assert_eq!(cart.subtotal().display(), "11,000원");
    }

    #[tokio::test]
    async fn test_failed_add_leaves_cart_untouched() {
        let catalog = Catalog::seeded();
        let americano = catalog.menu_item(MenuItemId::new(1)).unwrap();
        let carts = store();
        carts.add_item(americano, grande_shot(), 1).await.unwrap();

        let err = carts
            .add_item(americano, Selection::default(), 0)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientStateError::Cart(CartError::InvalidQuantity(0))
        ));
        assert_eq!(carts.cart().await.unwrap().item_count(), 1);
    }

    #[tokio::test]
    async fn test_clear_keeps_store_pointer() {
        let catalog = Catalog::seeded();
        let latte = catalog.menu_item(MenuItemId::new(2)).unwrap();
        let carts = store();
        carts.set_store(Some(StoreId::new(2))).await.unwrap();
        carts.add_item(latte, Selection::default(), 3).await.unwrap();

        carts.clear().await.unwrap();
        let cart = carts.cart().await.unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.store_id, Some(StoreId::new(2)));
    }

    #[tokio::test]
    async fn test_update_and_remove() {
        let catalog = Catalog::seeded();
        let latte = catalog.menu_item(MenuItemId::new(2)).unwrap();
        let cake = catalog.menu_item(MenuItemId::new(9)).unwrap();
        let carts = store();
        let latte_line = carts.add_item(latte, Selection::default(), 1).await.unwrap();
        let cake_line = carts.add_item(cake, Selection::default(), 1).await.unwrap();

        let updated = carts.update_quantity(latte_line, 3).await.unwrap();
        assert_eq!(updated.total_price.display(), "15,000원");

        let removed = carts.remove_item(cake_line).await.unwrap();
        assert_eq!(removed.menu_item_id, MenuItemId::new(9));
        let cart = carts.cart().await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].id, latte_line);
    }
}
