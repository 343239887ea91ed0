//! The four client stores over the memory and file adapters.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use brewline_core::cart::Selection;
use brewline_core::{MenuItemId, OwnerId, StoreId, UserId};
use brewline_storefront::catalog::Catalog;
use brewline_storefront::client_state::{ClientStores, OwnerSession};
use brewline_storefront::persistence::{
    ClientScope, FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, Namespace,
    SharedKeyValueStore,
};

fn owner_session() -> OwnerSession {
    OwnerSession {
        owner_id: OwnerId::new(7),
        name: "박지훈".to_owned(),
        email: "owner@brewline.kr".to_owned(),
        store_id: None,
        access_token: "owner-token-7".to_owned(),
        first_login: true,
    }
}

/// Fill all four stores for one scope.
async fn populate(stores: &ClientStores, catalog: &Catalog) {
    let americano = catalog.menu_item(MenuItemId::new(1)).unwrap();
    let customer = catalog.user(UserId::new(1)).unwrap().clone();

    stores.store_selection.select(StoreId::new(2)).await.unwrap();
    stores.cart.set_store(Some(StoreId::new(2))).await.unwrap();
    stores
        .cart
        .add_item(americano, Selection::default(), 2)
        .await
        .unwrap();
    stores.auth.sign_in(customer).await.unwrap();
    stores.owner.sign_in(owner_session()).await.unwrap();
}

async fn clearing_one_store_leaves_the_others(backend: SharedKeyValueStore) {
    let catalog = Catalog::seeded();
    let stores = ClientStores::bind(&backend, ClientScope::generate());
    populate(&stores, &catalog).await;

    stores.auth.sign_out().await.unwrap();

    assert!(stores.auth.current_user().await.unwrap().is_none());
    assert_eq!(stores.cart.cart().await.unwrap().item_count(), 2);
    assert_eq!(
        stores.store_selection.selected().await.unwrap(),
        Some(StoreId::new(2))
    );
    assert_eq!(stores.owner.current().await.unwrap(), Some(owner_session()));

    stores.cart.clear().await.unwrap();
    let cart = stores.cart.cart().await.unwrap();
    assert!(cart.is_empty());
    assert_eq!(cart.store_id, Some(StoreId::new(2)));
    assert!(stores.owner.current().await.unwrap().is_some());
}

async fn scopes_do_not_share_state(backend: SharedKeyValueStore) {
    let catalog = Catalog::seeded();
    let first = ClientStores::bind(&backend, ClientScope::generate());
    let second = ClientStores::bind(&backend, ClientScope::generate());
    populate(&first, &catalog).await;

    assert!(second.cart.cart().await.unwrap().is_empty());
    assert!(second.auth.current_user().await.unwrap().is_none());
    assert!(second.owner.current().await.unwrap().is_none());
    assert!(second.store_selection.selected().await.unwrap().is_none());
}

async fn unreadable_snapshot_reads_as_empty(backend: SharedKeyValueStore) {
    let scope = ClientScope::generate();
    backend
        .put(scope, Namespace::Cart, "{not json".to_owned())
        .await
        .unwrap();

    let stores = ClientStores::bind(&backend, scope);
    assert!(stores.cart.cart().await.unwrap().is_empty());

    // The next write replaces the bad snapshot.
    let catalog = Catalog::seeded();
    let latte = catalog.menu_item(MenuItemId::new(2)).unwrap();
    stores
        .cart
        .add_item(latte, Selection::default(), 1)
        .await
        .unwrap();
    assert_eq!(stores.cart.cart().await.unwrap().item_count(), 1);
}

fn memory() -> SharedKeyValueStore {
    Arc::new(MemoryKeyValueStore::new())
}

async fn file(dir: &tempfile::TempDir) -> SharedKeyValueStore {
    Arc::new(FileKeyValueStore::open(dir.path()).await.unwrap())
}

#[tokio::test]
async fn memory_adapter_keeps_namespaces_apart() {
    clearing_one_store_leaves_the_others(memory()).await;
    scopes_do_not_share_state(memory()).await;
    unreadable_snapshot_reads_as_empty(memory()).await;
}

#[tokio::test]
async fn file_adapter_keeps_namespaces_apart() {
    let dir = tempfile::tempdir().unwrap();
    clearing_one_store_leaves_the_others(file(&dir).await).await;
    scopes_do_not_share_state(file(&dir).await).await;
    unreadable_snapshot_reads_as_empty(file(&dir).await).await;
}

#[tokio::test]
async fn file_adapter_survives_reopening() {
    let dir = tempfile::tempdir().unwrap();
    let scope = ClientScope::generate();
    let catalog = Catalog::seeded();

    populate(&ClientStores::bind(&file(&dir).await, scope), &catalog).await;

    let reopened = ClientStores::bind(&file(&dir).await, scope);
    assert_eq!(reopened.cart.cart().await.unwrap().item_count(), 2);
    assert_eq!(
        reopened.auth.current_user().await.unwrap().map(|user| user.id),
        Some(UserId::new(1))
    );
    assert_eq!(
        reopened.store_selection.selected().await.unwrap(),
        Some(StoreId::new(2))
    );
}

#[tokio::test]
async fn sign_out_removes_the_snapshot() {
    let backend = memory();
    let scope = ClientScope::generate();
    let stores = ClientStores::bind(&backend, scope);
    stores.owner.sign_in(owner_session()).await.unwrap();
    assert!(backend.get(scope, Namespace::OwnerSession).await.unwrap().is_some());

    stores.owner.sign_out().await.unwrap();
    assert!(stores.owner.current().await.unwrap().is_none());
    assert!(backend.get(scope, Namespace::OwnerSession).await.unwrap().is_none());
}
