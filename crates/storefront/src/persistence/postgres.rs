//! `PostgreSQL` adapter.
//!
//! Table (see `migrations/`):
//!
//! ```sql
//! storefront.client_state (scope UUID, namespace TEXT, snapshot JSONB, updated_at TIMESTAMPTZ)
//! ```

use async_trait::async_trait;
use sqlx::PgPool;

use super::{ClientScope, KeyValueStore, Namespace, PersistError};

/// Stores snapshots in `storefront.client_state`.
#[derive(Debug, Clone)]
pub struct PostgresKeyValueStore {
    pool: PgPool,
}

impl PostgresKeyValueStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyValueStore for PostgresKeyValueStore {
    async fn ping(&self) -> Result<(), PersistError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn get(
        &self,
        scope: ClientScope,
        namespace: Namespace,
    ) -> Result<Option<String>, PersistError> {
        let snapshot: Option<String> = sqlx::query_scalar(
            r"
            SELECT snapshot::text
            FROM storefront.client_state
            WHERE scope = $1 AND namespace = $2
            ",
        )
        .bind(scope.as_uuid())
        .bind(namespace.key())
        .fetch_optional(&self.pool)
        .await?;
        Ok(snapshot)
    }

    async fn put(
        &self,
        scope: ClientScope,
        namespace: Namespace,
        snapshot: String,
    ) -> Result<(), PersistError> {
        sqlx::query(
            r"
            INSERT INTO storefront.client_state (scope, namespace, snapshot, updated_at)
            VALUES ($1, $2, $3::jsonb, now())
            ON CONFLICT (scope, namespace)
            DO UPDATE SET snapshot = EXCLUDED.snapshot, updated_at = now()
            ",
        )
        .bind(scope.as_uuid())
        .bind(namespace.key())
        .bind(snapshot)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, scope: ClientScope, namespace: Namespace) -> Result<(), PersistError> {
        sqlx::query(
            r"
            DELETE FROM storefront.client_state
            WHERE scope = $1 AND namespace = $2
            ",
        )
        .bind(scope.as_uuid())
        .bind(namespace.key())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parsed(snapshot: Option<String>) -> serde_json::Value {
        serde_json::from_str(&snapshot.unwrap()).unwrap()
    }

    #[ignore = "Requires a PostgreSQL database (DATABASE_URL)"]
    #[sqlx::test(migrations = "./migrations")]
    async fn test_put_get_delete(pool: PgPool) {
        let store = PostgresKeyValueStore::new(pool);
        let scope = ClientScope::generate();

        store.ping().await.unwrap();
        assert_eq!(store.get(scope, Namespace::Cart).await.unwrap(), None);

        store
            .put(scope, Namespace::Cart, r#"{"items":[],"store_id":3}"#.to_owned())
            .await
            .unwrap();
        assert_eq!(
            parsed(store.get(scope, Namespace::Cart).await.unwrap()),
            serde_json::json!({ "items": [], "store_id": 3 })
        );

        store
            .put(scope, Namespace::Cart, r#"{"items":[],"store_id":5}"#.to_owned())
            .await
            .unwrap();
        assert_eq!(
            parsed(store.get(scope, Namespace::Cart).await.unwrap())["store_id"],
            5
        );

        store.delete(scope, Namespace::Cart).await.unwrap();
        store.delete(scope, Namespace::Cart).await.unwrap();
        assert_eq!(store.get(scope, Namespace::Cart).await.unwrap(), None);
    }

    #[ignore = "Requires a PostgreSQL database (DATABASE_URL)"]
    #[sqlx::test(migrations = "./migrations")]
    async fn test_scopes_and_namespaces_are_isolated(pool: PgPool) {
        let store = PostgresKeyValueStore::new(pool);
        let alice = ClientScope::generate();
        let bob = ClientScope::generate();

        store
            .put(alice, Namespace::Cart, r#"{"owner":"alice"}"#.to_owned())
            .await
            .unwrap();
        store
            .put(alice, Namespace::StoreSelection, r#"{"store_id":1}"#.to_owned())
            .await
            .unwrap();

        assert_eq!(store.get(bob, Namespace::Cart).await.unwrap(), None);
        assert_eq!(store.get(alice, Namespace::Auth).await.unwrap(), None);

        store.delete(alice, Namespace::Cart).await.unwrap();
        assert_eq!(
            parsed(store.get(alice, Namespace::StoreSelection).await.unwrap())["store_id"],
            1
        );
    }

    #[ignore = "Requires a PostgreSQL database (DATABASE_URL)"]
    #[sqlx::test(migrations = "./migrations")]
    async fn test_rejects_non_json_snapshot(pool: PgPool) {
        let store = PostgresKeyValueStore::new(pool);
        let scope = ClientScope::generate();

        assert!(
            store
                .put(scope, Namespace::Cart, "{not json".to_owned())
                .await
                .is_err()
        );
        assert_eq!(store.get(scope, Namespace::Cart).await.unwrap(), None);
    }
}
