//! Filesystem adapter.
//!
//! Layout: `<root>/<scope>/<namespace>.json`. Each write goes to its own
//! temporary file and is renamed into place, so a crash never leaves half a
//! snapshot and concurrent writers never share a temp path.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use super::{ClientScope, KeyValueStore, Namespace, PersistError};

/// Stores each snapshot as a JSON file under a data directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    /// Use `root` as the data directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns `PersistError::Io` if the directory cannot be created.
    pub async fn open(root: impl AsRef<Path>) -> Result<Self, PersistError> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    fn path(&self, scope: ClientScope, namespace: Namespace) -> PathBuf {
        self.root
            .join(scope.to_string())
            .join(format!("{}.json", namespace.key()))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn ping(&self) -> Result<(), PersistError> {
        tokio::fs::metadata(&self.root).await?;
        Ok(())
    }

    async fn get(
        &self,
        scope: ClientScope,
        namespace: Namespace,
    ) -> Result<Option<String>, PersistError> {
        match tokio::fs::read_to_string(self.path(scope, namespace)).await {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(
        &self,
        scope: ClientScope,
        namespace: Namespace,
        snapshot: String,
    ) -> Result<(), PersistError> {
        let path = self.path(scope, namespace);
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let tmp = path.with_extension(format!("json.{}.tmp", Uuid::new_v4().simple()));
        let written = match tokio::fs::write(&tmp, snapshot).await {
            Ok(()) => tokio::fs::rename(&tmp, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn delete(&self, scope: ClientScope, namespace: Namespace) -> Result<(), PersistError> {
        match tokio::fs::remove_file(self.path(scope, namespace)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_snapshots_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let scope = ClientScope::generate();

        let store = FileKeyValueStore::open(dir.path()).await.unwrap();
        store
            .put(scope, Namespace::StoreSelection, "{\"store_id\":3}".to_owned())
            .await
            .unwrap();

        let reopened = FileKeyValueStore::open(dir.path()).await.unwrap();
        assert_eq!(
            reopened
                .get(scope, Namespace::StoreSelection)
                .await
                .unwrap()
                .as_deref(),
            Some("{\"store_id\":3}")
        );
        assert!(
            dir.path()
                .join(scope.to_string())
                .join("store-storage.json")
                .exists()
        );
    }

    #[tokio::test]
    async fn test_missing_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path()).await.unwrap();
        let scope = ClientScope::generate();

        assert_eq!(store.get(scope, Namespace::Cart).await.unwrap(), None);
        store.delete(scope, Namespace::Cart).await.unwrap();

        store
            .put(scope, Namespace::Cart, "{}".to_owned())
            .await
            .unwrap();
        store.delete(scope, Namespace::Cart).await.unwrap();
        assert_eq!(store.get(scope, Namespace::Cart).await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_puts_to_one_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path()).await.unwrap();
        let scope = ClientScope::generate();

        let writers: Vec<_> = (0..32)
            .map(|n| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .put(scope, Namespace::Cart, format!("{{\"writer\":{n}}}"))
                        .await
                })
            })
            .collect();
        for writer in writers {
            writer.await.unwrap().unwrap();
        }

        let snapshot = store.get(scope, Namespace::Cart).await.unwrap().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&snapshot).unwrap();
        assert!(parsed["writer"].as_u64().unwrap() < 32);

        let mut entries = tokio::fs::read_dir(dir.path().join(scope.to_string()))
            .await
            .unwrap();
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec!["cart-storage.json"]);
    }
}
