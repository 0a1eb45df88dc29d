//! Per-user favorite city lists.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    error::{PersistenceError, StoreError},
    store::KeyValueStore,
};

/// Store key holding one user's favorites.
fn favorites_key(user_id: &str) -> String {
    format!("favorites:{user_id}")
}

/// User-scoped favorite cities on top of a [`KeyValueStore`].
///
/// The contract is asymmetric on purpose: reads that fail for any reason
/// (missing record, unreadable store, unparseable payload) degrade to an
/// empty list, while writes that fail surface a [`PersistenceError`].
///
/// Mutations are unlocked read-modify-write, so concurrent edits for the
/// same user resolve as last-write-wins. Callers issue favorites edits one
/// at a time.
#[derive(Debug, Clone)]
pub struct FavoritesStore {
    store: Arc<dyn KeyValueStore>,
}

impl FavoritesStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Favorites for `user_id`, in the order they were added.
    ///
    /// Empty when `user_id` is empty, nothing was stored yet, or the stored
    /// value cannot be read.
    pub async fn list(&self, user_id: &str) -> Vec<String> {
        if user_id.is_empty() {
            return Vec::new();
        }

        let raw = match self.store.get(&favorites_key(user_id)).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!("Favorites read failed for user {}, treating as empty: {}", user_id, err);
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(list) => list,
            Err(err) => {
                warn!(
                    "Stored favorites for user {} were not valid JSON, treating as empty: {}",
                    user_id, err
                );
                Vec::new()
            }
        }
    }

    /// Whether `city` is already one of `user_id`'s favorites, compared
    /// case-insensitively.
    pub async fn is_favorite(&self, user_id: &str, city: &str) -> bool {
        let lowered = city.to_lowercase();
        self.list(user_id).await.iter().any(|c| c.to_lowercase() == lowered)
    }

    /// Append `city` in the caller's casing, unless an entry already matches
    /// it case-insensitively. Empty `user_id` is a no-op.
    pub async fn add(&self, user_id: &str, city: &str) -> Result<(), PersistenceError> {
        if user_id.is_empty() {
            return Ok(());
        }

        let mut list = self.list(user_id).await;
        let lowered = city.to_lowercase();
        if list.iter().any(|c| c.to_lowercase() == lowered) {
            return Ok(());
        }

        list.push(city.to_string());
        self.save(user_id, &list).await
    }

    /// Drop every entry matching `city` case-insensitively, then persist the
    /// result whether or not anything matched. Empty `user_id` is a no-op.
    pub async fn remove(&self, user_id: &str, city: &str) -> Result<(), PersistenceError> {
        if user_id.is_empty() {
            return Ok(());
        }

        let lowered = city.to_lowercase();
        let list: Vec<String> = self
            .list(user_id)
            .await
            .into_iter()
            .filter(|c| c.to_lowercase() != lowered)
            .collect();

        self.save(user_id, &list).await
    }

    async fn save(&self, user_id: &str, list: &[String]) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(list).map_err(StoreError::from)?;
        self.store.set(&favorites_key(user_id), &raw).await?;

        debug!("Persisted {} favorite(s) for user {}", list.len(), user_id);
        Ok(())
    }
}
