use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::StoreError;

pub mod file;
pub mod memory;

/// Async string key-value store backing favorites (and whatever else a host
/// wants to persist).
///
/// `get` answers `None` for keys that were never written. Both operations may
/// fail with a [`StoreError`]; what callers do with that differs per feature,
/// so the trait itself stays policy-free.
#[async_trait]
pub trait KeyValueStore: Send + Sync + Debug {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
