//! Client storage backends.
//!
//! A [`ClientStore`] is the raw collection handle: it persists fully-formed
//! records and answers queries, nothing more. Identifier coding, duplicate
//! pre-checks, timestamps, and error-taxonomy mapping all live in the
//! repository on top.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use clientdesk_core::{Client, ClientId, ClientPatch};

pub use in_memory::InMemoryClientStore;
pub use postgres::PostgresClientStore;

/// Storage-level failure.
///
/// Deliberately coarse: the repository only needs to distinguish a
/// uniqueness violation from everything else.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The engine's own uniqueness constraint rejected the write.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// Any other driver/engine failure (network, pool, malformed row, ...).
    #[error("{0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Listing filter shared by `list` and `count`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientFilter {
    /// Case-insensitive substring match on the client name.
    pub name: Option<String>,
    pub active: Option<bool>,
}

impl ClientFilter {
    pub fn matches(&self, client: &Client) -> bool {
        if let Some(name) = &self.name {
            if !client.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }
        if let Some(active) = self.active {
            if client.active != active {
                return false;
            }
        }
        true
    }
}

/// Raw storage handle for client records.
#[async_trait]
pub trait ClientStore: Send + Sync {
    /// Insert a fully-formed record. Fails with `DuplicateKey` when the
    /// document identifier is already taken.
    async fn insert(&self, client: Client) -> StoreResult<()>;

    async fn find_by_id(&self, id: ClientId) -> StoreResult<Option<Client>>;

    /// Look up a record by its document identifier (exact match).
    async fn find_by_document(&self, document_id: &str) -> StoreResult<Option<Client>>;

    /// Records matching `filter`, newest-updated first. `limit: None` means
    /// no page bound.
    async fn list(&self, filter: &ClientFilter, skip: u64, limit: Option<u64>)
    -> StoreResult<Vec<Client>>;

    /// Records whose name contains `name` case-insensitively, name ascending.
    async fn search_name(&self, name: &str) -> StoreResult<Vec<Client>>;

    /// Apply the supplied fields of `patch` to record `id`, stamping
    /// `updated_at`. Returns false when no record matched.
    async fn apply_patch(
        &self,
        id: ClientId,
        patch: &ClientPatch,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<bool>;

    /// Returns false when no record matched.
    async fn delete(&self, id: ClientId) -> StoreResult<bool>;

    async fn count(&self, filter: &ClientFilter) -> StoreResult<u64>;
}

#[async_trait]
impl<S> ClientStore for Arc<S>
where
    S: ClientStore + ?Sized,
{
    async fn insert(&self, client: Client) -> StoreResult<()> {
        (**self).insert(client).await
    }

    async fn find_by_id(&self, id: ClientId) -> StoreResult<Option<Client>> {
        (**self).find_by_id(id).await
    }

    async fn find_by_document(&self, document_id: &str) -> StoreResult<Option<Client>> {
        (**self).find_by_document(document_id).await
    }

    async fn list(
        &self,
        filter: &ClientFilter,
        skip: u64,
        limit: Option<u64>,
    ) -> StoreResult<Vec<Client>> {
        (**self).list(filter, skip, limit).await
    }

    async fn search_name(&self, name: &str) -> StoreResult<Vec<Client>> {
        (**self).search_name(name).await
    }

    async fn apply_patch(
        &self,
        id: ClientId,
        patch: &ClientPatch,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        (**self).apply_patch(id, patch, updated_at).await
    }

    async fn delete(&self, id: ClientId) -> StoreResult<bool> {
        (**self).delete(id).await
    }

    async fn count(&self, filter: &ClientFilter) -> StoreResult<u64> {
        (**self).count(filter).await
    }
}
