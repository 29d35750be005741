//! In-memory client store for dev/test.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use clientdesk_core::{Client, ClientId, ClientPatch};

use super::{ClientFilter, ClientStore, StoreError, StoreResult};

/// In-memory store backed by a `RwLock<HashMap>`.
///
/// Enforces the same document-identifier uniqueness the Postgres schema
/// enforces with a unique index, so the repository sees identical failure
/// modes against either backend.
#[derive(Debug, Default)]
pub struct InMemoryClientStore {
    inner: RwLock<HashMap<ClientId, Client>>,
}

impl InMemoryClientStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("store lock poisoned".to_string())
}

#[async_trait]
impl ClientStore for InMemoryClientStore {
    async fn insert(&self, client: Client) -> StoreResult<()> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        if map.values().any(|c| c.document_id == client.document_id) {
            return Err(StoreError::DuplicateKey(format!(
                "document_id {:?} already exists",
                client.document_id
            )));
        }
        map.insert(client.id, client);
        Ok(())
    }

    async fn find_by_id(&self, id: ClientId) -> StoreResult<Option<Client>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(&id).cloned())
    }

    async fn find_by_document(&self, document_id: &str) -> StoreResult<Option<Client>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().find(|c| c.document_id == document_id).cloned())
    }

    async fn list(
        &self,
        filter: &ClientFilter,
        skip: u64,
        limit: Option<u64>,
    ) -> StoreResult<Vec<Client>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        let mut matched: Vec<Client> = map.values().filter(|c| filter.matches(c)).cloned().collect();
        matched.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        let iter = matched.into_iter().skip(skip as usize);
        Ok(match limit {
            Some(limit) => iter.take(limit as usize).collect(),
            None => iter.collect(),
        })
    }

    async fn search_name(&self, name: &str) -> StoreResult<Vec<Client>> {
        let needle = name.to_lowercase();
        let map = self.inner.read().map_err(|_| poisoned())?;
        let mut matched: Vec<Client> = map
            .values()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        matched.sort_by_key(|c| c.name.to_lowercase());
        Ok(matched)
    }

    async fn apply_patch(
        &self,
        id: ClientId,
        patch: &ClientPatch,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;

        // Uniqueness is enforced here too: a patch moving document_id onto
        // an existing record fails like the unique index would.
        if let Some(document_id) = &patch.document_id {
            if map
                .values()
                .any(|c| c.id != id && &c.document_id == document_id)
            {
                return Err(StoreError::DuplicateKey(format!(
                    "document_id {document_id:?} already exists"
                )));
            }
        }

        match map.get_mut(&id) {
            Some(client) => {
                patch.apply_to(client);
                client.updated_at = updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: ClientId) -> StoreResult<bool> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        Ok(map.remove(&id).is_some())
    }

    async fn count(&self, filter: &ClientFilter) -> StoreResult<u64> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().filter(|c| filter.matches(c)).count() as u64)
    }
}
