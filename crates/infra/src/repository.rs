//! Client repository: identifier coding, duplicate pre-checks, timestamp
//! assignment, and translation of storage failures into the application
//! error taxonomy.
//!
//! Every operation returns exactly one of the four `AppError` kinds or
//! succeeds; no storage-engine error crosses this boundary raw.

use chrono::Utc;

use clientdesk_core::{AppError, AppResult, Client, ClientDraft, ClientId, ClientPatch};

use crate::store::{ClientFilter, ClientStore, StoreError};

/// Data access for client records.
///
/// The store handle is a constructor-supplied dependency; the repository
/// never establishes or tears down the connection itself, and serializes
/// nothing — each operation is one or more sequential store calls with no
/// cross-operation atomicity.
#[derive(Debug, Clone)]
pub struct ClientRepository<S> {
    store: S,
}

impl<S: ClientStore> ClientRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Decode an external identifier string.
    ///
    /// Malformed and nonexistent identifiers are indistinguishable to the
    /// caller: both surface as `NotFound`.
    fn decode_id(id: &str) -> AppResult<ClientId> {
        id.parse().map_err(|_| AppError::not_found("client"))
    }

    /// Records matching the filters, newest-updated first.
    ///
    /// Always succeeds (empty vector when nothing matches).
    pub async fn find_all(
        &self,
        skip: u64,
        limit: Option<u64>,
        name: Option<&str>,
        active: Option<bool>,
    ) -> AppResult<Vec<Client>> {
        self.store
            .list(&filter_from(name, active), skip, limit)
            .await
            .map_err(|e| wrap_store_error("listing clients", e))
    }

    /// Find one record by its external identifier string.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Client> {
        let id = Self::decode_id(id)?;
        self.get(id).await
    }

    /// `find_by_id` for an already-decoded identifier.
    pub async fn get(&self, id: ClientId) -> AppResult<Client> {
        self.store
            .find_by_id(id)
            .await
            .map_err(|e| wrap_store_error("finding client", e))?
            .ok_or_else(|| AppError::not_found("client"))
    }

    /// Records whose name contains `name` case-insensitively, ordered by
    /// name ascending.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Vec<Client>> {
        self.store
            .search_name(name)
            .await
            .map_err(|e| wrap_store_error("searching clients by name", e))
    }

    /// Create a record from `draft`.
    ///
    /// An explicit lookup by document identifier runs before the insert so
    /// the caller gets a precise `Duplicate` error; the store's own
    /// uniqueness constraint is the second line of defense and maps to the
    /// same kind. The returned record is re-fetched by identifier so
    /// storage-assigned fields are authoritative.
    pub async fn create(&self, draft: ClientDraft) -> AppResult<Client> {
        let existing = self
            .store
            .find_by_document(&draft.document_id)
            .await
            .map_err(|e| wrap_store_error("checking document id", e))?;
        if existing.is_some() {
            return Err(duplicate_document());
        }

        let client = draft.into_client(ClientId::new(), Utc::now());
        let id = client.id;
        self.store
            .insert(client)
            .await
            .map_err(|e| wrap_store_error("creating client", e))?;

        self.get(id).await
    }

    /// Apply a partial update to the record `id`.
    ///
    /// An empty patch is a caller error. Existence is checked before the
    /// write; the check-then-act window is an accepted race, so a record
    /// deleted in between surfaces as `NotFound` from the zero-row write.
    /// `updated_at` is always refreshed, whatever fields changed.
    pub async fn update(&self, id: &str, patch: ClientPatch) -> AppResult<Client> {
        if patch.is_empty() {
            return Err(AppError::validation(
                "at least one field must be provided for update",
            ));
        }
        let id = Self::decode_id(id)?;

        self.get(id).await?;

        let matched = self
            .store
            .apply_patch(id, &patch, Utc::now())
            .await
            .map_err(|e| wrap_store_error("updating client", e))?;
        if !matched {
            return Err(AppError::not_found("client"));
        }

        self.get(id).await
    }

    /// Hard-delete the record `id`.
    ///
    /// Not retry-safe: a second call on an already-deleted identifier fails
    /// with `NotFound`.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let id = Self::decode_id(id)?;
        self.get(id).await?;

        let deleted = self
            .store
            .delete(id)
            .await
            .map_err(|e| wrap_store_error("deleting client", e))?;
        if !deleted {
            return Err(AppError::not_found("client"));
        }
        Ok(true)
    }

    /// Count records matching the filters (same semantics as `find_all`,
    /// no pagination).
    pub async fn count(&self, name: Option<&str>, active: Option<bool>) -> AppResult<u64> {
        self.store
            .count(&filter_from(name, active))
            .await
            .map_err(|e| wrap_store_error("counting clients", e))
    }
}

fn filter_from(name: Option<&str>, active: Option<bool>) -> ClientFilter {
    ClientFilter {
        // An empty name filter means "no filter".
        name: name.map(str::to_string).filter(|n| !n.is_empty()),
        active,
    }
}

fn duplicate_document() -> AppError {
    AppError::duplicate("a client with this document id already exists")
}

fn wrap_store_error(operation: &str, err: StoreError) -> AppError {
    match err {
        StoreError::DuplicateKey(_) => duplicate_document(),
        StoreError::Backend(msg) => AppError::database(format!("{operation}: {msg}")),
    }
}
