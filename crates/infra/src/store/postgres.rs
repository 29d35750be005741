//! Postgres-backed client store.
//!
//! The expected table is documented in `schema.sql` (one row per client,
//! contact and address blocks flattened into columns, a unique index on
//! `document_id`).
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `StoreError` as follows:
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError | Scenario |
//! |------------|----------------------|------------|----------|
//! | Database (unique violation) | `23505` | `DuplicateKey` | document_id already taken |
//! | Database (other) | Any other | `Backend` | Other database errors |
//! | Other | N/A | `Backend` | Network errors, pool closed, etc. |
//!
//! ## Thread Safety
//!
//! Uses the SQLx connection pool, which is thread-safe (Arc + Send + Sync);
//! the store itself serializes nothing.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use clientdesk_core::{Address, Client, ClientId, ClientPatch, Contact};

use super::{ClientFilter, ClientStore, StoreError, StoreResult};

const SELECT_COLUMNS: &str = "\
    id, name, document_id, active, \
    phone, email, alternate_phone, \
    street, city, state, postal_code, country, \
    notes, created_at, updated_at";

/// Postgres-backed client store over a shared connection pool.
#[derive(Debug, Clone)]
pub struct PostgresClientStore {
    pool: Arc<PgPool>,
}

impl PostgresClientStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl ClientStore for PostgresClientStore {
    #[instrument(skip(self, client), fields(id = %client.id), err)]
    async fn insert(&self, client: Client) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO clients (
                id, name, document_id, active,
                phone, email, alternate_phone,
                street, city, state, postal_code, country,
                notes, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(client.id.as_uuid())
        .bind(&client.name)
        .bind(&client.document_id)
        .bind(client.active)
        .bind(&client.contact.phone)
        .bind(&client.contact.email)
        .bind(&client.contact.alternate_phone)
        .bind(&client.address.street)
        .bind(&client.address.city)
        .bind(&client.address.state)
        .bind(&client.address.postal_code)
        .bind(&client.address.country)
        .bind(&client.notes)
        .bind(client.created_at)
        .bind(client.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;

        Ok(())
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn find_by_id(&self, id: ClientId) -> StoreResult<Option<Client>> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM clients WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.map(|r| client_from_row(&r)).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_by_document(&self, document_id: &str) -> StoreResult<Option<Client>> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM clients WHERE document_id = $1"
        ))
        .bind(document_id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_document", e))?;

        row.map(|r| client_from_row(&r)).transpose()
    }

    #[instrument(skip(self, filter), err)]
    async fn list(
        &self,
        filter: &ClientFilter,
        skip: u64,
        limit: Option<u64>,
    ) -> StoreResult<Vec<Client>> {
        // LIMIT NULL means "no bound" in Postgres, which matches limit: None.
        let rows = sqlx::query(&format!(
            r#"
            SELECT {SELECT_COLUMNS}
            FROM clients
            WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
              AND ($2::boolean IS NULL OR active = $2)
            ORDER BY updated_at DESC
            OFFSET $3 LIMIT $4
            "#
        ))
        .bind(&filter.name)
        .bind(filter.active)
        .bind(skip as i64)
        .bind(limit.map(|l| l as i64))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list", e))?;

        rows.iter().map(client_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn search_name(&self, name: &str) -> StoreResult<Vec<Client>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {SELECT_COLUMNS}
            FROM clients
            WHERE name ILIKE '%' || $1 || '%'
            ORDER BY lower(name) ASC
            "#
        ))
        .bind(name)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("search_name", e))?;

        rows.iter().map(client_from_row).collect()
    }

    #[instrument(skip(self, patch), fields(id = %id), err)]
    async fn apply_patch(
        &self,
        id: ClientId,
        patch: &ClientPatch,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        // Contact, address and notes are supplied (or not) as whole blocks;
        // a boolean flag per block keeps the statement static.
        let contact = patch.contact.as_ref();
        let address = patch.address.as_ref();
        let notes = patch.notes.as_ref();

        let result = sqlx::query(
            r#"
            UPDATE clients SET
                name            = COALESCE($2::text, name),
                document_id     = COALESCE($3::text, document_id),
                active          = COALESCE($4::boolean, active),
                phone           = CASE WHEN $5::boolean THEN $6::text ELSE phone END,
                email           = CASE WHEN $5::boolean THEN $7::text ELSE email END,
                alternate_phone = CASE WHEN $5::boolean THEN $8::text ELSE alternate_phone END,
                street          = CASE WHEN $9::boolean THEN $10::text ELSE street END,
                city            = CASE WHEN $9::boolean THEN $11::text ELSE city END,
                state           = CASE WHEN $9::boolean THEN $12::text ELSE state END,
                postal_code     = CASE WHEN $9::boolean THEN $13::text ELSE postal_code END,
                country         = CASE WHEN $9::boolean THEN $14::text ELSE country END,
                notes           = CASE WHEN $15::boolean THEN $16::text ELSE notes END,
                updated_at      = $17
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(&patch.name)
        .bind(&patch.document_id)
        .bind(patch.active)
        .bind(contact.is_some())
        .bind(contact.map(|c| c.phone.clone()))
        .bind(contact.map(|c| c.email.clone()))
        .bind(contact.and_then(|c| c.alternate_phone.clone()))
        .bind(address.is_some())
        .bind(address.map(|a| a.street.clone()))
        .bind(address.map(|a| a.city.clone()))
        .bind(address.map(|a| a.state.clone()))
        .bind(address.map(|a| a.postal_code.clone()))
        .bind(address.map(|a| a.country.clone()))
        .bind(notes.is_some())
        .bind(notes.cloned().flatten())
        .bind(updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("apply_patch", e))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn delete(&self, id: ClientId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, filter), err)]
    async fn count(&self, filter: &ClientFilter) -> StoreResult<u64> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS total
            FROM clients
            WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
              AND ($2::boolean IS NULL OR active = $2)
            "#,
        )
        .bind(&filter.name)
        .bind(filter.active)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("count", e))?;

        let total: i64 = row
            .try_get("total")
            .map_err(|e| StoreError::Backend(format!("failed to read count: {e}")))?;
        Ok(total as u64)
    }
}

fn client_from_row(row: &PgRow) -> StoreResult<Client> {
    let read = |e: sqlx::Error| StoreError::Backend(format!("failed to read client row: {e}"));

    Ok(Client {
        id: ClientId::from_uuid(row.try_get::<uuid::Uuid, _>("id").map_err(read)?),
        name: row.try_get("name").map_err(read)?,
        document_id: row.try_get("document_id").map_err(read)?,
        active: row.try_get("active").map_err(read)?,
        contact: Contact {
            phone: row.try_get("phone").map_err(read)?,
            email: row.try_get("email").map_err(read)?,
            alternate_phone: row.try_get("alternate_phone").map_err(read)?,
        },
        address: Address {
            street: row.try_get("street").map_err(read)?,
            city: row.try_get("city").map_err(read)?,
            state: row.try_get("state").map_err(read)?,
            postal_code: row.try_get("postal_code").map_err(read)?,
            country: row.try_get("country").map_err(read)?,
        },
        notes: row.try_get("notes").map_err(read)?,
        created_at: row.try_get("created_at").map_err(read)?,
        updated_at: row.try_get("updated_at").map_err(read)?,
    })
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            if db_err.code().as_deref() == Some("23505") {
                StoreError::DuplicateKey(msg)
            } else {
                StoreError::Backend(msg)
            }
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}
