//! Client record model and the payload types callers supply.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;

use crate::entity::Entity;
use crate::error::AppError;
use crate::id::ClientId;

/// Contact information for a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub phone: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_phone: Option<String>,
}

/// Postal address for a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// A client record as stored and returned by the repository.
///
/// `id` is immutable for the record's lifetime. `created_at` is set once at
/// creation; `updated_at` is refreshed on every successful update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub document_id: String,
    pub active: bool,
    pub contact: Contact,
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Client {
    type Id = ClientId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn default_active() -> bool {
    true
}

/// Create payload. Identifier and timestamps are storage-assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDraft {
    pub name: String,
    pub document_id: String,
    #[serde(default = "default_active")]
    pub active: bool,
    pub contact: Contact,
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ClientDraft {
    /// Structural validation, reported with field-level details.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = FieldErrors::default();
        errors.check_len("name", &self.name, 1, 100);
        errors.check_len("document_id", &self.document_id, 5, 20);
        self.contact.collect_errors(&mut errors);
        self.address.collect_errors(&mut errors);
        errors.into_result()
    }

    /// Materialize a record from this draft at `now`.
    ///
    /// Both timestamps are set from the same instant, so a freshly created
    /// record always has `created_at == updated_at`.
    pub fn into_client(self, id: ClientId, now: DateTime<Utc>) -> Client {
        Client {
            id,
            name: self.name,
            document_id: self.document_id,
            active: self.active,
            contact: self.contact,
            address: self.address,
            notes: self.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update: only supplied fields are applied.
///
/// `notes` is double-optional so a caller can distinguish clearing the notes
/// (`"notes": null`) from leaving them unchanged (field absent).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<Option<String>>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

impl ClientPatch {
    /// True when no field was supplied at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.document_id.is_none()
            && self.active.is_none()
            && self.contact.is_none()
            && self.address.is_none()
            && self.notes.is_none()
    }

    /// Structural validation of the supplied fields only.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = FieldErrors::default();
        if let Some(name) = &self.name {
            errors.check_len("name", name, 1, 100);
        }
        if let Some(document_id) = &self.document_id {
            errors.check_len("document_id", document_id, 5, 20);
        }
        if let Some(contact) = &self.contact {
            contact.collect_errors(&mut errors);
        }
        if let Some(address) = &self.address {
            address.collect_errors(&mut errors);
        }
        errors.into_result()
    }

    /// Apply the supplied fields to `client`, leaving the rest untouched.
    ///
    /// Does not touch `updated_at`; refreshing it is the repository's job.
    pub fn apply_to(&self, client: &mut Client) {
        if let Some(name) = &self.name {
            client.name = name.clone();
        }
        if let Some(document_id) = &self.document_id {
            client.document_id = document_id.clone();
        }
        if let Some(active) = self.active {
            client.active = active;
        }
        if let Some(contact) = &self.contact {
            client.contact = contact.clone();
        }
        if let Some(address) = &self.address {
            client.address = address.clone();
        }
        if let Some(notes) = &self.notes {
            client.notes = notes.clone();
        }
    }
}

impl Contact {
    fn collect_errors(&self, errors: &mut FieldErrors) {
        errors.check_len("contact.phone", &self.phone, 5, 20);
        if !self.email.contains('@') {
            errors.push("contact.email", "must be a valid email address");
        }
        if let Some(alt) = &self.alternate_phone {
            errors.check_len("contact.alternate_phone", alt, 5, 20);
        }
    }
}

impl Address {
    fn collect_errors(&self, errors: &mut FieldErrors) {
        errors.check_len("address.street", &self.street, 1, 100);
        errors.check_len("address.city", &self.city, 1, 50);
        errors.check_len("address.state", &self.state, 1, 50);
        errors.check_len("address.postal_code", &self.postal_code, 1, 20);
        errors.check_len("address.country", &self.country, 1, 50);
    }
}

/// Accumulator for field-level validation errors.
#[derive(Debug, Default)]
struct FieldErrors(Vec<serde_json::Value>);

impl FieldErrors {
    fn push(&mut self, field: &str, msg: &str) {
        self.0.push(json!({ "field": field, "message": msg }));
    }

    fn check_len(&mut self, field: &str, value: &str, min: usize, max: usize) {
        let len = value.trim().chars().count();
        if len < min {
            self.push(field, &format!("must be at least {min} characters"));
        } else if len > max {
            self.push(field, &format!("must be at most {max} characters"));
        }
    }

    fn into_result(self) -> Result<(), AppError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation_with_details(
                "invalid client data",
                serde_json::Value::Array(self.0),
            ))
        }
    }
}
