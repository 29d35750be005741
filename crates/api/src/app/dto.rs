use serde::Deserialize;

use clientdesk_core::Client;

// -------------------------
// Request DTOs
// -------------------------
//
// Create/update bodies deserialize straight into the core payload types
// (`ClientDraft` / `ClientPatch`); only query strings need their own shapes.

fn default_limit() -> Option<u64> {
    Some(100)
}

#[derive(Debug, Deserialize)]
pub struct ListClientsQuery {
    #[serde(default)]
    pub skip: u64,
    /// Page bound; callers cannot unset it over HTTP.
    #[serde(default = "default_limit")]
    pub limit: Option<u64>,
    pub name: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CountClientsQuery {
    pub name: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SearchClientsQuery {
    pub name: String,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn client_to_json(client: &Client) -> serde_json::Value {
    serde_json::json!({
        "id": client.id.to_string(),
        "name": client.name,
        "document_id": client.document_id,
        "active": client.active,
        "contact": {
            "phone": client.contact.phone,
            "email": client.contact.email,
            "alternate_phone": client.contact.alternate_phone,
        },
        "address": {
            "street": client.address.street,
            "city": client.address.city,
            "state": client.address.state,
            "postal_code": client.address.postal_code,
            "country": client.address.country,
        },
        "notes": client.notes,
        "created_at": client.created_at.to_rfc3339(),
        "updated_at": client.updated_at.to_rfc3339(),
    })
}
