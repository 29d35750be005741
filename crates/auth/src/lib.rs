//! `clientdesk-auth` — authentication boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it models
//! token claims and validates them, nothing more. Token issuance lives with
//! whatever identity provider signs the tokens.

pub mod claims;
pub mod jwt;
pub mod principal;
pub mod roles;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtError, JwtValidator};
pub use principal::PrincipalId;
pub use roles::Role;
