//! HS256 token validation behind a trait, so the HTTP layer can hold an
//! `Arc<dyn JwtValidator>` without caring about the algorithm.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use thiserror::Error;

use crate::claims::{JwtClaims, TokenValidationError, validate_claims};

#[derive(Debug, Error)]
pub enum JwtError {
    /// The token could not be decoded or its signature did not verify.
    #[error("token rejected: {0}")]
    Decode(#[from] jsonwebtoken::errors::Error),

    /// The token decoded fine but its claims are outside their time window.
    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// Verifies a bearer token and returns its claims.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, JwtError>;
}

/// HMAC-SHA256 validator over a shared secret.
pub struct Hs256JwtValidator {
    key: DecodingKey,
}

impl Hs256JwtValidator {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_ref()),
        }
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, JwtError> {
        // The time window lives in our own claims (RFC3339 timestamps), so
        // the library's numeric `exp` handling is switched off and
        // `validate_claims` is the single source of truth.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.key, &validation)?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PrincipalId, Role};
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header};

    fn mint(secret: &str, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> String {
        let claims = JwtClaims {
            sub: PrincipalId::new(),
            roles: vec![Role::new("admin")],
            issued_at,
            expires_at,
        };
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("failed to encode jwt")
    }

    #[test]
    fn round_trips_claims_minted_with_the_same_secret() {
        let now = Utc::now();
        let token = mint("test-secret", now, now + Duration::minutes(10));

        let validator = Hs256JwtValidator::new("test-secret");
        let claims = validator.validate(&token, now).unwrap();
        assert_eq!(claims.roles, vec![Role::new("admin")]);
    }

    #[test]
    fn rejects_a_token_signed_with_a_different_secret() {
        let now = Utc::now();
        let token = mint("other-secret", now, now + Duration::minutes(10));

        let validator = Hs256JwtValidator::new("test-secret");
        assert!(matches!(
            validator.validate(&token, now),
            Err(JwtError::Decode(_))
        ));
    }

    #[test]
    fn rejects_an_expired_token() {
        let now = Utc::now();
        let token = mint(
            "test-secret",
            now - Duration::minutes(20),
            now - Duration::minutes(10),
        );

        let validator = Hs256JwtValidator::new("test-secret");
        assert!(matches!(
            validator.validate(&token, now),
            Err(JwtError::Claims(TokenValidationError::Expired))
        ));
    }
}
