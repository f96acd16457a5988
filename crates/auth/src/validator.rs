use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use crate::claims::{SessionClaims, SessionTokenError, ShopSession, validate_claims};

/// Verifies a raw bearer token and resolves the shop it was issued for.
pub trait SessionTokenValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<ShopSession, SessionTokenError>;
}

/// HS256 session tokens signed with the app's API secret.
pub struct Hs256SessionValidator {
    key: DecodingKey,
    validation: Validation,
    shop: String,
}

impl Hs256SessionValidator {
    pub fn new(api_secret: &[u8], api_key: &str, shop: impl Into<String>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[api_key]);
        validation.set_required_spec_claims(&["exp", "nbf", "aud"]);
        // Time window is checked in `validate_claims` against the caller's clock.
        validation.validate_exp = false;
        validation.validate_nbf = false;

        Self {
            key: DecodingKey::from_secret(api_secret),
            validation,
            shop: shop.into(),
        }
    }
}

impl SessionTokenValidator for Hs256SessionValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<ShopSession, SessionTokenError> {
        let data = decode::<SessionClaims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "session token rejected");
            SessionTokenError::Malformed(e.to_string())
        })?;
        validate_claims(&data.claims, &self.shop, now)
    }
}
