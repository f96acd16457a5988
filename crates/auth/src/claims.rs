use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Allowed clock skew between the embedding admin and this service.
pub const CLOCK_SKEW_SECS: i64 = 5;

/// Session token claims (transport-agnostic).
///
/// Times are unix seconds, as issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Issuer: `https://<shop>/admin`.
    pub iss: String,

    /// Destination shop: `https://<shop>`.
    pub dest: String,

    /// Audience: the app's API key.
    pub aud: String,

    /// Staff user id.
    #[serde(default)]
    pub sub: Option<String>,

    pub exp: i64,
    pub nbf: i64,
    pub iat: i64,

    #[serde(default)]
    pub jti: Option<String>,

    #[serde(default)]
    pub sid: Option<String>,
}

/// Authenticated shop context for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopSession {
    pub shop: String,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionTokenError {
    #[error("token could not be decoded: {0}")]
    Malformed(String),

    #[error("token has expired")]
    Expired,

    #[error("token not yet valid")]
    NotYetValid,

    #[error("invalid token time window (exp <= nbf)")]
    InvalidTimeWindow,

    #[error("token issued for another shop: {0}")]
    ShopMismatch(String),

    #[error("token issuer does not match its destination")]
    IssuerMismatch,
}

fn shop_domain(dest: &str) -> &str {
    dest.strip_prefix("https://")
        .unwrap_or(dest)
        .trim_end_matches('/')
}

/// Deterministically validate session claims for `expected_shop`.
///
/// Note: signature verification and decoding happen in the validator; this
/// checks the decoded claims only.
pub fn validate_claims(
    claims: &SessionClaims,
    expected_shop: &str,
    now: DateTime<Utc>,
) -> Result<ShopSession, SessionTokenError> {
    if claims.exp <= claims.nbf {
        return Err(SessionTokenError::InvalidTimeWindow);
    }
    let now = now.timestamp();
    if now + CLOCK_SKEW_SECS < claims.nbf {
        return Err(SessionTokenError::NotYetValid);
    }
    if now - CLOCK_SKEW_SECS >= claims.exp {
        return Err(SessionTokenError::Expired);
    }

    let shop = shop_domain(&claims.dest);
    if !shop.eq_ignore_ascii_case(expected_shop) {
        return Err(SessionTokenError::ShopMismatch(shop.to_string()));
    }
    if shop_domain(claims.iss.trim_end_matches("/admin")) != shop {
        return Err(SessionTokenError::IssuerMismatch);
    }

    Ok(ShopSession {
        shop: shop.to_string(),
        user_id: claims.sub.clone(),
        session_id: claims.sid.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SHOP: &str = "smitten.myshopify.com";

    fn claims(nbf: i64, exp: i64) -> SessionClaims {
        SessionClaims {
            iss: format!("https://{SHOP}/admin"),
            dest: format!("https://{SHOP}"),
            aud: "api-key".to_string(),
            sub: Some("42".to_string()),
            exp,
            nbf,
            iat: nbf,
            jti: None,
            sid: Some("s1".to_string()),
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn valid_claims_yield_shop_session() {
        let session = validate_claims(&claims(1_000, 1_060), SHOP, at(1_010)).unwrap();
        assert_eq!(session.shop, SHOP);
        assert_eq!(session.user_id.as_deref(), Some("42"));
        assert_eq!(session.session_id.as_deref(), Some("s1"));
    }

    #[test]
    fn time_window_is_enforced() {
        assert_eq!(
            validate_claims(&claims(1_000, 1_060), SHOP, at(1_100)),
            Err(SessionTokenError::Expired)
        );
        assert_eq!(
            validate_claims(&claims(1_000, 1_060), SHOP, at(900)),
            Err(SessionTokenError::NotYetValid)
        );
        assert_eq!(
            validate_claims(&claims(1_060, 1_000), SHOP, at(1_010)),
            Err(SessionTokenError::InvalidTimeWindow)
        );
    }

    #[test]
    fn small_clock_skew_is_tolerated() {
        assert!(validate_claims(&claims(1_000, 1_060), SHOP, at(998)).is_ok());
    }

    #[test]
    fn other_shops_are_rejected() {
        let mut c = claims(1_000, 1_060);
        c.dest = "https://other.myshopify.com".to_string();
        assert_eq!(
            validate_claims(&c, SHOP, at(1_010)),
            Err(SessionTokenError::ShopMismatch("other.myshopify.com".to_string()))
        );
    }

    #[test]
    fn issuer_must_match_destination() {
        let mut c = claims(1_000, 1_060);
        c.iss = "https://evil.example/admin".to_string();
        assert_eq!(
            validate_claims(&c, SHOP, at(1_010)),
            Err(SessionTokenError::IssuerMismatch)
        );
    }
}
