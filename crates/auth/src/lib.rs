//! `launchdesk-auth`: admin session boundary.
//!
//! The embedding admin hands every request a short-lived session token signed
//! with the app's API secret. This crate verifies the token and derives the
//! shop the request acts for. It is intentionally decoupled from HTTP.

pub mod claims;
pub mod validator;

pub use claims::{SessionClaims, SessionTokenError, ShopSession, validate_claims};
pub use validator::{Hs256SessionValidator, SessionTokenValidator};
