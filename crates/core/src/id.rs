//! Strongly-typed identifiers used across the domain.
//!
//! Catalog identifiers are opaque global ids owned by the commerce platform
//! (`gid://shopify/<Type>/<n>`). They are carried verbatim; the only
//! interpretation this crate performs is promoting a bare storefront id to its
//! global form and extracting the trailing segment back out.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

const GID_SCHEME: &str = "gid://";

/// Global identifier of a catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductGid(String);

/// Global identifier of a storefront customer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerGid(String);

macro_rules! impl_gid_newtype {
    ($t:ty, $name:literal, $resource:literal) => {
        impl $t {
            /// Wrap an identifier as-is (no validation beyond non-blank).
            pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::invalid_id(concat!($name, ": empty")));
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Promote a storefront id (`"123"`) to its global form; global ids
            /// pass through unchanged.
            pub fn from_storefront_id(value: &str) -> Result<Self, DomainError> {
                let trimmed = value.trim();
                if trimmed.starts_with(GID_SCHEME) {
                    return Self::new(trimmed);
                }
                Self::new(format!(concat!("gid://shopify/", $resource, "/{}"), trimmed))
            }

            /// Trailing path segment (the storefront's numeric id).
            pub fn legacy_id(&self) -> &str {
                self.0.rsplit('/').next().unwrap_or(&self.0)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

impl_gid_newtype!(ProductGid, "ProductGid", "Product");
impl_gid_newtype!(CustomerGid, "CustomerGid", "Customer");

/// Identifier of a stored product comment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(Uuid);

impl CommentId {
    /// Create a new identifier.
    ///
    /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
    /// for determinism.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CommentId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for CommentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for CommentId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::from_str(s.trim())
            .map_err(|e| DomainError::invalid_id(format!("CommentId: {e}")))?;
        Ok(Self(uuid))
    }
}
