//! Remote catalog gateway.
//!
//! The commerce platform owns products, tags, metafields and customers. Every
//! call through this trait is atomic on its own; no sequence of calls is.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use launchdesk_comments::CustomerProfile;
use launchdesk_core::ProductGid;
use launchdesk_products::CatalogProduct;

pub mod in_memory;
pub mod shopify;

pub use in_memory::{GatewayCall, GatewayOperation, InMemoryCatalog};
pub use shopify::ShopifyAdminGateway;

/// Page size used by catalog listings.
pub const PRODUCT_PAGE_SIZE: usize = 100;

/// Field-level error reported by a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserError {
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

fn join_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(|e| match &e.field {
            Some(field) if !field.is_empty() => format!("{}: {}", field.join("."), e.message),
            _ => e.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The request never produced a response (connect, timeout, TLS).
    #[error("transport error: {0}")]
    Transport(String),

    /// The API answered with a non-success HTTP status.
    #[error("catalog API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Top-level GraphQL errors (query rejected, throttled, ...).
    #[error("catalog API error: {0}")]
    Graphql(String),

    /// A mutation ran but reported field-level errors.
    #[error("{}", join_user_errors(.0))]
    UserErrors(Vec<UserError>),

    #[error("product not found: {0}")]
    NotFound(String),

    /// The response did not have the expected shape.
    #[error("unexpected catalog response: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn user_errors(&self) -> &[UserError] {
        match self {
            GatewayError::UserErrors(errors) => errors,
            _ => &[],
        }
    }
}

/// One metafield write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetafieldInput {
    pub owner_id: ProductGid,
    pub namespace: String,
    pub key: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[async_trait::async_trait]
pub trait CatalogGateway: Send + Sync {
    /// Current tags of one product.
    async fn product_tags(&self, id: &ProductGid) -> Result<Vec<String>, GatewayError>;

    /// Replace a product's full tag list.
    async fn update_product_tags(
        &self,
        id: &ProductGid,
        tags: &[String],
    ) -> Result<(), GatewayError>;

    /// Set (create or replace) one metafield.
    async fn set_metafield(&self, input: &MetafieldInput) -> Result<(), GatewayError>;

    /// First `first` products with their `custom` metafields.
    async fn list_products(&self, first: usize) -> Result<Vec<CatalogProduct>, GatewayError>;

    /// Titles by product id. Ids that do not resolve to a product are absent.
    async fn product_titles(
        &self,
        ids: &[ProductGid],
    ) -> Result<HashMap<ProductGid, String>, GatewayError>;

    /// Customers matching a search query such as `(email:a OR email:b)`.
    async fn search_customers(&self, query: &str) -> Result<Vec<CustomerProfile>, GatewayError>;
}

#[async_trait::async_trait]
impl<G> CatalogGateway for Arc<G>
where
    G: CatalogGateway + ?Sized,
{
    async fn product_tags(&self, id: &ProductGid) -> Result<Vec<String>, GatewayError> {
        (**self).product_tags(id).await
    }

    async fn update_product_tags(
        &self,
        id: &ProductGid,
        tags: &[String],
    ) -> Result<(), GatewayError> {
        (**self).update_product_tags(id, tags).await
    }

    async fn set_metafield(&self, input: &MetafieldInput) -> Result<(), GatewayError> {
        (**self).set_metafield(input).await
    }

    async fn list_products(&self, first: usize) -> Result<Vec<CatalogProduct>, GatewayError> {
        (**self).list_products(first).await
    }

    async fn product_titles(
        &self,
        ids: &[ProductGid],
    ) -> Result<HashMap<ProductGid, String>, GatewayError> {
        (**self).product_titles(ids).await
    }

    async fn search_customers(&self, query: &str) -> Result<Vec<CustomerProfile>, GatewayError> {
        (**self).search_customers(query).await
    }
}
