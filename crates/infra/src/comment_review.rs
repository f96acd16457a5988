//! Comment review listing for the admin.
//!
//! Joins stored comments with product titles and storefront customer
//! profiles. One titles lookup covers every distinct product; customers are
//! searched by normalised email in chunks.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use launchdesk_comments::{
    CustomerProfile, ProductComment, customer_search_queries, display_identity, normalize_email,
};
use launchdesk_core::{CommentId, ProductGid};

use crate::comment_store::{CommentStore, CommentStoreError};
use crate::gateway::{CatalogGateway, GatewayError};

pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error(transparent)]
    Store(#[from] CommentStoreError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewedComment {
    pub id: CommentId,
    pub product_id: String,
    pub product_title: String,
    pub name: String,
    pub email: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// All comments, newest first, ready for display.
#[tracing::instrument(skip_all)]
pub async fn review_comments<G, S>(
    gateway: &G,
    store: &S,
) -> Result<Vec<ReviewedComment>, ReviewError>
where
    G: CatalogGateway + ?Sized,
    S: CommentStore + ?Sized,
{
    let comments = store.list_newest_first().await?;
    if comments.is_empty() {
        return Ok(Vec::new());
    }

    let titles = product_titles(gateway, &comments).await?;
    let customers = customers_by_email(gateway, &comments).await?;
    tracing::debug!(
        comments = comments.len(),
        titles = titles.len(),
        customers = customers.len(),
        "comment review assembled"
    );

    Ok(comments
        .into_iter()
        .map(|comment| {
            let customer = customers.get(&normalize_email(&comment.email));
            let identity = display_identity(&comment, customer);
            let product_title = titles
                .get(&comment.product_id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string());
            ReviewedComment {
                id: comment.id,
                product_id: comment.product_id,
                product_title,
                name: identity.name,
                email: identity.email,
                text: comment.text,
                created_at: comment.created_at,
            }
        })
        .collect())
}

/// Titles keyed by the storefront product id stored on the comment.
async fn product_titles<G>(
    gateway: &G,
    comments: &[ProductComment],
) -> Result<HashMap<String, String>, GatewayError>
where
    G: CatalogGateway + ?Sized,
{
    let mut ids: Vec<ProductGid> = Vec::new();
    for comment in comments {
        // Unusable ids simply render as unknown products.
        let Ok(gid) = ProductGid::from_storefront_id(&comment.product_id) else {
            continue;
        };
        if !ids.contains(&gid) {
            ids.push(gid);
        }
    }
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let titles = gateway.product_titles(&ids).await?;
    Ok(titles
        .into_iter()
        .map(|(gid, title)| (gid.legacy_id().to_string(), title))
        .collect())
}

async fn customers_by_email<G>(
    gateway: &G,
    comments: &[ProductComment],
) -> Result<HashMap<String, CustomerProfile>, GatewayError>
where
    G: CatalogGateway + ?Sized,
{
    let mut emails: Vec<String> = Vec::new();
    for comment in comments {
        let email = normalize_email(&comment.email);
        if !email.is_empty() && !emails.contains(&email) {
            emails.push(email);
        }
    }

    let mut customers = HashMap::new();
    for query in customer_search_queries(&emails) {
        for customer in gateway.search_customers(&query).await? {
            customers.insert(normalize_email(&customer.email), customer);
        }
    }
    Ok(customers)
}
