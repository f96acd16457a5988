//! Read-only product listing as returned by the remote catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use launchdesk_core::ProductGid;

use crate::launch::LaunchState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
    pub alt_text: Option<String>,
}

/// One product from a catalog listing, with its `custom` metafields flattened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: ProductGid,
    pub title: String,
    pub tags: Vec<String>,
    pub total_inventory: Option<i64>,
    pub featured_image: Option<ProductImage>,
    pub metafields: BTreeMap<String, String>,
}

impl CatalogProduct {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn launch_state(&self) -> LaunchState {
        LaunchState::from_tags(&self.tags)
    }

    pub fn metafield(&self, key: &str) -> Option<&str> {
        self.metafields.get(key).map(String::as_str)
    }
}
