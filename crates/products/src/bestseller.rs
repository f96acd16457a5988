//! Best-seller ranking.

use serde::{Deserialize, Serialize};

use launchdesk_core::ProductGid;

use crate::catalog::{CatalogProduct, ProductImage};

/// Only products carrying this tag are ranked.
pub const TRACK_BESTSELLERS_TAG: &str = "track-bestsellers";

/// Metafield holding the ranking score.
pub const BESTSELLER_SCORE_KEY: &str = "bestseller_score";

pub const BESTSELLER_LIMIT: usize = 10;

pub const LOW_STOCK_THRESHOLD: i64 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn for_rank(rank: usize) -> Option<Self> {
        match rank {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestsellerEntry {
    pub rank: usize,
    pub medal: Option<Medal>,
    pub id: ProductGid,
    pub title: String,
    pub score: f64,
    pub total_inventory: i64,
    pub low_stock: bool,
    pub image: Option<ProductImage>,
}

/// Score from the product's metafield; missing or unparsable reads as zero.
pub fn bestseller_score(product: &CatalogProduct) -> f64 {
    product
        .metafield(BESTSELLER_SCORE_KEY)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Top tracked products by score, highest first. Ties keep listing order.
pub fn rank_bestsellers(products: &[CatalogProduct]) -> Vec<BestsellerEntry> {
    let mut tracked: Vec<(&CatalogProduct, f64)> = products
        .iter()
        .filter(|p| p.has_tag(TRACK_BESTSELLERS_TAG))
        .map(|p| (p, bestseller_score(p)))
        .collect();

    tracked.sort_by(|a, b| b.1.total_cmp(&a.1));

    tracked
        .into_iter()
        .take(BESTSELLER_LIMIT)
        .enumerate()
        .map(|(idx, (product, score))| {
            let rank = idx + 1;
            let total_inventory = product.total_inventory.unwrap_or(0);
            BestsellerEntry {
                rank,
                medal: Medal::for_rank(rank),
                id: product.id.clone(),
                title: product.title.clone(),
                score,
                total_inventory,
                low_stock: total_inventory < LOW_STOCK_THRESHOLD,
                image: product.featured_image.clone(),
            }
        })
        .collect()
}

/// Manually curated display position for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestsellerPosition {
    pub product_id: ProductGid,
    pub position: u32,
}
