//! Launch board: the launch manager's product listing.
//!
//! Products are grouped by derived launch state (pre-order, coming-soon, then
//! everything else) and each card carries the date field and actions that
//! apply to its state.

use serde::Serialize;

use launchdesk_core::ProductGid;

use crate::catalog::{CatalogProduct, ProductImage};
use crate::launch::{LaunchAction, LaunchState};
use crate::launch_date::LaunchDateField;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardAction {
    pub action_type: LaunchAction,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardDateField {
    pub key: &'static str,
    pub label: &'static str,
    pub is_pre_order: bool,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchCard {
    pub id: ProductGid,
    pub title: String,
    pub state: LaunchState,
    pub image: Option<ProductImage>,
    pub date_field: Option<BoardDateField>,
    pub actions: Vec<BoardAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardGroup {
    pub key: &'static str,
    pub heading: &'static str,
    pub products: Vec<LaunchCard>,
}

/// Collapse runs of whitespace and capitalise the first letter of each word.
pub fn display_title(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl LaunchCard {
    pub fn from_product(product: &CatalogProduct) -> Self {
        let state = product.launch_state();
        let date_field = LaunchDateField::for_state(state).map(|field| BoardDateField {
            key: field.key(),
            label: field.label(),
            is_pre_order: state == LaunchState::PreOrder,
            value: product.metafield(field.key()).unwrap_or_default().to_string(),
        });

        Self {
            id: product.id.clone(),
            title: display_title(&product.title),
            state,
            image: product.featured_image.clone(),
            date_field,
            actions: state
                .available_actions()
                .iter()
                .map(|a| BoardAction {
                    action_type: *a,
                    label: a.label(),
                })
                .collect(),
        }
    }
}

/// Build the board from a listing, keeping only titles matching `search`
/// (case-insensitive substring). Empty groups are omitted.
pub fn build_board(products: &[CatalogProduct], search: Option<&str>) -> Vec<BoardGroup> {
    let needle = search.map(str::to_lowercase).unwrap_or_default();

    let mut pre_order = Vec::new();
    let mut coming_soon = Vec::new();
    let mut other = Vec::new();

    for product in products
        .iter()
        .filter(|p| p.title.to_lowercase().contains(&needle))
    {
        let card = LaunchCard::from_product(product);
        match card.state {
            LaunchState::PreOrder => pre_order.push(card),
            LaunchState::ComingSoon => coming_soon.push(card),
            LaunchState::NowShipping => other.push(card),
        }
    }

    [
        ("pre-order", "Pre Order", pre_order),
        ("coming-soon", "Coming Soon", coming_soon),
        ("other", "Other Products", other),
    ]
    .into_iter()
    .filter(|(_, _, products)| !products.is_empty())
    .map(|(key, heading, products)| BoardGroup {
        key,
        heading,
        products,
    })
    .collect()
}
