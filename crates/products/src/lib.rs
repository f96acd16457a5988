//! Products domain module.
//!
//! Launch-state rules, launch date fields and the read-side shaping of catalog
//! listings, implemented as deterministic logic (no IO, no HTTP, no storage).

pub mod bestseller;
pub mod board;
pub mod catalog;
pub mod launch;
pub mod launch_date;
pub mod request;

pub use bestseller::{BestsellerEntry, BestsellerPosition, Medal, rank_bestsellers};
pub use board::{BoardGroup, LaunchCard, build_board, display_title};
pub use catalog::{CatalogProduct, ProductImage};
pub use launch::{COMING_SOON_TAG, LaunchAction, LaunchState, PRE_ORDER_TAG, TagDelta, resolve};
pub use launch_date::{CANNOT_CLEAR_DATE, LaunchDate, LaunchDateField};
pub use request::{DateChange, LaunchSubmission, MISSING_PRODUCT_OR_CHANGE, TransitionRequest};
