//! `launchdesk-core`: shared building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;

pub use error::DomainError;
pub use id::{CommentId, CustomerGid, ProductGid};
