//! Product comments module.
//!
//! Customers leave comments on products from the storefront; staff review and
//! delete them from the admin. This crate holds the comment model and the
//! display rules, with no storage or HTTP concerns.

pub mod comment;
pub mod identity;

pub use comment::{CommentSubmission, MISSING_REQUIRED_FIELDS, NewComment, ProductComment};
pub use identity::{
    CUSTOMER_QUERY_CHUNK, CustomerProfile, DisplayIdentity, customer_search_queries,
    display_identity, normalize_email,
};
