//! Product comment storage.
//!
//! Comments are the only data this service owns. Postgres is used when a
//! database is configured; otherwise comments live in process memory.

use thiserror::Error;

use launchdesk_comments::{NewComment, ProductComment};
use launchdesk_core::CommentId;

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryCommentStore;
pub use postgres::PostgresCommentStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommentStoreError {
    #[error("storage error in {operation}: {message}")]
    Storage {
        operation: &'static str,
        message: String,
    },

    /// A stored row could not be turned back into a comment.
    #[error("corrupt comment row: {0}")]
    Corrupt(String),
}

#[async_trait::async_trait]
pub trait CommentStore: Send + Sync {
    /// Store a validated comment, assigning its id and timestamp.
    async fn create(&self, comment: NewComment) -> Result<ProductComment, CommentStoreError>;

    async fn list_newest_first(&self) -> Result<Vec<ProductComment>, CommentStoreError>;

    /// Delete by id. Returns `false` when no such comment existed.
    async fn delete(&self, id: CommentId) -> Result<bool, CommentStoreError>;
}

#[async_trait::async_trait]
impl<S> CommentStore for std::sync::Arc<S>
where
    S: CommentStore + ?Sized,
{
    async fn create(&self, comment: NewComment) -> Result<ProductComment, CommentStoreError> {
        (**self).create(comment).await
    }

    async fn list_newest_first(&self) -> Result<Vec<ProductComment>, CommentStoreError> {
        (**self).list_newest_first().await
    }

    async fn delete(&self, id: CommentId) -> Result<bool, CommentStoreError> {
        (**self).delete(id).await
    }
}
