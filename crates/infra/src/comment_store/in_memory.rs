use std::sync::RwLock;

use chrono::Utc;

use launchdesk_comments::{NewComment, ProductComment};
use launchdesk_core::CommentId;

use super::{CommentStore, CommentStoreError};

/// In-memory comment store.
///
/// Intended for tests/dev. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryCommentStore {
    comments: RwLock<Vec<ProductComment>>,
}

impl InMemoryCommentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(operation: &'static str) -> CommentStoreError {
    CommentStoreError::Storage {
        operation,
        message: "lock poisoned".to_string(),
    }
}

#[async_trait::async_trait]
impl CommentStore for InMemoryCommentStore {
    async fn create(&self, comment: NewComment) -> Result<ProductComment, CommentStoreError> {
        let stored = comment.into_comment(CommentId::new(), Utc::now());
        self.comments
            .write()
            .map_err(|_| poisoned("create"))?
            .push(stored.clone());
        Ok(stored)
    }

    async fn list_newest_first(&self) -> Result<Vec<ProductComment>, CommentStoreError> {
        let mut comments: Vec<_> = self
            .comments
            .read()
            .map_err(|_| poisoned("list"))?
            .iter()
            .rev()
            .cloned()
            .collect();
        // Stable: equal timestamps keep reverse insertion order.
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }

    async fn delete(&self, id: CommentId) -> Result<bool, CommentStoreError> {
        let mut comments = self.comments.write().map_err(|_| poisoned("delete"))?;
        let before = comments.len();
        comments.retain(|c| c.id != id);
        Ok(comments.len() != before)
    }
}
