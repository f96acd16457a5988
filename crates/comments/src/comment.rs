use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use launchdesk_core::{CommentId, CustomerGid, DomainError};

pub const MISSING_REQUIRED_FIELDS: &str = "Missing required fields";

/// A stored product comment.
///
/// `product_id` is the storefront's numeric product id, as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductComment {
    pub id: CommentId,
    pub product_id: String,
    pub email: String,
    pub text: String,
    pub name: String,
    pub customer_id: Option<CustomerGid>,
    pub created_at: DateTime<Utc>,
}

/// Raw storefront form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSubmission {
    pub product_id: Option<String>,
    pub email: Option<String>,
    pub text: Option<String>,
    pub name: Option<String>,
    pub customer_id: Option<String>,
}

/// A validated comment, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub product_id: String,
    pub email: String,
    pub text: String,
    pub name: String,
    pub customer_id: Option<CustomerGid>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl NewComment {
    pub fn from_submission(submission: CommentSubmission) -> Result<Self, DomainError> {
        let customer_id = match non_empty(submission.customer_id) {
            Some(raw) => Some(CustomerGid::from_storefront_id(&raw)?),
            None => None,
        };

        let (Some(product_id), Some(email), Some(text)) = (
            non_empty(submission.product_id),
            non_empty(submission.email),
            non_empty(submission.text),
        ) else {
            return Err(DomainError::validation(MISSING_REQUIRED_FIELDS));
        };

        Ok(Self {
            product_id,
            email,
            text,
            name: submission.name.unwrap_or_default(),
            customer_id,
        })
    }

    pub fn into_comment(self, id: CommentId, created_at: DateTime<Utc>) -> ProductComment {
        ProductComment {
            id,
            product_id: self.product_id,
            email: self.email,
            text: self.text,
            name: self.name,
            customer_id: self.customer_id,
            created_at,
        }
    }
}
