//! Who wrote a comment, for display.
//!
//! Commenters are matched to storefront customers by normalised email. The
//! customer record wins when present; otherwise the submitted name and email
//! are shown.

use serde::{Deserialize, Serialize};

use crate::comment::ProductComment;

/// Customer search is issued in chunks of this many emails.
pub const CUSTOMER_QUERY_CHUNK: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayIdentity {
    pub name: String,
    pub email: String,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Customer search queries (`(email:a OR email:b)`) covering `emails`.
pub fn customer_search_queries(emails: &[String]) -> Vec<String> {
    emails
        .chunks(CUSTOMER_QUERY_CHUNK)
        .map(|chunk| {
            let terms = chunk
                .iter()
                .map(|e| format!("email:{e}"))
                .collect::<Vec<_>>()
                .join(" OR ");
            format!("({terms})")
        })
        .collect()
}

pub fn display_identity(
    comment: &ProductComment,
    customer: Option<&CustomerProfile>,
) -> DisplayIdentity {
    let full_name = customer
        .map(|c| {
            format!(
                "{} {}",
                c.first_name.as_deref().unwrap_or_default(),
                c.last_name.as_deref().unwrap_or_default()
            )
            .trim()
            .to_string()
        })
        .unwrap_or_default();

    let name = [full_name.as_str(), comment.name.trim(), comment.email.as_str()]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or("Guest")
        .to_string();

    let email = customer
        .map(|c| c.email.as_str())
        .filter(|e| !e.is_empty())
        .or(Some(comment.email.as_str()).filter(|e| !e.is_empty()))
        .unwrap_or("No email")
        .to_string();

    DisplayIdentity { name, email }
}
