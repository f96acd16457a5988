use serde::{Deserialize, Serialize};

use launchdesk_infra::ReviewedComment;
use launchdesk_products::{BestsellerEntry, BoardGroup};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct BoardQuery {
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCommentForm {
    pub comment_id: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub groups: Vec<BoardGroup>,
}

#[derive(Debug, Serialize)]
pub struct BestsellersResponse {
    pub products: Vec<BestsellerEntry>,
}

#[derive(Debug, Serialize)]
pub struct CommentsResponse {
    pub comments: Vec<ReviewedComment>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}
