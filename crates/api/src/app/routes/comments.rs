//! Admin review of storefront comments.

use std::sync::Arc;

use axum::{
    extract::{Extension, Form},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};

use launchdesk_core::CommentId;
use launchdesk_infra::review_comments;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn list(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match review_comments(&*services.catalog, &*services.comments).await {
        Ok(comments) => (StatusCode::OK, Json(dto::CommentsResponse { comments })).into_response(),
        Err(e) => errors::review_error_to_response(e),
    }
}

/// Delete the posted `commentId` (if any) and return to the listing.
pub async fn delete(
    Extension(services): Extension<Arc<AppServices>>,
    Form(form): Form<dto::DeleteCommentForm>,
) -> axum::response::Response {
    if let Some(raw) = form.comment_id.filter(|id| !id.trim().is_empty()) {
        let id: CommentId = match raw.trim().parse() {
            Ok(v) => v,
            Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid comment id"),
        };

        match services.comments.delete(id).await {
            Ok(true) => tracing::info!(comment_id = %id, "comment deleted"),
            Ok(false) => tracing::warn!(comment_id = %id, "comment to delete was not found"),
            Err(e) => return errors::store_error_to_response(e),
        }
    }

    Redirect::to("/comments").into_response()
}
