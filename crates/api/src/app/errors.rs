use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use launchdesk_core::DomainError;
use launchdesk_infra::{
    CommentStoreError, GatewayError, LaunchError, PositionsError, ReviewError, WritePhase,
};

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
    }
}

/// Remote failures carry the mutation's `userErrors` and whether the tag
/// write had already been applied.
fn remote_error(
    status: StatusCode,
    code: &'static str,
    message: String,
    source: &GatewayError,
    tags_committed: bool,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message,
            "user_errors": source.user_errors(),
            "tags_committed": tags_committed,
        })),
    )
        .into_response()
}

pub fn launch_error_to_response(err: LaunchError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        LaunchError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        LaunchError::RemoteRead { source } => match &source {
            GatewayError::NotFound(_) => {
                remote_error(StatusCode::NOT_FOUND, "product_not_found", message, &source, false)
            }
            _ => remote_error(StatusCode::BAD_GATEWAY, "remote_read_error", message, &source, false),
        },
        LaunchError::RemoteWrite {
            phase,
            tags_committed,
            source,
        } => {
            let code = match phase {
                WritePhase::Tags => "tag_write_error",
                WritePhase::LaunchDate => "date_write_error",
            };
            remote_error(StatusCode::BAD_GATEWAY, code, message, &source, tags_committed)
        }
    }
}

pub fn gateway_error_to_response(err: GatewayError) -> axum::response::Response {
    tracing::warn!(error = %err, "catalog request failed");
    json_error(StatusCode::BAD_GATEWAY, "gateway_error", err.to_string())
}

pub fn store_error_to_response(err: CommentStoreError) -> axum::response::Response {
    tracing::error!(error = %err, "comment store failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", err.to_string())
}

pub fn review_error_to_response(err: ReviewError) -> axum::response::Response {
    match err {
        ReviewError::Store(e) => store_error_to_response(e),
        ReviewError::Gateway(e) => gateway_error_to_response(e),
    }
}

pub fn positions_error_to_response(err: PositionsError) -> axum::response::Response {
    tracing::error!(error = %err, "best-seller positions unavailable");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "positions_error", err.to_string())
}
