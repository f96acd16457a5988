//! Storefront comment submission.
//!
//! Called cross-origin from the shop's theme, so every response carries CORS
//! headers for the configured storefront origin.

use std::sync::Arc;

use axum::{
    extract::{Extension, Form},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use launchdesk_comments::{CommentSubmission, NewComment};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// Origin allowed to call storefront endpoints.
#[derive(Debug, Clone)]
pub struct StorefrontOrigin(HeaderValue);

impl StorefrontOrigin {
    pub fn parse(origin: &str) -> Result<Self, header::InvalidHeaderValue> {
        HeaderValue::from_str(origin.trim()).map(Self)
    }

    fn apply(&self, mut res: Response) -> Response {
        let headers = res.headers_mut();
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, self.0.clone());
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        );
        res
    }
}

pub async fn create_comment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(origin): Extension<StorefrontOrigin>,
    Form(form): Form<CommentSubmission>,
) -> Response {
    let comment = match NewComment::from_submission(form) {
        Ok(c) => c,
        Err(e) => return origin.apply(errors::domain_error_to_response(e)),
    };

    let res = match services.comments.create(comment).await {
        Ok(stored) => {
            tracing::info!(
                comment_id = %stored.id,
                product_id = %stored.product_id,
                "storefront comment received"
            );
            (StatusCode::OK, Json(dto::SuccessResponse { success: true })).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    };
    origin.apply(res)
}

pub async fn preflight(Extension(origin): Extension<StorefrontOrigin>) -> Response {
    origin.apply(StatusCode::NO_CONTENT.into_response())
}
