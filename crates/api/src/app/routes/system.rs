use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::context::ShopContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(shop): Extension<ShopContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "shop": shop.shop(),
        "user_id": shop.user_id(),
    }))
}
