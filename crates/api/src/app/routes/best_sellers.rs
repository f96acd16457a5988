use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use launchdesk_infra::gateway::PRODUCT_PAGE_SIZE;
use launchdesk_products::{BestsellerPosition, rank_bestsellers};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list))
        .route("/positions", get(get_positions).put(put_positions))
}

pub async fn list(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    let products = match services.catalog.list_products(PRODUCT_PAGE_SIZE).await {
        Ok(p) => p,
        Err(e) => return errors::gateway_error_to_response(e),
    };

    let products = rank_bestsellers(&products);
    (StatusCode::OK, Json(dto::BestsellersResponse { products })).into_response()
}

pub async fn get_positions(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.positions.read().await {
        Ok(positions) => (StatusCode::OK, Json(positions)).into_response(),
        Err(e) => errors::positions_error_to_response(e),
    }
}

pub async fn put_positions(
    Extension(services): Extension<Arc<AppServices>>,
    Json(positions): Json<Vec<BestsellerPosition>>,
) -> axum::response::Response {
    match services.positions.write(&positions).await {
        Ok(()) => (StatusCode::OK, Json(positions)).into_response(),
        Err(e) => errors::positions_error_to_response(e),
    }
}
