//! Launch manager: the grouped product board and launch transitions.

use std::sync::Arc;

use axum::{
    extract::{Extension, Form, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use launchdesk_infra::gateway::PRODUCT_PAGE_SIZE;
use launchdesk_products::{LaunchSubmission, build_board};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::ShopContext;

pub async fn board(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::BoardQuery>,
) -> axum::response::Response {
    let products = match services.catalog.list_products(PRODUCT_PAGE_SIZE).await {
        Ok(p) => p,
        Err(e) => return errors::gateway_error_to_response(e),
    };

    let groups = build_board(&products, query.search.as_deref());
    (StatusCode::OK, Json(dto::BoardResponse { groups })).into_response()
}

pub async fn submit(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(shop): Extension<ShopContext>,
    Form(form): Form<LaunchSubmission>,
) -> axum::response::Response {
    match services.launch.submit(form).await {
        Ok(outcome) => {
            tracing::info!(
                shop = shop.shop(),
                user_id = shop.user_id(),
                product_id = %outcome.product_id,
                tags_written = outcome.tags.is_some(),
                date_field = outcome.date_field.map(|f| f.key()),
                "launch update applied"
            );
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => errors::launch_error_to_response(e),
    }
}
