use axum::{
    routing::{get, post},
    Router,
};

pub mod best_sellers;
pub mod comments;
pub mod launch;
pub mod storefront;
pub mod system;

/// Router for all authenticated (admin session) endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/launch-manager", get(launch::board).post(launch::submit))
        .nest("/best-sellers", best_sellers::router())
        .route("/comments", get(comments::list).post(comments::delete))
}

/// Router for endpoints called from the storefront (no admin session).
pub fn public_router() -> Router {
    Router::new().route(
        "/apps/product-manager/comment",
        post(storefront::create_comment).options(storefront::preflight),
    )
}
