//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: catalog gateway, comment store, positions file, launch coordinator
//! - `routes/`: HTTP routes + handlers (one file per admin area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use anyhow::Context;
use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use launchdesk_auth::{Hs256SessionValidator, SessionTokenValidator};
use launchdesk_infra::AppConfig;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use routes::storefront::StorefrontOrigin;
pub use services::AppServices;

/// Build the full HTTP router from configuration (entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let sessions: Arc<dyn SessionTokenValidator> = Arc::new(Hs256SessionValidator::new(
        config.shopify.api_secret.as_bytes(),
        &config.shopify.api_key,
        config.shopify.shop.clone(),
    ));
    let origin = StorefrontOrigin::parse(&config.storefront_origin)
        .context("STOREFRONT_ORIGIN is not a valid header value")?;
    let services = services::build_services(config).await?;

    Ok(build_router(services, sessions, origin))
}

/// Assemble the router around already-built services.
pub fn build_router(
    services: AppServices,
    sessions: Arc<dyn SessionTokenValidator>,
    origin: StorefrontOrigin,
) -> Router {
    let services = Arc::new(services);
    let auth_state = middleware::AuthState { sessions };

    // Admin routes: require a valid session token.
    let protected = routes::router()
        .layer(Extension(services.clone()))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    let public = routes::public_router()
        .layer(Extension(services))
        .layer(Extension(origin));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(public)
        .merge(protected)
        .layer(ServiceBuilder::new())
}
