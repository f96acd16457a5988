use anyhow::Context;

use launchdesk_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    launchdesk_observability::init(config.log_format);

    let app = launchdesk_api::app::build_app(&config).await?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        shop = %config.shopify.shop,
        "listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
