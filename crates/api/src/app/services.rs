//! Service wiring: catalog gateway, comment store, positions file and the
//! launch coordinator, shared by every handler.

use std::sync::Arc;

use anyhow::Context;

use launchdesk_infra::{
    AppConfig, BestsellerPositionsFile, CatalogGateway, CommentStore, InMemoryCommentStore,
    LaunchCoordinator, PostgresCommentStore, ShopifyAdminGateway,
};

pub struct AppServices {
    pub catalog: Arc<dyn CatalogGateway>,
    pub comments: Arc<dyn CommentStore>,
    pub positions: BestsellerPositionsFile,
    pub launch: LaunchCoordinator<Arc<dyn CatalogGateway>>,
}

impl AppServices {
    pub fn new(
        catalog: Arc<dyn CatalogGateway>,
        comments: Arc<dyn CommentStore>,
        positions: BestsellerPositionsFile,
    ) -> Self {
        Self {
            launch: LaunchCoordinator::new(catalog.clone()),
            catalog,
            comments,
            positions,
        }
    }
}

pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let catalog: Arc<dyn CatalogGateway> = Arc::new(
        ShopifyAdminGateway::new(&config.shopify).context("failed to build catalog client")?,
    );

    let comments: Arc<dyn CommentStore> = match &config.database_url {
        Some(url) => {
            let store = PostgresCommentStore::connect(url)
                .await
                .context("failed to open comment store")?;
            tracing::info!("comment store: postgres");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; comments are kept in memory and lost on restart");
            Arc::new(InMemoryCommentStore::new())
        }
    };

    let positions = BestsellerPositionsFile::new(config.positions_path.clone());

    Ok(AppServices::new(catalog, comments, positions))
}
