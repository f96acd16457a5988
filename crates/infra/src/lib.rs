//! Infrastructure layer: remote catalog, comment storage, config and the
//! launch-manager write path.

pub mod bestseller_positions;
pub mod comment_review;
pub mod comment_store;
pub mod config;
pub mod gateway;
pub mod launch;


pub use bestseller_positions::{BestsellerPositionsFile, PositionsError};
pub use comment_review::{ReviewError, ReviewedComment, UNKNOWN_PRODUCT, review_comments};
pub use comment_store::{CommentStore, CommentStoreError, InMemoryCommentStore, PostgresCommentStore};
pub use config::{AppConfig, ConfigError, ShopifyConfig};
pub use gateway::{
    CatalogGateway, GatewayError, InMemoryCatalog, MetafieldInput, ShopifyAdminGateway, UserError,
};
pub use launch::{LaunchCoordinator, LaunchError, LaunchOutcome, MetadataWriter, WritePhase};
