//! Launch date writes.

use thiserror::Error;

use launchdesk_core::{DomainError, ProductGid};
use launchdesk_products::launch_date::{LAUNCH_DATE_NAMESPACE, LAUNCH_DATE_TYPE};
use launchdesk_products::{LaunchDate, LaunchDateField};

use crate::gateway::{CatalogGateway, GatewayError, MetafieldInput};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateWriteError {
    /// Rejected locally; no remote call was made.
    #[error(transparent)]
    Rejected(#[from] DomainError),

    #[error(transparent)]
    Remote(#[from] GatewayError),
}

/// Writes one launch date metafield per call.
///
/// A blank value is rejected without touching the gateway; otherwise exactly
/// one `set_metafield` call is made. Set-or-replace only, never delete.
pub struct MetadataWriter<'g, G: ?Sized> {
    gateway: &'g G,
}

impl<'g, G> MetadataWriter<'g, G>
where
    G: CatalogGateway + ?Sized,
{
    pub fn new(gateway: &'g G) -> Self {
        Self { gateway }
    }

    pub async fn write_date(
        &self,
        product_id: &ProductGid,
        is_pre_order: bool,
        date_value: &str,
    ) -> Result<LaunchDateField, DateWriteError> {
        let value = LaunchDate::parse(date_value)?;
        let field = LaunchDateField::for_submission(is_pre_order);
        self.write(product_id, field, &value).await?;
        Ok(field)
    }

    /// Write an already validated date to `field`.
    pub async fn write(
        &self,
        product_id: &ProductGid,
        field: LaunchDateField,
        value: &LaunchDate,
    ) -> Result<(), GatewayError> {
        let input = MetafieldInput {
            owner_id: product_id.clone(),
            namespace: LAUNCH_DATE_NAMESPACE.to_string(),
            key: field.key().to_string(),
            kind: LAUNCH_DATE_TYPE.to_string(),
            value: value.as_str().to_string(),
        };
        self.gateway.set_metafield(&input).await?;
        tracing::info!(product_id = %product_id, key = field.key(), "launch date written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayCall, GatewayOperation, InMemoryCatalog};
    use launchdesk_products::{CANNOT_CLEAR_DATE, CatalogProduct};
    use std::collections::BTreeMap;

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::with_products(vec![CatalogProduct {
            id: ProductGid::new("P1").unwrap(),
            title: "Tea Kettle".to_string(),
            tags: vec![],
            total_inventory: None,
            featured_image: None,
            metafields: BTreeMap::new(),
        }])
    }

    #[tokio::test]
    async fn blank_dates_make_no_calls() {
        let catalog = catalog();
        let writer = MetadataWriter::new(&catalog);
        let id = ProductGid::new("P1").unwrap();

        for is_pre_order in [true, false] {
            for blank in ["", "  "] {
                let err = writer.write_date(&id, is_pre_order, blank).await.unwrap_err();
                assert_eq!(
                    err,
                    DateWriteError::Rejected(DomainError::validation(CANNOT_CLEAR_DATE))
                );
            }
        }
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test]
    async fn flag_selects_metafield_key() {
        let catalog = catalog();
        let writer = MetadataWriter::new(&catalog);
        let id = ProductGid::new("P1").unwrap();

        let field = writer.write_date(&id, true, "Late June").await.unwrap();
        assert_eq!(field, LaunchDateField::EstimatedShipDate);
        writer.write_date(&id, false, "2025-01-10").await.unwrap();

        let calls = catalog.calls();
        assert_eq!(calls.len(), 2);
        let GatewayCall::SetMetafield(first) = &calls[0] else {
            panic!("expected metafield write, got {:?}", calls[0]);
        };
        assert_eq!(first.key, "estimated_ship_date");
        assert_eq!(first.namespace, "custom");
        assert_eq!(first.kind, "single_line_text_field");
        assert_eq!(first.value, "Late June");

        let product = catalog.product(&id).unwrap();
        assert_eq!(product.metafield("preorder_estimate"), Some("2025-01-10"));
    }

    #[tokio::test]
    async fn remote_failures_are_surfaced() {
        let catalog = catalog();
        catalog.fail_next(
            GatewayOperation::SetMetafield,
            GatewayError::Transport("timed out".into()),
        );
        let writer = MetadataWriter::new(&catalog);
        let err = writer
            .write_date(&ProductGid::new("P1").unwrap(), false, "May")
            .await
            .unwrap_err();
        assert!(matches!(err, DateWriteError::Remote(GatewayError::Transport(_))));
    }
}
