//! Launch action coordination.
//!
//! One launch-manager submission runs as:
//!
//! ```text
//! Received
//!   ↓ validate (no remote calls on failure)
//! Validated
//!   ↓ read current tags, resolve           (only with an action)
//! TagsResolved
//!   ↓ write full tag list                  (only with an action)
//! TagsCommitted
//!   ↓ check the date is not blank          (only with a date)
//! DateValidated
//!   ↓ write launch date metafield
//! Done
//! ```
//!
//! The tag write and the date write are separate remote mutations. If the
//! date is refused or its write fails after the tag write succeeded, the tags
//! stay as written. Remote failures say so (`tags_committed`). Nothing is
//! retried or rolled back.

use thiserror::Error;

use launchdesk_core::{DomainError, ProductGid};
use launchdesk_products::{LaunchDateField, LaunchSubmission, TransitionRequest, resolve};

use crate::gateway::{CatalogGateway, GatewayError};
use crate::launch::metadata_writer::{DateWriteError, MetadataWriter};

/// Which remote write failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePhase {
    Tags,
    LaunchDate,
}

impl WritePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            WritePhase::Tags => "tags",
            WritePhase::LaunchDate => "launch_date",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LaunchError {
    /// Rejected locally. Only a blank date can be refused after the tag
    /// write; everything else is refused before any remote call.
    #[error("{0}")]
    Validation(String),

    /// Reading current tags failed; nothing was written.
    #[error("failed to read product: {source}")]
    RemoteRead { source: GatewayError },

    #[error("failed to write {}: {source}", .phase.as_str())]
    RemoteWrite {
        phase: WritePhase,
        /// Whether the tag mutation had already been applied.
        tags_committed: bool,
        source: GatewayError,
    },
}

impl LaunchError {
    pub fn tags_committed(&self) -> bool {
        matches!(
            self,
            LaunchError::RemoteWrite {
                tags_committed: true,
                ..
            }
        )
    }

    pub fn gateway_error(&self) -> Option<&GatewayError> {
        match self {
            LaunchError::Validation(_) => None,
            LaunchError::RemoteRead { source } | LaunchError::RemoteWrite { source, .. } => {
                Some(source)
            }
        }
    }
}

impl From<DomainError> for LaunchError {
    fn from(value: DomainError) -> Self {
        LaunchError::Validation(value.message())
    }
}

/// What a completed request changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOutcome {
    pub product_id: ProductGid,
    /// Tag list written, when an action was applied.
    pub tags: Option<Vec<String>>,
    /// Metafield written, when a date was applied.
    pub date_field: Option<LaunchDateField>,
}

pub struct LaunchCoordinator<G> {
    gateway: G,
}

impl<G> LaunchCoordinator<G>
where
    G: CatalogGateway,
{
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Validate a raw form submission and apply it.
    pub async fn submit(&self, submission: LaunchSubmission) -> Result<LaunchOutcome, LaunchError> {
        let request = TransitionRequest::from_submission(submission).map_err(|e| {
            tracing::debug!(reason = %e.message(), "launch submission rejected");
            LaunchError::from(e)
        })?;
        self.apply(&request).await
    }

    #[tracing::instrument(
        skip(self, request),
        fields(
            product_id = %request.product_id,
            action = request.action.map(|a| a.as_str()),
            has_date = request.date.is_some(),
        )
    )]
    pub async fn apply(&self, request: &TransitionRequest) -> Result<LaunchOutcome, LaunchError> {
        let product_id = &request.product_id;
        let mut outcome = LaunchOutcome {
            product_id: product_id.clone(),
            tags: None,
            date_field: None,
        };

        if let Some(action) = request.action {
            let current = self
                .gateway
                .product_tags(product_id)
                .await
                .map_err(|source| {
                    tracing::warn!(error = %source, "tag read failed");
                    LaunchError::RemoteRead { source }
                })?;

            let next = resolve(&current, action);
            self.gateway
                .update_product_tags(product_id, &next)
                .await
                .map_err(|source| {
                    tracing::warn!(error = %source, "tag write failed");
                    LaunchError::RemoteWrite {
                        phase: WritePhase::Tags,
                        tags_committed: false,
                        source,
                    }
                })?;

            tracing::info!(tags = ?next, "launch tags written");
            outcome.tags = Some(next);
        }

        if let Some(date) = &request.date {
            let tags_committed = outcome.tags.is_some();
            let writer = MetadataWriter::new(&self.gateway);
            let field = writer
                .write_date(product_id, date.is_pre_order, date.value.as_str())
                .await
                .map_err(|e| match e {
                    DateWriteError::Rejected(reason) => {
                        tracing::debug!(
                            reason = %reason.message(),
                            tags_committed,
                            "launch date refused"
                        );
                        LaunchError::from(reason)
                    }
                    DateWriteError::Remote(source) => {
                        tracing::warn!(
                            error = %source,
                            tags_committed,
                            "launch date write failed"
                        );
                        LaunchError::RemoteWrite {
                            phase: WritePhase::LaunchDate,
                            tags_committed,
                            source,
                        }
                    }
                })?;
            outcome.date_field = Some(field);
        }

        Ok(outcome)
    }
}
