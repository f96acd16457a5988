//! Launch date metafields.
//!
//! Pre-ordered products carry an estimated ship date; coming-soon products
//! carry the date pre-orders open. Both live in the `custom` namespace as plain
//! text, exactly as staff typed them.

use serde::{Deserialize, Serialize};

use launchdesk_core::DomainError;

use crate::launch::LaunchState;

/// Metafield namespace for launch dates.
pub const LAUNCH_DATE_NAMESPACE: &str = "custom";

/// Metafield type used when writing launch dates.
pub const LAUNCH_DATE_TYPE: &str = "single_line_text_field";

/// Returned when a blank date is submitted.
pub const CANNOT_CLEAR_DATE: &str =
    "Cannot clear date here. Use the Shopify product admin to remove it.";

/// Which launch date metafield a write targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchDateField {
    /// Shipping estimate for a product already taking pre-orders.
    EstimatedShipDate,
    /// Date a coming-soon product opens for pre-orders.
    PreorderEstimate,
}

impl LaunchDateField {
    /// Key selection for a date submission.
    ///
    /// The flag reflects the state the product was in when the form was
    /// rendered, not any tag change submitted alongside it.
    pub fn for_submission(is_pre_order: bool) -> Self {
        if is_pre_order {
            LaunchDateField::EstimatedShipDate
        } else {
            LaunchDateField::PreorderEstimate
        }
    }

    /// Field shown on the launch board for a product in `state`.
    pub fn for_state(state: LaunchState) -> Option<Self> {
        match state {
            LaunchState::PreOrder => Some(LaunchDateField::EstimatedShipDate),
            LaunchState::ComingSoon => Some(LaunchDateField::PreorderEstimate),
            LaunchState::NowShipping => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            LaunchDateField::EstimatedShipDate => "estimated_ship_date",
            LaunchDateField::PreorderEstimate => "preorder_estimate",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LaunchDateField::EstimatedShipDate => "Estimated Shipping Date",
            LaunchDateField::PreorderEstimate => "Pre-order Availability Date",
        }
    }
}

/// A launch date that is safe to write: never blank.
///
/// The value is kept verbatim; staff enter free text such as "Late June".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaunchDate(String);

impl LaunchDate {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.trim().is_empty() {
            return Err(DomainError::validation(CANNOT_CLEAR_DATE));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_follows_pre_order_flag() {
        assert_eq!(LaunchDateField::for_submission(true).key(), "estimated_ship_date");
        assert_eq!(LaunchDateField::for_submission(false).key(), "preorder_estimate");
    }

    #[test]
    fn board_field_follows_state() {
        assert_eq!(
            LaunchDateField::for_state(LaunchState::PreOrder),
            Some(LaunchDateField::EstimatedShipDate)
        );
        assert_eq!(
            LaunchDateField::for_state(LaunchState::ComingSoon),
            Some(LaunchDateField::PreorderEstimate)
        );
        assert_eq!(LaunchDateField::for_state(LaunchState::NowShipping), None);
    }

    #[test]
    fn blank_dates_cannot_clear() {
        for raw in ["", "   ", "\t\n"] {
            assert_eq!(
                LaunchDate::parse(raw),
                Err(DomainError::validation(CANNOT_CLEAR_DATE))
            );
        }
    }

    #[test]
    fn dates_are_kept_verbatim() {
        let date = LaunchDate::parse(" 2024-05-01").unwrap();
        assert_eq!(date.as_str(), " 2024-05-01");
    }
}
