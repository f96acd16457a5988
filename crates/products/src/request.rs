//! Launch transition requests.
//!
//! A request is built from one launch-manager form submission. Everything
//! that can be decided without the catalog is checked here; the date value is
//! carried raw and only checked when it is about to be written, after any tag
//! change in the same submission.

use serde::Deserialize;

use launchdesk_core::{DomainError, ProductGid};

use crate::launch::LaunchAction;

/// Returned when neither an action nor a date was submitted.
pub const MISSING_PRODUCT_OR_CHANGE: &str = "Missing productId or action type/date";

/// Raw launch-manager form fields, as posted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchSubmission {
    pub product_id: Option<String>,
    pub action_type: Option<String>,
    pub date_value: Option<String>,
    pub is_pre_order: Option<String>,
}

/// Date half of a transition request, as submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateChange {
    pub is_pre_order: bool,
    pub value: String,
}

/// A validated launch transition request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRequest {
    pub product_id: ProductGid,
    pub action: Option<LaunchAction>,
    pub date: Option<DateChange>,
}

impl TransitionRequest {
    /// Validate a form submission.
    ///
    /// - `productId` must be present and non-blank.
    /// - An empty `actionType` counts as absent (the board posts an empty
    ///   hidden field); a non-empty unknown one is rejected.
    /// - At least one of action or date must remain.
    ///
    /// A blank `dateValue` still counts as a date change here. It is refused
    /// by the date write, once any tag change has gone through.
    pub fn from_submission(submission: LaunchSubmission) -> Result<Self, DomainError> {
        let action_raw = submission.action_type.filter(|a| !a.is_empty());

        let product_id = match submission.product_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => ProductGid::new(id)?,
            _ => return Err(DomainError::validation(MISSING_PRODUCT_OR_CHANGE)),
        };

        if action_raw.is_none() && submission.date_value.is_none() {
            return Err(DomainError::validation(MISSING_PRODUCT_OR_CHANGE));
        }

        let action = action_raw
            .as_deref()
            .map(str::parse::<LaunchAction>)
            .transpose()?;

        let is_pre_order = submission.is_pre_order.as_deref() == Some("true");
        let date = submission.date_value.map(|value| DateChange {
            is_pre_order,
            value,
        });

        Ok(Self {
            product_id,
            action,
            date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(
        product_id: Option<&str>,
        action_type: Option<&str>,
        date_value: Option<&str>,
        is_pre_order: Option<&str>,
    ) -> LaunchSubmission {
        LaunchSubmission {
            product_id: product_id.map(str::to_string),
            action_type: action_type.map(str::to_string),
            date_value: date_value.map(str::to_string),
            is_pre_order: is_pre_order.map(str::to_string),
        }
    }

    #[test]
    fn action_only_request() {
        let req = TransitionRequest::from_submission(submission(
            Some("P1"),
            Some("set-pre-order"),
            None,
            None,
        ))
        .unwrap();
        assert_eq!(req.product_id.as_str(), "P1");
        assert_eq!(req.action, Some(LaunchAction::SetPreOrder));
        assert_eq!(req.date, None);
    }

    #[test]
    fn date_only_request_keeps_flag() {
        let req = TransitionRequest::from_submission(submission(
            Some("P1"),
            None,
            Some("2024-05-01"),
            Some("true"),
        ))
        .unwrap();
        assert_eq!(
            req.date,
            Some(DateChange {
                is_pre_order: true,
                value: "2024-05-01".to_string(),
            })
        );

        let req = TransitionRequest::from_submission(submission(
            Some("P1"),
            None,
            Some("2024-05-01"),
            Some("false"),
        ))
        .unwrap();
        assert!(!req.date.unwrap().is_pre_order);
    }

    #[test]
    fn missing_everything_is_rejected() {
        let err = TransitionRequest::from_submission(submission(Some("P1"), None, None, None))
            .unwrap_err();
        assert_eq!(err, DomainError::validation(MISSING_PRODUCT_OR_CHANGE));

        let err = TransitionRequest::from_submission(submission(
            None,
            Some("set-pre-order"),
            None,
            None,
        ))
        .unwrap_err();
        assert_eq!(err, DomainError::validation(MISSING_PRODUCT_OR_CHANGE));
    }

    #[test]
    fn empty_action_counts_as_absent() {
        let err = TransitionRequest::from_submission(submission(Some("P1"), Some(""), None, None))
            .unwrap_err();
        assert_eq!(err, DomainError::validation(MISSING_PRODUCT_OR_CHANGE));
    }

    #[test]
    fn unknown_action_is_rejected() {
        let err = TransitionRequest::from_submission(submission(
            Some("P1"),
            Some("set-discontinued"),
            None,
            None,
        ))
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("set-discontinued")));
    }

    #[test]
    fn blank_date_is_left_for_the_date_write() {
        for action in [None, Some("set-now-shipping")] {
            let req = TransitionRequest::from_submission(submission(
                Some("P1"),
                action,
                Some("  "),
                Some("true"),
            ))
            .unwrap();
            assert_eq!(req.date.unwrap().value, "  ");
        }
    }
}
