//! Launch state resolution.
//!
//! A product's launch state is never stored; it is read off its tag set. The
//! transition table below is the only place that knows which tags a launch
//! action adds and removes.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use launchdesk_core::DomainError;

/// Tag marking a product as open for pre-orders.
pub const PRE_ORDER_TAG: &str = "pre-order";

/// Tag marking a product as announced but not yet orderable.
pub const COMING_SOON_TAG: &str = "coming-soon";

/// Launch state derived from a product's tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LaunchState {
    PreOrder,
    ComingSoon,
    NowShipping,
}

impl LaunchState {
    /// Derive the state from a tag set.
    ///
    /// A tag set that drifted into carrying both markers reads as pre-order.
    pub fn from_tags<S: AsRef<str>>(tags: &[S]) -> Self {
        let has = |needle: &str| tags.iter().any(|t| t.as_ref() == needle);
        if has(PRE_ORDER_TAG) {
            LaunchState::PreOrder
        } else if has(COMING_SOON_TAG) {
            LaunchState::ComingSoon
        } else {
            LaunchState::NowShipping
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LaunchState::PreOrder => "pre-order",
            LaunchState::ComingSoon => "coming-soon",
            LaunchState::NowShipping => "now-shipping",
        }
    }

    /// Actions a staff member is offered from this state.
    pub fn available_actions(self) -> &'static [LaunchAction] {
        match self {
            LaunchState::PreOrder => &[LaunchAction::SetNowShipping],
            LaunchState::ComingSoon => &[LaunchAction::SetPreOrder, LaunchAction::SetNowShipping],
            LaunchState::NowShipping => &[LaunchAction::SetPreOrder, LaunchAction::SetComingSoon],
        }
    }
}

/// Requested launch transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LaunchAction {
    SetPreOrder,
    SetComingSoon,
    SetNowShipping,
}

impl LaunchAction {
    pub const ALL: [LaunchAction; 3] = [
        LaunchAction::SetPreOrder,
        LaunchAction::SetComingSoon,
        LaunchAction::SetNowShipping,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LaunchAction::SetPreOrder => "set-pre-order",
            LaunchAction::SetComingSoon => "set-coming-soon",
            LaunchAction::SetNowShipping => "set-now-shipping",
        }
    }

    /// Button label shown on the launch board.
    pub fn label(self) -> &'static str {
        match self {
            LaunchAction::SetPreOrder => "Set as Pre-order",
            LaunchAction::SetComingSoon => "Set as Coming Soon",
            LaunchAction::SetNowShipping => "Now Shipping",
        }
    }

    /// State a product is in once this action has been applied.
    pub fn target_state(self) -> LaunchState {
        match self {
            LaunchAction::SetPreOrder => LaunchState::PreOrder,
            LaunchAction::SetComingSoon => LaunchState::ComingSoon,
            LaunchAction::SetNowShipping => LaunchState::NowShipping,
        }
    }

    /// Transition table entry for this action.
    pub fn delta(self) -> TagDelta {
        match self {
            LaunchAction::SetComingSoon => TagDelta {
                add: &[COMING_SOON_TAG],
                remove: &[PRE_ORDER_TAG],
            },
            LaunchAction::SetPreOrder => TagDelta {
                add: &[PRE_ORDER_TAG],
                remove: &[COMING_SOON_TAG],
            },
            LaunchAction::SetNowShipping => TagDelta {
                add: &[],
                remove: &[PRE_ORDER_TAG, COMING_SOON_TAG],
            },
        }
    }
}

impl core::fmt::Display for LaunchAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LaunchAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "set-pre-order" => Ok(LaunchAction::SetPreOrder),
            "set-coming-soon" => Ok(LaunchAction::SetComingSoon),
            "set-now-shipping" => Ok(LaunchAction::SetNowShipping),
            other => Err(DomainError::validation(format!(
                "Unsupported action type: {other}"
            ))),
        }
    }
}

/// Tags to add and remove for one launch action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagDelta {
    pub add: &'static [&'static str],
    pub remove: &'static [&'static str],
}

impl TagDelta {
    /// `(current - remove) ∪ add`, keeping the order of retained tags and
    /// appending new ones. Duplicate tags in `current` collapse to one.
    pub fn apply<S: AsRef<str>>(&self, current: &[S]) -> Vec<String> {
        let mut next: Vec<String> = Vec::with_capacity(current.len() + self.add.len());
        for tag in current {
            let tag = tag.as_ref();
            if self.remove.contains(&tag) || next.iter().any(|t| t == tag) {
                continue;
            }
            next.push(tag.to_string());
        }
        for tag in self.add {
            if !next.iter().any(|t| t == tag) {
                next.push((*tag).to_string());
            }
        }
        next
    }
}

/// Resolve the tag set a product should carry after `action`.
pub fn resolve<S: AsRef<str>>(current: &[S], action: LaunchAction) -> Vec<String> {
    action.delta().apply(current)
}
