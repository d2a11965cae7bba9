//! User-driven status transitions.
//!
//! Every guarded transition is one row of [`TRANSITIONS`]: the action, the
//! statuses it may start from, the status it produces, and what happens when
//! it is attempted from anywhere else. Time-driven expiry is not an action;
//! see [`crate::engine::reconcile`].

use serde::{Deserialize, Serialize};

use crate::types::FoodStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    MarkDonated,
    CancelDonation,
    MarkConsumed,
}

/// Which statuses a rule accepts.
#[derive(Debug, Clone, Copy)]
pub enum Allowed {
    AnyOf(&'static [FoodStatus]),
    AnyExcept(FoodStatus),
}

impl Allowed {
    pub fn accepts(&self, status: FoodStatus) -> bool {
        match self {
            Allowed::AnyOf(allowed) => allowed.contains(&status),
            Allowed::AnyExcept(excluded) => status != *excluded,
        }
    }
}

/// What a disallowed attempt reports back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnReject {
    Warn(&'static str),
    Silent,
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub action: Action,
    pub from: Allowed,
    pub to: FoodStatus,
    pub on_reject: OnReject,
}

pub const TRANSITIONS: &[Rule] = &[
    Rule {
        action: Action::MarkDonated,
        from: Allowed::AnyOf(&[
            FoodStatus::Fresh,
            FoodStatus::Expiring,
            FoodStatus::DonationCancelled,
        ]),
        to: FoodStatus::Donated,
        on_reject: OnReject::Warn("This item cannot be donated."),
    },
    Rule {
        action: Action::CancelDonation,
        from: Allowed::AnyOf(&[FoodStatus::Donated]),
        to: FoodStatus::DonationCancelled,
        on_reject: OnReject::Warn("This item is not marked for donation."),
    },
    Rule {
        action: Action::MarkConsumed,
        from: Allowed::AnyExcept(FoodStatus::Consumed),
        to: FoodStatus::Consumed,
        on_reject: OnReject::Silent,
    },
];

/// Result of evaluating an action against a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied { from: FoodStatus, to: FoodStatus },
    /// Disallowed, but not worth telling the user about.
    Unchanged,
    /// Disallowed; the message is shown to the user as a warning.
    Rejected(&'static str),
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied { .. })
    }
}

pub fn rule_for(action: Action) -> Option<&'static Rule> {
    TRANSITIONS.iter().find(|rule| rule.action == action)
}

/// Evaluate `action` against the current `status`. Pure; nothing is written.
pub fn transition(status: FoodStatus, action: Action) -> Transition {
    let Some(rule) = rule_for(action) else {
        return Transition::Unchanged;
    };
    if rule.from.accepts(status) {
        Transition::Applied {
            from: status,
            to: rule.to,
        }
    } else {
        match rule.on_reject {
            OnReject::Warn(message) => Transition::Rejected(message),
            OnReject::Silent => Transition::Unchanged,
        }
    }
}
