//! Inventory operations for one authenticated user.
//!
//! [`Inventory`] glues the status engine to an [`InventoryStore`]: it
//! reconciles before every bucketed read, validates drafts before they reach
//! the store, and turns guarded transitions into user-facing notices.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::constants::EXPIRING_WINDOW_DAYS;
use crate::engine::{self, DONATION_HISTORY};
use crate::error::{PantryError, Result};
use crate::lifecycle::{self, Action, Transition};
use crate::store::{InventoryStore, ItemFilter, ItemOrder};
use crate::types::{FoodItem, FoodItemDraft, FoodStatus, ItemId, Notice, UserId};

/// An item together with values derived for a particular day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemView {
    #[serde(flatten)]
    pub item: FoodItem,
    pub status_label: &'static str,
    pub days_left: i64,
}

impl ItemView {
    pub fn new(item: FoodItem, today: NaiveDate) -> Self {
        Self {
            status_label: item.status.label(),
            days_left: engine::days_left(&item, today),
            item,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub today: NaiveDate,
    /// Rows moved to `EXPIRED` by the reconciliation that preceded this read.
    pub newly_expired: usize,
    pub expiring_soon: Vec<ItemView>,
    pub expired: Vec<ItemView>,
    pub items: Vec<ItemView>,
}

/// What came of a user-driven status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    pub item: FoodItem,
    pub applied: bool,
    pub notice: Option<Notice>,
}

pub struct Inventory<S> {
    store: S,
    expiring_window_days: i64,
}

impl<S: InventoryStore> Inventory<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            expiring_window_days: EXPIRING_WINDOW_DAYS,
        }
    }

    pub fn with_expiring_window(mut self, days: i64) -> Self {
        self.expiring_window_days = days;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persist `EXPIRED` on every stale item of `user` in one bulk update.
    pub fn reconcile(&self, user: UserId, today: NaiveDate) -> Result<usize> {
        let changed =
            self.store
                .bulk_update_status(user, &ItemFilter::stale(today), FoodStatus::Expired)?;
        if changed > 0 {
            info!(user = %user, count = changed, %today, "auto-expired food items");
        }
        Ok(changed)
    }

    pub fn dashboard(&self, user: UserId, today: NaiveDate) -> Result<Dashboard> {
        let newly_expired = self.reconcile(user, today)?;
        let items = self
            .store
            .find_by_user(user, &ItemFilter::all(), ItemOrder::ExpiryAsc)?;
        let buckets = engine::classify_with_window(&items, today, self.expiring_window_days);

        let view = |items: Vec<FoodItem>| -> Vec<ItemView> {
            items.into_iter().map(|i| ItemView::new(i, today)).collect()
        };

        Ok(Dashboard {
            today,
            newly_expired,
            expiring_soon: view(buckets.expiring_soon),
            expired: view(buckets.expired),
            items: view(buckets.all),
        })
    }

    pub fn get(&self, user: UserId, id: ItemId) -> Result<FoodItem> {
        self.store.get_by_id_and_user(id, user)
    }

    pub fn add(
        &self,
        user: UserId,
        draft: FoodItemDraft,
        today: NaiveDate,
    ) -> Result<(FoodItem, Notice)> {
        let draft = draft.validate()?;
        let item = self.store.create(user, &draft, today)?;
        debug!(user = %user, item = %item.id, "food item added");
        Ok((item, Notice::success("Food item added successfully.")))
    }

    /// Replace the owner-editable fields. Status and added date are kept.
    pub fn edit(
        &self,
        user: UserId,
        id: ItemId,
        draft: FoodItemDraft,
    ) -> Result<(FoodItem, Notice)> {
        let mut item = self.store.get_by_id_and_user(id, user)?;
        let draft = draft.validate()?;
        draft.apply_to(&mut item);
        let item = self.store.update(&item)?;
        Ok((item, Notice::success("Food item updated.")))
    }

    pub fn delete(&self, user: UserId, id: ItemId) -> Result<Notice> {
        if !self.store.delete(id, user)? {
            return Err(PantryError::NotFound);
        }
        debug!(user = %user, item = %id, "food item deleted");
        Ok(Notice::success("Food item deleted."))
    }

    /// Apply a guarded transition.
    ///
    /// A disallowed action leaves the item untouched and is reported through
    /// the returned notice, never as an error.
    pub fn apply(&self, user: UserId, id: ItemId, action: Action) -> Result<ActionOutcome> {
        let mut item = self.store.get_by_id_and_user(id, user)?;

        match lifecycle::transition(item.status, action) {
            Transition::Applied { from, to } => {
                item.status = to;
                let item = self.store.update(&item)?;
                debug!(item = %item.id, %from, %to, "status transition");
                let notice = applied_notice(action, &item.name);
                Ok(ActionOutcome {
                    item,
                    applied: true,
                    notice: Some(notice),
                })
            }
            Transition::Rejected(message) => {
                debug!(item = %item.id, status = %item.status, ?action, "transition rejected");
                Ok(ActionOutcome {
                    item,
                    applied: false,
                    notice: Some(Notice::warning(message)),
                })
            }
            Transition::Unchanged => Ok(ActionOutcome {
                item,
                applied: false,
                notice: None,
            }),
        }
    }

    /// Donated and donation-cancelled items, most recently added first.
    pub fn donation_history(&self, user: UserId) -> Result<Vec<FoodItem>> {
        self.store.find_by_user(
            user,
            &ItemFilter::with_status(&DONATION_HISTORY),
            ItemOrder::AddedDesc,
        )
    }
}

fn applied_notice(action: Action, name: &str) -> Notice {
    match action {
        Action::MarkDonated => Notice::success(format!("{name} marked for donation.")),
        Action::CancelDonation => Notice::info(format!("Donation cancelled for {name}.")),
        Action::MarkConsumed => Notice::success(format!("{name} marked as consumed.")),
    }
}
