//! The persistence seam.
//!
//! [`InventoryStore`] is everything the inventory service needs from a
//! relational store. Every method takes the owning [`UserId`]; an item owned
//! by someone else is indistinguishable from one that does not exist.

use chrono::NaiveDate;

use crate::error::Result;
use crate::types::{FoodItem, FoodItemDraft, FoodStatus, ItemId, UserId};

/// A conjunction of optional predicates over a user's items.
///
/// Unset fields match everything. The same filter drives in-memory matching
/// and the SQL `WHERE` clause built by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    /// `expiry_date < date`
    pub expiry_before: Option<NaiveDate>,
    /// `expiry_date >= date`
    pub expiry_from: Option<NaiveDate>,
    /// `expiry_date <= date`
    pub expiry_until: Option<NaiveDate>,
    pub status_in: Option<Vec<FoodStatus>>,
    pub status_not_in: Option<Vec<FoodStatus>>,
}

impl ItemFilter {
    pub fn all() -> Self {
        Self::default()
    }

    /// Items past their expiry date that have not been marked expired yet.
    pub fn stale(today: NaiveDate) -> Self {
        Self {
            expiry_before: Some(today),
            status_not_in: Some(vec![FoodStatus::Expired]),
            ..Self::default()
        }
    }

    pub fn with_status(statuses: &[FoodStatus]) -> Self {
        Self {
            status_in: Some(statuses.to_vec()),
            ..Self::default()
        }
    }

    pub fn matches(&self, item: &FoodItem) -> bool {
        if let Some(date) = self.expiry_before {
            if item.expiry_date >= date {
                return false;
            }
        }
        if let Some(date) = self.expiry_from {
            if item.expiry_date < date {
                return false;
            }
        }
        if let Some(date) = self.expiry_until {
            if item.expiry_date > date {
                return false;
            }
        }
        if let Some(statuses) = &self.status_in {
            if !statuses.contains(&item.status) {
                return false;
            }
        }
        if let Some(statuses) = &self.status_not_in {
            if statuses.contains(&item.status) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ItemOrder {
    /// Soonest expiry first, ties broken by id.
    #[default]
    ExpiryAsc,
    /// Most recently added first, ties broken by id descending.
    AddedDesc,
}

impl ItemOrder {
    pub fn sort(self, items: &mut [FoodItem]) {
        match self {
            ItemOrder::ExpiryAsc => items.sort_by_key(|i| (i.expiry_date, i.id)),
            ItemOrder::AddedDesc => {
                items.sort_by(|a, b| (b.added_date, b.id).cmp(&(a.added_date, a.id)))
            }
        }
    }
}

pub trait InventoryStore {
    fn find_by_user(
        &self,
        user: UserId,
        filter: &ItemFilter,
        order: ItemOrder,
    ) -> Result<Vec<FoodItem>>;

    /// Fails with [`crate::PantryError::NotFound`] when the item is missing
    /// or belongs to another user.
    fn get_by_id_and_user(&self, id: ItemId, user: UserId) -> Result<FoodItem>;

    /// Insert a new item with status `FRESH`. The store assigns the id and
    /// stamps `added_date`.
    fn create(&self, user: UserId, draft: &FoodItemDraft, added_date: NaiveDate)
        -> Result<FoodItem>;

    /// Write back every mutable field of `item`, scoped to `item.owner`.
    fn update(&self, item: &FoodItem) -> Result<FoodItem>;

    /// Set `status` on every item of `user` matching `filter`, in one
    /// statement. Returns the number of rows changed.
    fn bulk_update_status(
        &self,
        user: UserId,
        filter: &ItemFilter,
        status: FoodStatus,
    ) -> Result<usize>;

    /// Returns `true` if a row was deleted.
    fn delete(&self, id: ItemId, user: UserId) -> Result<bool>;
}

impl<T: InventoryStore + ?Sized> InventoryStore for &T {
    fn find_by_user(
        &self,
        user: UserId,
        filter: &ItemFilter,
        order: ItemOrder,
    ) -> Result<Vec<FoodItem>> {
        (**self).find_by_user(user, filter, order)
    }

    fn get_by_id_and_user(&self, id: ItemId, user: UserId) -> Result<FoodItem> {
        (**self).get_by_id_and_user(id, user)
    }

    fn create(
        &self,
        user: UserId,
        draft: &FoodItemDraft,
        added_date: NaiveDate,
    ) -> Result<FoodItem> {
        (**self).create(user, draft, added_date)
    }

    fn update(&self, item: &FoodItem) -> Result<FoodItem> {
        (**self).update(item)
    }

    fn bulk_update_status(
        &self,
        user: UserId,
        filter: &ItemFilter,
        status: FoodStatus,
    ) -> Result<usize> {
        (**self).bulk_update_status(user, filter, status)
    }

    fn delete(&self, id: ItemId, user: UserId) -> Result<bool> {
        (**self).delete(id, user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, expiry: NaiveDate, status: FoodStatus) -> FoodItem {
        FoodItem {
            id: ItemId(id),
            owner: UserId(1),
            name: "Rice".into(),
            quantity: "2kg".into(),
            category: None,
            added_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            expiry_date: expiry,
            status,
            notes: None,
        }
    }

    #[test]
    fn stale_filter_skips_expired_and_future() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let filter = ItemFilter::stale(today);

        assert!(filter.matches(&item(1, today.pred_opt().unwrap(), FoodStatus::Fresh)));
        assert!(filter.matches(&item(2, today.pred_opt().unwrap(), FoodStatus::Consumed)));
        assert!(!filter.matches(&item(3, today.pred_opt().unwrap(), FoodStatus::Expired)));
        assert!(!filter.matches(&item(4, today, FoodStatus::Fresh)));
    }

    #[test]
    fn expiry_order_breaks_ties_by_id() {
        let d = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let mut items = vec![
            item(3, d, FoodStatus::Fresh),
            item(1, d.succ_opt().unwrap(), FoodStatus::Fresh),
            item(2, d, FoodStatus::Fresh),
        ];
        ItemOrder::ExpiryAsc.sort(&mut items);
        let ids: Vec<_> = items.iter().map(|i| i.id.0).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
