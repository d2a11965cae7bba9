//! The status engine: pure, date-driven rules over a user's items.
//!
//! The current date is always an argument. Persisting the results of
//! [`reconcile`] is the job of [`crate::Inventory`].

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::constants::{EXPIRING_WINDOW_DAYS, MAX_EXPIRY_YEAR};
use crate::store::{ItemFilter, ItemOrder};
use crate::types::{FoodItem, FoodStatus, ItemId};

/// Statuses that can still show up as "expiring soon".
pub const EXPIRING_CANDIDATES: [FoodStatus; 3] = [
    FoodStatus::Fresh,
    FoodStatus::Expiring,
    FoodStatus::DonationCancelled,
];

/// Statuses listed in a user's donation history.
pub const DONATION_HISTORY: [FoodStatus; 2] = [FoodStatus::Donated, FoodStatus::DonationCancelled];

/// Whole days from `today` until the item expires. Negative once expired.
pub fn days_left(item: &FoodItem, today: NaiveDate) -> i64 {
    (item.expiry_date - today).num_days()
}

pub fn needs_expiry(item: &FoodItem, today: NaiveDate) -> bool {
    item.expiry_date < today && item.status != FoodStatus::Expired
}

/// Mark every stale item as expired, in memory.
///
/// Returns the ids that changed; a second call with the same `today` returns
/// nothing.
pub fn reconcile(items: &mut [FoodItem], today: NaiveDate) -> Vec<ItemId> {
    items
        .iter_mut()
        .filter(|item| needs_expiry(item, today))
        .map(|item| {
            item.status = FoodStatus::Expired;
            item.id
        })
        .collect()
}

/// The last expiry date an item may carry.
pub fn latest_expiry_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(MAX_EXPIRY_YEAR, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// Filter for items expiring within `window_days` of `today`, both ends
/// inclusive. A negative window is treated as zero; the upper bound never
/// goes past [`latest_expiry_date`].
pub fn expiring_soon_filter(today: NaiveDate, window_days: i64) -> ItemFilter {
    let days = Days::new(u64::try_from(window_days).unwrap_or(0));
    let until = today
        .checked_add_days(days)
        .map_or(latest_expiry_date(), |d| d.min(latest_expiry_date()));
    ItemFilter {
        expiry_from: Some(today),
        expiry_until: Some(until),
        status_in: Some(EXPIRING_CANDIDATES.to_vec()),
        ..ItemFilter::default()
    }
}

pub fn expired_filter() -> ItemFilter {
    ItemFilter::with_status(&[FoodStatus::Expired])
}

/// Dashboard partition of a user's items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Buckets {
    pub expiring_soon: Vec<FoodItem>,
    pub expired: Vec<FoodItem>,
    /// Every item, soonest expiry first.
    pub all: Vec<FoodItem>,
}

/// Split `items` into buckets with the default three-day window.
pub fn classify(items: &[FoodItem], today: NaiveDate) -> Buckets {
    classify_with_window(items, today, EXPIRING_WINDOW_DAYS)
}

/// Split `items` into buckets.
///
/// Expects items that have already been reconciled for `today`; an item
/// past its date but still `FRESH` lands in neither `expiring_soon` nor
/// `expired`.
pub fn classify_with_window(items: &[FoodItem], today: NaiveDate, window_days: i64) -> Buckets {
    let mut all = items.to_vec();
    ItemOrder::ExpiryAsc.sort(&mut all);

    let soon = expiring_soon_filter(today, window_days);
    let expired = expired_filter();

    Buckets {
        expiring_soon: all.iter().filter(|i| soon.matches(i)).cloned().collect(),
        expired: all.iter().filter(|i| expired.matches(i)).cloned().collect(),
        all,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserId;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 20).unwrap()
    }

    fn item(id: i64, offset: i64, status: FoodStatus) -> FoodItem {
        FoodItem {
            id: ItemId(id),
            owner: UserId(7),
            name: format!("item-{id}"),
            quantity: "1".into(),
            category: None,
            added_date: today() - Duration::days(10),
            expiry_date: today() + Duration::days(offset),
            status,
            notes: None,
        }
    }

    #[test]
    fn days_left_sign_follows_expiry() {
        assert_eq!(days_left(&item(1, 4, FoodStatus::Fresh), today()), 4);
        assert_eq!(days_left(&item(1, 0, FoodStatus::Fresh), today()), 0);
        assert_eq!(days_left(&item(1, -2, FoodStatus::Fresh), today()), -2);
    }

    #[test]
    fn reconcile_expires_once() {
        let mut items = vec![
            item(1, -1, FoodStatus::Fresh),
            item(2, -5, FoodStatus::Expired),
            item(3, 0, FoodStatus::Fresh),
            item(4, -3, FoodStatus::Donated),
        ];

        let changed = reconcile(&mut items, today());
        assert_eq!(changed, vec![ItemId(1), ItemId(4)]);
        assert_eq!(items[0].status, FoodStatus::Expired);
        assert_eq!(items[2].status, FoodStatus::Fresh);

        assert!(reconcile(&mut items, today()).is_empty());
    }

    #[test]
    fn item_two_days_out_is_expiring_soon() {
        let items = vec![item(1, 2, FoodStatus::Fresh)];
        let buckets = classify(&items, today());
        assert_eq!(buckets.expiring_soon.len(), 1);
        assert!(buckets.expired.is_empty());
    }

    #[test]
    fn window_is_inclusive_on_both_ends() {
        let items = vec![
            item(1, 0, FoodStatus::Fresh),
            item(2, 3, FoodStatus::Expiring),
            item(3, 4, FoodStatus::Fresh),
        ];
        let ids: Vec<_> = classify(&items, today())
            .expiring_soon
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec![ItemId(1), ItemId(2)]);
    }

    #[test]
    fn donated_and_consumed_are_never_expiring_soon() {
        let items = vec![
            item(1, 1, FoodStatus::Donated),
            item(2, 1, FoodStatus::Consumed),
            item(3, 1, FoodStatus::DonationCancelled),
        ];
        let buckets = classify(&items, today());
        assert_eq!(buckets.expiring_soon.len(), 1);
        assert_eq!(buckets.expiring_soon[0].id, ItemId(3));
    }

    #[test]
    fn yesterday_item_moves_to_expired_after_reconcile() {
        let mut items = vec![item(1, -1, FoodStatus::Fresh), item(2, 1, FoodStatus::Fresh)];
        reconcile(&mut items, today());
        let buckets = classify(&items, today());

        assert_eq!(buckets.expired.len(), 1);
        assert_eq!(buckets.expired[0].id, ItemId(1));
        assert!(buckets.expiring_soon.iter().all(|i| i.id != ItemId(1)));
    }

    #[test]
    fn all_bucket_sorted_by_expiry() {
        let items = vec![
            item(1, 9, FoodStatus::Fresh),
            item(2, -4, FoodStatus::Expired),
            item(3, 1, FoodStatus::Consumed),
        ];
        let ids: Vec<_> = classify(&items, today()).all.iter().map(|i| i.id.0).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn custom_window() {
        let items = vec![item(1, 6, FoodStatus::Fresh)];
        assert!(classify(&items, today()).expiring_soon.is_empty());
        assert_eq!(classify_with_window(&items, today(), 7).expiring_soon.len(), 1);
    }

    #[test]
    fn oversized_window_saturates() {
        let filter = expiring_soon_filter(today(), 100_000_000);
        assert_eq!(filter.expiry_until, Some(latest_expiry_date()));

        let items = vec![item(1, 400, FoodStatus::Fresh), item(2, -1, FoodStatus::Fresh)];
        let soon = classify_with_window(&items, today(), i64::MAX).expiring_soon;
        assert_eq!(soon.len(), 1);
        assert_eq!(soon[0].id.0, 1);
    }

    #[test]
    fn negative_window_covers_today_only() {
        let items = vec![item(1, 0, FoodStatus::Fresh), item(2, 1, FoodStatus::Fresh)];
        let soon = classify_with_window(&items, today(), -5).expiring_soon;
        assert_eq!(soon.len(), 1);
        assert_eq!(soon[0].id.0, 1);
    }
}
