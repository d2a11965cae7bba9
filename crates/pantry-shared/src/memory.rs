//! In-memory [`InventoryStore`] used by this crate's tests.

use std::cell::RefCell;

use chrono::NaiveDate;

use crate::error::{PantryError, Result};
use crate::store::{InventoryStore, ItemFilter, ItemOrder};
use crate::types::{FoodItem, FoodItemDraft, FoodStatus, ItemId, UserId};

#[derive(Default)]
pub struct MemoryStore {
    items: RefCell<Vec<FoodItem>>,
    next_id: RefCell<i64>,
}

impl MemoryStore {
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }
}

impl InventoryStore for MemoryStore {
    fn find_by_user(
        &self,
        user: UserId,
        filter: &ItemFilter,
        order: ItemOrder,
    ) -> Result<Vec<FoodItem>> {
        let mut found: Vec<_> = self
            .items
            .borrow()
            .iter()
            .filter(|i| i.owner == user && filter.matches(i))
            .cloned()
            .collect();
        order.sort(&mut found);
        Ok(found)
    }

    fn get_by_id_and_user(&self, id: ItemId, user: UserId) -> Result<FoodItem> {
        self.items
            .borrow()
            .iter()
            .find(|i| i.id == id && i.owner == user)
            .cloned()
            .ok_or(PantryError::NotFound)
    }

    fn create(
        &self,
        user: UserId,
        draft: &FoodItemDraft,
        added_date: NaiveDate,
    ) -> Result<FoodItem> {
        let mut next_id = self.next_id.borrow_mut();
        *next_id += 1;
        let item = FoodItem {
            id: ItemId(*next_id),
            owner: user,
            name: draft.name.clone(),
            quantity: draft.quantity.clone(),
            category: draft.category.clone(),
            added_date,
            expiry_date: draft.expiry_date,
            status: FoodStatus::Fresh,
            notes: draft.notes.clone(),
        };
        self.items.borrow_mut().push(item.clone());
        Ok(item)
    }

    fn update(&self, item: &FoodItem) -> Result<FoodItem> {
        let mut items = self.items.borrow_mut();
        let slot = items
            .iter_mut()
            .find(|i| i.id == item.id && i.owner == item.owner)
            .ok_or(PantryError::NotFound)?;
        let added_date = slot.added_date;
        *slot = item.clone();
        slot.added_date = added_date;
        Ok(slot.clone())
    }

    fn bulk_update_status(
        &self,
        user: UserId,
        filter: &ItemFilter,
        status: FoodStatus,
    ) -> Result<usize> {
        let mut changed = 0;
        for item in self.items.borrow_mut().iter_mut() {
            if item.owner == user && filter.matches(item) {
                item.status = status;
                changed += 1;
            }
        }
        Ok(changed)
    }

    fn delete(&self, id: ItemId, user: UserId) -> Result<bool> {
        let mut items = self.items.borrow_mut();
        let before = items.len();
        items.retain(|i| !(i.id == id && i.owner == user));
        Ok(items.len() < before)
    }
}
