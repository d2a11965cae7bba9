use chrono::NaiveDate;
use pantry_shared::{
    FoodItem, FoodItemDraft, FoodStatus, InventoryStore, ItemFilter, ItemId, ItemOrder, UserId,
};

use crate::database::Database;

impl InventoryStore for Database {
    fn find_by_user(
        &self,
        user: UserId,
        filter: &ItemFilter,
        order: ItemOrder,
    ) -> pantry_shared::Result<Vec<FoodItem>> {
        Ok(self.list_items(user, filter, order)?)
    }

    fn get_by_id_and_user(&self, id: ItemId, user: UserId) -> pantry_shared::Result<FoodItem> {
        Ok(self.get_item(id, user)?)
    }

    fn create(
        &self,
        user: UserId,
        draft: &FoodItemDraft,
        added_date: NaiveDate,
    ) -> pantry_shared::Result<FoodItem> {
        Ok(self.insert_item(user, draft, added_date)?)
    }

    fn update(&self, item: &FoodItem) -> pantry_shared::Result<FoodItem> {
        Ok(self.update_item(item)?)
    }

    fn bulk_update_status(
        &self,
        user: UserId,
        filter: &ItemFilter,
        status: FoodStatus,
    ) -> pantry_shared::Result<usize> {
        Ok(self.update_status_where(user, filter, status)?)
    }

    fn delete(&self, id: ItemId, user: UserId) -> pantry_shared::Result<bool> {
        Ok(self.delete_item(id, user)?)
    }
}
