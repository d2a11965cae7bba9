//! CRUD operations for food items.
//!
//! Every query is scoped by `user_id`; a row owned by someone else behaves
//! exactly like a missing row.

use chrono::NaiveDate;
use pantry_shared::{FoodItem, FoodItemDraft, FoodStatus, ItemFilter, ItemId, ItemOrder, UserId};
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter};

use crate::database::Database;
use crate::error::{Result, StoreError};

const DATE_FORMAT: &str = "%Y-%m-%d";

const ITEM_COLUMNS: &str =
    "id, user_id, name, quantity, category, added_date, expiry_date, status, notes";

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a new `FRESH` item and return it with its assigned id.
    pub fn insert_item(
        &self,
        user: UserId,
        draft: &FoodItemDraft,
        added_date: NaiveDate,
    ) -> Result<FoodItem> {
        self.conn().execute(
            "INSERT INTO food_items
                (user_id, name, quantity, category, added_date, expiry_date, status, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                user.0,
                draft.name,
                draft.quantity,
                draft.category,
                date_to_sql(added_date),
                date_to_sql(draft.expiry_date),
                FoodStatus::Fresh.code(),
                draft.notes,
            ],
        )?;

        let id = ItemId(self.conn().last_insert_rowid());
        tracing::debug!(user = %user, item = %id, "inserted food item");
        self.get_item(id, user)
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch one item, provided `user` owns it.
    pub fn get_item(&self, id: ItemId, user: UserId) -> Result<FoodItem> {
        self.conn()
            .query_row(
                &format!("SELECT {ITEM_COLUMNS} FROM food_items WHERE id = ?1 AND user_id = ?2"),
                params![id.0, user.0],
                row_to_item,
            )
            .map_err(StoreError::from_query)
    }

    /// List a user's items matching `filter`.
    pub fn list_items(
        &self,
        user: UserId,
        filter: &ItemFilter,
        order: ItemOrder,
    ) -> Result<Vec<FoodItem>> {
        let (clause, values) = where_clause(user, filter);
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM food_items WHERE {clause} ORDER BY {}",
            order_by(order)
        );

        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values), row_to_item)?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Write back the mutable fields of `item`. `added_date` is never touched.
    pub fn update_item(&self, item: &FoodItem) -> Result<FoodItem> {
        let affected = self.conn().execute(
            "UPDATE food_items
             SET name = ?1, quantity = ?2, category = ?3, expiry_date = ?4,
                 status = ?5, notes = ?6
             WHERE id = ?7 AND user_id = ?8",
            params![
                item.name,
                item.quantity,
                item.category,
                date_to_sql(item.expiry_date),
                item.status.code(),
                item.notes,
                item.id.0,
                item.owner.0,
            ],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        self.get_item(item.id, item.owner)
    }

    /// Set `status` on every matching item of `user` in a single statement.
    pub fn update_status_where(
        &self,
        user: UserId,
        filter: &ItemFilter,
        status: FoodStatus,
    ) -> Result<usize> {
        let (clause, mut values) = where_clause(user, filter);
        let sql = format!("UPDATE food_items SET status = ? WHERE {clause}");
        values.insert(0, Value::Text(status.code().to_string()));

        let affected = self.conn().execute(&sql, params_from_iter(values))?;
        Ok(affected)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Delete an item owned by `user`. Returns `true` if a row was deleted.
    pub fn delete_item(&self, id: ItemId, user: UserId) -> Result<bool> {
        let affected = self.conn().execute(
            "DELETE FROM food_items WHERE id = ?1 AND user_id = ?2",
            params![id.0, user.0],
        )?;
        Ok(affected > 0)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date_to_sql(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn status_values(statuses: &[FoodStatus]) -> (String, Vec<Value>) {
    let placeholders = vec!["?"; statuses.len()].join(", ");
    let values = statuses
        .iter()
        .map(|s| Value::Text(s.code().to_string()))
        .collect();
    (placeholders, values)
}

/// Build the `WHERE` clause for `filter`, always scoped to `user`.
///
/// Placeholders are anonymous (`?`) and bound in order from the returned
/// values. Dates compare correctly as `YYYY-MM-DD` text.
fn where_clause(user: UserId, filter: &ItemFilter) -> (String, Vec<Value>) {
    let mut clauses = vec!["user_id = ?".to_string()];
    let mut values = vec![Value::Integer(user.0)];

    if let Some(date) = filter.expiry_before {
        clauses.push("expiry_date < ?".into());
        values.push(Value::Text(date_to_sql(date)));
    }
    if let Some(date) = filter.expiry_from {
        clauses.push("expiry_date >= ?".into());
        values.push(Value::Text(date_to_sql(date)));
    }
    if let Some(date) = filter.expiry_until {
        clauses.push("expiry_date <= ?".into());
        values.push(Value::Text(date_to_sql(date)));
    }
    if let Some(statuses) = &filter.status_in {
        if statuses.is_empty() {
            clauses.push("0".into());
        } else {
            let (placeholders, status_values) = status_values(statuses);
            clauses.push(format!("status IN ({placeholders})"));
            values.extend(status_values);
        }
    }
    if let Some(statuses) = filter.status_not_in.as_deref().filter(|s| !s.is_empty()) {
        let (placeholders, status_values) = status_values(statuses);
        clauses.push(format!("status NOT IN ({placeholders})"));
        values.extend(status_values);
    }

    (clauses.join(" AND "), values)
}

fn order_by(order: ItemOrder) -> &'static str {
    match order {
        ItemOrder::ExpiryAsc => "expiry_date ASC, id ASC",
        ItemOrder::AddedDesc => "added_date DESC, id DESC",
    }
}

fn parse_date(idx: usize, s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Map a `rusqlite::Row` to a [`FoodItem`].
fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<FoodItem> {
    let added_str: String = row.get(5)?;
    let expiry_str: String = row.get(6)?;
    let status_str: String = row.get(7)?;

    let status = status_str
        .parse::<FoodStatus>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?;

    Ok(FoodItem {
        id: ItemId(row.get(0)?),
        owner: UserId(row.get(1)?),
        name: row.get(2)?,
        quantity: row.get(3)?,
        category: row.get(4)?,
        added_date: parse_date(5, &added_str)?,
        expiry_date: parse_date(6, &expiry_str)?,
        status,
        notes: row.get(8)?,
    })
}
