//! CRUD operations for [`User`] records.

use chrono::{DateTime, Utc};
use pantry_shared::UserId;
use rusqlite::{params, ErrorCode};

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::User;

impl Database {
    /// Register a new user. Fails with [`StoreError::Conflict`] when the
    /// username is taken.
    pub fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        created_at: DateTime<Utc>,
    ) -> Result<User> {
        self.conn()
            .execute(
                "INSERT INTO users (username, email, password_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![username, email, password_hash, created_at.to_rfc3339()],
            )
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(ref err, _)
                    if err.code == ErrorCode::ConstraintViolation =>
                {
                    StoreError::Conflict(format!("username {username}"))
                }
                other => StoreError::Sqlite(other),
            })?;

        let id = UserId(self.conn().last_insert_rowid());
        tracing::info!(user = %id, %username, "user registered");
        self.get_user(id)
    }

    pub fn get_user(&self, id: UserId) -> Result<User> {
        self.conn()
            .query_row(
                "SELECT id, username, email, password_hash, created_at
                 FROM users WHERE id = ?1",
                params![id.0],
                row_to_user,
            )
            .map_err(StoreError::from_query)
    }

    pub fn find_user_by_username(&self, username: &str) -> Result<User> {
        self.conn()
            .query_row(
                "SELECT id, username, email, password_hash, created_at
                 FROM users WHERE username = ?1",
                params![username],
                row_to_user,
            )
            .map_err(StoreError::from_query)
    }

    /// Delete a user together with their items and sessions.
    pub fn delete_user(&self, id: UserId) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM users WHERE id = ?1", params![id.0])?;
        if affected > 0 {
            tracing::info!(user = %id, "user deleted");
        }
        Ok(affected > 0)
    }
}

pub(crate) fn parse_timestamp(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Map a `rusqlite::Row` to a [`User`].
fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let created_str: String = row.get(4)?;

    Ok(User {
        id: UserId(row.get(0)?),
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: parse_timestamp(4, &created_str)?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pantry_shared::{FoodItemDraft, ItemFilter, ItemOrder};

    use super::*;

    #[test]
    fn create_and_lookup() {
        let db = Database::open_in_memory().unwrap();
        let user = db
            .create_user("dana", "dana@example.com", "aa$bb", Utc::now())
            .unwrap();

        assert_eq!(db.find_user_by_username("dana").unwrap(), user);
        assert_eq!(db.get_user(user.id).unwrap().email, "dana@example.com");
        assert!(matches!(
            db.find_user_by_username("nobody"),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn duplicate_username_conflicts() {
        let db = Database::open_in_memory().unwrap();
        db.create_user("erin", "erin@example.com", "aa$bb", Utc::now())
            .unwrap();
        let err = db
            .create_user("erin", "other@example.com", "cc$dd", Utc::now())
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn deleting_user_cascades_to_items() {
        let db = Database::open_in_memory().unwrap();
        let user = db
            .create_user("finn", "finn@example.com", "aa$bb", Utc::now())
            .unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let draft = FoodItemDraft {
            name: "Lentils".into(),
            quantity: "1kg".into(),
            category: None,
            expiry_date: today,
            notes: None,
        };
        db.insert_item(user.id, &draft, today).unwrap();

        assert!(db.delete_user(user.id).unwrap());
        let left: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM food_items", [], |row| row.get(0))
            .unwrap();
        assert_eq!(left, 0);
        assert!(db
            .list_items(user.id, &ItemFilter::all(), ItemOrder::ExpiryAsc)
            .unwrap()
            .is_empty());
    }
}
