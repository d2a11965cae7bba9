//! Bearer-token sessions.
//!
//! Only the token hash is stored; see [`pantry_shared::auth`].

use chrono::{DateTime, Utc};
use pantry_shared::UserId;
use rusqlite::params;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{Session, User};
use crate::users::parse_timestamp;

impl Database {
    pub fn create_session(&self, session: &Session) -> Result<()> {
        self.conn().execute(
            "INSERT INTO sessions (token_hash, user_id, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                session.token_hash,
                session.user_id.0,
                session.created_at.to_rfc3339(),
                session.expires_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Resolve a session to its user. Expired sessions are treated as
    /// missing.
    pub fn user_for_session(&self, token_hash: &str, now: DateTime<Utc>) -> Result<User> {
        let (user_id, expires_str): (i64, String) = self
            .conn()
            .query_row(
                "SELECT user_id, expires_at FROM sessions WHERE token_hash = ?1",
                params![token_hash],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .map_err(StoreError::from_query)?;

        let expires_at = parse_timestamp(1, &expires_str)?;
        if expires_at <= now {
            return Err(StoreError::NotFound);
        }
        self.get_user(UserId(user_id))
    }

    pub fn delete_session(&self, token_hash: &str) -> Result<bool> {
        let affected = self.conn().execute(
            "DELETE FROM sessions WHERE token_hash = ?1",
            params![token_hash],
        )?;
        Ok(affected > 0)
    }

    /// Drop every session that expired before `now`.
    pub fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut stmt = self
            .conn()
            .prepare("SELECT token_hash, expires_at FROM sessions")?;
        let rows = stmt.query_map([], |row| {
            let hash: String = row.get(0)?;
            let expires: String = row.get(1)?;
            Ok((hash, parse_timestamp(1, &expires)?))
        })?;

        let mut expired = Vec::new();
        for row in rows {
            let (hash, expires_at) = row?;
            if expires_at <= now {
                expired.push(hash);
            }
        }

        for hash in &expired {
            self.delete_session(hash)?;
        }
        Ok(expired.len())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn session(user_id: UserId, hash: &str, ttl: Duration) -> Session {
        let now = Utc::now();
        Session {
            token_hash: hash.into(),
            user_id,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    #[test]
    fn live_session_resolves_user() {
        let db = Database::open_in_memory().unwrap();
        let user = db
            .create_user("gail", "gail@example.com", "aa$bb", Utc::now())
            .unwrap();
        db.create_session(&session(user.id, "h1", Duration::hours(1)))
            .unwrap();

        assert_eq!(db.user_for_session("h1", Utc::now()).unwrap().id, user.id);
        assert!(matches!(
            db.user_for_session("h2", Utc::now()),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn expired_sessions_rejected_and_purged() {
        let db = Database::open_in_memory().unwrap();
        let user = db
            .create_user("hank", "hank@example.com", "aa$bb", Utc::now())
            .unwrap();
        db.create_session(&session(user.id, "old", Duration::hours(-1)))
            .unwrap();
        db.create_session(&session(user.id, "new", Duration::hours(1)))
            .unwrap();

        assert!(matches!(
            db.user_for_session("old", Utc::now()),
            Err(StoreError::NotFound)
        ));
        assert_eq!(db.purge_expired_sessions(Utc::now()).unwrap(), 1);
        assert!(db.user_for_session("new", Utc::now()).is_ok());
    }

    #[test]
    fn logout_deletes_session() {
        let db = Database::open_in_memory().unwrap();
        let user = db
            .create_user("ivy", "ivy@example.com", "aa$bb", Utc::now())
            .unwrap();
        db.create_session(&session(user.id, "tok", Duration::hours(1)))
            .unwrap();

        assert!(db.delete_session("tok").unwrap());
        assert!(db.user_for_session("tok", Utc::now()).is_err());
    }
}
