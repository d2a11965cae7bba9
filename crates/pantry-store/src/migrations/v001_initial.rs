//! v001 -- Initial schema creation.
//!
//! Creates `users`, `food_items` and `sessions`. Items and sessions are
//! deleted together with their owning user.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Users
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    username      TEXT NOT NULL UNIQUE,
    email         TEXT NOT NULL,
    password_hash TEXT NOT NULL,              -- salt_hex$hash_hex
    created_at    TEXT NOT NULL               -- RFC-3339
);

-- ----------------------------------------------------------------
-- Food items
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS food_items (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL,             -- FK -> users(id)
    name        TEXT NOT NULL,
    quantity    TEXT NOT NULL,
    category    TEXT,
    added_date  TEXT NOT NULL,                -- YYYY-MM-DD
    expiry_date TEXT NOT NULL,                -- YYYY-MM-DD
    status      TEXT NOT NULL DEFAULT 'FRESH',
    notes       TEXT,

    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_food_items_user_expiry
    ON food_items(user_id, expiry_date);

-- ----------------------------------------------------------------
-- Sessions
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS sessions (
    token_hash TEXT PRIMARY KEY NOT NULL,     -- BLAKE3 of the bearer token
    user_id    INTEGER NOT NULL,              -- FK -> users(id)
    created_at TEXT NOT NULL,                 -- RFC-3339
    expires_at TEXT NOT NULL,                 -- RFC-3339

    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
