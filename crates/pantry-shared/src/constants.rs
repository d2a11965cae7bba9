/// Application name
pub const APP_NAME: &str = "Pantry";

/// Days ahead of today (inclusive) that count as "expiring soon"
pub const EXPIRING_WINDOW_DAYS: i64 = 3;

/// Upper bound accepted for `EXPIRING_WINDOW_DAYS`
pub const MAX_EXPIRING_WINDOW_DAYS: i64 = 366;

/// Accepted range of expiry years; dates are stored as `YYYY-MM-DD` text
pub const MIN_EXPIRY_YEAR: i32 = 1;
pub const MAX_EXPIRY_YEAR: i32 = 9999;

/// Field length limits for food items
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_QUANTITY_LEN: usize = 50;
pub const MAX_CATEGORY_LEN: usize = 50;

/// Username and password rules for signup
pub const MAX_USERNAME_LEN: usize = 150;
pub const MIN_PASSWORD_LEN: usize = 8;

/// BLAKE3 rounds applied to each password hash, and the most a stored
/// hash may ask for
pub const PASSWORD_HASH_ROUNDS: u32 = 50_000;
pub const MAX_PASSWORD_HASH_ROUNDS: u32 = 1_000_000;

/// Salt size for password hashing, in bytes
pub const PASSWORD_SALT_SIZE: usize = 16;

/// Session token size, in bytes (hex-encoded on the wire)
pub const SESSION_TOKEN_SIZE: usize = 32;

/// Default session lifetime in hours (two weeks)
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 336;

/// Upper bound accepted for `SESSION_TTL_HOURS` (one year)
pub const MAX_SESSION_TTL_HOURS: i64 = 8760;

/// Default HTTP API port
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Key derivation contexts (BLAKE3)
pub const KDF_CONTEXT_PASSWORD: &str = "pantry-password-v1";
pub const KDF_CONTEXT_SESSION: &str = "pantry-session-token-v1";
