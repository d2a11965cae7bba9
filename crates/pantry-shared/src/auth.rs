//! Password and session-token primitives for the auth layer.
//!
//! Passwords are stored as `rounds$salt_hex$hash_hex`. The hash starts as a
//! BLAKE3 derived key over `salt || password` and is then re-keyed
//! `rounds - 1` times, so every guess costs the same work as a login.
//! Session tokens are random and only their BLAKE3 hash is ever persisted.

use rand::RngCore;
use subtle::ConstantTimeEq;

use crate::constants::{
    KDF_CONTEXT_PASSWORD, KDF_CONTEXT_SESSION, MAX_PASSWORD_HASH_ROUNDS, PASSWORD_HASH_ROUNDS,
    PASSWORD_SALT_SIZE, SESSION_TOKEN_SIZE,
};
use crate::error::AuthError;

fn derive_password_key(salt: &[u8], password: &str, rounds: u32) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new_derive_key(KDF_CONTEXT_PASSWORD);
    hasher.update(salt);
    hasher.update(password.as_bytes());
    let mut key = *hasher.finalize().as_bytes();
    for _ in 1..rounds {
        key = *blake3::keyed_hash(&key, salt).as_bytes();
    }
    key
}

pub fn hash_password(password: &str) -> String {
    hash_password_with_rounds(password, PASSWORD_HASH_ROUNDS)
}

fn hash_password_with_rounds(password: &str, rounds: u32) -> String {
    let mut salt = [0u8; PASSWORD_SALT_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    let key = derive_password_key(&salt, password, rounds);
    format!("{rounds}${}${}", hex::encode(salt), hex::encode(key))
}

/// Check `password` against a stored hash in constant time.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, AuthError> {
    let mut parts = stored.splitn(3, '$');
    let (Some(rounds), Some(salt_hex), Some(hash_hex)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(AuthError::MalformedHash);
    };
    let rounds: u32 = rounds.parse().map_err(|_| AuthError::MalformedHash)?;
    if !(1..=MAX_PASSWORD_HASH_ROUNDS).contains(&rounds) {
        return Err(AuthError::MalformedHash);
    }
    let salt = hex::decode(salt_hex).map_err(|_| AuthError::MalformedHash)?;
    let expected = hex::decode(hash_hex).map_err(|_| AuthError::MalformedHash)?;
    if expected.len() != 32 {
        return Err(AuthError::MalformedHash);
    }

    let actual = derive_password_key(&salt, password, rounds);
    Ok(actual.as_slice().ct_eq(expected.as_slice()).unwrap_u8() == 1)
}

/// A fresh bearer token, hex encoded. Shown to the client exactly once.
pub fn generate_session_token() -> String {
    let mut token = [0u8; SESSION_TOKEN_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut token);
    hex::encode(token)
}

/// The form of a session token that is safe to store.
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = blake3::Hasher::new_derive_key(KDF_CONTEXT_SESSION);
    hasher.update(token.as_bytes());
    hasher.finalize().to_hex().to_string()
}
