//! Accounts and bearer-token sessions.
//!
//! Signup and login hand out a random token; clients send it back as
//! `Authorization: Bearer <token>`. [`require_session`] resolves it to a
//! [`CurrentUser`] that every inventory handler receives.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use pantry_shared::auth::{
    generate_session_token, hash_password, hash_session_token, verify_password,
};
use pantry_shared::error::AuthError;
use pantry_shared::validation::validate_signup;
use pantry_shared::{Notice, UserId};
use pantry_store::{Session, StoreError, User};

use crate::api::AppState;
use crate::error::ServerError;

/// The authenticated caller, inserted by [`require_session`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: String,
    pub token_hash: String,
}

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: User,
    pub notice: Option<Notice>,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ServerError> {
    let token = bearer_token(req.headers()).ok_or(ServerError::Unauthorized)?;
    let token_hash = hash_session_token(token);

    let user = {
        let db = state.db()?;
        match db.user_for_session(&token_hash, Utc::now()) {
            Ok(user) => user,
            Err(StoreError::NotFound) => {
                debug!("rejected unknown or expired session");
                return Err(AuthError::SessionExpired.into());
            }
            Err(e) => return Err(e.into()),
        }
    };

    req.extensions_mut().insert(CurrentUser {
        id: user.id,
        username: user.username,
        token_hash,
    });
    Ok(next.run(req).await)
}

/// When a session opened at `now` stops being valid.
fn session_expiry(ttl_hours: i64, now: DateTime<Utc>) -> Result<DateTime<Utc>, ServerError> {
    Duration::try_hours(ttl_hours)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| ServerError::Internal(format!("session TTL out of range: {ttl_hours}h")))
}

/// Create a session for `user` and return the raw token.
fn start_session(
    state: &AppState,
    user: &User,
    now: DateTime<Utc>,
    expires_at: DateTime<Utc>,
) -> Result<String, ServerError> {
    let token = generate_session_token();
    let session = Session {
        token_hash: hash_session_token(&token),
        user_id: user.id,
        created_at: now,
        expires_at,
    };
    state.db()?.create_session(&session)?;
    Ok(token)
}

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ServerError> {
    if !state.config.registration_open {
        return Err(ServerError::Forbidden(
            "Registration is closed on this instance".into(),
        ));
    }

    let signup = validate_signup(&req.username, &req.email, &req.password1, &req.password2)?;
    let now = Utc::now();
    let expires_at = session_expiry(state.config.session_ttl_hours, now)?;
    let password_hash = hash_password(&signup.password);

    let user = state
        .db()?
        .create_user(&signup.username, &signup.email, &password_hash, now)
        .map_err(|e| match e {
            StoreError::Conflict(_) => ServerError::from(AuthError::UsernameTaken),
            other => ServerError::from(other),
        })?;
    let token = start_session(&state, &user, now, expires_at)?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            token,
            user,
            notice: Some(Notice::success("Account created successfully. Welcome!")),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, ServerError> {
    let user = match state.db()?.find_user_by_username(req.username.trim()) {
        Ok(user) => user,
        Err(StoreError::NotFound) => return Err(AuthError::InvalidCredentials.into()),
        Err(e) => return Err(e.into()),
    };

    if !verify_password(&req.password, &user.password_hash)? {
        info!(username = %user.username, "failed login");
        return Err(AuthError::InvalidCredentials.into());
    }

    let now = Utc::now();
    let expires_at = session_expiry(state.config.session_ttl_hours, now)?;
    let token = start_session(&state, &user, now, expires_at)?;
    Ok(Json(SessionResponse {
        token,
        user,
        notice: None,
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<serde_json::Value>, ServerError> {
    state.db()?.delete_session(&current.token_hash)?;
    debug!(user = %current.id, "logged out");
    Ok(Json(serde_json::json!({ "logged_out": true })))
}

/// Delete the caller's account along with every item and session they own.
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<serde_json::Value>, ServerError> {
    if !state.db()?.delete_user(current.id)? {
        return Err(ServerError::NotFound);
    }
    info!(user = %current.id, username = %current.username, "account deleted");
    Ok(Json(serde_json::json!({ "deleted": true })))
}

#[cfg(test)]
mod tests {
    use pantry_store::Database;

    use super::*;
    use crate::config::ServerConfig;

    fn state_with_ttl(session_ttl_hours: i64) -> AppState {
        let config = ServerConfig {
            session_ttl_hours,
            ..ServerConfig::default()
        };
        AppState::new(Database::open_in_memory().unwrap(), config)
    }

    fn signup_request(username: &str) -> SignupRequest {
        SignupRequest {
            username: username.into(),
            email: format!("{username}@example.com"),
            password1: "tomato-soup-42".into(),
            password2: "tomato-soup-42".into(),
        }
    }

    #[test]
    fn session_expiry_rejects_out_of_range_ttl() {
        let now = Utc::now();
        assert_eq!(session_expiry(2, now).unwrap(), now + Duration::hours(2));
        assert!(matches!(
            session_expiry(10_000_000_000, now),
            Err(ServerError::Internal(_))
        ));
        assert!(matches!(
            session_expiry(i64::MAX, now),
            Err(ServerError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn signup_with_bad_ttl_creates_no_account() {
        let state = state_with_ttl(10_000_000_000);
        let result = signup(State(state.clone()), Json(signup_request("ivan"))).await;
        assert!(matches!(result, Err(ServerError::Internal(_))));
        assert!(matches!(
            state.db().unwrap().find_user_by_username("ivan"),
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn duplicate_signup_and_bad_login_map_to_auth_errors() {
        let state = state_with_ttl(1);
        signup(State(state.clone()), Json(signup_request("judy")))
            .await
            .unwrap();

        let again = signup(State(state.clone()), Json(signup_request("judy"))).await;
        match again {
            Err(ServerError::Conflict(msg)) => {
                assert_eq!(msg, AuthError::UsernameTaken.to_string())
            }
            other => panic!("expected conflict, got {:?}", other.err()),
        }

        let login_req = LoginRequest {
            username: "judy".into(),
            password: "wrong-password".into(),
        };
        match login(State(state.clone()), Json(login_req)).await {
            Err(ServerError::InvalidCredentials(msg)) => {
                assert_eq!(msg, AuthError::InvalidCredentials.to_string())
            }
            other => panic!("expected invalid credentials, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn corrupt_password_hash_is_internal() {
        let state = state_with_ttl(1);
        state
            .db()
            .unwrap()
            .create_user("kim", "kim@example.com", "not-a-hash", Utc::now())
            .unwrap();

        let login_req = LoginRequest {
            username: "kim".into(),
            password: "whatever-pass".into(),
        };
        assert!(matches!(
            login(State(state), Json(login_req)).await,
            Err(ServerError::Internal(_))
        ));
    }

    #[test]
    fn bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert("authorization", "Bearer abc123".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc123"));

        headers.insert("authorization", "Basic abc123".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        headers.insert("authorization", "Bearer ".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }
}
