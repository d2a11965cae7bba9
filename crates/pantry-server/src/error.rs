use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pantry_shared::error::AuthError;
use pantry_shared::validation::ValidationErrors;
use pantry_shared::PantryError;
use pantry_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not found")]
    NotFound,

    #[error("Validation failed")]
    Validation(ValidationErrors),

    #[error("Authentication required")]
    Unauthorized,

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PantryError> for ServerError {
    fn from(e: PantryError) -> Self {
        match e {
            PantryError::NotFound => ServerError::NotFound,
            PantryError::Validation(errors) => ServerError::Validation(errors),
            PantryError::Auth(AuthError::UsernameTaken) => {
                ServerError::Conflict(AuthError::UsernameTaken.to_string())
            }
            PantryError::Auth(AuthError::SessionExpired) => ServerError::Unauthorized,
            PantryError::Auth(AuthError::InvalidCredentials) => {
                ServerError::InvalidCredentials(AuthError::InvalidCredentials.to_string())
            }
            PantryError::Auth(other) => ServerError::Internal(other.to_string()),
            PantryError::Store(msg) => ServerError::Internal(msg),
        }
    }
}

impl From<AuthError> for ServerError {
    fn from(e: AuthError) -> Self {
        ServerError::from(PantryError::from(e))
    }
}

impl From<StoreError> for ServerError {
    fn from(e: StoreError) -> Self {
        ServerError::from(PantryError::from(e))
    }
}

impl From<ValidationErrors> for ServerError {
    fn from(errors: ValidationErrors) -> Self {
        ServerError::Validation(errors)
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ServerError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ServerError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            ServerError::InvalidCredentials(_) => (StatusCode::UNAUTHORIZED, self.to_string()),
            ServerError::Forbidden(_) => (StatusCode::FORBIDDEN, self.to_string()),
            ServerError::Conflict(_) => (StatusCode::CONFLICT, self.to_string()),
            ServerError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = match &self {
            ServerError::Validation(fields) => serde_json::json!({
                "error": message,
                "fields": fields,
            }),
            _ => serde_json::json!({
                "error": message,
            }),
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: impl Into<ServerError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn auth_errors_map_to_http_status() {
        assert_eq!(status_of(AuthError::InvalidCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AuthError::SessionExpired), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AuthError::UsernameTaken), StatusCode::CONFLICT);
        assert_eq!(status_of(AuthError::MalformedHash), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn store_errors_map_to_http_status() {
        assert_eq!(status_of(StoreError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(StoreError::Migration("v002".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(status_of(PantryError::NotFound), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_errors_map_to_bad_request() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "This field is required.");
        assert_eq!(status_of(errors), StatusCode::BAD_REQUEST);
    }
}
