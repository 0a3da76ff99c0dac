// Console error types
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::config;
use crate::database::DatabaseError;
use crate::schema::FieldError;
use crate::services::AccountError;
use crate::ui::{messages::messages, templates};

/// Errors surfaced by console actions, rendered as the generic error page
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    // 500, or 503 when the store is unreachable
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    // 400
    #[error("Invalid field value: {0}")]
    Field(#[from] FieldError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    // 401, answered with a redirect to the login page
    #[error("Login required")]
    Unauthorized,

    // 404
    #[error("Not found: {0}")]
    NotFound(String),

    // 409 or 400 depending on the account problem
    #[error(transparent)]
    Account(#[from] AccountError),
}

impl AdminError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AdminError::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        AdminError::BadRequest(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AdminError::Database(DatabaseError::ConfigMissing(_))
            | AdminError::Database(DatabaseError::InvalidDatabaseUrl) => StatusCode::SERVICE_UNAVAILABLE,
            AdminError::Database(DatabaseError::NotFound(_)) => StatusCode::NOT_FOUND,
            AdminError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AdminError::Field(_) | AdminError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AdminError::Unauthorized => StatusCode::UNAUTHORIZED,
            AdminError::NotFound(_) => StatusCode::NOT_FOUND,
            AdminError::Account(AccountError::AlreadyExists(_)) => StatusCode::CONFLICT,
            AdminError::Account(AccountError::InvalidName(_)) => StatusCode::BAD_REQUEST,
            AdminError::Account(AccountError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text safe to show in the browser; storage internals stay in the logs
    pub fn client_message(&self) -> Option<String> {
        match self {
            AdminError::Database(_) | AdminError::Account(AccountError::Database(_)) => None,
            other => Some(other.to_string()),
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        if let AdminError::Unauthorized = self {
            return Redirect::to("/login").into_response();
        }

        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Console action failed: {}", self);
        } else {
            tracing::debug!("Console action rejected: {}", self);
        }

        let page = templates::error_page(&config::config().ui.title, messages(), self.client_message().as_deref());
        (status, Html(page)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_variants_to_status_codes() {
        assert_eq!(AdminError::not_found("users 9").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AdminError::Field(FieldError::UnknownField("x".to_string())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AdminError::Database(DatabaseError::QueryError("boom".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AdminError::Account(AccountError::AlreadyExists("alice".to_string())).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn hides_storage_details_from_clients() {
        let err = AdminError::Database(DatabaseError::QueryError("relation users missing".to_string()));
        assert_eq!(err.client_message(), None);
        assert_eq!(
            AdminError::not_found("users 9").client_message().as_deref(),
            Some("Not found: users 9")
        );
    }

    #[test]
    fn unauthorized_redirects_to_login() {
        let response = AdminError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/login");
    }
}
