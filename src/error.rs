//! Errors returned by the directory and the HTTP handlers.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::schemas::UserName;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    /// The payload could not be read into the expected shape
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Could not find user {0}")]
    UserNotFound(UserName),

    #[error("User {0} already exists")]
    DuplicateUser(UserName),

    /// Amounts must be positive and finite
    #[error("Invalid amount {0}: must be a positive, finite number")]
    InvalidAmount(f64),

    #[error("User {0} cannot lend to themselves")]
    SelfTransaction(UserName),

    #[error("No route defined for {0}")]
    UnknownRoute(String),

    /// Initial ledger data breaks a ledger invariant
    #[error("Inconsistent ledger: {0}")]
    InconsistentLedger(String),
}

impl LedgerError {
    /// Machine-readable kind, sent alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::MalformedRequest(_) => "malformed_request",
            LedgerError::UserNotFound(_) => "user_not_found",
            LedgerError::DuplicateUser(_) => "duplicate_user",
            LedgerError::InvalidAmount(_) => "invalid_amount",
            LedgerError::SelfTransaction(_) => "self_transaction",
            LedgerError::UnknownRoute(_) => "unknown_route",
            LedgerError::InconsistentLedger(_) => "inconsistent_ledger",
        }
    }
}

impl ResponseError for LedgerError {
    fn status_code(&self) -> StatusCode {
        match self {
            LedgerError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            LedgerError::UserNotFound(_) | LedgerError::UnknownRoute(_) => StatusCode::NOT_FOUND,
            LedgerError::DuplicateUser(_) => StatusCode::CONFLICT,
            LedgerError::InvalidAmount(_) | LedgerError::SelfTransaction(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            LedgerError::InconsistentLedger(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_user() {
        assert_eq!(
            LedgerError::UserNotFound("zoe".to_string()).to_string(),
            "Could not find user zoe"
        );
        assert_eq!(
            LedgerError::DuplicateUser("adam".to_string()).to_string(),
            "User adam already exists"
        );
    }

    #[test]
    fn status_codes() {
        assert_eq!(
            LedgerError::MalformedRequest(String::new()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            LedgerError::DuplicateUser("adam".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            LedgerError::InvalidAmount(-1.0).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            LedgerError::UnknownRoute("/nope".into()).status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
