use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use anyhow::Error as ANYHOW_ERROR;
use bigdecimal::ParseBigDecimalError;
use serde_json::Error as JSON_ERROR;
use sqlx::error::Error as SQL_ERROR;
use std::num::{ParseFloatError, ParseIntError};
use std::str::ParseBoolError as PARSE_BOOL_ERROR;
use std::string::FromUtf8Error as FROM_UTF8_ERROR;
use std::{env::VarError, io::Error as IO_ERROR};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::subscriber::SetGlobalDefaultError as TRACING_GLOBAL_DEFAULT_ERROR;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] IO_ERROR),

    #[error("{0}")]
    INT(#[from] ParseIntError),

    #[error("{0}")]
    Float(#[from] ParseFloatError),

    #[error("{0}")]
    ParseBigDecimal(#[from] ParseBigDecimalError),

    #[error("{0}")]
    SQL(#[from] SQL_ERROR),

    #[error("{0}")]
    VAR(#[from] VarError),

    #[error("{0}")]
    TokioJoinError(#[from] JoinError),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("{0}")]
    JsonError(#[from] JSON_ERROR),

    #[error("Server end with error: {0}")]
    ServerError(String),

    #[error("Task error: {0}")]
    TaskError(String),

    #[error("{0}")]
    ParseBoolError(#[from] PARSE_BOOL_ERROR),

    #[error("Tracing error: {0}")]
    SetGlobalDefaultError(#[from] TRACING_GLOBAL_DEFAULT_ERROR),

    #[error("{0}")]
    AnyHowError(#[from] ANYHOW_ERROR),

    #[error("{0}")]
    FromUtf8Error(#[from] FROM_UTF8_ERROR),

    #[error("Invalid option: {option}")]
    InvalidOption { option: String },

    #[error("Missing parameter: {0}")]
    MissingParams(String),

    #[error("Proposal not found: {0}")]
    ProposalNotFound(String),

    #[error("Membership not found: user {user_id} in dao {dao_id}")]
    MembershipNotFound { user_id: String, dao_id: String },

    #[error("Unknown operation: {service}.{method}")]
    UnknownOperation { service: String, method: String },
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request - client sent invalid input
            Error::InvalidOption { .. }
            | Error::MissingParams(_)
            | Error::UnknownOperation { .. }
            | Error::INT(_)
            | Error::Float(_)
            | Error::ParseBigDecimal(_)
            | Error::ParseBoolError(_) => StatusCode::BAD_REQUEST,

            // 404 Not Found - requested entity does not exist
            Error::ProposalNotFound(_) | Error::MembershipNotFound { .. } => {
                StatusCode::NOT_FOUND
            },

            // 500 Internal Server Error - everything else
            Error::Io(_)
            | Error::SQL(_)
            | Error::VAR(_)
            | Error::TokioJoinError(_)
            | Error::ConfigurationError(_)
            | Error::JsonError(_)
            | Error::ServerError(_)
            | Error::TaskError(_)
            | Error::SetGlobalDefaultError(_)
            | Error::AnyHowError(_)
            | Error::FromUtf8Error(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = serde_json::json!({
            "error": status.canonical_reason().unwrap_or("Unknown"),
            "message": self.to_string(),
            "status": status.as_u16(),
        });
        HttpResponse::build(status).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_variants_map_to_404() {
        let err = Error::ProposalNotFound("p-1".to_string());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err = Error::MembershipNotFound {
            user_id: "u-1".to_string(),
            dao_id: "d-1".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn caller_bugs_map_to_400() {
        let err = Error::UnknownOperation {
            service: "treasury".to_string(),
            method: "explode".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = Error::MissingParams("daoId".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn storage_failures_map_to_500() {
        let err = Error::SQL(sqlx::Error::PoolClosed);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
