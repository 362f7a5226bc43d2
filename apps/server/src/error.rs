use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use nuchain_core::errors::{DatabaseError, Error as CoreError, InvestmentError, ValidationError};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Core(CoreError::Validation(err))
    }
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    /// Machine-readable failure kind
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<BTreeMap<String, String>>,
    /// The limiting quantity of a funds or capacity rejection
    #[serde(skip_serializing_if = "Option::is_none")]
    available: Option<Decimal>,
}

impl ErrorBody {
    fn new(status: StatusCode, error: &'static str, message: impl Into<String>) -> Self {
        Self {
            code: status.as_u16(),
            error,
            message: message.into(),
            fields: None,
            available: None,
        }
    }

    fn with_field(mut self, field: &str, message: impl Into<String>) -> Self {
        self.fields
            .get_or_insert_with(BTreeMap::new)
            .insert(field.to_string(), message.into());
        self
    }

    fn with_available(mut self, available: Decimal) -> Self {
        self.available = Some(available);
        self
    }
}

fn validation_body(err: &ValidationError) -> ErrorBody {
    let status = StatusCode::BAD_REQUEST;
    let body = ErrorBody::new(status, "validation_error", err.to_string());
    match err {
        ValidationError::InvalidField { field, message } => body.with_field(field, message.clone()),
        ValidationError::MissingField(field) => body.with_field(field, "This field is required."),
        ValidationError::DecimalParse(_) => body,
    }
}

fn core_error_response(err: &CoreError) -> (StatusCode, ErrorBody) {
    match err {
        CoreError::Validation(e) => (StatusCode::BAD_REQUEST, validation_body(e)),
        CoreError::Investment(e) => match e {
            InvestmentError::InvalidAmount(reason) => {
                let status = StatusCode::BAD_REQUEST;
                let body = ErrorBody::new(status, "validation_error", e.to_string())
                    .with_field("amount", reason.clone());
                (status, body)
            }
            InvestmentError::ReactorNotFound(_) => {
                let status = StatusCode::NOT_FOUND;
                (status, ErrorBody::new(status, "not_found", e.to_string()))
            }
            InvestmentError::InsufficientFunds { available, .. } => {
                let status = StatusCode::CONFLICT;
                let body = ErrorBody::new(status, "insufficient_funds", e.to_string())
                    .with_available(*available);
                (status, body)
            }
            InvestmentError::CapacityExceeded { available, .. } => {
                let status = StatusCode::CONFLICT;
                let body = ErrorBody::new(status, "capacity_exceeded", e.to_string())
                    .with_available(*available);
                (status, body)
            }
            InvestmentError::NoWallet(_) => {
                let status = StatusCode::PRECONDITION_FAILED;
                let body = ErrorBody::new(
                    status,
                    "no_wallet",
                    "Connect an external wallet before investing.",
                );
                (status, body)
            }
            InvestmentError::ExternalLockFailed(cause) => {
                tracing::error!("External lock failed: {}", cause);
                external_failure()
            }
        },
        CoreError::Ledger(cause) => {
            tracing::error!("External ledger call failed: {}", cause);
            external_failure()
        }
        CoreError::NotFound(_) | CoreError::Database(DatabaseError::NotFound(_)) => {
            let status = StatusCode::NOT_FOUND;
            (status, ErrorBody::new(status, "not_found", err.to_string()))
        }
        CoreError::Database(DatabaseError::UniqueViolation(detail)) => {
            let status = StatusCode::CONFLICT;
            let body = ErrorBody::new(status, "conflict", "The record already exists.");
            if detail.contains("username") {
                (
                    status,
                    body.with_field("username", "A user with that username already exists."),
                )
            } else {
                (status, body)
            }
        }
        CoreError::ConstraintViolation(_) => {
            let status = StatusCode::CONFLICT;
            (status, ErrorBody::new(status, "conflict", err.to_string()))
        }
        _ => {
            tracing::error!("Request failed: {}", err);
            internal_failure()
        }
    }
}

fn external_failure() -> (StatusCode, ErrorBody) {
    let status = StatusCode::BAD_GATEWAY;
    let body = ErrorBody::new(
        status,
        "external_system_error",
        "The external ledger could not complete the request. Please try again later.",
    );
    (status, body)
}

fn internal_failure() -> (StatusCode, ErrorBody) {
    let status = StatusCode::INTERNAL_SERVER_ERROR;
    (
        status,
        ErrorBody::new(status, "internal_error", "Internal server error"),
    )
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Core(e) => core_error_response(e),
            ApiError::Unauthorized(reason) => {
                let status = StatusCode::UNAUTHORIZED;
                (status, ErrorBody::new(status, "unauthorized", reason.clone()))
            }
            ApiError::Anyhow(e) => {
                tracing::error!("Request failed: {:#}", e);
                internal_failure()
            }
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
