use actix_web::{
    error::ResponseError,
    http::StatusCode,
    HttpResponse,
};
use hugard_engine::{ChargeIssuerError, LedgerError, ReportingError};
use log::error;
use thiserror::Error;

use crate::data_objects::CommandResponse;

/// What members see when something breaks on our side. The details only go to the log.
pub const GENERIC_FAILURE: &str = "Oh no, there was an error processing your payment! Please try again later.";
pub const NOT_ALLOWED: &str = "Sorry, but you're not allowed to use this command.";

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("The payment provider could not process the request. {0}")]
    ProviderError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Request came from an unknown community")]
    UnknownCommunity,
    #[error("{NOT_ALLOWED}")]
    InsufficientPermissions,
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
}

impl ServerError {
    /// The text shown to the member. Internal failures are replaced by a generic apology.
    pub fn user_message(&self) -> String {
        match self {
            Self::ValidationError(_) | Self::InvalidRequestBody(_) | Self::InsufficientPermissions => self.to_string(),
            Self::UnknownCommunity => self.to_string(),
            Self::NoRecordFound(_) => self.to_string(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::UnknownCommunity => StatusCode::FORBIDDEN,
            Self::InsufficientPermissions => StatusCode::FORBIDDEN,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::ProviderError(_) => StatusCode::BAD_GATEWAY,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() || self.status_code() == StatusCode::BAD_GATEWAY {
            error!("💻️ {self}");
        }
        HttpResponse::build(self.status_code()).json(CommandResponse::message(self.user_message(), true))
    }
}

impl From<ChargeIssuerError> for ServerError {
    fn from(e: ChargeIssuerError) -> Self {
        match e {
            ChargeIssuerError::InvalidAmount(_) | ChargeIssuerError::BelowMinimum(_) => {
                Self::ValidationError(e.to_string())
            },
            ChargeIssuerError::ProviderUnavailable(_) => Self::ProviderError(e.to_string()),
            ChargeIssuerError::DuplicateInvoice(_) | ChargeIssuerError::DatabaseError(_) => {
                Self::BackendError(e.to_string())
            },
        }
    }
}

impl From<ReportingError> for ServerError {
    fn from(e: ReportingError) -> Self {
        Self::BackendError(e.to_string())
    }
}

impl From<LedgerError> for ServerError {
    fn from(e: LedgerError) -> Self {
        Self::InitializeError(e.to_string())
    }
}
