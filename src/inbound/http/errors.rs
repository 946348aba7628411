use crate::domain::admin::errors::AdminServiceError;
use crate::domain::contact::errors::ContactError;
use crate::domain::subscription::errors::SubscriptionServiceError;
use crate::inbound::http::responses::ApiResponse;

use actix_web::HttpResponse;
use actix_web::{http::StatusCode, ResponseError};

pub const INVALID_SUBSCRIBER: &str = "Invalid input data. Please check your email address.";
pub const MISSING_EMAIL: &str = "Email address is required.";
pub const ALREADY_SUBSCRIBED: &str = "This email is already subscribed to our newsletter.";
pub const NOT_SUBSCRIBED: &str = "Email address not found in our newsletter list.";
pub const MISSING_EMAILS: &str = "Emails array is required.";
pub const DELIVERY_FAILED: &str = "Failed to send message. Please try again.";
pub const INTERNAL_ERROR: &str = "Internal server error. Please try again later.";

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl AppError {
    /// Replaces the generic message of an unexpected failure with the one of
    /// the operation that failed.
    pub fn or_message(self, message: &str) -> Self {
        match self {
            AppError::Unexpected(source) => AppError::Internal {
                message: message.to_string(),
                source,
            },
            other => other,
        }
    }

    fn user_message(&self) -> String {
        match self {
            AppError::Validation(message) | AppError::NotFound(message) => message.clone(),
            AppError::Internal { message, .. } => message.clone(),
            AppError::Unexpected(_) => INTERNAL_ERROR.to_string(),
        }
    }
}

impl From<SubscriptionServiceError> for AppError {
    fn from(error: SubscriptionServiceError) -> Self {
        match error {
            SubscriptionServiceError::Validation(_) => {
                AppError::Validation(INVALID_SUBSCRIBER.to_string())
            }
            SubscriptionServiceError::MissingEmail => AppError::Validation(MISSING_EMAIL.to_string()),
            SubscriptionServiceError::AlreadySubscribed(_) => {
                AppError::Validation(ALREADY_SUBSCRIBED.to_string())
            }
            SubscriptionServiceError::NotFound(_) => AppError::NotFound(NOT_SUBSCRIBED.to_string()),
            SubscriptionServiceError::Unexpected(e) => AppError::Unexpected(e),
        }
    }
}

impl From<AdminServiceError> for AppError {
    fn from(error: AdminServiceError) -> Self {
        match error {
            AdminServiceError::MissingEmails => AppError::Validation(MISSING_EMAILS.to_string()),
            AdminServiceError::Unexpected(e) => AppError::Unexpected(e),
        }
    }
}

impl From<ContactError> for AppError {
    fn from(error: ContactError) -> Self {
        match error {
            ContactError::MissingFields | ContactError::InvalidEmail => {
                AppError::Validation(error.to_string())
            }
            ContactError::DeliveryFailed(cause) => AppError::Internal {
                message: DELIVERY_FAILED.to_string(),
                source: anyhow::anyhow!(cause),
            },
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal { .. } | AppError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        HttpResponse::build(self.status_code()).json(ApiResponse::failure(self.user_message()))
    }
}
