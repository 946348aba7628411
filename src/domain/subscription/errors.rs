use super::models::{email::EmailError, subscriber::SubscriberValidationError};
use super::ports::SubscriberRepositoryError;

#[derive(thiserror::Error, Debug)]
pub enum SubscriptionServiceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Email address is required")]
    MissingEmail,

    #[error("{0} is already subscribed")]
    AlreadySubscribed(String),

    #[error("Subscriber not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<SubscriberValidationError> for SubscriptionServiceError {
    fn from(error: SubscriberValidationError) -> Self {
        match error {
            SubscriberValidationError::InvalidEmail(EmailError::Missing) => Self::MissingEmail,
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<SubscriberRepositoryError> for SubscriptionServiceError {
    fn from(error: SubscriberRepositoryError) -> Self {
        match error {
            SubscriberRepositoryError::AlreadyExists(email) => Self::AlreadySubscribed(email),
            SubscriberRepositoryError::SubscriberNotFound => {
                Self::NotFound("subscriber vanished during the request".into())
            }
            SubscriberRepositoryError::Corrupted(e) => {
                Self::Unexpected(anyhow::anyhow!("corrupted subscriber record: {}", e))
            }
            SubscriberRepositoryError::Unexpected(e) => Self::Unexpected(e),
        }
    }
}
