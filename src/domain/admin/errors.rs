use crate::domain::subscription::ports::SubscriberRepositoryError;

#[derive(thiserror::Error, Debug)]
pub enum AdminServiceError {
    #[error("Emails array is required")]
    MissingEmails,

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<SubscriberRepositoryError> for AdminServiceError {
    fn from(error: SubscriberRepositoryError) -> Self {
        match error {
            SubscriberRepositoryError::Unexpected(e) => Self::Unexpected(e),
            other => Self::Unexpected(anyhow::Error::new(other)),
        }
    }
}
