#[derive(thiserror::Error, Debug)]
pub enum ContactError {
    #[error("Name, email, and message are required")]
    MissingFields,

    #[error("Please provide a valid email address")]
    InvalidEmail,

    #[error("Failed to send message: {0}")]
    DeliveryFailed(String),
}
