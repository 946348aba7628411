use async_trait::async_trait;

use super::{errors::ContactError, models::ContactRequest};

#[async_trait]
pub trait ContactService: Send + Sync + 'static {
    /// Forwards a submission to the company inbox and thanks the submitter.
    async fn send_message(&self, request: ContactRequest) -> Result<(), ContactError>;
}
