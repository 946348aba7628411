use async_trait::async_trait;

use super::models::{DeliveryReport, OutgoingEmail};
use crate::domain::subscription::models::{email::SubscriberEmail, name::SubscriberName};

/// Sends one-off (non-campaign) emails through a relay.
///
/// None of the operations fail: every attempt ends in a [`DeliveryReport`].
#[async_trait]
pub trait TransactionalMailer: Send + Sync + 'static {
    async fn send_email(&self, email: OutgoingEmail) -> DeliveryReport;

    async fn send_welcome_email(
        &self,
        to: &SubscriberEmail,
        first_name: Option<&SubscriberName>,
    ) -> DeliveryReport;

    async fn send_unsubscribe_confirmation(&self, to: &SubscriberEmail) -> DeliveryReport;
}
