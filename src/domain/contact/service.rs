use std::sync::Arc;

use async_trait::async_trait;

use super::{
    errors::ContactError,
    models::{ContactMessage, ContactRequest},
    ports::ContactService,
    templates,
};
use crate::domain::{
    mail::{
        models::{Brand, DeliveryReport, OutgoingEmail},
        ports::TransactionalMailer,
    },
    subscription::models::email::SubscriberEmail,
};

const CONTACT_SERVICE: &str = "contact-form";

pub struct ContactRelay<M: TransactionalMailer> {
    mailer: Option<Arc<M>>,
    brand: Brand,
}

impl<M: TransactionalMailer> ContactRelay<M> {
    pub fn new(mailer: Option<Arc<M>>, brand: Brand) -> Self {
        Self { mailer, brand }
    }
}

#[async_trait]
impl<M: TransactionalMailer> ContactService for ContactRelay<M> {
    #[tracing::instrument(
        name = "Relaying a contact form submission",
        skip(self, request),
        fields(contact_email = tracing::field::Empty)
    )]
    async fn send_message(&self, request: ContactRequest) -> Result<(), ContactError> {
        let contact = ContactMessage::try_from(request)?;
        tracing::Span::current().record("contact_email", tracing::field::display(&contact.email));

        let Some(mailer) = &self.mailer else {
            tracing::error!("Transactional mail not configured, cannot relay contact message");
            return Err(ContactError::DeliveryFailed(
                "transactional mail not configured".into(),
            ));
        };

        let company_inbox = SubscriberEmail::parse(self.brand.contact_email.clone())
            .map_err(|e| ContactError::DeliveryFailed(e.to_string()))?;
        let notification = OutgoingEmail::new(
            company_inbox,
            templates::admin_notification(&self.brand, &contact),
        )
        .reply_to(contact.email.clone())
        .tagged("contact", CONTACT_SERVICE);

        if let DeliveryReport::Failed { error } = mailer.send_email(notification).await {
            tracing::error!(%error, "Failed to send contact email to the company inbox");
            return Err(ContactError::DeliveryFailed(error));
        }

        let confirmation = OutgoingEmail::new(
            contact.email.clone(),
            templates::confirmation(&self.brand, &contact),
        )
        .tagged("confirmation", CONTACT_SERVICE);

        if let DeliveryReport::Failed { error } = mailer.send_email(confirmation).await {
            // Best effort once the company inbox has the message.
            tracing::warn!(%error, "Failed to send contact confirmation to the submitter");
        }

        Ok(())
    }
}
