use std::sync::Arc;

use async_trait::async_trait;

use super::{
    errors::SubscriptionServiceError,
    models::{
        email::{EmailError, SubscriberEmail},
        email_log::{EmailLogStatus, EmailLogType, NewEmailLog},
        subscriber::{
            NewSubscriber, NewSubscriberRequest, Subscriber, SubscriberStatus,
            ValidSubscriberRequest,
        },
    },
    ports::{
        MailingList, MailingListFields, MailingListProfile, SubscribeOutcome, SubscriberRepository,
        SubscriptionService, UnsubscribeOutcome,
    },
};
use crate::domain::mail::{
    models::{Brand, DeliveryReport},
    ports::TransactionalMailer,
    templates,
};

/// Keeps the local subscriber store, the mailing-list provider and the
/// transactional mailer in step.
///
/// The store is written first and is the source of truth. Provider calls
/// run afterwards and their failures are logged, never returned. A provider
/// that is `None` is not configured and is skipped.
pub struct Subscription<R, L, M>
where
    R: SubscriberRepository,
    L: MailingList,
    M: TransactionalMailer,
{
    pub repo: Arc<R>,
    mailing_list: Option<Arc<L>>,
    mailer: Option<Arc<M>>,
    brand: Brand,
}

impl<R, L, M> Subscription<R, L, M>
where
    R: SubscriberRepository,
    L: MailingList,
    M: TransactionalMailer,
{
    pub fn new(
        repo: Arc<R>,
        mailing_list: Option<Arc<L>>,
        mailer: Option<Arc<M>>,
        brand: Brand,
    ) -> Self {
        Self {
            repo,
            mailing_list,
            mailer,
            brand,
        }
    }

    #[tracing::instrument(name = "Creating a new subscriber", skip(self, request))]
    async fn create(
        &self,
        request: ValidSubscriberRequest,
    ) -> Result<SubscribeOutcome, SubscriptionServiceError> {
        let subscriber = self.repo.insert(NewSubscriber::active(request)).await?;

        let mailer_list_id = self.push_to_mailing_list(&subscriber).await;
        let subscriber = subscriber.with_mailer_list_id(mailer_list_id);

        let report = self.send_welcome(&subscriber).await;
        let subject = templates::welcome_subject(&self.brand);
        self.log_email(&subscriber, EmailLogType::Welcome, &subject, report)
            .await?;

        Ok(SubscribeOutcome::Created(subscriber))
    }

    #[tracing::instrument(name = "Reactivating an unsubscribed subscriber", skip(self, existing, request))]
    async fn reactivate(
        &self,
        existing: Subscriber,
        request: ValidSubscriberRequest,
    ) -> Result<SubscribeOutcome, SubscriptionServiceError> {
        let subscriber = self.repo.update(&existing.reactivate(&request)).await?;

        let subscriber = self.resync_mailing_list(subscriber).await;

        let report = self.send_welcome(&subscriber).await;
        let subject = templates::welcome_subject(&self.brand);
        self.log_email(&subscriber, EmailLogType::Welcome, &subject, report)
            .await?;

        Ok(SubscribeOutcome::Reactivated(subscriber))
    }

    /// Creates the remote subscriber and stores its id locally. Returns the
    /// id only when both steps succeeded.
    async fn push_to_mailing_list(&self, subscriber: &Subscriber) -> Option<String> {
        let Some(mailing_list) = &self.mailing_list else {
            tracing::info!("Mailing list not configured, skipping mailing list sync");
            return None;
        };

        match mailing_list
            .create_subscriber(&subscriber.email, &profile_of(subscriber))
            .await
        {
            Ok(remote) => self.store_mailer_list_id(subscriber, remote.id).await,
            Err(error) => {
                tracing::warn!(
                    error.cause_chain = ?error,
                    "Failed to add subscriber to the mailing list",
                );
                None
            }
        }
    }

    async fn resync_mailing_list(&self, subscriber: Subscriber) -> Subscriber {
        let Some(mailing_list) = &self.mailing_list else {
            tracing::info!("Mailing list not configured, skipping mailing list sync");
            return subscriber;
        };

        match mailing_list.get_subscriber(&subscriber.email).await {
            Ok(Some(_)) => {
                if let Err(error) = mailing_list
                    .update_subscriber(&subscriber.email, &profile_of(&subscriber))
                    .await
                {
                    tracing::warn!(
                        error.cause_chain = ?error,
                        "Failed to update subscriber on the mailing list",
                    );
                }
                subscriber
            }
            Ok(None) => {
                let mailer_list_id = self.push_to_mailing_list(&subscriber).await;
                match mailer_list_id {
                    Some(id) => subscriber.with_mailer_list_id(Some(id)),
                    None => subscriber,
                }
            }
            Err(error) => {
                tracing::warn!(
                    error.cause_chain = ?error,
                    "Failed to look subscriber up on the mailing list",
                );
                subscriber
            }
        }
    }

    async fn store_mailer_list_id(&self, subscriber: &Subscriber, remote_id: String) -> Option<String> {
        match self.repo.set_mailer_list_id(subscriber.id, &remote_id).await {
            Ok(()) => Some(remote_id),
            Err(error) => {
                tracing::warn!(
                    error.cause_chain = ?error,
                    "Failed to store the mailing list id of a subscriber",
                );
                None
            }
        }
    }

    async fn send_welcome(&self, subscriber: &Subscriber) -> Option<DeliveryReport> {
        let Some(mailer) = &self.mailer else {
            tracing::info!("Transactional mail not configured, skipping welcome email");
            return None;
        };
        let report = mailer
            .send_welcome_email(&subscriber.email, subscriber.first_name.as_ref())
            .await;
        trace_delivery("welcome", &report);
        Some(report)
    }

    async fn send_unsubscribe_confirmation(&self, subscriber: &Subscriber) -> Option<DeliveryReport> {
        let Some(mailer) = &self.mailer else {
            tracing::info!("Transactional mail not configured, skipping unsubscribe confirmation");
            return None;
        };
        let report = mailer.send_unsubscribe_confirmation(&subscriber.email).await;
        trace_delivery("unsubscribe confirmation", &report);
        Some(report)
    }

    async fn log_email(
        &self,
        subscriber: &Subscriber,
        log_type: EmailLogType,
        subject: &str,
        report: Option<DeliveryReport>,
    ) -> Result<(), SubscriptionServiceError> {
        self.repo
            .append_email_log(NewEmailLog {
                subscriber_id: subscriber.id,
                log_type,
                status: EmailLogStatus::from(report.as_ref()),
                subject: subject.to_string(),
            })
            .await?;
        Ok(())
    }
}

fn profile_of(subscriber: &Subscriber) -> MailingListProfile {
    MailingListProfile {
        name: subscriber.display_name(),
        fields: MailingListFields {
            first_name: subscriber.first_name.as_ref().map(|n| n.to_string()),
            last_name: subscriber.last_name.as_ref().map(|n| n.to_string()),
            source: subscriber.source.clone(),
        },
    }
}

fn trace_delivery(kind: &str, report: &DeliveryReport) {
    match report {
        DeliveryReport::Sent { message_id } => {
            tracing::info!(%message_id, "{} email sent", kind)
        }
        DeliveryReport::Failed { error } => {
            tracing::error!(%error, "{} email failed", kind)
        }
    }
}

#[async_trait]
impl<R, L, M> SubscriptionService for Subscription<R, L, M>
where
    R: SubscriberRepository,
    L: MailingList,
    M: TransactionalMailer,
{
    #[tracing::instrument(
        name = "Subscribing to the newsletter",
        skip(self, req),
        fields(subscriber_email = %req.email)
    )]
    async fn subscribe(
        &self,
        req: NewSubscriberRequest,
    ) -> Result<SubscribeOutcome, SubscriptionServiceError> {
        let request = ValidSubscriberRequest::try_from(req)?;

        match self.repo.find_by_email(&request.email).await? {
            Some(existing) if existing.is_unsubscribed() => self.reactivate(existing, request).await,
            Some(existing) => Err(SubscriptionServiceError::AlreadySubscribed(
                existing.email.into(),
            )),
            None => self.create(request).await,
        }
    }

    #[tracing::instrument(
        name = "Unsubscribing from the newsletter",
        skip(self, email),
        fields(subscriber_email = %email)
    )]
    async fn unsubscribe(&self, email: &str) -> Result<UnsubscribeOutcome, SubscriptionServiceError> {
        let email = match SubscriberEmail::parse(email.to_string()) {
            Ok(email) => email,
            Err(EmailError::Missing) => return Err(SubscriptionServiceError::MissingEmail),
            // A malformed address can never have been stored.
            Err(EmailError::Invalid(_)) => {
                return Err(SubscriptionServiceError::NotFound(email.to_string()))
            }
        };

        let subscriber = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| SubscriptionServiceError::NotFound(email.to_string()))?;

        if subscriber.is_unsubscribed() {
            return Ok(UnsubscribeOutcome::AlreadyUnsubscribed);
        }

        let subscriber = self
            .repo
            .update(&subscriber.with_status(SubscriberStatus::Unsubscribed))
            .await?;

        match &self.mailing_list {
            Some(mailing_list) => {
                if let Err(error) = mailing_list.delete_subscriber(&subscriber.email).await {
                    tracing::warn!(
                        error.cause_chain = ?error,
                        "Failed to remove subscriber from the mailing list",
                    );
                }
            }
            None => tracing::info!("Mailing list not configured, skipping mailing list removal"),
        }

        let report = self.send_unsubscribe_confirmation(&subscriber).await;
        let subject = templates::unsubscribe_subject(&self.brand);
        self.log_email(&subscriber, EmailLogType::Transactional, &subject, report)
            .await?;

        Ok(UnsubscribeOutcome::Unsubscribed(subscriber))
    }
}
