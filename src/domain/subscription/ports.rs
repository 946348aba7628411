use async_trait::async_trait;

use super::errors::SubscriptionServiceError;
use super::models::{
    email::SubscriberEmail,
    email_log::{EmailLog, NewEmailLog},
    subscriber::{NewSubscriber, NewSubscriberRequest, Subscriber, SubscriberId},
};

///  Represents the store of subscriber records and their email history
#[async_trait]
pub trait SubscriberRepository: Send + Sync + 'static {
    /// Looks a subscriber up by its exact email address
    async fn find_by_email(
        &self,
        email: &SubscriberEmail,
    ) -> Result<Option<Subscriber>, SubscriberRepositoryError>;

    /// Inserts a new subscriber. Fails with `AlreadyExists` when the email
    /// is taken, including when a concurrent insert won the race.
    async fn insert(&self, subscriber: NewSubscriber)
        -> Result<Subscriber, SubscriberRepositoryError>;

    /// Persists every mutable field of `subscriber` and bumps `updated_at`
    async fn update(&self, subscriber: &Subscriber) -> Result<Subscriber, SubscriberRepositoryError>;

    /// Records the external mailing-list id of a subscriber
    async fn set_mailer_list_id(
        &self,
        id: SubscriberId,
        mailer_list_id: &str,
    ) -> Result<(), SubscriberRepositoryError>;

    /// Appends a row to the email history
    async fn append_email_log(&self, log: NewEmailLog) -> Result<EmailLog, SubscriberRepositoryError>;
}

#[derive(thiserror::Error, Debug)]
pub enum SubscriberRepositoryError {
    #[error("A subscriber with email {0} already exists")]
    AlreadyExists(String),

    #[error("Subscriber not found")]
    SubscriberNotFound,

    #[error("Stored subscriber is corrupted: {0}")]
    Corrupted(String),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// Profile data mirrored to the mailing-list provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct MailingListFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailingListProfile {
    pub name: Option<String>,
    pub fields: MailingListFields,
}

/// A subscriber as known by the mailing-list provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSubscriber {
    pub id: String,
    pub email: String,
    pub status: Option<String>,
}

/// External mailing-list provider
#[async_trait]
pub trait MailingList: Send + Sync + 'static {
    async fn create_subscriber(
        &self,
        email: &SubscriberEmail,
        profile: &MailingListProfile,
    ) -> Result<RemoteSubscriber, MailingListError>;

    /// `Ok(None)` when the provider does not know the address
    async fn get_subscriber(
        &self,
        email: &SubscriberEmail,
    ) -> Result<Option<RemoteSubscriber>, MailingListError>;

    async fn update_subscriber(
        &self,
        email: &SubscriberEmail,
        profile: &MailingListProfile,
    ) -> Result<RemoteSubscriber, MailingListError>;

    async fn delete_subscriber(&self, email: &SubscriberEmail) -> Result<(), MailingListError>;
}

#[derive(thiserror::Error, Debug)]
pub enum MailingListError {
    #[error("Mailing list API error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Mailing list request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid mailing list request: {0}")]
    InvalidRequest(String),
}

/// What a successful subscribe did.
#[derive(Debug, Clone, PartialEq)]
pub enum SubscribeOutcome {
    Created(Subscriber),
    Reactivated(Subscriber),
}

impl SubscribeOutcome {
    pub fn subscriber(&self) -> &Subscriber {
        match self {
            SubscribeOutcome::Created(s) | SubscribeOutcome::Reactivated(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnsubscribeOutcome {
    Unsubscribed(Subscriber),
    AlreadyUnsubscribed,
}

#[async_trait]
pub trait SubscriptionService: Send + Sync + 'static {
    async fn subscribe(
        &self,
        req: NewSubscriberRequest,
    ) -> Result<SubscribeOutcome, SubscriptionServiceError>;

    async fn unsubscribe(&self, email: &str) -> Result<UnsubscribeOutcome, SubscriptionServiceError>;
}
