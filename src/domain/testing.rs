//! In-memory stand-ins for the ports, used by the service unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::admin::{
    models::{StatusCounts, SubscriberQuery},
    ports::SubscriberDirectory,
};
use crate::domain::mail::{
    models::{DeliveryReport, OutgoingEmail},
    ports::TransactionalMailer,
};
use crate::domain::subscription::{
    models::{
        email::SubscriberEmail,
        email_log::{EmailLog, NewEmailLog},
        name::SubscriberName,
        subscriber::{NewSubscriber, Subscriber, SubscriberId, SubscriberStatus},
    },
    ports::{
        MailingList, MailingListError, MailingListProfile, RemoteSubscriber,
        SubscriberRepository, SubscriberRepositoryError,
    },
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum StoreMode {
    #[default]
    Healthy,
    ConflictingInserts,
    Unavailable,
}

#[derive(Default)]
pub struct InMemorySubscriberRepository {
    subscribers: Mutex<Vec<Subscriber>>,
    logs: Mutex<Vec<EmailLog>>,
    mutations: AtomicUsize,
    mode: StoreMode,
}

impl InMemorySubscriberRepository {
    /// Every lookup misses and every insert loses a race.
    pub fn with_conflicting_inserts() -> Self {
        Self {
            mode: StoreMode::ConflictingInserts,
            ..Default::default()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            mode: StoreMode::Unavailable,
            ..Default::default()
        }
    }

    pub fn subscribers(&self) -> Vec<Subscriber> {
        self.subscribers.lock().unwrap().clone()
    }

    pub fn logs(&self) -> Vec<EmailLog> {
        self.logs.lock().unwrap().clone()
    }

    /// Number of writes performed so far.
    pub fn mutations(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    /// Changes a status behind the services' back.
    pub fn force_status(&self, email: &str, status: SubscriberStatus) {
        let mut subscribers = self.subscribers.lock().unwrap();
        let subscriber = subscribers
            .iter_mut()
            .find(|s| s.email.as_str() == email)
            .expect("unknown subscriber");
        subscriber.status = status;
    }

    fn check(&self) -> Result<(), SubscriberRepositoryError> {
        if self.mode == StoreMode::Unavailable {
            return Err(anyhow::anyhow!("store unavailable").into());
        }
        Ok(())
    }

    fn wrote(&self) {
        self.mutations.fetch_add(1, Ordering::SeqCst);
    }
}

fn matches_search(subscriber: &Subscriber, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    let contains = |value: Option<&str>| {
        value
            .map(|v| v.to_lowercase().contains(&needle))
            .unwrap_or(false)
    };
    contains(Some(subscriber.email.as_str()))
        || contains(subscriber.first_name.as_ref().map(SubscriberName::as_str))
        || contains(subscriber.last_name.as_ref().map(SubscriberName::as_str))
}

#[async_trait]
impl SubscriberRepository for InMemorySubscriberRepository {
    async fn find_by_email(
        &self,
        email: &SubscriberEmail,
    ) -> Result<Option<Subscriber>, SubscriberRepositoryError> {
        self.check()?;
        if self.mode == StoreMode::ConflictingInserts {
            return Ok(None);
        }
        Ok(self
            .subscribers
            .lock()
            .unwrap()
            .iter()
            .find(|s| &s.email == email)
            .cloned())
    }

    async fn insert(&self, new: NewSubscriber) -> Result<Subscriber, SubscriberRepositoryError> {
        self.check()?;
        let mut subscribers = self.subscribers.lock().unwrap();
        if self.mode == StoreMode::ConflictingInserts
            || subscribers.iter().any(|s| s.email == new.email)
        {
            return Err(SubscriberRepositoryError::AlreadyExists(new.email.into()));
        }
        let now = Utc::now();
        let subscriber = Subscriber {
            id: SubscriberId(Uuid::new_v4()),
            email: new.email,
            first_name: new.first_name,
            last_name: new.last_name,
            status: new.status,
            tags: new.tags,
            source: Some(new.source),
            mailer_list_id: None,
            created_at: now,
            updated_at: now,
        };
        subscribers.push(subscriber.clone());
        self.wrote();
        Ok(subscriber)
    }

    async fn update(&self, subscriber: &Subscriber) -> Result<Subscriber, SubscriberRepositoryError> {
        self.check()?;
        let mut subscribers = self.subscribers.lock().unwrap();
        let stored = subscribers
            .iter_mut()
            .find(|s| s.id == subscriber.id)
            .ok_or(SubscriberRepositoryError::SubscriberNotFound)?;
        *stored = Subscriber {
            updated_at: Utc::now(),
            created_at: stored.created_at,
            ..subscriber.clone()
        };
        self.wrote();
        Ok(stored.clone())
    }

    async fn set_mailer_list_id(
        &self,
        id: SubscriberId,
        mailer_list_id: &str,
    ) -> Result<(), SubscriberRepositoryError> {
        self.check()?;
        let mut subscribers = self.subscribers.lock().unwrap();
        let stored = subscribers
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(SubscriberRepositoryError::SubscriberNotFound)?;
        stored.mailer_list_id = Some(mailer_list_id.to_string());
        stored.updated_at = Utc::now();
        self.wrote();
        Ok(())
    }

    async fn append_email_log(&self, log: NewEmailLog) -> Result<EmailLog, SubscriberRepositoryError> {
        self.check()?;
        let log = EmailLog {
            id: Uuid::new_v4(),
            subscriber_id: log.subscriber_id,
            log_type: log.log_type,
            status: log.status,
            subject: log.subject,
            created_at: Utc::now(),
        };
        self.logs.lock().unwrap().push(log.clone());
        self.wrote();
        Ok(log)
    }
}

#[async_trait]
impl SubscriberDirectory for InMemorySubscriberRepository {
    async fn list(
        &self,
        query: &SubscriberQuery,
    ) -> Result<(Vec<Subscriber>, u64), SubscriberRepositoryError> {
        self.check()?;
        // Insertion order is creation order, so newest first is reverse order.
        let matching: Vec<Subscriber> = self
            .subscribers
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|s| query.status.map_or(true, |status| s.status == status))
            .filter(|s| query.search.as_deref().map_or(true, |q| matches_search(s, q)))
            .cloned()
            .collect();
        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn count_by_status(&self) -> Result<StatusCounts, SubscriberRepositoryError> {
        self.check()?;
        let mut counts = StatusCounts::default();
        for subscriber in self.subscribers.lock().unwrap().iter() {
            counts.add(subscriber.status, 1);
        }
        Ok(counts)
    }
}

/// Remembers remote subscribers and every call made to it.
#[derive(Default)]
pub struct FakeMailingList {
    remote: Mutex<HashMap<String, (RemoteSubscriber, MailingListProfile)>>,
    calls: Mutex<Vec<String>>,
    next_id: AtomicUsize,
}

impl FakeMailingList {
    pub fn remote(&self, email: &str) -> Option<RemoteSubscriber> {
        self.remote.lock().unwrap().get(email).map(|(r, _)| r.clone())
    }

    pub fn profile(&self, email: &str) -> Option<MailingListProfile> {
        self.remote.lock().unwrap().get(email).map(|(_, p)| p.clone())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &str, email: &SubscriberEmail) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{} {}", call, email));
    }
}

fn not_found() -> MailingListError {
    MailingListError::Status {
        status: 404,
        body: r#"{"message":"Resource not found."}"#.into(),
    }
}

#[async_trait]
impl MailingList for FakeMailingList {
    async fn create_subscriber(
        &self,
        email: &SubscriberEmail,
        profile: &MailingListProfile,
    ) -> Result<RemoteSubscriber, MailingListError> {
        self.record("create", email);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let remote = RemoteSubscriber {
            id: format!("ml-{}", id),
            email: email.to_string(),
            status: Some("active".into()),
        };
        self.remote
            .lock()
            .unwrap()
            .insert(email.to_string(), (remote.clone(), profile.clone()));
        Ok(remote)
    }

    async fn get_subscriber(
        &self,
        email: &SubscriberEmail,
    ) -> Result<Option<RemoteSubscriber>, MailingListError> {
        self.record("get", email);
        Ok(self.remote(email.as_str()))
    }

    async fn update_subscriber(
        &self,
        email: &SubscriberEmail,
        profile: &MailingListProfile,
    ) -> Result<RemoteSubscriber, MailingListError> {
        self.record("update", email);
        let mut remote = self.remote.lock().unwrap();
        let entry = remote.get_mut(email.as_str()).ok_or_else(not_found)?;
        entry.1 = profile.clone();
        Ok(entry.0.clone())
    }

    async fn delete_subscriber(&self, email: &SubscriberEmail) -> Result<(), MailingListError> {
        self.record("delete", email);
        self.remote
            .lock()
            .unwrap()
            .remove(email.as_str())
            .map(|_| ())
            .ok_or_else(not_found)
    }
}

/// A provider that is down.
pub struct FailingMailingList;

fn outage() -> MailingListError {
    MailingListError::Status {
        status: 503,
        body: "Service Unavailable".into(),
    }
}

#[async_trait]
impl MailingList for FailingMailingList {
    async fn create_subscriber(
        &self,
        _: &SubscriberEmail,
        _: &MailingListProfile,
    ) -> Result<RemoteSubscriber, MailingListError> {
        Err(outage())
    }

    async fn get_subscriber(
        &self,
        _: &SubscriberEmail,
    ) -> Result<Option<RemoteSubscriber>, MailingListError> {
        Err(outage())
    }

    async fn update_subscriber(
        &self,
        _: &SubscriberEmail,
        _: &MailingListProfile,
    ) -> Result<RemoteSubscriber, MailingListError> {
        Err(outage())
    }

    async fn delete_subscriber(&self, _: &SubscriberEmail) -> Result<(), MailingListError> {
        Err(outage())
    }
}

/// Records what would have been sent.
#[derive(Default)]
pub struct FakeMailer {
    sent: Mutex<Vec<(String, String)>>,
    outgoing: Mutex<Vec<OutgoingEmail>>,
    fail_all: bool,
    fail_for: Option<String>,
}

impl FakeMailer {
    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Default::default()
        }
    }

    /// Fails only deliveries addressed to `recipient`.
    pub fn failing_for(recipient: &str) -> Self {
        Self {
            fail_for: Some(recipient.to_string()),
            ..Default::default()
        }
    }

    /// `(kind, recipient)` of every attempt.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Every message handed to `send_email`.
    pub fn outgoing(&self) -> Vec<OutgoingEmail> {
        self.outgoing.lock().unwrap().clone()
    }

    fn attempt(&self, kind: &str, to: &SubscriberEmail) -> DeliveryReport {
        self.sent
            .lock()
            .unwrap()
            .push((kind.to_string(), to.to_string()));
        if self.fail_all || self.fail_for.as_deref() == Some(to.as_str()) {
            DeliveryReport::Failed {
                error: "Connection refused".into(),
            }
        } else {
            DeliveryReport::Sent {
                message_id: format!("{}@test.local", Uuid::new_v4()),
            }
        }
    }
}

#[async_trait]
impl TransactionalMailer for FakeMailer {
    async fn send_email(&self, email: OutgoingEmail) -> DeliveryReport {
        let report = self.attempt("email", &email.to);
        self.outgoing.lock().unwrap().push(email);
        report
    }

    async fn send_welcome_email(
        &self,
        to: &SubscriberEmail,
        _first_name: Option<&SubscriberName>,
    ) -> DeliveryReport {
        self.attempt("welcome", to)
    }

    async fn send_unsubscribe_confirmation(&self, to: &SubscriberEmail) -> DeliveryReport {
        self.attempt("unsubscribe", to)
    }
}
