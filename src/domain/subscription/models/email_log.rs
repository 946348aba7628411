use chrono::{DateTime, Utc};

use super::subscriber::SubscriberId;
use crate::domain::mail::models::DeliveryReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailLogType {
    Welcome,
    Transactional,
    Campaign,
}

impl EmailLogType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailLogType::Welcome => "WELCOME",
            EmailLogType::Transactional => "TRANSACTIONAL",
            EmailLogType::Campaign => "CAMPAIGN",
        }
    }
}

/// What actually happened to the message a log row refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailLogStatus {
    Sent,
    Failed,
    /// The mailer is not configured, so nothing was attempted.
    Skipped,
}

impl EmailLogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailLogStatus::Sent => "SENT",
            EmailLogStatus::Failed => "FAILED",
            EmailLogStatus::Skipped => "SKIPPED",
        }
    }
}

impl From<Option<&DeliveryReport>> for EmailLogStatus {
    fn from(report: Option<&DeliveryReport>) -> Self {
        match report {
            Some(DeliveryReport::Sent { .. }) => EmailLogStatus::Sent,
            Some(DeliveryReport::Failed { .. }) => EmailLogStatus::Failed,
            None => EmailLogStatus::Skipped,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEmailLog {
    pub subscriber_id: SubscriberId,
    pub log_type: EmailLogType,
    pub status: EmailLogStatus,
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmailLog {
    pub id: uuid::Uuid,
    pub subscriber_id: SubscriberId,
    pub log_type: EmailLogType,
    pub status: EmailLogStatus,
    pub subject: String,
    pub created_at: DateTime<Utc>,
}
