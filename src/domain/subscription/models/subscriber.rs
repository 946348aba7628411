use chrono::{DateTime, Utc};

use super::{
    email::{EmailError, SubscriberEmail},
    name::{SubscriberName, SubscriberNameError},
};

pub const DEFAULT_SOURCE: &str = "website";

/// Subscription form payload as received over the wire.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubscriberRequest {
    #[serde(default)]
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub source: Option<String>,
}

impl NewSubscriberRequest {
    pub fn new(email: &str) -> NewSubscriberRequest {
        Self {
            email: email.to_string(),
            ..Default::default()
        }
    }

    pub fn with_names(self, first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: Some(first_name.to_string()),
            last_name: Some(last_name.to_string()),
            ..self
        }
    }

    pub fn with_source(self, source: &str) -> Self {
        Self {
            source: Some(source.to_string()),
            ..self
        }
    }
}

/// A validated subscription request.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSubscriberRequest {
    pub email: SubscriberEmail,
    pub first_name: Option<SubscriberName>,
    pub last_name: Option<SubscriberName>,
    pub source: Option<String>,
}

impl TryFrom<NewSubscriberRequest> for ValidSubscriberRequest {
    type Error = SubscriberValidationError;

    fn try_from(request: NewSubscriberRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            email: SubscriberEmail::parse(request.email)?,
            first_name: SubscriberName::parse_optional(request.first_name)?,
            last_name: SubscriberName::parse_optional(request.last_name)?,
            source: request
                .source
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        })
    }
}

/// Display name sent to the mailing list: "first last", only when a first
/// name is known.
pub(crate) fn display_name(
    first_name: Option<&SubscriberName>,
    last_name: Option<&SubscriberName>,
) -> Option<String> {
    let first_name = first_name?;
    let full = format!(
        "{} {}",
        first_name.as_str(),
        last_name.map(|n| n.as_str()).unwrap_or_default()
    );
    Some(full.trim().to_string())
}

#[derive(thiserror::Error, Debug)]
pub enum SubscriberValidationError {
    #[error("Invalid subscriber name: {0}")]
    InvalidName(#[from] SubscriberNameError),
    #[error("Invalid subscriber email: {0}")]
    InvalidEmail(#[from] EmailError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SubscriberId(pub uuid::Uuid);

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SubscriberStatusError {
    #[error("Unknown subscriber status: {0}")]
    UnknownStatus(String),
}

/// Consent state of a subscriber. Only `Active` subscribers receive mail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriberStatus {
    Active,
    Unsubscribed,
    Bounced,
    Complained,
}

impl SubscriberStatus {
    const ACTIVE: &'static str = "ACTIVE";
    const UNSUBSCRIBED: &'static str = "UNSUBSCRIBED";
    const BOUNCED: &'static str = "BOUNCED";
    const COMPLAINED: &'static str = "COMPLAINED";

    pub const ALL: [SubscriberStatus; 4] = [
        SubscriberStatus::Active,
        SubscriberStatus::Unsubscribed,
        SubscriberStatus::Bounced,
        SubscriberStatus::Complained,
    ];

    pub fn parse(status: &str) -> Result<SubscriberStatus, SubscriberStatusError> {
        match status {
            Self::ACTIVE => Ok(SubscriberStatus::Active),
            Self::UNSUBSCRIBED => Ok(SubscriberStatus::Unsubscribed),
            Self::BOUNCED => Ok(SubscriberStatus::Bounced),
            Self::COMPLAINED => Ok(SubscriberStatus::Complained),
            _ => Err(SubscriberStatusError::UnknownStatus(status.into())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriberStatus::Active => Self::ACTIVE,
            SubscriberStatus::Unsubscribed => Self::UNSUBSCRIBED,
            SubscriberStatus::Bounced => Self::BOUNCED,
            SubscriberStatus::Complained => Self::COMPLAINED,
        }
    }
}

impl From<SubscriberStatus> for String {
    fn from(value: SubscriberStatus) -> Self {
        value.as_str().to_string()
    }
}

impl serde::Serialize for SubscriberStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Row to be inserted into the subscriber store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscriber {
    pub email: SubscriberEmail,
    pub first_name: Option<SubscriberName>,
    pub last_name: Option<SubscriberName>,
    pub status: SubscriberStatus,
    pub tags: Vec<String>,
    pub source: String,
}

impl NewSubscriber {
    pub fn active(request: ValidSubscriberRequest) -> Self {
        Self {
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            status: SubscriberStatus::Active,
            tags: Vec::new(),
            source: request.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
        }
    }

    pub fn with_tags(self, tags: Vec<String>) -> Self {
        Self { tags, ..self }
    }
}

/// A subscriber as persisted in the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscriber {
    pub id: SubscriberId,
    pub email: SubscriberEmail,
    pub first_name: Option<SubscriberName>,
    pub last_name: Option<SubscriberName>,
    pub status: SubscriberStatus,
    pub tags: Vec<String>,
    pub source: Option<String>,
    pub mailer_list_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscriber {
    pub fn is_unsubscribed(&self) -> bool {
        self.status == SubscriberStatus::Unsubscribed
    }

    /// Turns an unsubscribed record back into an active one. Profile fields
    /// present in the request replace the stored ones; absent fields are kept.
    pub fn reactivate(self, request: &ValidSubscriberRequest) -> Self {
        Self {
            status: SubscriberStatus::Active,
            first_name: request.first_name.clone().or(self.first_name),
            last_name: request.last_name.clone().or(self.last_name),
            source: request.source.clone().or(self.source),
            ..self
        }
    }

    pub fn with_status(self, status: SubscriberStatus) -> Self {
        Self { status, ..self }
    }

    pub fn with_mailer_list_id(self, mailer_list_id: Option<String>) -> Self {
        Self {
            mailer_list_id,
            ..self
        }
    }

    pub fn display_name(&self) -> Option<String> {
        display_name(self.first_name.as_ref(), self.last_name.as_ref())
    }
}
