use super::errors::ContactError;
use crate::domain::subscription::models::email::SubscriberEmail;

pub const DEFAULT_SUBJECT: &str = "General Inquiry";

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

/// A contact-form submission with its required fields present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: SubscriberEmail,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub message: String,
}

impl ContactMessage {
    pub fn subject(&self) -> &str {
        self.subject.as_deref().unwrap_or(DEFAULT_SUBJECT)
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TryFrom<ContactRequest> for ContactMessage {
    type Error = ContactError;

    fn try_from(request: ContactRequest) -> Result<Self, Self::Error> {
        let (Some(name), Some(email), Some(message)) = (
            present(request.name),
            present(request.email),
            present(request.message),
        ) else {
            return Err(ContactError::MissingFields);
        };
        let email = SubscriberEmail::parse(email).map_err(|_| ContactError::InvalidEmail)?;

        Ok(Self {
            name,
            email,
            phone: present(request.phone),
            company: present(request.company),
            subject: present(request.subject),
            message,
        })
    }
}
