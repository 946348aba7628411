use crate::domain::subscription::models::email::SubscriberEmail;

/// Company identity rendered into every outgoing email.
///
/// Deserialized from the `company` configuration section; every field has a
/// default so a partial section is enough.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct Brand {
    /// Short name used in headlines and subjects.
    pub name: String,
    /// Legal name used in footers.
    pub legal_name: String,
    /// Public URL of the website, without trailing slash.
    pub app_url: String,
    /// Inbox that receives contact-form notifications.
    pub contact_email: String,
    pub phone: String,
    pub address_street: String,
    pub address_city: String,
}

impl Default for Brand {
    fn default() -> Self {
        Self {
            name: "Red Lotus International".into(),
            legal_name: "Red Lotus International LLC".into(),
            app_url: "http://127.0.0.1:8000".into(),
            contact_email: "info@redlotusintl.com".into(),
            phone: "+1 (555) 123-4567".into(),
            address_street: "123 Business Park Drive".into(),
            address_city: "Stafford, VA 22554".into(),
        }
    }
}

impl Brand {
    pub fn app_url(&self) -> &str {
        self.app_url.trim_end_matches('/')
    }
}

/// Subject plus both renderings of a message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Classification attached to a message; projected onto SMTP headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTag {
    pub name: String,
    pub value: String,
}

impl EmailTag {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: SubscriberEmail,
    pub message: EmailMessage,
    pub reply_to: Option<SubscriberEmail>,
    pub tags: Vec<EmailTag>,
}

impl OutgoingEmail {
    pub fn new(to: SubscriberEmail, message: EmailMessage) -> Self {
        Self {
            to,
            message,
            reply_to: None,
            tags: Vec::new(),
        }
    }

    pub fn reply_to(self, reply_to: SubscriberEmail) -> Self {
        Self {
            reply_to: Some(reply_to),
            ..self
        }
    }

    pub fn tagged(self, kind: &str, service: &str) -> Self {
        let mut tags = self.tags;
        tags.push(EmailTag::new("type", kind));
        tags.push(EmailTag::new("service", service));
        Self { tags, ..self }
    }

    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag.name == name)
            .map(|tag| tag.value.as_str())
    }
}

/// Outcome of a delivery attempt. Delivery failures are values, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryReport {
    Sent { message_id: String },
    Failed { error: String },
}
