use validator::validate_email;

/// A syntactically valid email address, kept exactly as submitted.
///
/// Lookups are case-sensitive, so no normalisation happens here.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(s: String) -> Result<SubscriberEmail, EmailError> {
        if s.trim().is_empty() {
            return Err(EmailError::Missing);
        }
        if validate_email(&s) {
            Ok(Self(s))
        } else {
            Err(EmailError::Invalid(format!("{} is not a valid email", s)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<SubscriberEmail> for String {
    fn from(email: SubscriberEmail) -> Self {
        email.0
    }
}

impl TryFrom<String> for SubscriberEmail {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SubscriberEmail::parse(value)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum EmailError {
    #[error("Email address is required")]
    Missing,
    #[error("Invalid email address: {0}")]
    Invalid(String),
}
