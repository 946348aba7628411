use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, thiserror::Error)]
pub enum SubscriberNameError {
    #[error(
        "Subscriber name is too long (maximum allowed is {} characters).",
        SubscriberName::MAX_LENGTH
    )]
    TooLong,
}

/// First or last name of a subscriber. Free text, bounded in length.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SubscriberName(String);

impl SubscriberName {
    const MAX_LENGTH: usize = 256;

    /// Parses an optional name. Blank input is treated as no name at all.
    pub fn parse_optional(s: Option<String>) -> Result<Option<SubscriberName>, SubscriberNameError> {
        match s {
            Some(s) if !s.trim().is_empty() => Self::parse(s).map(Some),
            _ => Ok(None),
        }
    }

    pub fn parse(s: String) -> Result<SubscriberName, SubscriberNameError> {
        let s = s.trim().to_string();
        if s.graphemes(true).count() > SubscriberName::MAX_LENGTH {
            return Err(SubscriberNameError::TooLong);
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SubscriberName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<SubscriberName> for String {
    fn from(name: SubscriberName) -> Self {
        name.0
    }
}
