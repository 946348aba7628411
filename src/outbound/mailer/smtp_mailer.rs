use std::time::Duration;

use async_trait::async_trait;
use mail_send::mail_builder::{headers::text::Text, MessageBuilder};
use mail_send::SmtpClientBuilder;
use secrecy::{ExposeSecret, Secret};

use crate::configuration::SmtpSettings;
use crate::domain::mail::{
    models::{Brand, DeliveryReport, OutgoingEmail},
    ports::TransactionalMailer,
    templates,
};
use crate::domain::subscription::models::{email::SubscriberEmail, name::SubscriberName};

const DEFAULT_EMAIL_TYPE: &str = "general";
const DEFAULT_SERVICE: &str = "newsletter";

#[derive(Debug, thiserror::Error)]
pub enum SmtpMailerError {
    #[error("smtp configuration error: {0}")]
    Config(String),
    #[error("smtp error: {0}")]
    Smtp(#[from] mail_send::Error),
    #[error("smtp relay did not answer in time")]
    Timeout,
}

/// Relays transactional mail through an authenticated SMTP server.
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    host: String,
    port: u16,
    implicit_tls: bool,
    username: String,
    password: Secret<String>,
    sender: SubscriberEmail,
    sender_name: String,
    timeout: Duration,
    brand: Brand,
}

impl SmtpMailer {
    pub fn new(configuration: SmtpSettings, brand: Brand) -> Result<Self, SmtpMailerError> {
        let implicit_tls = configuration.implicit_tls();
        let timeout = configuration.timeout();
        let sender = configuration.sender().map_err(SmtpMailerError::Config)?;
        let host = configuration
            .host
            .ok_or_else(|| SmtpMailerError::Config("missing SMTP host".into()))?;
        let username = configuration
            .username
            .ok_or_else(|| SmtpMailerError::Config("missing SMTP username".into()))?;
        let password = configuration
            .password
            .ok_or_else(|| SmtpMailerError::Config("missing SMTP password".into()))?;
        let sender_name = configuration
            .sender_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| brand.name.clone());

        Ok(Self {
            host,
            port: configuration.port,
            implicit_tls,
            username,
            password,
            sender,
            sender_name,
            timeout,
            brand,
        })
    }

    fn message_id(&self) -> String {
        let domain = self
            .sender
            .as_str()
            .rsplit('@')
            .next()
            .unwrap_or("localhost");
        format!("{}@{}", uuid::Uuid::new_v4(), domain)
    }

    fn build_message<'a>(&'a self, email: &'a OutgoingEmail, message_id: &'a str) -> MessageBuilder<'a> {
        let mut message = MessageBuilder::new()
            .from((self.sender_name.as_str(), self.sender.as_str()))
            .to(email.to.as_str())
            .subject(email.message.subject.as_str())
            .html_body(email.message.html.as_str())
            .text_body(email.message.text.as_str())
            .message_id(message_id)
            .header(
                "X-Email-Type",
                Text::new(email.tag("type").unwrap_or(DEFAULT_EMAIL_TYPE)),
            )
            .header(
                "X-Service",
                Text::new(email.tag("service").unwrap_or(DEFAULT_SERVICE)),
            );

        if let Some(reply_to) = &email.reply_to {
            message = message.reply_to(reply_to.as_str());
        }

        message
    }

    async fn deliver(&self, message: MessageBuilder<'_>) -> Result<(), SmtpMailerError> {
        let credentials = (self.username.as_str(), self.password.expose_secret().as_str());
        let send = async {
            SmtpClientBuilder::new(self.host.as_str(), self.port)
                .implicit_tls(self.implicit_tls)
                .credentials(credentials)
                .timeout(self.timeout)
                .connect()
                .await?
                .send(message)
                .await
        };

        tokio::time::timeout(self.timeout, send)
            .await
            .map_err(|_| SmtpMailerError::Timeout)??;
        Ok(())
    }
}

#[async_trait]
impl TransactionalMailer for SmtpMailer {
    #[tracing::instrument(
        name = "Sending transactional email",
        skip(self, email),
        fields(
            recipient = %email.to,
            email_type = email.tag("type").unwrap_or(DEFAULT_EMAIL_TYPE),
        )
    )]
    async fn send_email(&self, email: OutgoingEmail) -> DeliveryReport {
        let message_id = self.message_id();
        let message = self.build_message(&email, &message_id);

        match self.deliver(message).await {
            Ok(()) => {
                tracing::info!(%message_id, "Email sent");
                DeliveryReport::Sent { message_id }
            }
            Err(e) => {
                tracing::error!(error.cause_chain = ?e, error.message = %e, "Failed to send email");
                DeliveryReport::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn send_welcome_email(
        &self,
        to: &SubscriberEmail,
        first_name: Option<&SubscriberName>,
    ) -> DeliveryReport {
        let message = templates::welcome(&self.brand, to, first_name);
        self.send_email(OutgoingEmail::new(to.clone(), message).tagged("welcome", DEFAULT_SERVICE))
            .await
    }

    async fn send_unsubscribe_confirmation(&self, to: &SubscriberEmail) -> DeliveryReport {
        let message = templates::unsubscribe_confirmation(&self.brand);
        self.send_email(
            OutgoingEmail::new(to.clone(), message).tagged("unsubscribe", DEFAULT_SERVICE),
        )
        .await
    }
}
