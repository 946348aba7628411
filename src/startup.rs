use std::sync::Arc;

use crate::configuration::{MailingListSettings, Settings, SmtpSettings};
use crate::domain::admin::service::Admin;
use crate::domain::contact::service::ContactRelay;
use crate::domain::mail::models::Brand;
use crate::domain::subscription::service::Subscription;
use crate::inbound::http::Application;
use crate::outbound::db::postgres_db::PostgresDb;
use crate::outbound::mailer::smtp_mailer::SmtpMailer;
use crate::outbound::mailing_list::mailerlite_client::MailerLiteClient;

pub type SubscriptionServiceImpl = Subscription<PostgresDb, MailerLiteClient, SmtpMailer>;
pub type AdminServiceImpl = Admin<PostgresDb>;
pub type ContactServiceImpl = ContactRelay<SmtpMailer>;

/// `None` unless a usable API key is configured.
pub fn mailing_list(configuration: &MailingListSettings) -> Option<Arc<MailerLiteClient>> {
    if !configuration.is_configured() {
        tracing::info!("Mailing list API key not configured, remote sync disabled");
        return None;
    }
    match MailerLiteClient::new(configuration.clone()) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            tracing::error!(error.cause_chain = ?e, "Failed to build the mailing list client");
            None
        }
    }
}

/// `None` unless the SMTP relay and its credentials are configured.
pub fn mailer(configuration: &SmtpSettings, brand: &Brand) -> Option<Arc<SmtpMailer>> {
    if !configuration.is_configured() {
        tracing::info!("SMTP relay not configured, transactional email disabled");
        return None;
    }
    match SmtpMailer::new(configuration.clone(), brand.clone()) {
        Ok(mailer) => Some(Arc::new(mailer)),
        Err(e) => {
            tracing::error!(error.cause_chain = ?e, "Failed to build the SMTP mailer");
            None
        }
    }
}

pub async fn build(configuration: Settings) -> Result<Application, std::io::Error> {
    let repo = Arc::new(PostgresDb::new(&configuration.database));
    let mailing_list = mailing_list(&configuration.mailing_list);
    let mailer = mailer(&configuration.smtp, &configuration.company);

    let subscription_service = Subscription::new(
        repo.clone(),
        mailing_list,
        mailer.clone(),
        configuration.company.clone(),
    );
    let admin_service = Admin::new(repo);
    let contact_service = ContactRelay::new(mailer, configuration.company);

    Application::build(
        subscription_service,
        admin_service,
        contact_service,
        configuration.application,
    )
    .await
}
