use crate::domain::mail::models::Brand;
use crate::domain::subscription::models::email::SubscriberEmail;
use secrecy::{ExposeSecret, Secret};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use sqlx::ConnectOptions;

/// Key shipped in the sample environment files; never a real credential.
const PLACEHOLDER_API_KEY: &str = "your_mailerlite_api_key";

pub enum Environment {
    Local,
    Production,
}

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub general: GeneralSettings,
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub mailing_list: MailingListSettings,
    pub smtp: SmtpSettings,
    #[serde(default)]
    pub company: Brand,
}

#[derive(serde::Deserialize, Clone)]
pub struct GeneralSettings {
    pub log_level: String,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub database_name: String,
    pub require_ssl: bool,
}

#[derive(serde::Deserialize, Clone)]
pub struct MailingListSettings {
    pub base_url: String,
    pub api_key: Option<Secret<String>>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

#[derive(serde::Deserialize, Clone)]
pub struct SmtpSettings {
    pub host: Option<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<Secret<String>>,
    pub sender_email: String,
    pub sender_name: Option<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl Settings {
    pub fn log_level(&self) -> String {
        self.general.log_level.clone()
    }
}

impl DatabaseSettings {
    pub fn without_db(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };
        PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
            .ssl_mode(ssl_mode)
    }

    pub fn with_db(&self) -> PgConnectOptions {
        self.without_db()
            .database(&self.database_name)
            .log_statements(tracing::log::LevelFilter::Trace)
    }
}

fn is_set(value: Option<&str>) -> bool {
    value.map_or(false, |v| !v.trim().is_empty())
}

impl MailingListSettings {
    /// The provider is only used with a real API key.
    pub fn is_configured(&self) -> bool {
        let key = self.api_key.as_ref().map(|k| k.expose_secret().as_str());
        is_set(key) && key != Some(PLACEHOLDER_API_KEY)
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_milliseconds)
    }
}

impl SmtpSettings {
    /// Transactional mail needs a relay host and a full set of credentials.
    pub fn is_configured(&self) -> bool {
        is_set(self.host.as_deref())
            && is_set(self.username.as_deref())
            && is_set(self.password.as_ref().map(|p| p.expose_secret().as_str()))
    }

    pub fn sender(&self) -> Result<SubscriberEmail, String> {
        SubscriberEmail::parse(self.sender_email.clone()).map_err(|e| e.to_string())
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_milliseconds)
    }

    /// Port 465 speaks TLS from the first byte, every other port upgrades
    /// with STARTTLS.
    pub fn implicit_tls(&self) -> bool {
        self.port == 465
    }
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either 'local' or 'production'.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path =
        std::env::current_dir().map_err(|e| config::ConfigError::Message(e.to_string()))?;
    let configuration_directory = base_path.join("configuration");
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;

    let mut settings = config::Config::default();
    settings.merge(config::File::from(configuration_directory.join("base")).required(true))?;
    settings.merge(
        config::File::from(configuration_directory.join(environment.as_str())).required(true),
    )?;
    // E.g. APP_SMTP__HOST=smtp.improvmx.com sets `smtp.host`
    settings.merge(config::Environment::with_prefix("app").separator("__"))?;
    settings.try_into()
}
