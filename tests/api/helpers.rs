use once_cell::sync::Lazy;
use redlotus::configuration::{get_configuration, DatabaseSettings, Settings};
use redlotus::outbound::telemetry::init_logger;
use redlotus::startup;
use secrecy::Secret;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use uuid::Uuid;
use wiremock::MockServer;

pub const MAILING_LIST_API_KEY: &str = "test-mailing-list-key";

static TRACING: Lazy<()> = Lazy::new(|| {
    let c = get_configuration().expect("Failed to read configuration");
    let default_filter_level = c.general.log_level;
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        init_logger(&subscriber_name, &default_filter_level, std::io::stdout);
    } else {
        init_logger(&subscriber_name, &default_filter_level, std::io::sink);
    }
});

#[derive(Debug, sqlx::FromRow)]
pub struct StoredSubscriber {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub status: String,
    pub tags: Vec<String>,
    pub source: Option<String>,
    pub mailer_list_id: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct StoredEmailLog {
    #[sqlx(rename = "type")]
    pub log_type: String,
    pub status: String,
    pub subject: String,
}

pub struct TestApp {
    pub address: String,
    #[allow(dead_code)]
    pub port: u16,
    pub db_pool: PgPool,
    pub mailing_list_server: MockServer,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn post_subscribe(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/newsletter/subscribe", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_unsubscribe(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/newsletter/unsubscribe", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_unsubscribe(&self, email: Option<&str>) -> reqwest::Response {
        let mut request = self
            .api_client
            .get(&format!("{}/api/newsletter/unsubscribe", &self.address));
        if let Some(email) = email {
            request = request.query(&[("email", email)]);
        }
        request
            .send()
            .await
            .expect("Failed to execute unsubscribe request.")
    }

    pub async fn get_subscribers(&self, query: &[(&str, &str)]) -> reqwest::Response {
        self.api_client
            .get(&format!("{}/api/newsletter/subscribers", &self.address))
            .query(query)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_subscribers(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/newsletter/subscribers", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_contact(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/contact", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_raw(&self, route: &str, body: &'static str) -> reqwest::Response {
        self.api_client
            .post(&format!("{}{}", &self.address, route))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn stored_subscribers(&self) -> Vec<StoredSubscriber> {
        sqlx::query_as(
            "SELECT id, email, first_name, last_name, status, tags, source, mailer_list_id \
             FROM subscribers ORDER BY created_at",
        )
        .fetch_all(&self.db_pool)
        .await
        .expect("Failed to fetch saved subscribers.")
    }

    pub async fn stored_subscriber(&self, email: &str) -> StoredSubscriber {
        sqlx::query_as(
            "SELECT id, email, first_name, last_name, status, tags, source, mailer_list_id \
             FROM subscribers WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.db_pool)
        .await
        .expect("Failed to fetch saved subscriber.")
    }

    pub async fn email_logs(&self, subscriber_id: Uuid) -> Vec<StoredEmailLog> {
        sqlx::query_as(
            "SELECT type, status, subject FROM email_logs \
             WHERE subscriber_id = $1 ORDER BY created_at",
        )
        .bind(subscriber_id)
        .fetch_all(&self.db_pool)
        .await
        .expect("Failed to fetch the email log.")
    }
}

pub async fn body_of(response: reqwest::Response) -> serde_json::Value {
    response
        .json()
        .await
        .expect("Response body is not valid JSON.")
}

/// App wired to a mock mailing list, with transactional email disabled.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

pub async fn spawn_app_without_mailing_list() -> TestApp {
    spawn_app_with(|c| c.mailing_list.api_key = None).await
}

async fn spawn_app_with(customise: impl FnOnce(&mut Settings)) -> TestApp {
    Lazy::force(&TRACING);
    let mailing_list_server = MockServer::start().await;
    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration");
        c.database.database_name = Uuid::new_v4().to_string();
        c.application.port = 0;
        c.mailing_list.base_url = mailing_list_server.uri();
        c.mailing_list.api_key = Some(Secret::new(MAILING_LIST_API_KEY.to_string()));
        c.mailing_list.timeout_milliseconds = 500;
        c.smtp.host = None;
        customise(&mut c);
        c
    };

    let db_pool = configure_database(&configuration.database).await;

    let application = startup::build(configuration)
        .await
        .expect("Failed to build application");
    let application_port = application.port();
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address: format!("http://localhost:{}", application_port),
        port: application_port,
        db_pool,
        mailing_list_server,
        api_client: reqwest::Client::new(),
    }
}

pub async fn configure_database(config: &DatabaseSettings) -> PgPool {
    let mut connection = PgConnection::connect_with(&config.without_db())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.database_name).as_str())
        .await
        .expect("Failed to create database");

    let connection_pool = PgPool::connect_with(config.with_db())
        .await
        .expect("Failed to connect to Postgres");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate database");

    connection_pool
}
