use crate::configuration::DatabaseSettings;
use crate::domain::subscription::{
    models::{
        email::SubscriberEmail,
        name::SubscriberName,
        subscriber::{Subscriber, SubscriberId, SubscriberStatus},
    },
    ports::SubscriberRepositoryError,
};
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

mod directory_repo;
mod subscriber_repo;

const SUBSCRIBER_COLUMNS: &str = "id, email, first_name, last_name, status, tags, source, \
    mailer_list_id, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct PostgresDb {
    pool: PgPool,
}

impl PostgresDb {
    pub fn new(configuration: &DatabaseSettings) -> PostgresDb {
        PostgresDb {
            pool: PgPoolOptions::new()
                .acquire_timeout(std::time::Duration::from_secs(2))
                .connect_lazy_with(configuration.with_db()),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(sqlx::FromRow)]
struct SubscriberRow {
    id: uuid::Uuid,
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
    status: String,
    tags: Vec<String>,
    source: Option<String>,
    mailer_list_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SubscriberRow> for Subscriber {
    type Error = SubscriberRepositoryError;

    fn try_from(row: SubscriberRow) -> Result<Self, Self::Error> {
        let corrupted = |e: &dyn std::fmt::Display| {
            SubscriberRepositoryError::Corrupted(format!("subscriber {}: {}", row.id, e))
        };
        let email = SubscriberEmail::parse(row.email.clone()).map_err(|e| corrupted(&e))?;
        let first_name =
            SubscriberName::parse_optional(row.first_name.clone()).map_err(|e| corrupted(&e))?;
        let last_name =
            SubscriberName::parse_optional(row.last_name.clone()).map_err(|e| corrupted(&e))?;
        let status = SubscriberStatus::parse(&row.status).map_err(|e| corrupted(&e))?;

        Ok(Subscriber {
            id: SubscriberId(row.id),
            email,
            first_name,
            last_name,
            status,
            tags: row.tags,
            source: row.source,
            mailer_list_id: row.mailer_list_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
