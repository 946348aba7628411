use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;

use super::{PostgresDb, SubscriberRow, SUBSCRIBER_COLUMNS};
use crate::domain::subscription::{
    models::{
        email::SubscriberEmail,
        email_log::{EmailLog, NewEmailLog},
        subscriber::{NewSubscriber, Subscriber, SubscriberId},
    },
    ports::{SubscriberRepository, SubscriberRepositoryError},
};

#[async_trait]
impl SubscriberRepository for PostgresDb {
    #[tracing::instrument(name = "Looking up subscriber by email", skip(self, email))]
    async fn find_by_email(
        &self,
        email: &SubscriberEmail,
    ) -> Result<Option<Subscriber>, SubscriberRepositoryError> {
        let query = format!("SELECT {} FROM subscribers WHERE email = $1", SUBSCRIBER_COLUMNS);
        let row = sqlx::query_as::<_, SubscriberRow>(&query)
            .bind(email.as_str())
            .fetch_optional(self.pool())
            .await
            .context("Failed to look up subscriber by email")?;

        row.map(Subscriber::try_from).transpose()
    }

    #[tracing::instrument(name = "Saving new subscriber details in db", skip(self, subscriber))]
    async fn insert(
        &self,
        subscriber: NewSubscriber,
    ) -> Result<Subscriber, SubscriberRepositoryError> {
        let now = Utc::now();
        let query = format!(
            r#"INSERT INTO subscribers
                (id, email, first_name, last_name, status, tags, source, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING {}"#,
            SUBSCRIBER_COLUMNS
        );
        let row = sqlx::query_as::<_, SubscriberRow>(&query)
            .bind(uuid::Uuid::new_v4())
            .bind(subscriber.email.as_str())
            .bind(subscriber.first_name.as_ref().map(|n| n.as_str()))
            .bind(subscriber.last_name.as_ref().map(|n| n.as_str()))
            .bind(subscriber.status.as_str())
            .bind(&subscriber.tags)
            .bind(&subscriber.source)
            .bind(now)
            .fetch_one(self.pool())
            .await
            .map_err(|e| match e {
                // A concurrent request inserted the same email first.
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    SubscriberRepositoryError::AlreadyExists(subscriber.email.to_string())
                }
                e => SubscriberRepositoryError::Unexpected(
                    anyhow::Error::new(e).context("Failed to insert a new subscriber"),
                ),
            })?;

        Subscriber::try_from(row)
    }

    #[tracing::instrument(name = "Update subscriber", skip(self, subscriber), fields(subscriber_id = %subscriber.id))]
    async fn update(&self, subscriber: &Subscriber) -> Result<Subscriber, SubscriberRepositoryError> {
        let query = format!(
            r#"UPDATE subscribers
            SET first_name = $1, last_name = $2, status = $3, tags = $4, source = $5,
                mailer_list_id = $6, updated_at = $7
            WHERE id = $8
            RETURNING {}"#,
            SUBSCRIBER_COLUMNS
        );
        let row = sqlx::query_as::<_, SubscriberRow>(&query)
            .bind(subscriber.first_name.as_ref().map(|n| n.as_str()))
            .bind(subscriber.last_name.as_ref().map(|n| n.as_str()))
            .bind(subscriber.status.as_str())
            .bind(&subscriber.tags)
            .bind(&subscriber.source)
            .bind(&subscriber.mailer_list_id)
            .bind(Utc::now())
            .bind(subscriber.id.0)
            .fetch_optional(self.pool())
            .await
            .context("Failed to update subscriber")?
            .ok_or(SubscriberRepositoryError::SubscriberNotFound)?;

        Subscriber::try_from(row)
    }

    #[tracing::instrument(name = "Storing mailing list id", skip(self))]
    async fn set_mailer_list_id(
        &self,
        id: SubscriberId,
        mailer_list_id: &str,
    ) -> Result<(), SubscriberRepositoryError> {
        let result = sqlx::query(
            "UPDATE subscribers SET mailer_list_id = $1, updated_at = $2 WHERE id = $3",
        )
        .bind(mailer_list_id)
        .bind(Utc::now())
        .bind(id.0)
        .execute(self.pool())
        .await
        .context("Failed to store the mailing list id of a subscriber")?;

        if result.rows_affected() == 0 {
            return Err(SubscriberRepositoryError::SubscriberNotFound);
        }
        Ok(())
    }

    #[tracing::instrument(
        name = "Appending to the email log",
        skip(self, log),
        fields(log_type = log.log_type.as_str(), log_status = log.status.as_str())
    )]
    async fn append_email_log(&self, log: NewEmailLog) -> Result<EmailLog, SubscriberRepositoryError> {
        let id = uuid::Uuid::new_v4();
        let created_at = Utc::now();
        sqlx::query(
            r#"INSERT INTO email_logs (id, subscriber_id, type, status, subject, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(id)
        .bind(log.subscriber_id.0)
        .bind(log.log_type.as_str())
        .bind(log.status.as_str())
        .bind(&log.subject)
        .bind(created_at)
        .execute(self.pool())
        .await
        .context("Failed to append to the email log")?;

        Ok(EmailLog {
            id,
            subscriber_id: log.subscriber_id,
            log_type: log.log_type,
            status: log.status,
            subject: log.subject,
            created_at,
        })
    }
}
