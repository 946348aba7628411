use anyhow::Context;
use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};

use super::{PostgresDb, SubscriberRow, SUBSCRIBER_COLUMNS};
use crate::domain::admin::{
    models::{StatusCounts, SubscriberQuery},
    ports::SubscriberDirectory,
};
use crate::domain::subscription::{
    models::subscriber::{Subscriber, SubscriberStatus},
    ports::SubscriberRepositoryError,
};

/// Escapes the `ILIKE` wildcards so user input only matches literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &SubscriberQuery) {
    let mut clause = " WHERE ";
    if let Some(status) = query.status {
        builder.push(clause).push("status = ").push_bind(status.as_str());
        clause = " AND ";
    }
    if let Some(search) = &query.search {
        let pattern = format!("%{}%", escape_like(search));
        builder
            .push(clause)
            .push("(email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR first_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR last_name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[async_trait]
impl SubscriberDirectory for PostgresDb {
    #[tracing::instrument(name = "Listing subscribers from db", skip(self))]
    async fn list(
        &self,
        query: &SubscriberQuery,
    ) -> Result<(Vec<Subscriber>, u64), SubscriberRepositoryError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM subscribers");
        push_filters(&mut count, query);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(self.pool())
            .await
            .context("Failed to count subscribers")?;

        let mut page = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM subscribers",
            SUBSCRIBER_COLUMNS
        ));
        push_filters(&mut page, query);
        page.push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(i64::from(query.limit))
            .push(" OFFSET ")
            .push_bind(query.offset() as i64);
        let rows: Vec<SubscriberRow> = page
            .build_query_as()
            .fetch_all(self.pool())
            .await
            .context("Failed to fetch a page of subscribers")?;

        let subscribers = rows
            .into_iter()
            .map(Subscriber::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((subscribers, total.max(0) as u64))
    }

    #[tracing::instrument(name = "Counting subscribers by status", skip(self))]
    async fn count_by_status(&self) -> Result<StatusCounts, SubscriberRepositoryError> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM subscribers GROUP BY status")
                .fetch_all(self.pool())
                .await
                .context("Failed to count subscribers by status")?;

        let mut counts = StatusCounts::default();
        for (status, count) in rows {
            let status = SubscriberStatus::parse(&status)
                .map_err(|e| SubscriberRepositoryError::Corrupted(e.to_string()))?;
            counts.add(status, count.max(0) as u64);
        }
        Ok(counts)
    }
}
