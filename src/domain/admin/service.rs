use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{
    errors::AdminServiceError,
    models::{
        dedup_tags, ImportEntry, ImportError, ImportReport, ImportRequest, ImportSummary,
        Pagination, SubscriberPage, SubscriberQuery, IMPORT_SOURCE,
    },
    ports::{AdminService, SubscriberDirectory},
};
use crate::domain::subscription::{
    models::subscriber::{
        NewSubscriber, NewSubscriberRequest, Subscriber, SubscriberValidationError,
        ValidSubscriberRequest,
    },
    ports::{SubscriberRepository, SubscriberRepositoryError},
};

const INVALID_EMAIL: &str = "Invalid email format";
const INVALID_ENTRY: &str = "Invalid entry";
const EMAIL_EXISTS: &str = "Email already exists";
const STORE_FAILURE: &str = "Failed to store subscriber";

pub struct Admin<R>
where
    R: SubscriberRepository + SubscriberDirectory,
{
    pub repo: Arc<R>,
}

impl<R> Admin<R>
where
    R: SubscriberRepository + SubscriberDirectory,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    async fn import_one(
        &self,
        item: &Value,
        tags: &[String],
        source: &str,
    ) -> Result<Subscriber, ImportError> {
        let entry = ImportEntry::decode(item).ok_or_else(|| {
            // An object with a usable email failed on one of its profile fields.
            match item.get("email").and_then(Value::as_str) {
                Some(email) => ImportError {
                    email: Value::String(email.to_string()),
                    error: INVALID_ENTRY.into(),
                },
                None => ImportError {
                    email: item.clone(),
                    error: INVALID_EMAIL.into(),
                },
            }
        })?;
        let failed = |error: &str| ImportError {
            email: Value::String(entry.email().to_string()),
            error: error.to_string(),
        };

        let (email, first_name, last_name) = match entry.clone() {
            ImportEntry::Email(email) => (email, None, None),
            ImportEntry::WithProfile {
                email,
                first_name,
                last_name,
            } => (email, first_name, last_name),
        };
        let request = ValidSubscriberRequest::try_from(NewSubscriberRequest {
            email,
            first_name,
            last_name,
            source: Some(source.to_string()),
        })
        .map_err(|e| match e {
            SubscriberValidationError::InvalidEmail(_) => failed(INVALID_EMAIL),
            SubscriberValidationError::InvalidName(e) => failed(&e.to_string()),
        })?;

        match self.repo.find_by_email(&request.email).await {
            Ok(Some(_)) => return Err(failed(EMAIL_EXISTS)),
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(error.cause_chain = ?error, "Failed to look up an imported subscriber");
                return Err(failed(STORE_FAILURE));
            }
        }

        let subscriber = NewSubscriber::active(request).with_tags(tags.to_vec());
        match self.repo.insert(subscriber).await {
            Ok(subscriber) => Ok(subscriber),
            Err(SubscriberRepositoryError::AlreadyExists(_)) => Err(failed(EMAIL_EXISTS)),
            Err(error) => {
                tracing::warn!(error.cause_chain = ?error, "Failed to store an imported subscriber");
                Err(failed(STORE_FAILURE))
            }
        }
    }
}

#[async_trait]
impl<R> AdminService for Admin<R>
where
    R: SubscriberRepository + SubscriberDirectory,
{
    #[tracing::instrument(name = "Listing subscribers", skip(self))]
    async fn list_subscribers(
        &self,
        query: SubscriberQuery,
    ) -> Result<SubscriberPage, AdminServiceError> {
        let (subscribers, total) = self.repo.list(&query).await?;
        let counts = self.repo.count_by_status().await?;

        Ok(SubscriberPage {
            subscribers: subscribers.into_iter().map(Into::into).collect(),
            pagination: Pagination::new(&query, total),
            stats: counts.into(),
        })
    }

    #[tracing::instrument(name = "Importing subscribers", skip(self, request))]
    async fn bulk_import(&self, request: ImportRequest) -> Result<ImportReport, AdminServiceError> {
        let items = match request.emails {
            Some(Value::Array(items)) if !items.is_empty() => items,
            _ => return Err(AdminServiceError::MissingEmails),
        };
        let tags = dedup_tags(request.tags.unwrap_or_default());
        let source = request
            .source
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| IMPORT_SOURCE.to_string());

        let mut imported = Vec::new();
        let mut errors = Vec::new();
        for item in &items {
            match self.import_one(item, &tags, &source).await {
                Ok(subscriber) => imported.push(subscriber.into()),
                Err(error) => errors.push(error),
            }
        }
        tracing::info!(
            imported = imported.len(),
            failed = errors.len(),
            "Bulk import finished"
        );

        Ok(ImportReport {
            summary: ImportSummary {
                total: items.len(),
                successful: imported.len(),
                failed: errors.len(),
            },
            imported,
            errors,
        })
    }
}
