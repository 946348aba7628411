use async_trait::async_trait;

use super::errors::AdminServiceError;
use super::models::{ImportReport, ImportRequest, StatusCounts, SubscriberPage, SubscriberQuery};
use crate::domain::subscription::{models::subscriber::Subscriber, ports::SubscriberRepositoryError};

/// Read side of the subscriber store used by the admin pages.
#[async_trait]
pub trait SubscriberDirectory: Send + Sync + 'static {
    /// One page of subscribers matching `query`, newest first, along with
    /// the number of matching subscribers across all pages.
    async fn list(
        &self,
        query: &SubscriberQuery,
    ) -> Result<(Vec<Subscriber>, u64), SubscriberRepositoryError>;

    /// Counts over the whole store, ignoring any filter.
    async fn count_by_status(&self) -> Result<StatusCounts, SubscriberRepositoryError>;
}

#[async_trait]
pub trait AdminService: Send + Sync + 'static {
    async fn list_subscribers(
        &self,
        query: SubscriberQuery,
    ) -> Result<SubscriberPage, AdminServiceError>;

    async fn bulk_import(&self, request: ImportRequest) -> Result<ImportReport, AdminServiceError>;
}
