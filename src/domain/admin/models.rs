use chrono::{DateTime, Utc};

use crate::domain::subscription::models::subscriber::{
    Subscriber, SubscriberId, SubscriberStatus,
};

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const MAX_PAGE_SIZE: u32 = 200;
pub const IMPORT_SOURCE: &str = "bulk_import";

/// Raw query string of the subscriber listing. Every value is optional and
/// unparsable values fall back to their defaults.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberQuery {
    pub page: u32,
    pub limit: u32,
    pub status: Option<SubscriberStatus>,
    pub search: Option<String>,
}

impl Default for SubscriberQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            status: None,
            search: None,
        }
    }
}

impl From<ListParams> for SubscriberQuery {
    fn from(params: ListParams) -> Self {
        let page = params
            .page
            .and_then(|p| p.trim().parse::<u32>().ok())
            .unwrap_or(1)
            .max(1);
        let limit = params
            .limit
            .and_then(|l| l.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        // Unknown statuses are ignored rather than rejected.
        let status = params
            .status
            .and_then(|s| SubscriberStatus::parse(s.trim()).ok());
        let search = params
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            page,
            limit,
            status,
            search,
        }
    }
}

impl SubscriberQuery {
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// Unfiltered number of subscribers per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub active: u64,
    pub unsubscribed: u64,
    pub bounced: u64,
    pub complained: u64,
}

impl StatusCounts {
    pub fn add(&mut self, status: SubscriberStatus, count: u64) {
        match status {
            SubscriberStatus::Active => self.active += count,
            SubscriberStatus::Unsubscribed => self.unsubscribed += count,
            SubscriberStatus::Bounced => self.bounced += count,
            SubscriberStatus::Complained => self.complained += count,
        }
    }

    pub fn total(&self) -> u64 {
        self.active + self.unsubscribed + self.bounced + self.complained
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Stats {
    pub total: u64,
    pub active: u64,
    pub unsubscribed: u64,
    pub bounced: u64,
    pub complained: u64,
}

impl From<StatusCounts> for Stats {
    fn from(counts: StatusCounts) -> Self {
        Self {
            total: counts.total(),
            active: counts.active,
            unsubscribed: counts.unsubscribed,
            bounced: counts.bounced,
            complained: counts.complained,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(query: &SubscriberQuery, total: u64) -> Self {
        let total_pages = total.div_ceil(u64::from(query.limit));
        Self {
            page: query.page,
            limit: query.limit,
            total,
            total_pages,
            has_next: u64::from(query.page) < total_pages,
            has_prev: query.page > 1,
        }
    }
}

/// Admin-facing projection of a subscriber.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberView {
    pub id: SubscriberId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub status: SubscriberStatus,
    pub tags: Vec<String>,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Subscriber> for SubscriberView {
    fn from(s: Subscriber) -> Self {
        Self {
            id: s.id,
            email: s.email.into(),
            first_name: s.first_name.map(String::from),
            last_name: s.last_name.map(String::from),
            status: s.status,
            tags: s.tags,
            source: s.source,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SubscriberPage {
    pub subscribers: Vec<SubscriberView>,
    pub pagination: Pagination,
    pub stats: Stats,
}

/// Bulk import payload. `emails` stays untyped so each item can be decoded
/// and reported on its own.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ImportRequest {
    #[serde(default)]
    pub emails: Option<serde_json::Value>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub source: Option<String>,
}

/// One item of a bulk import.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(untagged)]
pub enum ImportEntry {
    Email(String),
    WithProfile {
        email: String,
        #[serde(rename = "firstName", default)]
        first_name: Option<String>,
        #[serde(rename = "lastName", default)]
        last_name: Option<String>,
    },
}

impl ImportEntry {
    pub fn decode(value: &serde_json::Value) -> Option<ImportEntry> {
        serde_json::from_value(value.clone()).ok()
    }

    pub fn email(&self) -> &str {
        match self {
            ImportEntry::Email(email) | ImportEntry::WithProfile { email, .. } => email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ImportError {
    pub email: serde_json::Value,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ImportSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ImportReport {
    pub imported: Vec<SubscriberView>,
    pub errors: Vec<ImportError>,
    pub summary: ImportSummary,
}

/// Removes blank and repeated tags, keeping the first occurrence of each.
pub fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !unique.contains(&tag) {
            unique.push(tag);
        }
    }
    unique
}
