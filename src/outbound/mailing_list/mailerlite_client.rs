use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode, Url};
use secrecy::{ExposeSecret, Secret};
use serde_aux::field_attributes::deserialize_string_from_number;

use crate::configuration::MailingListSettings;
use crate::domain::subscription::{
    models::email::SubscriberEmail,
    ports::{MailingList, MailingListError, MailingListFields, MailingListProfile, RemoteSubscriber},
};

/// REST client for the MailerLite subscribers API.
#[derive(Debug, Clone)]
pub struct MailerLiteClient {
    http_client: Client,
    base_url: Url,
    api_key: Secret<String>,
}

impl MailerLiteClient {
    pub fn new(configuration: MailingListSettings) -> Result<Self, MailingListError> {
        let api_key = configuration
            .api_key
            .clone()
            .ok_or_else(|| MailingListError::InvalidRequest("missing API key".into()))?;
        let base_url = Url::parse(&configuration.base_url)
            .map_err(|e| MailingListError::InvalidRequest(format!("invalid base url: {}", e)))?;
        let http_client = Client::builder().timeout(configuration.timeout()).build()?;

        Ok(Self {
            http_client,
            base_url,
            api_key,
        })
    }

    /// `{base}/subscribers`, or `{base}/subscribers/{email}` with the address
    /// encoded as a single path segment.
    fn subscribers_url(&self, email: Option<&SubscriberEmail>) -> Result<Url, MailingListError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                MailingListError::InvalidRequest("base url cannot carry a path".into())
            })?;
            segments.pop_if_empty().push("subscribers");
            if let Some(email) = email {
                segments.push(email.as_str());
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http_client
            .request(method, url)
            .bearer_auth(self.api_key.expose_secret())
            .header(header::ACCEPT, "application/json")
    }
}

async fn error_for_status(response: Response) -> Result<Response, MailingListError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(MailingListError::Status {
        status: status.as_u16(),
        body,
    })
}

#[derive(serde::Serialize)]
struct SubscriberPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    fields: &'a MailingListFields,
}

#[derive(serde::Deserialize)]
struct SubscriberRecord {
    #[serde(deserialize_with = "deserialize_string_from_number")]
    id: String,
    email: String,
    #[serde(default)]
    status: Option<String>,
}

/// Records come back either bare or wrapped in `{"data": ...}`.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } | Envelope::Bare(data) => data,
        }
    }
}

impl From<SubscriberRecord> for RemoteSubscriber {
    fn from(record: SubscriberRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            status: record.status,
        }
    }
}

async fn parse_record(response: Response) -> Result<RemoteSubscriber, MailingListError> {
    let record: Envelope<SubscriberRecord> = response.json().await?;
    Ok(record.into_inner().into())
}

#[async_trait]
impl MailingList for MailerLiteClient {
    #[tracing::instrument(name = "Creating mailing list subscriber", skip(self, email, profile))]
    async fn create_subscriber(
        &self,
        email: &SubscriberEmail,
        profile: &MailingListProfile,
    ) -> Result<RemoteSubscriber, MailingListError> {
        let payload = SubscriberPayload {
            email: Some(email.as_str()),
            name: profile.name.as_deref(),
            fields: &profile.fields,
        };
        let response = self
            .request(Method::POST, self.subscribers_url(None)?)
            .json(&payload)
            .send()
            .await?;
        parse_record(error_for_status(response).await?).await
    }

    #[tracing::instrument(name = "Fetching mailing list subscriber", skip(self, email))]
    async fn get_subscriber(
        &self,
        email: &SubscriberEmail,
    ) -> Result<Option<RemoteSubscriber>, MailingListError> {
        let response = self
            .request(Method::GET, self.subscribers_url(Some(email))?)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        parse_record(error_for_status(response).await?)
            .await
            .map(Some)
    }

    #[tracing::instrument(name = "Updating mailing list subscriber", skip(self, email, profile))]
    async fn update_subscriber(
        &self,
        email: &SubscriberEmail,
        profile: &MailingListProfile,
    ) -> Result<RemoteSubscriber, MailingListError> {
        let payload = SubscriberPayload {
            email: None,
            name: profile.name.as_deref(),
            fields: &profile.fields,
        };
        let response = self
            .request(Method::PUT, self.subscribers_url(Some(email))?)
            .json(&payload)
            .send()
            .await?;
        parse_record(error_for_status(response).await?).await
    }

    #[tracing::instrument(name = "Deleting mailing list subscriber", skip(self, email))]
    async fn delete_subscriber(&self, email: &SubscriberEmail) -> Result<(), MailingListError> {
        let response = self
            .request(Method::DELETE, self.subscribers_url(Some(email))?)
            .send()
            .await?;
        error_for_status(response).await?;
        Ok(())
    }
}
