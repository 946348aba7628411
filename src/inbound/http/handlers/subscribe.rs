use crate::{
    domain::subscription::{
        models::subscriber::{NewSubscriberRequest, SubscriberId},
        ports::{SubscribeOutcome, SubscriptionService},
    },
    inbound::http::{errors::AppError, responses::ApiResponse, SharedSubscriptionState},
};
use actix_web::{web, HttpResponse};

const SUBSCRIBED: &str =
    "Successfully subscribed to our newsletter! Check your email for a welcome message.";
const RESUBSCRIBED: &str = "Welcome back! You have been resubscribed to our newsletter.";
const SUBSCRIBE_FAILED: &str = "An error occurred while subscribing. Please try again later.";

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct SubscribedData {
    id: SubscriberId,
    email: String,
    mailer_list_id: Option<String>,
}

#[tracing::instrument(
    name = "Adding a new subscriber",
    skip(subscriber_request, state),
    fields(
        subscriber_email = %subscriber_request.email,
        subscriber_source = ?subscriber_request.source,
    )
)]
pub async fn subscribe<SS: SubscriptionService>(
    subscriber_request: web::Json<NewSubscriberRequest>,
    state: web::Data<SharedSubscriptionState<SS>>,
) -> Result<HttpResponse, AppError> {
    let outcome = state
        .subscription_service()
        .subscribe(subscriber_request.into_inner())
        .await
        .map_err(|e| AppError::from(e).or_message(SUBSCRIBE_FAILED))?;

    let response = match outcome {
        SubscribeOutcome::Created(subscriber) => ApiResponse::data(SubscribedData {
            id: subscriber.id,
            email: subscriber.email.into(),
            mailer_list_id: subscriber.mailer_list_id,
        })
        .with_message(SUBSCRIBED),
        SubscribeOutcome::Reactivated(_) => ApiResponse {
            success: true,
            message: Some(RESUBSCRIBED.to_string()),
            data: None,
        },
    };

    Ok(HttpResponse::Ok().json(response))
}
