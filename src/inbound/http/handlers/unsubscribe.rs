use crate::domain::subscription::ports::{SubscriptionService, UnsubscribeOutcome};
use crate::inbound::http::{errors::AppError, responses::ApiResponse, SharedSubscriptionState};
use actix_web::{web, HttpResponse};

const UNSUBSCRIBED: &str = "You have been successfully unsubscribed from our newsletter.";
const ALREADY_UNSUBSCRIBED: &str = "This email is already unsubscribed.";
const MISSING_PARAMETER: &str = "Email parameter is required.";
const UNSUBSCRIBE_FAILED: &str = "An error occurred while unsubscribing. Please try again later.";

/// Body of the unsubscribe form. Anything but a string counts as missing.
#[derive(Debug, serde::Deserialize)]
pub struct UnsubscribeRequest {
    #[serde(default)]
    email: Option<serde_json::Value>,
}

#[derive(Debug, serde::Deserialize)]
pub struct UnsubscribeParams {
    email: Option<String>,
}

async fn remove<SS: SubscriptionService>(
    email: &str,
    state: &SharedSubscriptionState<SS>,
) -> Result<HttpResponse, AppError> {
    let outcome = state
        .subscription_service()
        .unsubscribe(email)
        .await
        .map_err(|e| AppError::from(e).or_message(UNSUBSCRIBE_FAILED))?;

    let message = match outcome {
        UnsubscribeOutcome::Unsubscribed(_) => UNSUBSCRIBED,
        UnsubscribeOutcome::AlreadyUnsubscribed => ALREADY_UNSUBSCRIBED,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(message)))
}

#[tracing::instrument(name = "Removing a subscriber", skip(req, state))]
pub async fn unsubscribe<SS: SubscriptionService>(
    req: web::Json<UnsubscribeRequest>,
    state: web::Data<SharedSubscriptionState<SS>>,
) -> Result<HttpResponse, AppError> {
    let email = req
        .email
        .as_ref()
        .and_then(|email| email.as_str())
        .unwrap_or_default();
    remove(email, &state).await
}

#[tracing::instrument(name = "Removing a subscriber from a link", skip(params, state))]
pub async fn unsubscribe_link<SS: SubscriptionService>(
    params: web::Query<UnsubscribeParams>,
    state: web::Data<SharedSubscriptionState<SS>>,
) -> Result<HttpResponse, AppError> {
    match params.email.as_deref() {
        Some(email) if !email.is_empty() => remove(email, &state).await,
        _ => Err(AppError::Validation(MISSING_PARAMETER.to_string())),
    }
}
