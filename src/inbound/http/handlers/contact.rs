use crate::domain::contact::{models::ContactRequest, ports::ContactService};
use crate::inbound::http::{errors::AppError, responses::ApiResponse, SharedContactState};
use actix_web::{web, HttpResponse};

const MESSAGE_SENT: &str = "Thank you for your message! We'll get back to you soon.";

#[tracing::instrument(name = "Relaying a contact form", skip(req, state))]
pub async fn contact<CS: ContactService>(
    req: web::Json<ContactRequest>,
    state: web::Data<SharedContactState<CS>>,
) -> Result<HttpResponse, AppError> {
    state
        .contact_service()
        .send_message(req.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(MESSAGE_SENT)))
}
