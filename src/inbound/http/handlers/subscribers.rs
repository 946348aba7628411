use crate::domain::admin::{
    models::{ImportRequest, ListParams, SubscriberQuery},
    ports::AdminService,
};
use crate::inbound::http::{errors::AppError, responses::ApiResponse, SharedAdminState};
use actix_web::{web, HttpResponse};

const LIST_FAILED: &str = "An error occurred while fetching subscribers.";
const IMPORT_FAILED: &str = "An error occurred while importing subscribers.";

#[tracing::instrument(name = "Listing subscribers", skip(params, state))]
pub async fn list_subscribers<AS: AdminService>(
    params: web::Query<ListParams>,
    state: web::Data<SharedAdminState<AS>>,
) -> Result<HttpResponse, AppError> {
    let query = SubscriberQuery::from(params.into_inner());
    let page = state
        .admin_service()
        .list_subscribers(query)
        .await
        .map_err(|e| AppError::from(e).or_message(LIST_FAILED))?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(page)))
}

#[tracing::instrument(name = "Importing subscribers", skip(req, state))]
pub async fn import_subscribers<AS: AdminService>(
    req: web::Json<ImportRequest>,
    state: web::Data<SharedAdminState<AS>>,
) -> Result<HttpResponse, AppError> {
    let report = state
        .admin_service()
        .bulk_import(req.into_inner())
        .await
        .map_err(|e| AppError::from(e).or_message(IMPORT_FAILED))?;

    let message = format!("Successfully imported {} subscribers.", report.summary.successful);
    Ok(HttpResponse::Ok().json(ApiResponse::data(report).with_message(message)))
}
