use crate::configuration::ApplicationSettings;
use crate::domain::admin::ports::AdminService;
use crate::domain::contact::ports::ContactService;
use crate::domain::subscription::ports::SubscriptionService;
use crate::inbound::http::handlers::{
    contact, health_check, import_subscribers, list_subscribers, subscribe, unsubscribe,
    unsubscribe_link,
};
use crate::inbound::http::responses::ApiResponse;
use crate::inbound::http::state::{SharedAdminState, SharedContactState, SharedSubscriptionState};
use actix_web::dev::Server;
use actix_web::error::InternalError;
use actix_web::{web, App, HttpResponse, HttpServer};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub mod errors;
mod handlers;
pub mod responses;
pub mod state;

pub use errors::AppError;

const INVALID_BODY: &str = "Invalid request body.";
const INVALID_QUERY: &str = "Invalid query string.";

pub struct Application {
    port: u16,
    server: Server,
}

/// Malformed payloads get the same envelope as every other failure.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::warn!(error = %err, "Rejected malformed JSON body");
        InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(ApiResponse::failure(INVALID_BODY)),
        )
        .into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(ApiResponse::failure(INVALID_QUERY)),
        )
        .into()
    })
}

fn run<SS: SubscriptionService, AS: AdminService, CS: ContactService>(
    listener: TcpListener,
    subscription_state: SharedSubscriptionState<SS>,
    admin_state: SharedAdminState<AS>,
    contact_state: SharedContactState<CS>,
) -> Result<Server, std::io::Error> {
    let subscription_state = web::Data::new(subscription_state);
    let admin_state = web::Data::new(admin_state);
    let contact_state = web::Data::new(contact_state);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(json_config())
            .app_data(query_config())
            .route("/health_check", web::get().to(health_check))
            .service(
                web::scope("/api")
                    .app_data(subscription_state.clone())
                    .route("/newsletter/subscribe", web::post().to(subscribe::<SS>))
                    .route("/newsletter/unsubscribe", web::post().to(unsubscribe::<SS>))
                    .route(
                        "/newsletter/unsubscribe",
                        web::get().to(unsubscribe_link::<SS>),
                    )
                    .app_data(admin_state.clone())
                    .route(
                        "/newsletter/subscribers",
                        web::get().to(list_subscribers::<AS>),
                    )
                    .route(
                        "/newsletter/subscribers",
                        web::post().to(import_subscribers::<AS>),
                    )
                    .app_data(contact_state.clone())
                    .route("/contact", web::post().to(contact::<CS>)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}

impl Application {
    pub async fn build<SS: SubscriptionService, AS: AdminService, CS: ContactService>(
        subscription_service: SS,
        admin_service: AS,
        contact_service: CS,
        configuration: ApplicationSettings,
    ) -> Result<Self, std::io::Error> {
        let address = format!("{}:{}", configuration.host, configuration.port);
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();

        let server: Server = run(
            listener,
            SharedSubscriptionState::new(subscription_service),
            SharedAdminState::new(admin_service),
            SharedContactState::new(contact_service),
        )?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}
