mod config;
mod core;
mod models;
mod routes;
mod services;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware};
use config::Settings;
use core::CreditPullPipeline;
use models::BureauHeader;
use routes::credit::AppState;
use services::{BureauGateway, SalesforceClient, SalesforceCredentials};
use std::sync::Arc;
use tracing::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting credit pull service...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Initialize Salesforce client
    let salesforce = Arc::new(SalesforceClient::new(
        settings.salesforce.base_url,
        settings.salesforce.api_version,
        settings.salesforce.record_object,
        SalesforceCredentials {
            client_id: settings.salesforce.client_id,
            client_secret: settings.salesforce.client_secret,
            username: settings.salesforce.username,
            password: settings.salesforce.password,
        },
    ));

    info!("Salesforce client initialized");

    // Initialize bureau gateway client
    let bureau = Arc::new(BureauGateway::new(settings.bureau.endpoint));

    let header = BureauHeader {
        user_id: settings.bureau.user_id,
        user_password: settings.bureau.user_password,
        customer_id: settings.bureau.customer_id,
    };

    let pipeline = Arc::new(CreditPullPipeline::new(salesforce, bureau, header));

    info!("Credit pull pipeline initialized");

    // Build application state
    let app_state = AppState { pipeline };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
