use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use axum::{Extension, Router};
use bb8_postgres::bb8::Pool;
use bb8_postgres::tokio_postgres::NoTls;
use bb8_postgres::PostgresConnectionManager;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::auth::JwtVerifier;
use crate::config::Config;
use crate::events::rabbitmq_client::EventQueueClient;
use crate::helpers::handler_404::page_not_found_handler;

pub mod analytics_controller;
pub mod health_check;
pub mod webhook_controller;

#[derive(Clone)]
pub struct AppState {
    pub postgres_connection: Pool<PostgresConnectionManager<NoTls>>,
    pub event_queue: Arc<EventQueueClient>,
    pub http_client: reqwest::Client,
    pub config: Config,
}

pub async fn serve(
    postgres_connection: Pool<PostgresConnectionManager<NoTls>>,
    event_queue: Arc<EventQueueClient>,
    config: &Config,
) -> anyhow::Result<()> {
    let origins: Vec<HeaderValue> = config
        .origin_urls
        .split(',')
        .map(|s| s.parse().unwrap())
        .collect::<Vec<HeaderValue>>();

    let app_state = AppState {
        postgres_connection,
        event_queue: event_queue.clone(),
        http_client: reqwest::Client::new(),
        config: config.clone(),
    };
    let jwt_verifier = Arc::new(JwtVerifier::new(
        &config.jwt_secret,
        &config.jwt_issuer,
        &config.jwt_audience,
    ));

    let application = router_endpoints(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    CorsLayer::new()
                        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                        .allow_origin(origins)
                        .allow_headers([AUTHORIZATION, CONTENT_TYPE]),
                )
                .layer(Extension(jwt_verifier)),
        )
        .fallback(page_not_found_handler);

    let port = SocketAddr::from(([0, 0, 0, 0], config.service_port));
    info!("API server listening on port: {}", port);
    axum::Server::bind(&port)
        .serve(application.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Error spinning up the API server")?;

    event_queue.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for the shutdown signal: {}", e);
    }
}

pub fn router_endpoints(app_state: AppState) -> Router {
    health_check::router()
        .nest("/analytics", analytics_controller::router(app_state.clone()))
        .nest("/webhooks", webhook_controller::router(app_state))
}
