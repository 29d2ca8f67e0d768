use std::sync::Arc;

use clap::Parser;
use dotenv::dotenv;
use tracing::error;

use travelink_analytics::config::Config;
use travelink_analytics::controller;
use travelink_analytics::events::rabbitmq_client::EventQueueClient;
use travelink_analytics::repositories;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::parse();

    let postgres_connection = repositories::create_postgres_pool(&config).await?;

    let event_queue = Arc::new(EventQueueClient::new(&config));
    if let Err(e) = event_queue.connect().await {
        error!("Failed to connect to RabbitMQ on startup: {}", e);
    }

    controller::serve(postgres_connection, event_queue, &config).await
}
