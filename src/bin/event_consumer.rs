use clap::Parser;
use dotenv::dotenv;
use tracing::info;

use travelink_analytics::config::Config;
use travelink_analytics::events::consumer::handle_event;
use travelink_analytics::events::rabbitmq_client::EventQueueClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::parse();

    info!("Starting the reservation event consumer...");
    let event_queue = EventQueueClient::new(&config);
    event_queue.connect().await?;

    let consume_res = event_queue.consume(handle_event).await;
    event_queue.close().await;
    consume_res
}
