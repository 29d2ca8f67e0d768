use std::time::Duration;

use anyhow::{anyhow, Context};
use futures::StreamExt;
use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicNackOptions, BasicPublishOptions, BasicQosOptions,
    QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::Config;
use crate::models::event::QueueEvent;

pub const RETRY_LIMIT: usize = 3;
const RETRY_DELAY: Duration = Duration::from_secs(2);

struct QueueChannel {
    connection: Connection,
    channel: Channel,
}

pub struct EventQueueClient {
    uri: String,
    queue_name: String,
    state: Mutex<Option<QueueChannel>>,
}

impl EventQueueClient {
    pub fn new(config: &Config) -> Self {
        Self {
            uri: config.amqp_uri(),
            queue_name: config.rabbitmq_queue.clone(),
            state: Mutex::new(None),
        }
    }

    pub async fn connect(&self) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        for attempt in 1..=RETRY_LIMIT {
            match self.open_channel().await {
                Ok(opened) => {
                    info!("Connected to RabbitMQ queue: {}", self.queue_name);
                    *state = Some(opened);
                    return Ok(());
                }
                Err(e) => {
                    warn!(
                        "Attempt {}/{} to connect to RabbitMQ failed: {}",
                        attempt, RETRY_LIMIT, e
                    );
                    if attempt < RETRY_LIMIT {
                        tokio::time::sleep(RETRY_DELAY).await;
                    }
                }
            }
        }

        Err(anyhow!(
            "Failed to connect to RabbitMQ after {} attempts",
            RETRY_LIMIT
        ))
    }

    async fn open_channel(&self) -> anyhow::Result<QueueChannel> {
        let connection = Connection::connect(&self.uri, ConnectionProperties::default())
            .await
            .context("Failed to open AMQP connection")?;
        let channel = connection
            .create_channel()
            .await
            .context("Failed to open AMQP channel")?;
        channel
            .queue_declare(
                &self.queue_name,
                QueueDeclareOptions {
                    durable: true,
                    ..QueueDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await
            .context("Failed to declare queue")?;

        Ok(QueueChannel {
            connection,
            channel,
        })
    }

    /// Hand out a live channel, reconnecting when the previous one died.
    async fn ensure_channel(&self) -> anyhow::Result<Channel> {
        let mut state = self.state.lock().await;
        if let Some(existing) = state.as_ref() {
            if existing.connection.status().connected() && existing.channel.status().connected() {
                return Ok(existing.channel.clone());
            }
            info!("Reconnecting to RabbitMQ...");
        }

        let opened = self.open_channel().await?;
        let channel = opened.channel.clone();
        *state = Some(opened);
        Ok(channel)
    }

    pub async fn publish(&self, event: &QueueEvent) -> anyhow::Result<()> {
        let body = serde_json::to_vec(event).context("Failed to serialize queue event")?;

        for attempt in 1..=RETRY_LIMIT {
            match self.try_publish(&body).await {
                Ok(()) => {
                    info!("Published event to queue: {}", event.event);
                    return Ok(());
                }
                Err(e) => {
                    warn!(
                        "Attempt {}/{} to publish event failed: {}",
                        attempt, RETRY_LIMIT, e
                    );
                    *self.state.lock().await = None;
                    if attempt < RETRY_LIMIT {
                        tokio::time::sleep(RETRY_DELAY).await;
                    }
                }
            }
        }

        Err(anyhow!(
            "Failed to publish event {} after {} attempts",
            event.event,
            RETRY_LIMIT
        ))
    }

    async fn try_publish(&self, body: &[u8]) -> anyhow::Result<()> {
        let channel = self.ensure_channel().await?;
        channel
            .basic_publish(
                "",
                &self.queue_name,
                BasicPublishOptions::default(),
                body,
                BasicProperties::default()
                    // delivery mode 2 = persistent
                    .with_delivery_mode(2)
                    .with_content_type("application/json".into()),
            )
            .await
            .context("Failed to publish to queue")?
            .await
            .context("Broker did not confirm the publish")?;
        Ok(())
    }

    /// Blocking consume loop: one unacked message at a time, ack on success,
    /// nack + requeue when the handler fails.
    pub async fn consume<F>(&self, handler: F) -> anyhow::Result<()>
    where
        F: Fn(&[u8]) -> anyhow::Result<()>,
    {
        let channel = self.ensure_channel().await?;
        channel
            .basic_qos(1, BasicQosOptions::default())
            .await
            .context("Failed to set consumer prefetch")?;
        let mut consumer = channel
            .basic_consume(
                &self.queue_name,
                "analytics-consumer",
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await
            .context("Failed to start consuming")?;

        info!("Waiting for messages on queue: {}", self.queue_name);
        while let Some(delivery) = consumer.next().await {
            let delivery = delivery.context("Failed to receive delivery from queue")?;
            match handler(&delivery.data) {
                Ok(()) => {
                    delivery
                        .ack(BasicAckOptions::default())
                        .await
                        .context("Failed to ack message")?;
                }
                Err(e) => {
                    warn!("Failed to process message, requeueing due to: {}", e);
                    delivery
                        .nack(BasicNackOptions {
                            requeue: true,
                            ..BasicNackOptions::default()
                        })
                        .await
                        .context("Failed to nack message")?;
                }
            }
        }

        Ok(())
    }

    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        if let Some(opened) = state.take() {
            match opened.connection.close(200, "closing").await {
                Ok(_) => info!("RabbitMQ connection closed"),
                Err(e) => warn!("Failed to close RabbitMQ connection cleanly: {}", e),
            }
        }
    }
}
