pub mod consumer;
pub mod rabbitmq_client;
