use clap::Parser;

#[derive(Parser, Clone, Debug)]
pub struct Config {
    #[clap(env, long, default_value = "postgres")]
    pub db_host: String,

    #[clap(env, long, default_value_t = 5432)]
    pub db_port: u16,

    #[clap(env, long, default_value = "booking_db")]
    pub db_name: String,

    #[clap(env, long, default_value = "booking_user")]
    pub db_user: String,

    #[clap(env, long, default_value = "booking_password")]
    pub db_password: String,

    #[clap(env, long, default_value = "rabbitmq")]
    pub rabbitmq_host: String,

    #[clap(env, long, default_value_t = 5672)]
    pub rabbitmq_port: u16,

    #[clap(env, long, default_value = "guest")]
    pub rabbitmq_user: String,

    #[clap(env, long, default_value = "guest")]
    pub rabbitmq_password: String,

    #[clap(env, long, default_value = "analytics_queue")]
    pub rabbitmq_queue: String,

    /// Shared secret for tokens minted by the booking system
    #[clap(env, long)]
    pub jwt_secret: String,

    #[clap(env, long, default_value = "travelink-laravel")]
    pub jwt_issuer: String,

    #[clap(env, long, default_value = "travelink-api")]
    pub jwt_audience: String,

    #[clap(env, long, default_value_t = 8000)]
    pub service_port: u16,

    #[clap(env, long, default_value = "http://localhost:3000")]
    pub origin_urls: String,

    #[clap(env, long, default_value = "http://partner.example.com/hook")]
    pub partner_webhook_url: String,
}

impl Config {
    pub fn postgres_connection_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password={}",
            self.db_host, self.db_port, self.db_name, self.db_user, self.db_password,
        )
    }

    pub fn amqp_uri(&self) -> String {
        format!(
            "amqp://{}:{}@{}:{}/%2f",
            self.rabbitmq_user, self.rabbitmq_password, self.rabbitmq_host, self.rabbitmq_port,
        )
    }
}
