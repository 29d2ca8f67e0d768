use clap::Parser;
use dotenv::dotenv;
use rand::Rng;
use time::{Duration, OffsetDateTime, PrimitiveDateTime};
use tracing::{info, warn};

use travelink_analytics::config::Config;
use travelink_analytics::models::reservation::{
    Reservation, STATUS_CANCELLED, STATUS_COMPLETED, STATUS_CONFIRMED, STATUS_PENDING,
};
use travelink_analytics::repositories;
use travelink_analytics::repositories::postgres_repo::PostgresBookingRepo;

const HOTEL_IDS: [i32; 5] = [1, 2, 3, 4, 5];
const ROOM_TYPES: [&str; 5] = ["single", "double", "deluxe", "suite", "presidential"];
const STATUSES: [&str; 4] = [
    STATUS_CONFIRMED,
    STATUS_COMPLETED,
    STATUS_CANCELLED,
    STATUS_PENDING,
];
const RESERVATION_COUNT: usize = 100;

// bcrypt hash of "password", shared by every sample account
const SAMPLE_PASSWORD_HASH: &str = "$2y$10$92IXUNpkjO0rOQ5byMi.Ye4oKoEa3Ro9llC/.og/at2.uheWG/igi";

const SAMPLE_USERS: [(&str, &str, &str); 5] = [
    ("Admin User", "admin@example.com", "admin"),
    ("John Doe", "john@example.com", "client"),
    ("Jane Smith", "jane@example.com", "client"),
    ("Bob Wilson", "bob@example.com", "client"),
    ("Alice Brown", "alice@example.com", "client"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::parse();
    let postgres_connection = repositories::create_postgres_pool(&config).await?;
    let booking_repo = PostgresBookingRepo::new(postgres_connection);

    info!("Seeding the booking database with sample data...");

    for (name, email, role) in SAMPLE_USERS {
        booking_repo
            .create_user(name, email, SAMPLE_PASSWORD_HASH, role)
            .await?;
    }
    info!("{} sample users ensured", SAMPLE_USERS.len());

    let clients = booking_repo.retrieve_users_by_role("client").await?;
    if clients.is_empty() {
        warn!("No client users found to own reservations, BAILING");
        return Ok(());
    }

    let reservations = generate_reservations(&clients.iter().map(|u| u.id).collect::<Vec<i64>>());

    let mut created = 0;
    for reservation in &reservations {
        match booking_repo.add_reservation(reservation).await {
            Ok(()) => created += 1,
            Err(e) => warn!("Failed to create reservation due to: {}", e),
        }
    }
    info!("{} reservations created", created);

    let user_count = booking_repo.count_users().await?;
    let reservation_count = booking_repo.count_reservations().await?;
    info!(
        "Seed summary: {} users, {} reservations",
        user_count, reservation_count
    );
    for breakdown in booking_repo.status_counts().await? {
        info!("  {}: {}", breakdown.status, breakdown.count);
    }

    Ok(())
}

fn generate_reservations(client_ids: &[i64]) -> Vec<Reservation> {
    let today = OffsetDateTime::now_utc();
    let mut rng = rand::thread_rng();

    (0..RESERVATION_COUNT)
        .map(|_| {
            let check_in = today + Duration::days(rng.gen_range(-30..=60));
            let check_out = check_in + Duration::days(rng.gen_range(1..=7));
            Reservation {
                user_id: client_ids[rng.gen_range(0..client_ids.len())],
                hotel_id: HOTEL_IDS[rng.gen_range(0..HOTEL_IDS.len())],
                room_type: ROOM_TYPES[rng.gen_range(0..ROOM_TYPES.len())].to_string(),
                check_in: strip_offset(check_in),
                check_out: strip_offset(check_out),
                status: STATUSES[rng.gen_range(0..STATUSES.len())].to_string(),
            }
        })
        .collect()
}

fn strip_offset(moment: OffsetDateTime) -> PrimitiveDateTime {
    PrimitiveDateTime::new(moment.date(), moment.time())
}
