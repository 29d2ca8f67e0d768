use anyhow::{anyhow, Context};
use bb8_postgres::bb8::{Pool, PooledConnection};
use bb8_postgres::tokio_postgres::{NoTls, Row};
use bb8_postgres::PostgresConnectionManager;
use tracing::warn;

use crate::models::occupancy::{
    percentage, HotelOccupancy, OccupancyStats, RoomTypeOccupancy, StatusBreakdown,
};
use crate::models::reservation::{
    Reservation, STATUS_CANCELLED, STATUS_COMPLETED, STATUS_CONFIRMED,
};
use crate::models::user::User;

pub const RETRY_LIMIT: usize = 5;

pub struct PostgresBookingRepo {
    postgres_connection: Pool<PostgresConnectionManager<NoTls>>,
}

impl PostgresBookingRepo {
    pub fn new(postgres_connection: Pool<PostgresConnectionManager<NoTls>>) -> Self {
        Self {
            postgres_connection,
        }
    }

    async fn get_postgres_connection(
        &self,
    ) -> anyhow::Result<PooledConnection<PostgresConnectionManager<NoTls>>> {
        for _ in 0..RETRY_LIMIT {
            match self.postgres_connection.get().await {
                Ok(conn) => return Ok(conn),
                Err(e) => {
                    warn!("Failed to retrieve postgres connection due to: {}, retrying in 3s", e);
                    tokio::time::sleep(tokio::time::Duration::from_secs(3)).await;
                    continue;
                }
            }
        }

        Err(anyhow!("Failed to retrieve a valid connection from postgres pool, BAILING"))
    }

    pub async fn occupancy_statistics(&self) -> anyhow::Result<OccupancyStats> {
        let total = self.count_reservations().await?;
        let active = self.count_reservations_with_status(STATUS_CONFIRMED).await?;
        let completed = self.count_reservations_with_status(STATUS_COMPLETED).await?;
        let cancelled = self.count_reservations_with_status(STATUS_CANCELLED).await?;

        Ok(OccupancyStats {
            total_reservations: total,
            active_reservations: active,
            completed_reservations: completed,
            cancelled_reservations: cancelled,
            occupancy_rate: percentage(active, total),
            by_hotel: self.hotel_breakdown().await?,
            by_room_type: self.room_type_breakdown().await?,
            by_status: self.status_breakdown(total).await?,
        })
    }

    pub async fn hotel_occupancy(&self, hotel_id: i32) -> anyhow::Result<HotelOccupancy> {
        let conn = self.get_postgres_connection().await?;
        let row = conn
            .query_one(
                "SELECT COUNT(*) AS total, \
                 COUNT(*) FILTER (WHERE status = $2) AS active \
                 FROM reservations WHERE hotel_id = $1;",
                &[&hotel_id, &STATUS_CONFIRMED],
            )
            .await
            .context("Failed to query hotel occupancy")?;

        let total = row.get::<&str, i64>("total");
        let active = row.get::<&str, i64>("active");
        Ok(HotelOccupancy {
            hotel_id,
            total_reservations: total,
            active_reservations: active,
            occupancy_rate: percentage(active, total),
        })
    }

    async fn hotel_breakdown(&self) -> anyhow::Result<Vec<HotelOccupancy>> {
        let conn = self.get_postgres_connection().await?;
        let rows = conn
            .query(
                "SELECT hotel_id, COUNT(*) AS total, \
                 COUNT(*) FILTER (WHERE status = $1) AS active \
                 FROM reservations GROUP BY hotel_id ORDER BY hotel_id;",
                &[&STATUS_CONFIRMED],
            )
            .await
            .context("Failed to query per-hotel occupancy")?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let total = row.get::<&str, i64>("total");
                let active = row.get::<&str, i64>("active");
                HotelOccupancy {
                    hotel_id: row.get("hotel_id"),
                    total_reservations: total,
                    active_reservations: active,
                    occupancy_rate: percentage(active, total),
                }
            })
            .collect())
    }

    async fn room_type_breakdown(&self) -> anyhow::Result<Vec<RoomTypeOccupancy>> {
        let conn = self.get_postgres_connection().await?;
        let rows = conn
            .query(
                "SELECT room_type, COUNT(*) AS total, \
                 COUNT(*) FILTER (WHERE status = $1) AS active \
                 FROM reservations GROUP BY room_type ORDER BY room_type;",
                &[&STATUS_CONFIRMED],
            )
            .await
            .context("Failed to query per-room-type occupancy")?;

        Ok(rows
            .into_iter()
            .map(|row| RoomTypeOccupancy {
                room_type: row.get("room_type"),
                total_reservations: row.get::<&str, i64>("total"),
                active_reservations: row.get::<&str, i64>("active"),
            })
            .collect())
    }

    async fn status_breakdown(&self, total: i64) -> anyhow::Result<Vec<StatusBreakdown>> {
        let conn = self.get_postgres_connection().await?;
        let rows = conn
            .query(
                "SELECT status, COUNT(*) AS count FROM reservations \
                 GROUP BY status ORDER BY status;",
                &[],
            )
            .await
            .context("Failed to query per-status reservation counts")?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let count = row.get::<&str, i64>("count");
                StatusBreakdown {
                    status: row.get("status"),
                    count,
                    percentage: percentage(count, total),
                }
            })
            .collect())
    }

    pub async fn count_reservations(&self) -> anyhow::Result<i64> {
        let conn = self.get_postgres_connection().await?;
        let row = conn
            .query_one("SELECT COUNT(*) AS count FROM reservations;", &[])
            .await
            .context("Failed to count reservations")?;
        Ok(row.get::<&str, i64>("count"))
    }

    async fn count_reservations_with_status(&self, status: &str) -> anyhow::Result<i64> {
        let conn = self.get_postgres_connection().await?;
        let row = conn
            .query_one(
                "SELECT COUNT(*) AS count FROM reservations WHERE status = $1;",
                &[&status],
            )
            .await
            .context("Failed to count reservations by status")?;
        Ok(row.get::<&str, i64>("count"))
    }

    pub async fn count_users(&self) -> anyhow::Result<i64> {
        let conn = self.get_postgres_connection().await?;
        let row = conn
            .query_one("SELECT COUNT(*) AS count FROM users;", &[])
            .await
            .context("Failed to count users")?;
        Ok(row.get::<&str, i64>("count"))
    }

    /// Seeding only. The insert is idempotent on the unique email column.
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: &str,
    ) -> anyhow::Result<()> {
        let conn = self.get_postgres_connection().await?;
        let res = conn
            .execute(
                "INSERT INTO users (name, email, password, role, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, NOW(), NOW()) \
                 ON CONFLICT (email) DO NOTHING;",
                &[&name, &email, &password_hash, &role],
            )
            .await;
        match res {
            Ok(_) => {}
            Err(e) => {
                warn!("Failed to insert user {} into table due to: {}", email, e);
            }
        }
        Ok(())
    }

    pub async fn retrieve_users_by_role(&self, role: &str) -> anyhow::Result<Vec<User>> {
        let conn = self.get_postgres_connection().await?;
        let rows = conn
            .query(
                "SELECT id, name, email, role FROM users WHERE role = $1;",
                &[&role],
            )
            .await
            .context("Failed to retrieve users by role")?;

        Ok(rows.into_iter().map(parse_row_into_user).collect())
    }

    /// Seeding only.
    pub async fn add_reservation(&self, reservation: &Reservation) -> anyhow::Result<()> {
        let conn = self.get_postgres_connection().await?;
        conn.execute(
            "INSERT INTO reservations \
             (user_id, hotel_id, room_type, check_in, check_out, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW());",
            &[
                &reservation.user_id,
                &reservation.hotel_id,
                &reservation.room_type,
                &reservation.check_in,
                &reservation.check_out,
                &reservation.status,
            ],
        )
        .await
        .context("Failed to insert reservation")?;
        Ok(())
    }

    /// Reused by the seeder summary, where the total is not yet known.
    pub async fn status_counts(&self) -> anyhow::Result<Vec<StatusBreakdown>> {
        let total = self.count_reservations().await?;
        self.status_breakdown(total).await
    }
}

fn parse_row_into_user(row: Row) -> User {
    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        role: row.get("role"),
    }
}
