use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

pub const STATUS_CONFIRMED: &str = "confirmed";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_CANCELLED: &str = "cancelled";
pub const STATUS_PENDING: &str = "pending";

/// Mirror of the booking system's `reservations` table. The schema is owned
/// by the upstream system; this service only reads and seeds it.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Reservation {
    pub user_id: i64,
    pub hotel_id: i32,
    pub room_type: String,
    pub check_in: PrimitiveDateTime,
    pub check_out: PrimitiveDateTime,
    pub status: String,
}
