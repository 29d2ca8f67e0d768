use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OccupancyStats {
    pub total_reservations: i64,
    pub active_reservations: i64,
    pub completed_reservations: i64,
    pub cancelled_reservations: i64,
    pub occupancy_rate: f64,
    pub by_hotel: Vec<HotelOccupancy>,
    pub by_room_type: Vec<RoomTypeOccupancy>,
    pub by_status: Vec<StatusBreakdown>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HotelOccupancy {
    pub hotel_id: i32,
    pub total_reservations: i64,
    pub active_reservations: i64,
    pub occupancy_rate: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RoomTypeOccupancy {
    pub room_type: String,
    pub total_reservations: i64,
    pub active_reservations: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StatusBreakdown {
    pub status: String,
    pub count: i64,
    pub percentage: f64,
}

/// Share of `part` in `total` as a percentage, rounded to 2 decimal places.
/// A zero total yields 0.0 rather than a division by zero.
pub fn percentage(part: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 10000.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_of_regular_counts() {
        assert_eq!(percentage(30, 42), 71.43);
        assert_eq!(percentage(21, 42), 50.0);
        assert_eq!(percentage(42, 42), 100.0);
    }

    #[test]
    fn percentage_rounds_to_two_decimals() {
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(2, 3), 66.67);
        assert_eq!(percentage(1, 7), 14.29);
    }

    #[test]
    fn percentage_with_empty_table_is_zero() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(5, 0), 0.0);
    }

    #[test]
    fn percentage_with_zero_part() {
        assert_eq!(percentage(0, 42), 0.0);
    }
}
