use serde::{Deserialize, Serialize};

/// Mirror of the booking system's `users` table.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
}
