use std::sync::Arc;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use crate::auth::AdminUser;
use crate::controller::AppState;
use crate::events::rabbitmq_client::EventQueueClient;
use crate::helpers::current_timestamp;
use crate::models::event::{QueueEvent, EVENT_OCCUPANCY_STATS_GENERATED};
use crate::models::occupancy::OccupancyStats;
use crate::repositories::postgres_repo::PostgresBookingRepo;

pub fn router(app_state: AppState) -> Router {
    let booking_repo = Arc::new(PostgresBookingRepo::new(app_state.postgres_connection));

    Router::new()
        .route("/occupancy", get(get_occupancy_statistics))
        .route("/occupancy/hotel/:hotel_id", get(get_hotel_occupancy))
        .route_layer(Extension(booking_repo))
        .route_layer(Extension(app_state.event_queue))
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OccupancyResponse {
    pub success: bool,
    pub message: String,
    pub data: Option<OccupancyStats>,
    pub timestamp: String,
}

pub async fn get_occupancy_statistics(
    AdminUser(admin): AdminUser,
    Extension(booking_repo): Extension<Arc<PostgresBookingRepo>>,
    Extension(event_queue): Extension<Arc<EventQueueClient>>,
) -> impl IntoResponse {
    info!("Generating occupancy statistics for admin: {}", admin.user_id);

    let stats_res = booking_repo.occupancy_statistics().await;

    return match stats_res {
        Ok(stats) => {
            let event = QueueEvent {
                event: EVENT_OCCUPANCY_STATS_GENERATED.to_string(),
                timestamp: current_timestamp(),
                data: json!({
                    "total_reservations": stats.total_reservations,
                    "active_reservations": stats.active_reservations,
                    "occupancy_rate": stats.occupancy_rate,
                }),
            };
            if let Err(e) = event_queue.publish(&event).await {
                error!("Failed to publish occupancy stats event: {}", e);
            }

            (
                StatusCode::OK,
                json!(OccupancyResponse {
                    success: true,
                    message: "Occupancy statistics generated successfully".to_string(),
                    data: Some(stats),
                    timestamp: current_timestamp(),
                })
                .to_string(),
            )
                .into_response()
        }
        Err(e) => {
            warn!("Something went wrong generating occupancy statistics due to: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "success": false,
                    "message": "Failed to generate occupancy statistics",
                    "error": e.to_string(),
                    "timestamp": current_timestamp(),
                })
                .to_string(),
            )
                .into_response()
        }
    };
}

pub async fn get_hotel_occupancy(
    AdminUser(_admin): AdminUser,
    Extension(booking_repo): Extension<Arc<PostgresBookingRepo>>,
    Path(hotel_id): Path<i32>,
) -> impl IntoResponse {
    let hotel_stats_res = booking_repo.hotel_occupancy(hotel_id).await;

    return match hotel_stats_res {
        Ok(hotel_stats) => (
            StatusCode::OK,
            json!({
                "success": true,
                "data": hotel_stats,
            })
            .to_string(),
        )
            .into_response(),
        Err(e) => {
            warn!(
                "Something went wrong retrieving occupancy for hotel: {}, due to: {}",
                hotel_id, e
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "success": false,
                    "message": "Failed to retrieve hotel occupancy",
                    "error": e.to_string(),
                    "timestamp": current_timestamp(),
                })
                .to_string(),
            )
                .into_response()
        }
    };
}
