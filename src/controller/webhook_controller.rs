use std::time::Duration;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Extension, Json, Router};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::config::Config;
use crate::controller::AppState;

const PARTNER_TIMEOUT: Duration = Duration::from_secs(5);

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/dispatch", post(dispatch_webhook))
        .route_layer(Extension(app_state.http_client))
        .route_layer(Extension(app_state.config))
}

pub async fn dispatch_webhook(
    Extension(http_client): Extension<reqwest::Client>,
    Extension(config): Extension<Config>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    let partner_res = http_client
        .post(&config.partner_webhook_url)
        .json(&payload)
        .timeout(PARTNER_TIMEOUT)
        .send()
        .await;

    return match partner_res {
        Ok(partner_response) => {
            info!(
                "Forwarded webhook payload to partner, status: {}",
                partner_response.status()
            );
            (
                StatusCode::OK,
                json!({
                    "status": "sent",
                    "partner_status": partner_response.status().as_u16(),
                })
                .to_string(),
            )
                .into_response()
        }
        Err(e) => {
            warn!("Failed to forward webhook payload to partner due to: {}", e);
            (
                StatusCode::OK,
                json!({
                    "status": "error",
                    "detail": e.to_string(),
                })
                .to_string(),
            )
                .into_response()
        }
    };
}
