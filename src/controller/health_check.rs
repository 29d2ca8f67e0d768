use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde_json::json;

use crate::helpers::current_timestamp;

pub fn router() -> Router {
    Router::new()
        .route("/", get(get_service_info))
        .route("/health", get(get_health_check))
}

async fn get_service_info() -> impl IntoResponse {
    (
        StatusCode::OK,
        json!({
            "service": "Analytics Service",
            "status": "running",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": current_timestamp(),
        })
        .to_string(),
    )
}

async fn get_health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        json!({
            "status": "healthy",
            "timestamp": current_timestamp(),
        })
        .to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_endpoint_responds_ok() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn service_info_endpoint_responds_ok() {
        let response = router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
