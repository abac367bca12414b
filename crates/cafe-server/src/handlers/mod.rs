//! HTTP handlers

pub mod cafes;

use crate::error::ApiError;
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.db.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}

/// Fallback for unmatched routes
pub async fn not_found() -> ApiError {
    ApiError::CafeNotFound
}

#[cfg(test)]
mod tests {
    use crate::services::ApiKeyVerifier;
    use crate::storage::Database;
    use crate::AppState;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use std::path::PathBuf;
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn test_app() -> Router {
        app_with(Arc::new(Database::in_memory().await.unwrap()))
    }

    fn app_with(db: Arc<Database>) -> Router {
        let state = AppState {
            db,
            api_keys: Arc::new(ApiKeyVerifier::new(None)),
        };
        let static_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static");
        crate::build_router(state, &static_dir)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_home_page() {
        let (status, body) = get(test_app().await, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8_lossy(&body).contains("<h1>Cafe &amp; Wifi API</h1>"));
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get(test_app().await, "/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_health_unavailable_when_database_closed() {
        let db = Arc::new(Database::in_memory().await.unwrap());
        db.close().await;

        let (status, body) = get(app_with(db), "/health").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "unavailable");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let (status, body) = get(test_app().await, "/no/such/route").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"]["Not Found"].is_string());
    }
}
