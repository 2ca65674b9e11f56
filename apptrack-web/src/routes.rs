//! Route definitions for the apptrack web server

use crate::{auth, handlers, AppState};
use axum::{
    routing::{get, post},
    Router,
};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Registration and login
        .route("/users", post(auth::handlers::register_user))
        .route("/users/login", post(auth::handlers::login_user))
        .route("/users/me", get(auth::handlers::get_me))
        // Appointments (bearer token required, owner-scoped)
        .route(
            "/appointments",
            get(handlers::list_appointments).post(handlers::create_appointment),
        )
        .route(
            "/appointments/{id}",
            get(handlers::get_appointment)
                .put(handlers::update_appointment)
                .delete(handlers::delete_appointment),
        )
}

#[cfg(test)]
mod tests {
    use crate::{create_app, AppState, WebConfig};
    use axum::http::StatusCode;
    use tower::ServiceExt;

    async fn test_state() -> AppState {
        let mut config = WebConfig::default();
        config.dev_mode = true;
        config.database_url = Some("sqlite::memory:".to_string());
        config.auth.jwt_secret = Some("routes-test-secret".to_string());
        AppState::new(config).await.unwrap()
    }

    #[tokio::test]
    async fn test_health_check_route() {
        let app = create_app(test_state().await);

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/api/health")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let app = create_app(test_state().await);

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/api/unknown")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
