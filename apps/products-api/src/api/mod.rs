//! API routes module

pub mod health;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
pub fn routes(state: &AppState) -> Router {
    Router::new().nest("/product", products::router(state))
}

/// Router with the /ready endpoint, which pings the database.
pub fn ready_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use core_config::{app_info, server::ServerConfig};
    use database::postgres::PostgresConfig;
    use http_body_util::BodyExt;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use tower::ServiceExt;

    fn state() -> AppState {
        AppState {
            config: Config {
                app: app_info!(),
                database: PostgresConfig::new("postgres://localhost/catalog"),
                server: ServerConfig::default(),
                environment: Environment::Development,
                run_migrations: false,
                min_expiration_days: 30,
            },
            db: MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        }
    }

    #[tokio::test]
    async fn test_product_routes_are_nested() {
        let response = routes(&state())
            .oneshot(
                Request::builder()
                    .uri("/product/-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "getProductById.id: Id must be positive.");
    }
}
