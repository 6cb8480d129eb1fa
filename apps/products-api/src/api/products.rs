//! Products API routes

use axum::Router;
use domain_products::{
    handlers, ExpirationDateRule, PgProductRepository, ProductService, ProductState,
};

use crate::state::AppState;

/// Products router over PostgreSQL, with the configured expiration window
pub fn router(state: &AppState) -> Router {
    let repository = PgProductRepository::new(state.db.clone());
    let service = ProductService::new(repository);

    handlers::router_with_state(
        ProductState::new(service)
            .with_expiration(ExpirationDateRule::new(state.config.min_expiration_days)),
    )
}
