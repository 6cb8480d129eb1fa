//! # Axum Helpers
//!
//! Shared building blocks for the workspace's Axum services.
//!
//! ## Modules
//!
//! - **[`server`]**: Router assembly with OpenAPI UIs, health checks, graceful shutdown
//! - **[`http`]**: CORS and security header middleware
//! - **[`errors`]**: `AppError` and the JSON error envelope
//! - **[`extractors`]**: Positive id path parameters, validated JSON bodies
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router};
//! use core_config::server::ServerConfig;
//! use std::time::Duration;
//!
//! let router = create_router::<ApiDoc>(api_routes)?;
//! create_production_app(router, &ServerConfig::default(), Duration::from_secs(30), async {}).await?;
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    build_router, create_production_app, create_router, health_router, run_health_checks,
    HealthCheckFuture, HealthResponse, ShutdownCoordinator,
};

pub use http::{create_cors_layer, parse_allowed_origins, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{PathOperation, PositiveIdPath, ValidateWith, ValidatedJson};
