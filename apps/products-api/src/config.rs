//! Configuration for Products API

use core_config::{app_info, env_parse, server::ServerConfig, AppInfo, FromEnv};
use database::postgres::PostgresConfig;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Apply pending migrations before serving (`RUN_MIGRATIONS`, default true)
    pub run_migrations: bool,
    /// Days an expiration date must lie ahead (`PRODUCT_MIN_EXPIRATION_DAYS`, default 30)
    pub min_expiration_days: i64,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // Required - will fail if not set
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080

        Ok(Self {
            app: app_info!(),
            database,
            server,
            environment,
            run_migrations: env_parse("RUN_MIGRATIONS", "true")?,
            min_expiration_days: env_parse("PRODUCT_MIN_EXPIRATION_DAYS", "30")?,
        })
    }
}
