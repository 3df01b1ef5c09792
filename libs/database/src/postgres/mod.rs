//! PostgreSQL connector: pool configuration, connection with retry, and
//! the health check used by readiness probes.

mod config;
mod connector;
mod health;

pub use config::PostgresConfig;
pub use connector::{connect_from_config, connect_from_config_with_retry, connect_with_options};
pub use health::check_health;

// Re-export SeaORM types callers need alongside the connector
pub use sea_orm::{ConnectOptions, DatabaseConnection, DbErr};
