//! PostgreSQL connectivity for the catalog services.
//!
//! # Features
//!
//! - `postgres` (default) - SeaORM connector, retry and health check
//! - `config` - load [`postgres::PostgresConfig`] via `core_config::FromEnv`
//!
//! # Example
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::postgres;
//!
//! let config = postgres::PostgresConfig::from_env()?;
//! let db = postgres::connect_from_config_with_retry(config, None).await?;
//! postgres::check_health(&db).await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
