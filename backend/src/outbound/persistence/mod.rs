//! PostgreSQL persistence adapter using Diesel ORM.
//!
//! The measurement repository runs queries through `diesel-async` on a `bb8`
//! pool. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module; only domain types cross the boundary.
//!
//! # Example
//!
//! ```ignore
//! use bp_backend::outbound::persistence::{
//!     DbPool, DieselMeasurementRepository, PoolConfig, run_migrations,
//! };
//!
//! run_migrations("postgres://localhost/bp").await?;
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/bp")).await?;
//! let repo = DieselMeasurementRepository::new(pool);
//! ```

mod diesel_measurement_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_measurement_repository::DieselMeasurementRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
