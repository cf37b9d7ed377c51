//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain ports backed by PostgreSQL via
//! Diesel with async support through `diesel-async` and `bb8` pooling.
//!
//! - Repository implementations only translate between Diesel rows and
//!   domain types.
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) never
//!   leave this module.
//! - Every Diesel or pool failure is mapped onto the port's typed error.
//!
//! # Example
//!
//! ```no_run
//! use briki_api::outbound::persistence::{DbPool, DieselPlanRepository, PoolConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/briki")).await?;
//! let plans = DieselPlanRepository::new(pool);
//! # let _ = plans;
//! # Ok(())
//! # }
//! ```

mod ddl;
mod diesel_helpers;
mod diesel_interaction_repository;
mod diesel_plan_repository;
mod diesel_plan_seed_repository;
mod models;
mod pool;
mod schema;

pub use diesel_interaction_repository::DieselInteractionRepository;
pub use diesel_plan_repository::DieselPlanRepository;
pub use diesel_plan_seed_repository::DieselPlanSeedRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
