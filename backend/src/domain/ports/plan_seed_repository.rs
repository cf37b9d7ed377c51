//! Port for creating the plan schema and seeding the sample catalogue.
//!
//! Adapters must make seeding atomic: either every sample plan is inserted
//! or none is, and two processes starting together must not both insert.

use async_trait::async_trait;

use crate::domain::NewInsurancePlan;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised while preparing the plan catalogue.
    pub enum PlanSeedRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "plan seeding connection failed: {message}",
        /// DDL or insert failed during execution.
        Query { message: String } => "plan seeding query failed: {message}",
    }
}

/// Outcome of a seeding attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedingResult {
    /// The table was empty and the plans were inserted.
    Applied { inserted: usize },
    /// The table already held plans; nothing was written.
    AlreadySeeded,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlanSeedRepository: Send + Sync {
    /// Create the plan and interaction tables when they do not exist.
    async fn ensure_schema(&self) -> Result<(), PlanSeedRepositoryError>;

    /// Insert `plans` when the plans table is empty.
    async fn seed_plans(
        &self,
        plans: Vec<NewInsurancePlan>,
    ) -> Result<SeedingResult, PlanSeedRepositoryError>;
}
