//! Database initialisation: create the schema, then seed the sample plans.
//!
//! Safe to run on every process start; seeding is skipped when plans exist.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::domain::ports::{PlanSeedRepository, PlanSeedRepositoryError, SeedingResult};
use crate::domain::{PlanValidationError, sample_plans};

/// Errors raised while initialising the plan catalogue.
#[derive(Debug, Error)]
pub enum PlanCatalogueError {
    /// A bundled sample plan failed validation.
    #[error("sample plan failed validation: {0}")]
    InvalidSample(#[from] PlanValidationError),
    /// Schema creation or seeding failed.
    #[error("plan catalogue persistence error: {0}")]
    Persistence(#[from] PlanSeedRepositoryError),
}

/// Service that prepares the plan tables at startup.
#[derive(Clone)]
pub struct PlanCatalogueInitializer {
    repository: Arc<dyn PlanSeedRepository>,
}

impl PlanCatalogueInitializer {
    pub fn new(repository: Arc<dyn PlanSeedRepository>) -> Self {
        Self { repository }
    }

    /// Create both tables if missing and seed the sample catalogue when the
    /// plans table is empty.
    ///
    /// # Errors
    /// Returns [`PlanCatalogueError`] when DDL or seeding fails.
    pub async fn initialize(&self) -> Result<SeedingResult, PlanCatalogueError> {
        self.repository.ensure_schema().await?;
        let plans = sample_plans()?;
        let result = self.repository.seed_plans(plans).await?;
        match result {
            SeedingResult::Applied { inserted } => {
                info!(inserted, "seeded sample insurance plans");
            }
            SeedingResult::AlreadySeeded => {
                info!("insurance plans already present; skipping seed");
            }
        }
        Ok(result)
    }
}
