//! Read-side port for the insurance plan catalogue.

use async_trait::async_trait;
use tracing::error;

use crate::domain::{Error, InsurancePlan, PlanFilter, PlanId, PopularLimit, PopularPlan};

use super::define_port_error;

define_port_error! {
    /// Errors raised when reading insurance plans.
    pub enum PlanRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "plan repository connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } => "plan repository query failed: {message}",
    }
}

/// Port for reading insurance plans.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// Every plan, ordered by name ascending.
    async fn all_plans(&self) -> Result<Vec<InsurancePlan>, PlanRepositoryError>;

    /// A single plan, or `None` when no row has the identifier.
    async fn find_by_id(&self, id: PlanId) -> Result<Option<InsurancePlan>, PlanRepositoryError>;

    /// Plans matching the applied predicates of `filter`, ordered by base
    /// price ascending.
    async fn filter_plans(
        &self,
        filter: &PlanFilter,
    ) -> Result<Vec<InsurancePlan>, PlanRepositoryError>;

    /// Plans with at least one interaction, ordered by interaction count
    /// descending then plan id ascending.
    async fn popular_plans(
        &self,
        limit: PopularLimit,
    ) -> Result<Vec<PopularPlan>, PlanRepositoryError>;
}

impl From<PlanRepositoryError> for Error {
    fn from(err: PlanRepositoryError) -> Self {
        error!(error = %err, "plan repository failure");
        Error::internal(err.to_string())
    }
}
