//! Port for recording and reading plan interaction events.

use async_trait::async_trait;
use tracing::error;

use crate::domain::{Error, InteractionSubject, NewPlanInteraction, PlanId, PlanInteraction};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by interaction repository adapters.
    pub enum InteractionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "interaction repository connection failed: {message}",
        /// Query or insert failed during execution.
        Query { message: String } => "interaction repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InteractionRepository: Send + Sync {
    /// Persist an interaction and return the stored row with its generated
    /// id and timestamp.
    async fn record(
        &self,
        interaction: NewPlanInteraction,
    ) -> Result<PlanInteraction, InteractionRepositoryError>;

    /// Interactions for one plan, newest first.
    async fn for_plan(
        &self,
        plan_id: PlanId,
    ) -> Result<Vec<PlanInteraction>, InteractionRepositoryError>;

    /// Interactions whose user id or device id matches `subject`, newest
    /// first.
    async fn for_subject(
        &self,
        subject: &InteractionSubject,
    ) -> Result<Vec<PlanInteraction>, InteractionRepositoryError>;
}

impl From<InteractionRepositoryError> for Error {
    fn from(err: InteractionRepositoryError) -> Self {
        error!(error = %err, "interaction repository failure");
        Error::internal(err.to_string())
    }
}
