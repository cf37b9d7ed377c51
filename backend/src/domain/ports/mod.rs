//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod interaction_repository;
mod plan_repository;
mod plan_seed_repository;

#[cfg(test)]
pub use interaction_repository::MockInteractionRepository;
pub use interaction_repository::{InteractionRepository, InteractionRepositoryError};
#[cfg(test)]
pub use plan_repository::MockPlanRepository;
pub use plan_repository::{PlanRepository, PlanRepositoryError};
#[cfg(test)]
pub use plan_seed_repository::MockPlanSeedRepository;
pub use plan_seed_repository::{PlanSeedRepository, PlanSeedRepositoryError, SeedingResult};
