//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{InteractionRepository, PlanRepository};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use briki_api::inbound::http::state::HttpState;
/// use briki_api::test_support::InMemoryPlanStore;
///
/// let store = Arc::new(InMemoryPlanStore::default());
/// let state = HttpState::new(store.clone(), store);
/// let _plans = state.plans.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub plans: Arc<dyn PlanRepository>,
    pub interactions: Arc<dyn InteractionRepository>,
}

impl HttpState {
    pub fn new(
        plans: Arc<dyn PlanRepository>,
        interactions: Arc<dyn InteractionRepository>,
    ) -> Self {
        Self {
            plans,
            interactions,
        }
    }
}
