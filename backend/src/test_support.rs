//! In-memory port implementations for integration tests.
//!
//! Compiled only with the `test-support` feature. [`InMemoryPlanStore`]
//! implements every persistence port with the same ordering and matching
//! rules as the Diesel adapters, so HTTP behaviour can be exercised without
//! PostgreSQL.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{
    InteractionRepository, InteractionRepositoryError, PlanRepository, PlanRepositoryError,
    PlanSeedRepository, PlanSeedRepositoryError, SeedingResult,
};
use crate::domain::{
    InsurancePlan, InteractionSubject, NewInsurancePlan, NewPlanInteraction, PlanFilter, PlanId,
    PlanInteraction, PlanValidationError, PopularLimit, PopularPlan,
};

#[derive(Default)]
struct StoreState {
    schema_ready: bool,
    plans: Vec<InsurancePlan>,
    interactions: Vec<PlanInteraction>,
}

impl StoreState {
    fn insert_plan(&mut self, plan: NewInsurancePlan) -> Result<InsurancePlan, PlanValidationError> {
        let next_id = self.plans.iter().map(|p| p.id().get()).max().unwrap_or(0) + 1;
        let stored = InsurancePlan::new(
            PlanId::new(next_id),
            plan.attributes().clone(),
            Utc::now(),
        )?;
        self.plans.push(stored.clone());
        Ok(stored)
    }
}

/// Thread-safe store backing every plan and interaction port.
///
/// # Examples
/// ```
/// use briki_api::domain::sample_plans;
/// use briki_api::test_support::InMemoryPlanStore;
///
/// let store = InMemoryPlanStore::with_plans(sample_plans().expect("valid samples"))
///     .expect("store seeded");
/// assert_eq!(store.plan_count(), 8);
/// ```
#[derive(Default)]
pub struct InMemoryPlanStore {
    state: Mutex<StoreState>,
    unavailable: AtomicBool,
}

impl InMemoryPlanStore {
    /// Store pre-populated with `plans`, assigned ids from 1.
    ///
    /// # Errors
    /// Returns [`PlanValidationError`] when a plan fails validation.
    pub fn with_plans(plans: Vec<NewInsurancePlan>) -> Result<Self, PlanValidationError> {
        let store = Self::default();
        {
            let mut state = store.lock();
            state.schema_ready = true;
            for plan in plans {
                state.insert_plan(plan)?;
            }
        }
        Ok(store)
    }

    /// Make every port call fail with a connection error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn plan_count(&self) -> usize {
        self.lock().plans.len()
    }

    pub fn interaction_count(&self) -> usize {
        self.lock().interactions.len()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_unavailable(&self) -> bool {
        self.unavailable.load(Ordering::SeqCst)
    }
}

const UNAVAILABLE: &str = "in-memory store marked unavailable";

fn sorted_newest_first(mut interactions: Vec<PlanInteraction>) -> Vec<PlanInteraction> {
    interactions.sort_by(|a, b| {
        b.recorded_at
            .cmp(&a.recorded_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    interactions
}

#[async_trait]
impl PlanRepository for InMemoryPlanStore {
    async fn all_plans(&self) -> Result<Vec<InsurancePlan>, PlanRepositoryError> {
        if self.is_unavailable() {
            return Err(PlanRepositoryError::connection(UNAVAILABLE));
        }
        let mut plans = self.lock().plans.clone();
        plans.sort_by(|a, b| {
            a.attributes()
                .name
                .cmp(&b.attributes().name)
                .then_with(|| a.id().cmp(&b.id()))
        });
        Ok(plans)
    }

    async fn find_by_id(&self, id: PlanId) -> Result<Option<InsurancePlan>, PlanRepositoryError> {
        if self.is_unavailable() {
            return Err(PlanRepositoryError::connection(UNAVAILABLE));
        }
        Ok(self.lock().plans.iter().find(|plan| plan.id() == id).cloned())
    }

    async fn filter_plans(
        &self,
        filter: &PlanFilter,
    ) -> Result<Vec<InsurancePlan>, PlanRepositoryError> {
        if self.is_unavailable() {
            return Err(PlanRepositoryError::connection(UNAVAILABLE));
        }
        let mut plans: Vec<InsurancePlan> = self
            .lock()
            .plans
            .iter()
            .filter(|plan| filter.matches(plan))
            .cloned()
            .collect();
        plans.sort_by(|a, b| {
            a.attributes()
                .base_price
                .cmp(&b.attributes().base_price)
                .then_with(|| a.id().cmp(&b.id()))
        });
        Ok(plans)
    }

    async fn popular_plans(
        &self,
        limit: PopularLimit,
    ) -> Result<Vec<PopularPlan>, PlanRepositoryError> {
        if self.is_unavailable() {
            return Err(PlanRepositoryError::connection(UNAVAILABLE));
        }
        let state = self.lock();
        let mut ranked: Vec<PopularPlan> = state
            .plans
            .iter()
            .map(|plan| PopularPlan {
                plan: plan.clone(),
                interaction_count: i64::try_from(
                    state
                        .interactions
                        .iter()
                        .filter(|interaction| interaction.plan_id == plan.id())
                        .count(),
                )
                .unwrap_or(i64::MAX),
            })
            .filter(|popular| popular.interaction_count > 0)
            .collect();
        ranked.sort_by(|a, b| {
            b.interaction_count
                .cmp(&a.interaction_count)
                .then_with(|| a.plan.id().cmp(&b.plan.id()))
        });
        ranked.truncate(usize::try_from(limit.get()).unwrap_or(usize::MAX));
        Ok(ranked)
    }
}

#[async_trait]
impl InteractionRepository for InMemoryPlanStore {
    async fn record(
        &self,
        interaction: NewPlanInteraction,
    ) -> Result<PlanInteraction, InteractionRepositoryError> {
        if self.is_unavailable() {
            return Err(InteractionRepositoryError::connection(UNAVAILABLE));
        }
        let mut state = self.lock();
        if !state.plans.iter().any(|plan| plan.id() == interaction.plan_id) {
            return Err(InteractionRepositoryError::query(format!(
                "plan {} does not exist",
                interaction.plan_id
            )));
        }
        let id = state.interactions.iter().map(|i| i.id).max().unwrap_or(0) + 1;
        let NewPlanInteraction {
            plan_id,
            device_id,
            interaction_type,
            user_id,
            metadata,
        } = interaction;
        let stored = PlanInteraction {
            id,
            plan_id,
            user_id,
            device_id,
            interaction_type,
            recorded_at: Utc::now(),
            metadata,
        };
        state.interactions.push(stored.clone());
        Ok(stored)
    }

    async fn for_plan(
        &self,
        plan_id: PlanId,
    ) -> Result<Vec<PlanInteraction>, InteractionRepositoryError> {
        if self.is_unavailable() {
            return Err(InteractionRepositoryError::connection(UNAVAILABLE));
        }
        let matching = self
            .lock()
            .interactions
            .iter()
            .filter(|interaction| interaction.plan_id == plan_id)
            .cloned()
            .collect();
        Ok(sorted_newest_first(matching))
    }

    async fn for_subject(
        &self,
        subject: &InteractionSubject,
    ) -> Result<Vec<PlanInteraction>, InteractionRepositoryError> {
        if self.is_unavailable() {
            return Err(InteractionRepositoryError::connection(UNAVAILABLE));
        }
        let matching = self
            .lock()
            .interactions
            .iter()
            .filter(|interaction| subject.matches(interaction))
            .cloned()
            .collect();
        Ok(sorted_newest_first(matching))
    }
}

#[async_trait]
impl PlanSeedRepository for InMemoryPlanStore {
    async fn ensure_schema(&self) -> Result<(), PlanSeedRepositoryError> {
        if self.is_unavailable() {
            return Err(PlanSeedRepositoryError::connection(UNAVAILABLE));
        }
        self.lock().schema_ready = true;
        Ok(())
    }

    async fn seed_plans(
        &self,
        plans: Vec<NewInsurancePlan>,
    ) -> Result<SeedingResult, PlanSeedRepositoryError> {
        if self.is_unavailable() {
            return Err(PlanSeedRepositoryError::connection(UNAVAILABLE));
        }
        let mut state = self.lock();
        if !state.schema_ready {
            return Err(PlanSeedRepositoryError::query("schema not created"));
        }
        if !state.plans.is_empty() {
            return Ok(SeedingResult::AlreadySeeded);
        }
        let inserted = plans.len();
        for plan in plans {
            state
                .insert_plan(plan)
                .map_err(|err| PlanSeedRepositoryError::query(err.to_string()))?;
        }
        Ok(SeedingResult::Applied { inserted })
    }
}
