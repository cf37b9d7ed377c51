//! PostgreSQL-backed interaction event adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{InteractionRepository, InteractionRepositoryError};
use crate::domain::{InteractionSubject, NewPlanInteraction, PlanId, PlanInteraction};

use super::diesel_helpers::{collect_rows, map_basic_diesel_error, map_basic_pool_error};
use super::models::{InteractionRow, NewInteractionRow};
use super::pool::{DbPool, PoolError};
use super::schema::plan_interactions;

/// Diesel-backed implementation of the interaction port.
#[derive(Clone)]
pub struct DieselInteractionRepository {
    pool: DbPool,
}

impl DieselInteractionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> InteractionRepositoryError {
    map_basic_pool_error(error, InteractionRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> InteractionRepositoryError {
    map_basic_diesel_error(
        error,
        operation,
        InteractionRepositoryError::query,
        InteractionRepositoryError::connection,
    )
}

fn convert_rows(
    rows: Vec<InteractionRow>,
) -> Result<Vec<PlanInteraction>, InteractionRepositoryError> {
    collect_rows(
        rows.into_iter().map(InteractionRow::into_domain),
        InteractionRepositoryError::query,
    )
}

#[async_trait]
impl InteractionRepository for DieselInteractionRepository {
    async fn record(
        &self,
        interaction: NewPlanInteraction,
    ) -> Result<PlanInteraction, InteractionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: InteractionRow = diesel::insert_into(plan_interactions::table)
            .values(NewInteractionRow::from(&interaction))
            .returning(InteractionRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "record interaction"))?;
        row.into_domain().map_err(InteractionRepositoryError::query)
    }

    async fn for_plan(
        &self,
        plan_id: PlanId,
    ) -> Result<Vec<PlanInteraction>, InteractionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<InteractionRow> = plan_interactions::table
            .filter(plan_interactions::plan_id.eq(plan_id.get()))
            .select(InteractionRow::as_select())
            .order_by((plan_interactions::recorded_at.desc(), plan_interactions::id.desc()))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list plan interactions"))?;
        convert_rows(rows)
    }

    async fn for_subject(
        &self,
        subject: &InteractionSubject,
    ) -> Result<Vec<PlanInteraction>, InteractionRepositoryError> {
        let user_id = subject.user_id().map(str::to_owned);
        let device_id = subject.device_id().map(str::to_owned);

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<InteractionRow> = plan_interactions::table
            .filter(
                plan_interactions::user_id
                    .eq(user_id)
                    .or(plan_interactions::device_id.nullable().eq(device_id)),
            )
            .select(InteractionRow::as_select())
            .order_by((plan_interactions::recorded_at.desc(), plan_interactions::id.desc()))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list subject interactions"))?;
        convert_rows(rows)
    }
}
