//! PostgreSQL-backed schema creation and plan seeding adapter.
//!
//! Schema creation and seeding each run in a transaction holding the same
//! advisory lock, so concurrent starters never race on the catalog or insert
//! the catalogue twice. Seeding checks the plan count and writes every plan
//! with a single multi-row insert.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl, SimpleAsyncConnection};

use crate::domain::NewInsurancePlan;
use crate::domain::ports::{PlanSeedRepository, PlanSeedRepositoryError, SeedingResult};

use super::ddl::{ACQUIRE_CATALOGUE_LOCK, CATALOGUE_LOCK_KEY, CREATE_SCHEMA};
use super::diesel_helpers::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NewPlanRow;
use super::pool::{DbPool, PoolError};
use super::schema::insurance_plans;

/// Diesel-backed implementation of the plan seeding port.
#[derive(Clone)]
pub struct DieselPlanSeedRepository {
    pool: DbPool,
}

impl DieselPlanSeedRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PlanSeedRepositoryError {
    map_basic_pool_error(error, PlanSeedRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> PlanSeedRepositoryError {
    map_basic_diesel_error(
        error,
        operation,
        PlanSeedRepositoryError::query,
        PlanSeedRepositoryError::connection,
    )
}

async fn acquire_catalogue_lock(conn: &mut AsyncPgConnection) -> QueryResult<usize> {
    diesel::sql_query(ACQUIRE_CATALOGUE_LOCK)
        .bind::<BigInt, _>(CATALOGUE_LOCK_KEY)
        .execute(conn)
        .await
}

#[async_trait]
impl PlanSeedRepository for DieselPlanSeedRepository {
    async fn ensure_schema(&self) -> Result<(), PlanSeedRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                acquire_catalogue_lock(conn).await?;
                conn.batch_execute(CREATE_SCHEMA).await
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_diesel_error(err, "create schema"))
    }

    async fn seed_plans(
        &self,
        plans: Vec<NewInsurancePlan>,
    ) -> Result<SeedingResult, PlanSeedRepositoryError> {
        let rows: Vec<NewPlanRow<'_>> = plans.iter().map(NewPlanRow::from).collect();
        if rows.is_empty() {
            return Ok(SeedingResult::Applied { inserted: 0 });
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                acquire_catalogue_lock(conn).await?;

                let existing: i64 = insurance_plans::table.count().get_result(conn).await?;
                if existing > 0 {
                    return Ok(SeedingResult::AlreadySeeded);
                }

                let inserted = diesel::insert_into(insurance_plans::table)
                    .values(&rows)
                    .execute(conn)
                    .await?;
                Ok::<_, diesel::result::Error>(SeedingResult::Applied { inserted })
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_diesel_error(err, "seed plans"))
    }
}
