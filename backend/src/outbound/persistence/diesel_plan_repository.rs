//! PostgreSQL-backed plan catalogue read adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{PlanRepository, PlanRepositoryError};
use crate::domain::{ANY_COUNTRY, InsurancePlan, PlanFilter, PlanId, PopularLimit, PopularPlan};

use super::ddl::POPULAR_PLANS;
use super::diesel_helpers::{collect_rows, map_basic_diesel_error, map_basic_pool_error};
use super::models::{PlanRow, PopularPlanRow};
use super::pool::{DbPool, PoolError};
use super::schema::insurance_plans;

/// Diesel-backed implementation of the plan read port.
#[derive(Clone)]
pub struct DieselPlanRepository {
    pool: DbPool,
}

impl DieselPlanRepository {
    /// Create a new repository with the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use briki_api::outbound::persistence::{DbPool, DieselPlanRepository, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/briki")).await?;
    /// let repository = DieselPlanRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PlanRepositoryError {
    map_basic_pool_error(error, PlanRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> PlanRepositoryError {
    map_basic_diesel_error(
        error,
        operation,
        PlanRepositoryError::query,
        PlanRepositoryError::connection,
    )
}

fn convert_plans(rows: Vec<PlanRow>) -> Result<Vec<InsurancePlan>, PlanRepositoryError> {
    collect_rows(
        rows.into_iter().map(PlanRow::into_domain),
        PlanRepositoryError::query,
    )
}

#[async_trait]
impl PlanRepository for DieselPlanRepository {
    async fn all_plans(&self) -> Result<Vec<InsurancePlan>, PlanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PlanRow> = insurance_plans::table
            .select(PlanRow::as_select())
            .order_by((insurance_plans::name.asc(), insurance_plans::id.asc()))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list plans"))?;
        convert_plans(rows)
    }

    async fn find_by_id(&self, id: PlanId) -> Result<Option<InsurancePlan>, PlanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<PlanRow> = insurance_plans::table
            .filter(insurance_plans::id.eq(id.get()))
            .select(PlanRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find plan"))?;
        row.map(PlanRow::into_domain)
            .transpose()
            .map_err(PlanRepositoryError::query)
    }

    async fn filter_plans(
        &self,
        filter: &PlanFilter,
    ) -> Result<Vec<InsurancePlan>, PlanRepositoryError> {
        let ignored = filter.unapplied_criteria();
        if !ignored.is_empty() {
            debug!(?ignored, "plan filter criteria accepted but not applied");
        }

        let mut query = insurance_plans::table
            .select(PlanRow::as_select())
            .into_boxed();
        if let Some(destination) = filter.destination.clone() {
            query = query.filter(
                insurance_plans::country
                    .eq(destination)
                    .or(insurance_plans::country.eq(ANY_COUNTRY)),
            );
        }
        if let Some(adventure) = filter.include_adventure_activities {
            query = query.filter(insurance_plans::adventure_activities.eq(adventure));
        }
        if let Some(min_coverage) = filter.min_medical_coverage {
            query = query.filter(insurance_plans::medical_coverage.ge(min_coverage));
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PlanRow> = query
            .order_by((insurance_plans::base_price.asc(), insurance_plans::id.asc()))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "filter plans"))?;
        convert_plans(rows)
    }

    async fn popular_plans(
        &self,
        limit: PopularLimit,
    ) -> Result<Vec<PopularPlan>, PlanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PopularPlanRow> = diesel::sql_query(POPULAR_PLANS)
            .bind::<BigInt, _>(limit.get())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "rank popular plans"))?;
        collect_rows(
            rows.into_iter().map(PopularPlanRow::into_domain),
            PlanRepositoryError::query,
        )
    }
}
