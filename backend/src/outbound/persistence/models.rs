//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types are pure
//! and report failures as strings so adapters can wrap them in their own
//! error type.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use serde_json::Value;

use crate::domain::{
    DeviceId, InsurancePlan, InteractionType, NewInsurancePlan, NewPlanInteraction,
    PlanAttributes, PlanId, PlanInteraction, PopularPlan,
};

use super::schema::{insurance_plans, plan_interactions};

/// Row struct for reading from the insurance_plans table.
#[derive(Debug, Clone, Queryable, Selectable, QueryableByName)]
#[diesel(table_name = insurance_plans)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PlanRow {
    pub id: i32,
    pub name: String,
    pub provider: String,
    pub base_price: i32,
    pub medical_coverage: i32,
    pub trip_cancellation: String,
    pub baggage_protection: i32,
    pub emergency_evacuation: Option<i32>,
    pub adventure_activities: bool,
    pub rental_car_coverage: Option<i32>,
    pub rating: Option<String>,
    pub reviews: Option<i32>,
    pub country: String,
    pub created_at: DateTime<Utc>,
}

impl PlanRow {
    pub(crate) fn into_domain(self) -> Result<InsurancePlan, String> {
        let id = PlanId::new(self.id);
        let attributes = PlanAttributes {
            name: self.name,
            provider: self.provider,
            base_price: self.base_price,
            medical_coverage: self.medical_coverage,
            trip_cancellation: self.trip_cancellation,
            baggage_protection: self.baggage_protection,
            emergency_evacuation: self.emergency_evacuation,
            adventure_activities: self.adventure_activities,
            rental_car_coverage: self.rental_car_coverage,
            rating: self.rating,
            reviews: self.reviews,
            country: self.country,
        };
        InsurancePlan::new(id, attributes, self.created_at)
            .map_err(|err| format!("plan {id} is invalid: {err}"))
    }
}

/// Result row of the popularity aggregation.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct PopularPlanRow {
    #[diesel(embed)]
    pub plan: PlanRow,
    #[diesel(sql_type = BigInt)]
    pub interaction_count: i64,
}

impl PopularPlanRow {
    pub(crate) fn into_domain(self) -> Result<PopularPlan, String> {
        Ok(PopularPlan {
            plan: self.plan.into_domain()?,
            interaction_count: self.interaction_count,
        })
    }
}

/// Insertable struct for seeding plans.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = insurance_plans)]
pub(crate) struct NewPlanRow<'a> {
    pub name: &'a str,
    pub provider: &'a str,
    pub base_price: i32,
    pub medical_coverage: i32,
    pub trip_cancellation: &'a str,
    pub baggage_protection: i32,
    pub emergency_evacuation: Option<i32>,
    pub adventure_activities: bool,
    pub rental_car_coverage: Option<i32>,
    pub rating: Option<&'a str>,
    pub reviews: Option<i32>,
    pub country: &'a str,
}

impl<'a> From<&'a NewInsurancePlan> for NewPlanRow<'a> {
    fn from(plan: &'a NewInsurancePlan) -> Self {
        let attrs = plan.attributes();
        Self {
            name: &attrs.name,
            provider: &attrs.provider,
            base_price: attrs.base_price,
            medical_coverage: attrs.medical_coverage,
            trip_cancellation: &attrs.trip_cancellation,
            baggage_protection: attrs.baggage_protection,
            emergency_evacuation: attrs.emergency_evacuation,
            adventure_activities: attrs.adventure_activities,
            rental_car_coverage: attrs.rental_car_coverage,
            rating: attrs.rating.as_deref(),
            reviews: attrs.reviews,
            country: &attrs.country,
        }
    }
}

/// Row struct for reading from the plan_interactions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = plan_interactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct InteractionRow {
    pub id: i32,
    pub plan_id: i32,
    pub user_id: Option<String>,
    pub device_id: String,
    pub interaction_type: String,
    pub recorded_at: DateTime<Utc>,
    pub metadata: Option<Value>,
}

impl InteractionRow {
    pub(crate) fn into_domain(self) -> Result<PlanInteraction, String> {
        let interaction_type = self
            .interaction_type
            .parse::<InteractionType>()
            .map_err(|err| format!("interaction {}: {err}", self.id))?;
        let device_id = DeviceId::new(self.device_id)
            .map_err(|err| format!("interaction {}: {err}", self.id))?;
        Ok(PlanInteraction {
            id: self.id,
            plan_id: PlanId::new(self.plan_id),
            user_id: self.user_id,
            device_id,
            interaction_type,
            recorded_at: self.recorded_at,
            metadata: self.metadata,
        })
    }
}

/// Insertable struct for recording interactions.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = plan_interactions)]
pub(crate) struct NewInteractionRow<'a> {
    pub plan_id: i32,
    pub user_id: Option<&'a str>,
    pub device_id: &'a str,
    pub interaction_type: &'a str,
    pub metadata: Option<&'a Value>,
}

impl<'a> From<&'a NewPlanInteraction> for NewInteractionRow<'a> {
    fn from(interaction: &'a NewPlanInteraction) -> Self {
        Self {
            plan_id: interaction.plan_id.get(),
            user_id: interaction.user_id.as_deref(),
            device_id: interaction.device_id.as_str(),
            interaction_type: interaction.interaction_type.as_str(),
            metadata: interaction.metadata.as_ref(),
        }
    }
}
