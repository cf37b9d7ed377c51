//! Insurance plan read endpoints.
//!
//! ```text
//! GET /api/plans
//! GET /api/plans/filter
//! GET /api/plans/popular
//! GET /api/plans/{id}
//! ```

use actix_web::{HttpResponse, get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, InsurancePlan, PlanFilter, PopularLimit, PopularPlan};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{ApiEnvelope, ErrorEnvelope};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, first_value, lenient_int, non_blank, parse_plan_id, present_flag,
};

const PATH_ID: FieldName = FieldName::new("id");

/// Plan representation returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Premium Explorer")]
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
    /// Destination the plan applies to, or `all`.
    #[schema(example = "all")]
    pub country: String,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

impl From<InsurancePlan> for PlanResponse {
    fn from(plan: InsurancePlan) -> Self {
        let id = plan.id().get();
        let created_at = plan.created_at().to_rfc3339();
        let attrs = plan.attributes().clone();
        Self {
            id,
            name: attrs.name,
            provider: attrs.provider,
            base_price: attrs.base_price,
            medical_coverage: attrs.medical_coverage,
            trip_cancellation: attrs.trip_cancellation,
            baggage_protection: attrs.baggage_protection,
            emergency_evacuation: attrs.emergency_evacuation,
            adventure_activities: attrs.adventure_activities,
            rental_car_coverage: attrs.rental_car_coverage,
            rating: attrs.rating,
            reviews: attrs.reviews,
            country: attrs.country,
            created_at,
        }
    }
}

/// Plan with its recorded interaction count.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PopularPlanResponse {
    #[serde(flatten)]
    pub plan: PlanResponse,
    #[schema(example = 12)]
    pub interaction_count: i64,
}

impl From<PopularPlan> for PopularPlanResponse {
    fn from(popular: PopularPlan) -> Self {
        Self {
            plan: popular.plan.into(),
            interaction_count: popular.interaction_count,
        }
    }
}

/// Raw filter query. Values stay textual so malformed numbers are treated
/// as absent rather than rejected; repeated keys keep their first value.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PlanFilterQuery {
    /// Accepted but not applied.
    pub origin: Option<String>,
    /// Country to match; plans for `all` countries always match.
    pub destination: Option<String>,
    /// Accepted but not applied.
    pub start_date: Option<String>,
    /// Accepted but not applied.
    pub end_date: Option<String>,
    /// Accepted but not applied.
    pub age: Option<String>,
    /// Accepted but not applied.
    pub travelers_count: Option<String>,
    /// Minimum medical coverage, inclusive.
    pub min_medical_coverage: Option<String>,
    /// `true` keeps adventure plans; any other value keeps the rest.
    pub include_adventure_activities: Option<String>,
}

impl PlanFilterQuery {
    fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            origin: first_value(pairs, "origin"),
            destination: first_value(pairs, "destination"),
            start_date: first_value(pairs, "startDate"),
            end_date: first_value(pairs, "endDate"),
            age: first_value(pairs, "age"),
            travelers_count: first_value(pairs, "travelersCount"),
            min_medical_coverage: first_value(pairs, "minMedicalCoverage"),
            include_adventure_activities: first_value(pairs, "includeAdventureActivities"),
        }
    }
}

impl From<PlanFilterQuery> for PlanFilter {
    fn from(query: PlanFilterQuery) -> Self {
        Self {
            origin: non_blank(query.origin),
            destination: non_blank(query.destination),
            start_date: non_blank(query.start_date),
            end_date: non_blank(query.end_date),
            age: lenient_int(query.age.as_deref()),
            travelers_count: lenient_int(query.travelers_count.as_deref()),
            min_medical_coverage: lenient_int(query.min_medical_coverage.as_deref()),
            include_adventure_activities: present_flag(
                query.include_adventure_activities.as_deref(),
            ),
        }
    }
}

/// Query for the popularity ranking.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PopularQuery {
    /// Number of plans to return (default 5, capped at 50).
    pub limit: Option<String>,
}

impl PopularQuery {
    fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            limit: first_value(pairs, "limit"),
        }
    }

    fn limit(&self) -> PopularLimit {
        lenient_int(self.limit.as_deref())
            .map(|value| PopularLimit::from_requested(i64::from(value)))
            .unwrap_or_default()
    }
}

fn plan_list(plans: Vec<InsurancePlan>) -> ApiEnvelope<Vec<PlanResponse>> {
    ApiEnvelope::ok(plans.into_iter().map(PlanResponse::from).collect())
}

/// List every plan ordered by name.
#[utoipa::path(
    get,
    path = "/api/plans",
    responses(
        (status = 200, description = "All plans", body = ApiEnvelope<Vec<PlanResponse>>),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["plans"],
    operation_id = "listPlans"
)]
#[get("/plans")]
pub async fn list_plans(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let plans = state.plans.all_plans().await?;
    Ok(HttpResponse::Ok().json(plan_list(plans)))
}

/// Filter plans by destination, adventure cover and medical coverage.
#[utoipa::path(
    get,
    path = "/api/plans/filter",
    params(PlanFilterQuery),
    responses(
        (status = 200, description = "Matching plans by base price", body = ApiEnvelope<Vec<PlanResponse>>),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["plans"],
    operation_id = "filterPlans"
)]
#[get("/plans/filter")]
pub async fn filter_plans(
    state: web::Data<HttpState>,
    query: web::Query<Vec<(String, String)>>,
) -> ApiResult<HttpResponse> {
    let filter = PlanFilter::from(PlanFilterQuery::from_pairs(&query));
    let plans = state.plans.filter_plans(&filter).await?;
    Ok(HttpResponse::Ok().json(plan_list(plans)))
}

/// Rank plans by recorded interactions.
#[utoipa::path(
    get,
    path = "/api/plans/popular",
    params(PopularQuery),
    responses(
        (status = 200, description = "Most interacted-with plans", body = ApiEnvelope<Vec<PopularPlanResponse>>),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["plans"],
    operation_id = "popularPlans"
)]
#[get("/plans/popular")]
pub async fn popular_plans(
    state: web::Data<HttpState>,
    query: web::Query<Vec<(String, String)>>,
) -> ApiResult<HttpResponse> {
    let limit = PopularQuery::from_pairs(&query).limit();
    let popular = state.plans.popular_plans(limit).await?;
    let body: Vec<PopularPlanResponse> = popular.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(ApiEnvelope::ok(body)))
}

/// Fetch a single plan.
#[utoipa::path(
    get,
    path = "/api/plans/{id}",
    params(("id" = String, Path, description = "Integer plan identifier")),
    responses(
        (status = 200, description = "Plan", body = ApiEnvelope<PlanResponse>),
        (status = 400, description = "Invalid plan ID", body = ErrorEnvelope),
        (status = 404, description = "Plan not found", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["plans"],
    operation_id = "getPlan"
)]
#[get("/plans/{id}")]
pub async fn get_plan(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_plan_id(&path, PATH_ID)?;
    let plan = state
        .plans
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::not_found("Plan not found"))?;
    Ok(HttpResponse::Ok().json(ApiEnvelope::ok(PlanResponse::from(plan))))
}
