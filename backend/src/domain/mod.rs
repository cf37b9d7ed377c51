//! Domain primitives, aggregates and ports.
//!
//! Purpose: define the strongly typed plan and interaction entities used by
//! the HTTP and persistence adapters, plus the ports those adapters
//! implement.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - InsurancePlan, PlanFilter, PopularPlan: plan catalogue reads.
//! - PlanInteraction, NewPlanInteraction, InteractionSubject: event log.
//! - PlanCatalogueInitializer: schema creation and seeding at startup.

pub mod error;
pub mod interaction;
pub mod plan;
pub mod plan_catalogue;
pub mod ports;
mod sample_plans;
pub mod trace_id;

pub use self::error::{Error, ErrorCode};
pub use self::interaction::{
    DeviceId, InteractionSubject, InteractionType, InteractionValidationError,
    NewPlanInteraction, PlanInteraction, UnknownInteractionType,
};
pub use self::plan::{
    ANY_COUNTRY, InsurancePlan, MAX_POPULAR_LIMIT, NewInsurancePlan, PlanAttributes, PlanFilter,
    PlanId, PlanIdParseError, PlanValidationError, PopularLimit, PopularPlan,
};
pub use self::plan_catalogue::{PlanCatalogueError, PlanCatalogueInitializer};
pub use self::sample_plans::sample_plans;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use briki_api::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("Plan not found"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
