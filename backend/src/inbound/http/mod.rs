//! HTTP inbound adapter exposing REST endpoints.

pub mod envelope;
pub mod error;
pub mod health;
pub mod interactions;
pub mod plans;
pub mod state;
pub mod validation;

pub use error::ApiResult;

use actix_web::{Scope, web};

/// Build the `/api` scope with every plan and interaction endpoint.
///
/// Literal plan routes register ahead of `/plans/{id}` so `filter` and
/// `popular` never reach the identifier parser.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .service(plans::list_plans)
        .service(plans::filter_plans)
        .service(plans::popular_plans)
        .service(plans::get_plan)
        .service(interactions::record_interaction)
        .service(interactions::plan_interactions)
        .service(interactions::subject_interactions)
}
