//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every handler under `inbound::http` together with the
//! response DTOs. Domain types stay free of utoipa; the inbound layer owns
//! their wire schemas.
//!
//! The document backs Swagger UI in debug builds and is exported with
//! `cargo run --bin openapi-dump`.

use utoipa::OpenApi;

use crate::inbound::http::envelope::ErrorEnvelope;
use crate::inbound::http::health::HealthStatus;
use crate::inbound::http::interactions::{InteractionResponse, RecordInteractionRequest};
use crate::inbound::http::plans::{PlanResponse, PopularPlanResponse};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Briki plans API",
        description = "Insurance plan catalogue, filtering, popularity ranking and interaction tracking.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::plans::list_plans,
        crate::inbound::http::plans::filter_plans,
        crate::inbound::http::plans::popular_plans,
        crate::inbound::http::plans::get_plan,
        crate::inbound::http::interactions::record_interaction,
        crate::inbound::http::interactions::plan_interactions,
        crate::inbound::http::interactions::subject_interactions,
        crate::inbound::http::health::status,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        PlanResponse,
        PopularPlanResponse,
        InteractionResponse,
        RecordInteractionRequest,
        ErrorEnvelope,
        HealthStatus
    )),
    tags(
        (name = "plans", description = "Insurance plan catalogue queries"),
        (name = "interactions", description = "User and device interaction tracking"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
