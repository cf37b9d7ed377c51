//! Plan interaction endpoints.
//!
//! ```text
//! POST /api/interactions
//! GET  /api/interactions/plan/{planId}
//! GET  /api/interactions/user?userId=&deviceId=
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    DeviceId, Error, InteractionSubject, InteractionType, NewPlanInteraction, PlanId,
    PlanInteraction,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{ApiEnvelope, ErrorEnvelope};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    DEVICE_ID, FieldName, INTERACTION_TYPE, PLAN_ID, invalid_interaction_type_error,
    invalid_plan_id_error, missing_fields_error, non_blank, parse_plan_id,
};

/// Interaction representation returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InteractionResponse {
    pub id: i32,
    pub plan_id: i32,
    pub user_id: Option<String>,
    #[schema(example = "device-3f9c")]
    pub device_id: String,
    #[schema(value_type = String, example = "view")]
    pub interaction_type: InteractionType,
    /// RFC 3339 event time.
    pub timestamp: String,
    pub metadata: Option<Value>,
}

impl From<PlanInteraction> for InteractionResponse {
    fn from(interaction: PlanInteraction) -> Self {
        Self {
            id: interaction.id,
            plan_id: interaction.plan_id.get(),
            user_id: interaction.user_id,
            device_id: interaction.device_id.as_str().to_owned(),
            interaction_type: interaction.interaction_type,
            timestamp: interaction.recorded_at.to_rfc3339(),
            metadata: interaction.metadata,
        }
    }
}

/// Plan identifier as sent by clients: a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PlanIdInput {
    Number(Number),
    Text(String),
}

impl PlanIdInput {
    fn parse(&self) -> Result<PlanId, Error> {
        match self {
            Self::Number(number) => number
                .as_i64()
                .and_then(|value| i32::try_from(value).ok())
                .map(PlanId::new)
                .ok_or_else(|| invalid_plan_id_error(PLAN_ID, &number.to_string())),
            Self::Text(text) => parse_plan_id(text, PLAN_ID),
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }
}

/// Body of `POST /api/interactions`.
///
/// Every field is optional at the wire level so missing fields are reported
/// together in a single 400 rather than as a deserialisation failure.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordInteractionRequest {
    #[schema(value_type = Option<i32>, example = 1)]
    pub plan_id: Option<PlanIdInput>,
    pub device_id: Option<String>,
    #[schema(example = "view")]
    pub interaction_type: Option<String>,
    pub user_id: Option<String>,
    pub metadata: Option<Value>,
}

impl RecordInteractionRequest {
    fn missing_fields(&self) -> Vec<FieldName> {
        let plan_missing = self.plan_id.as_ref().is_none_or(PlanIdInput::is_blank);
        let device_missing = non_blank(self.device_id.clone()).is_none();
        let type_missing = non_blank(self.interaction_type.clone()).is_none();
        [
            (PLAN_ID, plan_missing),
            (DEVICE_ID, device_missing),
            (INTERACTION_TYPE, type_missing),
        ]
        .into_iter()
        .filter_map(|(field, missing)| missing.then_some(field))
        .collect()
    }
}

impl TryFrom<RecordInteractionRequest> for NewPlanInteraction {
    type Error = Error;

    fn try_from(request: RecordInteractionRequest) -> Result<Self, Self::Error> {
        let missing = request.missing_fields();
        if !missing.is_empty() {
            return Err(missing_fields_error(&missing));
        }
        let RecordInteractionRequest {
            plan_id,
            device_id,
            interaction_type,
            user_id,
            metadata,
        } = request;

        let plan_id = plan_id
            .as_ref()
            .map(PlanIdInput::parse)
            .transpose()?
            .ok_or_else(|| missing_fields_error(&[PLAN_ID]))?;
        let raw_type = interaction_type.unwrap_or_default();
        let interaction_type = raw_type
            .parse::<InteractionType>()
            .map_err(|_| invalid_interaction_type_error(&raw_type))?;
        let device_id = DeviceId::new(device_id.unwrap_or_default())
            .map_err(|_| missing_fields_error(&[DEVICE_ID]))?;

        Ok(Self {
            plan_id,
            device_id,
            interaction_type,
            user_id: non_blank(user_id),
            metadata: metadata.filter(|value| !value.is_null()),
        })
    }
}

/// Query for interaction history by user or device.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SubjectQuery {
    pub user_id: Option<String>,
    pub device_id: Option<String>,
}

fn interaction_list(interactions: Vec<PlanInteraction>) -> ApiEnvelope<Vec<InteractionResponse>> {
    ApiEnvelope::ok(interactions.into_iter().map(Into::into).collect())
}

/// Record an interaction against a plan.
#[utoipa::path(
    post,
    path = "/api/interactions",
    request_body = RecordInteractionRequest,
    responses(
        (status = 201, description = "Interaction recorded", body = ApiEnvelope<InteractionResponse>),
        (status = 400, description = "Missing or invalid field", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["interactions"],
    operation_id = "recordInteraction"
)]
#[post("/interactions")]
pub async fn record_interaction(
    state: web::Data<HttpState>,
    payload: web::Json<RecordInteractionRequest>,
) -> ApiResult<HttpResponse> {
    let interaction = NewPlanInteraction::try_from(payload.into_inner())?;
    let recorded = state.interactions.record(interaction).await?;
    Ok(HttpResponse::Created().json(
        ApiEnvelope::ok(InteractionResponse::from(recorded)).with_message("Interaction recorded"),
    ))
}

/// Interactions for one plan, newest first.
#[utoipa::path(
    get,
    path = "/api/interactions/plan/{planId}",
    params(("planId" = String, Path, description = "Integer plan identifier")),
    responses(
        (status = 200, description = "Plan interactions", body = ApiEnvelope<Vec<InteractionResponse>>),
        (status = 400, description = "Invalid plan ID", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["interactions"],
    operation_id = "planInteractions"
)]
#[get("/interactions/plan/{plan_id}")]
pub async fn plan_interactions(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let plan_id = parse_plan_id(&path, PLAN_ID)?;
    let interactions = state.interactions.for_plan(plan_id).await?;
    Ok(HttpResponse::Ok().json(interaction_list(interactions)))
}

/// Interactions for a user or device, newest first.
#[utoipa::path(
    get,
    path = "/api/interactions/user",
    params(SubjectQuery),
    responses(
        (status = 200, description = "Subject interactions", body = ApiEnvelope<Vec<InteractionResponse>>),
        (status = 400, description = "Neither identifier supplied", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["interactions"],
    operation_id = "subjectInteractions"
)]
#[get("/interactions/user")]
pub async fn subject_interactions(
    state: web::Data<HttpState>,
    query: web::Query<SubjectQuery>,
) -> ApiResult<HttpResponse> {
    let SubjectQuery { user_id, device_id } = query.into_inner();
    let subject = InteractionSubject::new(user_id, device_id)
        .map_err(|_| Error::invalid_request("Either userId or deviceId is required"))?;
    let interactions = state.interactions.for_subject(&subject).await?;
    Ok(HttpResponse::Ok().json(interaction_list(interactions)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test};
    use chrono::Utc;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::ports::{
        InteractionRepositoryError, MockInteractionRepository, MockPlanRepository,
    };

    fn stored(interaction: NewPlanInteraction) -> PlanInteraction {
        PlanInteraction {
            id: 1,
            plan_id: interaction.plan_id,
            user_id: interaction.user_id,
            device_id: interaction.device_id,
            interaction_type: interaction.interaction_type,
            recorded_at: Utc::now(),
            metadata: interaction.metadata,
        }
    }

    async fn send(
        repo: MockInteractionRepository,
        req: test::TestRequest,
    ) -> (StatusCode, serde_json::Value) {
        let state = HttpState::new(Arc::new(MockPlanRepository::new()), Arc::new(repo));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(
                    web::JsonConfig::default()
                        .error_handler(crate::inbound::http::error::json_error_handler),
                )
                .service(
                    web::scope("/api")
                        .service(record_interaction)
                        .service(plan_interactions)
                        .service(subject_interactions),
                ),
        )
        .await;
        let res = test::call_service(&app, req.to_request()).await;
        let status = res.status();
        let body = test::read_body_json(res).await;
        (status, body)
    }

    fn post(body: serde_json::Value) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/interactions")
            .set_json(body)
    }

    #[rstest]
    #[case(json!({ "planId": 2, "deviceId": "d-1", "interactionType": "view" }))]
    #[case(json!({ "planId": "2", "deviceId": "d-1", "interactionType": "view", "userId": "" }))]
    #[actix_web::test]
    async fn valid_body_is_recorded(#[case] body: serde_json::Value) {
        let mut repo = MockInteractionRepository::new();
        repo.expect_record()
            .withf(|interaction| {
                interaction.plan_id == PlanId::new(2)
                    && interaction.device_id.as_str() == "d-1"
                    && interaction.user_id.is_none()
            })
            .times(1)
            .returning(|interaction| Ok(stored(interaction)));

        let (status, body) = send(repo, post(body)).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Interaction recorded");
        assert_eq!(body["data"]["deviceId"], "d-1");
        assert_eq!(body["data"]["interactionType"], "view");
        assert_eq!(body["data"]["planId"], 2);
    }

    #[rstest]
    #[case(json!({ "deviceId": "d", "interactionType": "view" }), "planId")]
    #[case(json!({ "planId": 1, "interactionType": "view" }), "deviceId")]
    #[case(json!({ "planId": 1, "deviceId": "d" }), "interactionType")]
    #[case(json!({ "planId": 1, "deviceId": "  ", "interactionType": "view" }), "deviceId")]
    #[actix_web::test]
    async fn missing_fields_are_named(#[case] body: serde_json::Value, #[case] field: &str) {
        let mut repo = MockInteractionRepository::new();
        repo.expect_record().times(0);

        let (status, body) = send(repo, post(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body["error"].as_str().expect("error message");
        assert!(message.starts_with("Missing required fields"));
        assert!(message.contains(field));
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_type_lists_accepted_values() {
        let mut repo = MockInteractionRepository::new();
        repo.expect_record().times(0);

        let (status, body) = send(
            repo,
            post(json!({ "planId": 1, "deviceId": "d", "interactionType": "bogus" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Invalid interaction type. Must be one of: view, selection, comparison, checkout_start, checkout_complete"
        );
    }

    #[rstest]
    #[case(json!({ "planId": "one", "deviceId": "d", "interactionType": "view" }))]
    #[case(json!({ "planId": 1.5, "deviceId": "d", "interactionType": "view" }))]
    #[actix_web::test]
    async fn non_integer_plan_id_is_rejected(#[case] body: serde_json::Value) {
        let (status, body) = send(MockInteractionRepository::new(), post(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid plan ID");
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_json_yields_error_envelope() {
        let req = test::TestRequest::post()
            .uri("/api/interactions")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json");

        let (status, body) = send(MockInteractionRepository::new(), req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "invalid_request");
    }

    #[rstest]
    #[actix_web::test]
    async fn record_failure_is_internal_error() {
        let mut repo = MockInteractionRepository::new();
        repo.expect_record().return_once(|_| {
            Err(InteractionRepositoryError::query(
                "violates foreign key constraint",
            ))
        });

        let (status, body) = send(
            repo,
            post(json!({ "planId": 404, "deviceId": "d", "interactionType": "view" })),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[rstest]
    #[actix_web::test]
    async fn plan_history_rejects_non_integer_id() {
        let mut repo = MockInteractionRepository::new();
        repo.expect_for_plan().times(0);

        let req = test::TestRequest::get().uri("/api/interactions/plan/first");
        let (status, body) = send(repo, req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid plan ID");
    }

    #[rstest]
    #[actix_web::test]
    async fn subject_history_requires_an_identifier() {
        let mut repo = MockInteractionRepository::new();
        repo.expect_for_subject().times(0);

        let req = test::TestRequest::get().uri("/api/interactions/user");
        let (status, body) = send(repo, req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Either userId or deviceId is required");
    }

    #[rstest]
    #[actix_web::test]
    async fn subject_history_passes_both_identifiers() {
        let mut repo = MockInteractionRepository::new();
        repo.expect_for_subject()
            .withf(|subject| subject.user_id() == Some("u-1") && subject.device_id() == Some("d-1"))
            .return_once(|_| Ok(Vec::new()));

        let req = test::TestRequest::get().uri("/api/interactions/user?userId=u-1&deviceId=d-1");
        let (status, body) = send(repo, req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));
    }
}
