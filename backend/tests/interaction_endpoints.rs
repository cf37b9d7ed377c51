//! Interaction endpoints exercised through the full application with the
//! in-memory store.

mod support;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use briki_api::test_support::InMemoryPlanStore;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use support::{data_array, get, post_json, seeded_store, send};

#[fixture]
fn store() -> Arc<InMemoryPlanStore> {
    seeded_store()
}

#[rstest]
#[actix_web::test]
async fn recording_echoes_the_interaction(store: Arc<InMemoryPlanStore>) {
    let res = post_json(
        &store,
        "/api/interactions",
        json!({
            "planId": 2,
            "deviceId": "device-a",
            "interactionType": "selection",
            "metadata": { "source": "compare" }
        }),
    )
    .await;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.body["message"], "Interaction recorded");
    assert_eq!(res.body["data"]["deviceId"], "device-a");
    assert_eq!(res.body["data"]["interactionType"], "selection");
    assert_eq!(res.body["data"]["planId"], 2);
    assert_eq!(res.body["data"]["metadata"]["source"], "compare");
    assert_eq!(store.interaction_count(), 1);
}

#[rstest]
#[actix_web::test]
async fn recorded_view_appears_in_plan_history(store: Arc<InMemoryPlanStore>) {
    let created = post_json(
        &store,
        "/api/interactions",
        json!({ "planId": "1", "deviceId": "device-a", "interactionType": "view" }),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);

    let res = get(&store, "/api/interactions/plan/1").await;

    assert_eq!(res.status, StatusCode::OK);
    let history = data_array(&res);
    assert_eq!(history.len(), 1);
    assert_eq!(
        history.first().map(|item| &item["interactionType"]),
        Some(&Value::from("view"))
    );
}

#[rstest]
#[case(json!({ "deviceId": "d", "interactionType": "view" }), "planId")]
#[case(json!({ "planId": 1, "interactionType": "view" }), "deviceId")]
#[case(json!({ "planId": 1, "deviceId": "  " }), "deviceId, interactionType")]
#[actix_web::test]
async fn missing_fields_are_listed(
    store: Arc<InMemoryPlanStore>,
    #[case] body: Value,
    #[case] missing: &str,
) {
    let res = post_json(&store, "/api/interactions", body).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        res.body["error"],
        format!("Missing required fields: {missing}")
    );
    assert_eq!(store.interaction_count(), 0);
}

#[rstest]
#[actix_web::test]
async fn unknown_type_lists_accepted_values(store: Arc<InMemoryPlanStore>) {
    let res = post_json(
        &store,
        "/api/interactions",
        json!({ "planId": 1, "deviceId": "d", "interactionType": "bogus" }),
    )
    .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let message = res.body["error"].as_str().expect("error message");
    for accepted in [
        "view",
        "selection",
        "comparison",
        "checkout_start",
        "checkout_complete",
    ] {
        assert!(message.contains(accepted), "{message} should list {accepted}");
    }
}

#[rstest]
#[case(json!(1.5))]
#[case(json!("one"))]
#[actix_web::test]
async fn non_integer_plan_id_is_rejected(store: Arc<InMemoryPlanStore>, #[case] plan_id: Value) {
    let res = post_json(
        &store,
        "/api/interactions",
        json!({ "planId": plan_id, "deviceId": "d", "interactionType": "view" }),
    )
    .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "Invalid plan ID");
}

#[rstest]
#[actix_web::test]
async fn unknown_plan_is_a_server_error(store: Arc<InMemoryPlanStore>) {
    let res = post_json(
        &store,
        "/api/interactions",
        json!({ "planId": 404, "deviceId": "d", "interactionType": "view" }),
    )
    .await;

    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body["error"], "Internal server error");
}

#[rstest]
#[actix_web::test]
async fn malformed_json_body_is_rejected(store: Arc<InMemoryPlanStore>) {
    let res = send(
        &store,
        TestRequest::post()
            .uri("/api/interactions")
            .insert_header(("content-type", "application/json"))
            .set_payload("{ not json"),
    )
    .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["success"], false);
}

#[rstest]
#[actix_web::test]
async fn subject_history_matches_user_or_device(store: Arc<InMemoryPlanStore>) {
    for body in [
        json!({ "planId": 1, "deviceId": "phone", "interactionType": "view", "userId": "u-1" }),
        json!({ "planId": 2, "deviceId": "laptop", "interactionType": "comparison" }),
        json!({ "planId": 3, "deviceId": "tablet", "interactionType": "view" }),
    ] {
        let res = post_json(&store, "/api/interactions", body).await;
        assert_eq!(res.status, StatusCode::CREATED);
    }

    let res = get(&store, "/api/interactions/user?userId=u-1&deviceId=laptop").await;

    assert_eq!(res.status, StatusCode::OK);
    let mut plan_ids: Vec<i64> = data_array(&res)
        .iter()
        .map(|item| item["planId"].as_i64().expect("plan id"))
        .collect();
    plan_ids.sort_unstable();
    assert_eq!(plan_ids, vec![1, 2]);
}

#[rstest]
#[actix_web::test]
async fn subject_history_requires_an_identifier(store: Arc<InMemoryPlanStore>) {
    let res = get(&store, "/api/interactions/user?userId=").await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "Either userId or deviceId is required");
}

#[rstest]
#[actix_web::test]
async fn plan_history_rejects_non_numeric_ids(store: Arc<InMemoryPlanStore>) {
    let res = get(&store, "/api/interactions/plan/latest").await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "Invalid plan ID");
}
