//! Shared helper utilities for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! helpers a given suite does not call are expected.
#![allow(dead_code, reason = "each test crate uses a different subset")]

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::HeaderMap;
use actix_web::{test, web};
use briki_api::domain::sample_plans;
use briki_api::inbound::http::health::HealthState;
use briki_api::inbound::http::state::HttpState;
use briki_api::server::{AppDependencies, CorsOrigins, build_app};
use briki_api::test_support::InMemoryPlanStore;
use serde_json::Value;

/// Store seeded with the bundled sample catalogue.
pub fn seeded_store() -> Arc<InMemoryPlanStore> {
    let plans = sample_plans().expect("sample plans are valid");
    Arc::new(InMemoryPlanStore::with_plans(plans).expect("store seeded"))
}

/// Application dependencies backed by `store`.
pub fn dependencies(store: &Arc<InMemoryPlanStore>) -> AppDependencies {
    let health_state = web::Data::new(HealthState::new("test"));
    health_state.mark_ready();
    AppDependencies {
        health_state,
        http_state: web::Data::new(HttpState::new(store.clone(), store.clone())),
        cors_origins: CorsOrigins::Any,
    }
}

/// Status, headers and JSON body of a response.
pub struct JsonResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Send `request` through the full application.
pub async fn send(store: &Arc<InMemoryPlanStore>, request: test::TestRequest) -> JsonResponse {
    let app = test::init_service(build_app(dependencies(store))).await;
    let response = test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let headers = response.headers().clone();
    let body = test::read_body_json(response).await;
    JsonResponse {
        status,
        headers,
        body,
    }
}

/// `GET uri` through the full application.
pub async fn get(store: &Arc<InMemoryPlanStore>, uri: &str) -> JsonResponse {
    send(store, test::TestRequest::get().uri(uri)).await
}

/// `POST uri` with a JSON body through the full application.
pub async fn post_json(store: &Arc<InMemoryPlanStore>, uri: &str, body: Value) -> JsonResponse {
    send(store, test::TestRequest::post().uri(uri).set_json(body)).await
}

/// The `data` array of a success envelope.
pub fn data_array(response: &JsonResponse) -> &Vec<Value> {
    response.body["data"]
        .as_array()
        .expect("data should be an array")
}
