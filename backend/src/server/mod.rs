//! Server construction, startup initialisation and middleware wiring.

mod settings;

pub use settings::{CorsOrigins, ServerSettings, SettingsError, log_filter};

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::dev::{ServerHandle, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::Trace;
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::{PlanCatalogueError, PlanCatalogueInitializer};
use crate::inbound::http::api_scope;
use crate::inbound::http::error::{json_error_handler, query_error_handler, unmatched_route};
use crate::inbound::http::health::{HealthState, live, ready, status};
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{
    DbPool, DieselInteractionRepository, DieselPlanRepository, DieselPlanSeedRepository,
    PoolConfig, PoolError,
};

/// Errors that abort startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("database pool: {0}")]
    Pool(#[from] PoolError),
    #[error("database initialisation: {0}")]
    Catalogue(#[from] PlanCatalogueError),
    #[error("http server: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared state and policy handed to every Actix worker.
#[derive(Clone)]
pub struct AppDependencies {
    pub health_state: web::Data<HealthState>,
    pub http_state: web::Data<HttpState>,
    pub cors_origins: CorsOrigins,
}

fn cors(origins: &CorsOrigins) -> Cors {
    let cors = Cors::default()
        .allowed_methods(["GET", "POST", "OPTIONS"])
        .allow_any_header()
        .max_age(3600);
    match origins {
        CorsOrigins::Any => cors.allow_any_origin().send_wildcard(),
        CorsOrigins::List(list) => list
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin)),
    }
}

fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .add((header::X_FRAME_OPTIONS, "DENY"))
        .add((header::REFERRER_POLICY, "no-referrer"))
        .add((
            header::STRICT_TRANSPORT_SECURITY,
            "max-age=15552000; includeSubDomains",
        ))
        .add((header::X_XSS_PROTECTION, "0"))
        .add(("cross-origin-resource-policy", "same-origin"))
}

/// Assemble the Actix application: middleware, health probes and the API.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        cors_origins,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .wrap(security_headers())
        .wrap(cors(&cors_origins))
        .wrap(Trace)
        .service(status)
        .service(ready)
        .service(live)
        .service(api_scope());

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.default_service(web::to(unmatched_route))
}

async fn shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result,
            _ = terminate.recv() => Ok(()),
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}

async fn drain_on_shutdown(handle: ServerHandle, health_state: web::Data<HealthState>) {
    if let Err(error) = shutdown_signal().await {
        warn!(%error, "failed to listen for shutdown signals");
        return;
    }
    health_state.mark_unhealthy();
    info!("shutdown requested; draining connections");
    handle.stop(true).await;
}

/// Build the pool, prepare the schema and seed data, then serve until a
/// shutdown signal arrives.
///
/// # Errors
/// Returns [`StartupError`] when the pool cannot be built, database
/// initialisation fails, or the listener cannot bind.
pub async fn run(settings: ServerSettings) -> Result<(), StartupError> {
    let ServerSettings {
        database_url,
        database_ssl,
        pool_max_size,
        host,
        port,
        cors_origins,
        environment,
    } = settings;

    let pool = DbPool::new(
        PoolConfig::new(database_url)
            .with_max_size(pool_max_size)
            .with_tls(database_ssl),
    )
    .await?;

    let health_state = web::Data::new(HealthState::new(environment.as_str()));
    PlanCatalogueInitializer::new(Arc::new(DieselPlanSeedRepository::new(pool.clone())))
        .initialize()
        .await?;
    health_state.mark_ready();

    let http_state = web::Data::new(HttpState::new(
        Arc::new(DieselPlanRepository::new(pool.clone())),
        Arc::new(DieselInteractionRepository::new(pool)),
    ));
    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state,
        cors_origins,
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind((host.as_str(), port))?
        .disable_signals()
        .run();
    info!(%host, port, %environment, "server listening");

    actix_web::rt::spawn(drain_on_shutdown(server.handle(), health_state));
    server.await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::{MockInteractionRepository, MockPlanRepository};

    fn deps(cors_origins: CorsOrigins) -> AppDependencies {
        AppDependencies {
            health_state: web::Data::new(HealthState::new("test")),
            http_state: web::Data::new(HttpState::new(
                Arc::new(MockPlanRepository::new()),
                Arc::new(MockInteractionRepository::new()),
            )),
            cors_origins,
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn responses_carry_security_headers() {
        let app = test::init_service(build_app(deps(CorsOrigins::Any))).await;
        let res =
            test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;

        assert_eq!(res.status(), StatusCode::OK);
        let headers = res.headers();
        assert_eq!(
            headers
                .get(header::X_CONTENT_TYPE_OPTIONS)
                .and_then(|v| v.to_str().ok()),
            Some("nosniff")
        );
        assert_eq!(
            headers.get(header::X_FRAME_OPTIONS).and_then(|v| v.to_str().ok()),
            Some("DENY")
        );
        assert!(headers.contains_key("trace-id"));
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_routes_return_not_found_envelope() {
        let app = test::init_service(build_app(deps(CorsOrigins::Any))).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/unknown").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Route not found");
    }

    #[rstest]
    #[actix_web::test]
    async fn listed_origin_is_echoed() {
        let origin = "https://briki.example";
        let app = test::init_service(build_app(deps(CorsOrigins::List(vec![
            origin.to_owned(),
        ]))))
        .await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/health")
                .insert_header((header::ORIGIN, origin))
                .to_request(),
        )
        .await;

        assert_eq!(
            res.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some(origin)
        );
    }
}
