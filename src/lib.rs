pub mod db;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod repository;
pub mod settings;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_utils;

use std::net::SocketAddr;

use axum::{Router, routing::get};
use handlers::{classes, healthz_live, healthz_ready, instructors, payments, root, schedules};
use sea_orm::DatabaseConnection;
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::AppError;
use crate::openapi::ApiDoc;
use crate::settings::Settings;

/// Per-process handles shared by every request. The connection is a pool; each
/// request borrows it for the repositories it builds.
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub db: DatabaseConnection,
}

pub async fn run() -> Result<(), AppError> {
    let settings = Settings::from_env()?;

    let env_filter = if settings.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .without_time()
        .init();

    let db = db::connect(&settings.database_url, settings.max_connections).await?;
    db::create_tables(&db).await?;

    let state = AppState {
        settings: settings.clone(),
        db,
    };

    let app = build_router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], state.settings.port));
    info!("Starting Gym Admin on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    let mut router = Router::new()
        .route("/", get(root))
        .route("/healthz/live", get(healthz_live))
        .route("/healthz/ready", get(healthz_ready))
        .merge(classes::routes())
        .merge(instructors::routes())
        .merge(payments::routes())
        .merge(schedules::routes())
        .with_state(state.clone());

    if state.settings.enable_swagger {
        let openapi = ApiDoc::openapi();
        let swagger = SwaggerUi::new("/docs").url("/openapi.json", openapi);
        router = router.merge(swagger);
    }

    router.layer(trace_layer)
}
