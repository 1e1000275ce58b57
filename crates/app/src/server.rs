//! Actix Web service exposing discovery, health, metrics, and the live
//! pushup WebSocket endpoint.

use std::sync::{Arc, Mutex};

use actix_cors::Cors;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use anyhow::{Context, Result};
use pose_core::MoveNetDetector;
use serde::Serialize;
use tracing::info;

use crate::{
    config::ServerConfig,
    session::{transport::run_session, SharedDetector},
    telemetry,
};

/// Frame payloads above this size are rejected at the websocket layer.
const MAX_FRAME_BYTES: usize = 4 * 1024 * 1024;

struct AppState {
    detector: SharedDetector,
    jpeg_quality: u8,
}

#[derive(Serialize)]
struct DiscoveryResponse {
    message: &'static str,
    status: &'static str,
    version: &'static str,
    endpoints: EndpointMap,
}

#[derive(Serialize)]
struct EndpointMap {
    websocket: &'static str,
    health: &'static str,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    detector: &'static str,
}

/// Load the pose detector and run the HTTP server until shutdown.
pub fn run(config: ServerConfig) -> Result<()> {
    let detector = MoveNetDetector::new(&config.model_path, config.min_score)
        .context("Failed to initialise pose detector")?;
    info!(
        "pose detector initialised from {}",
        config.model_path.display()
    );
    let detector: SharedDetector = Arc::new(Mutex::new(detector));

    actix_web::rt::System::new().block_on(serve(config, detector))
}

async fn serve(config: ServerConfig, detector: SharedDetector) -> Result<()> {
    let bind = config.bind.clone();
    let jpeg_quality = config.jpeg_quality;
    info!("listening on http://{bind} (websocket at /ws/live_pushup)");

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(web::Data::new(AppState {
                detector: detector.clone(),
                jpeg_quality,
            }))
            .route("/", web::get().to(index_handler))
            .route("/health", web::get().to(health_handler))
            .route("/metrics", web::get().to(metrics_handler))
            .route("/ws/live_pushup", web::get().to(live_pushup_handler))
    })
    .bind(&bind)
    .with_context(|| format!("Failed to bind {bind}"))?
    .run()
    .await
    .context("HTTP server error")
}

/// Discovery document matching the service's public contract.
async fn index_handler() -> HttpResponse {
    HttpResponse::Ok().json(DiscoveryResponse {
        message: "Welcome to the AI Pushup Trainer API",
        status: "online",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: EndpointMap {
            websocket: "/ws/live_pushup",
            health: "/health",
        },
    })
}

async fn health_handler() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        detector: "ready",
    })
}

/// Prometheus exposition of the pipeline counters.
async fn metrics_handler() -> HttpResponse {
    match telemetry::prometheus_handle() {
        Some(handle) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(handle.render()),
        None => HttpResponse::ServiceUnavailable().finish(),
    }
}

/// Upgrade to a WebSocket and hand the connection to a streaming session.
async fn live_pushup_handler(
    req: HttpRequest,
    body: web::Payload,
    state: web::Data<AppState>,
) -> actix_web::Result<HttpResponse> {
    let (response, session, stream) = actix_ws::handle(&req, body)?;
    let stream = stream
        .max_frame_size(MAX_FRAME_BYTES)
        .aggregate_continuations()
        .max_continuation_size(MAX_FRAME_BYTES);

    actix_web::rt::spawn(run_session(
        session,
        stream,
        state.detector.clone(),
        state.jpeg_quality,
    ));
    Ok(response)
}
