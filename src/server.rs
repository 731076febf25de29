//! HTTP transport over the shared posture session.
//!
//! Payload shape validation is left to the `Json` extractor: a landmark
//! without `idx`/`x`/`y`, or a non-numeric calibration angle, is rejected
//! before it reaches the analyzer.

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{HeaderValue, Method},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::landmark::Landmark;
use crate::posture::PostureReport;
use crate::session::PostureSession;

#[derive(Debug, Deserialize)]
pub struct LandmarksPayload {
    pub landmarks: Vec<Landmark>,
}

#[derive(Debug, Deserialize)]
pub struct CalibrationPayload {
    pub angle_deg: f64,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum AnalysisResponse {
    Report(PostureReport),
    Error { error: String },
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum LastAngleResponse {
    Angle { angle_deg: f64 },
    Error { error: &'static str },
}

pub fn router(session: PostureSession, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/analyze_posture", post(analyze_posture))
        .route("/calibrate", post(calibrate))
        .route("/last_angle", get(last_angle))
        .route("/reset", post(reset))
        .layer(cors_layer(allowed_origins))
        .with_state(session)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// Binds to `config.bind` and serves until Ctrl-C.
pub async fn serve(config: &ServerConfig, session: PostureSession) -> Result<()> {
    let listener = TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!(addr = %listener.local_addr()?, "posture coach listening");

    let app = router(session, &config.allowed_origins);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "posture coach" }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn analyze_posture(
    State(session): State<PostureSession>,
    Json(payload): Json<LandmarksPayload>,
) -> Json<AnalysisResponse> {
    let response = match session.analyze_frame(&payload.landmarks) {
        Ok(report) => AnalysisResponse::Report(report),
        Err(err) => AnalysisResponse::Error {
            error: err.to_string(),
        },
    };
    Json(response)
}

async fn calibrate(
    State(session): State<PostureSession>,
    Json(payload): Json<CalibrationPayload>,
) -> Json<serde_json::Value> {
    let accepted = session.calibrate(payload.angle_deg);
    Json(serde_json::json!({ "neutral_offset": accepted }))
}

async fn last_angle(State(session): State<PostureSession>) -> Json<LastAngleResponse> {
    Json(match session.last_angle() {
        Some(angle_deg) => LastAngleResponse::Angle { angle_deg },
        None => LastAngleResponse::Error {
            error: "no angle yet",
        },
    })
}

async fn reset(State(session): State<PostureSession>) -> Json<serde_json::Value> {
    session.reset();
    Json(serde_json::json!({ "status": "reset" }))
}
