use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jongmok_core::config::Settings;
use jongmok_core::domain::analysis::AnalysisReport;
use jongmok_core::llm::error::AnalysisError;
use jongmok_core::llm::gemini::GeminiClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env();
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/api/analyze", post(analyze))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    ticker: String,
}

async fn analyze(Json(req): Json<AnalyzeRequest>) -> Result<Json<AnalysisReport>, ApiError> {
    // The credential is read per call: a missing key fails this request, not
    // the process.
    let settings = Settings::from_env();
    let client = GeminiClient::from_settings(&settings)?;
    let report = jongmok_core::llm::analyze(&client, &req.ticker).await?;
    Ok(Json(report))
}

struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        let status = match &err {
            AnalysisError::EmptyTicker => StatusCode::BAD_REQUEST,
            AnalysisError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AnalysisError::Authentication(_)
            | AnalysisError::Generation(_)
            | AnalysisError::Extraction
            | AnalysisError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
        };

        if status.is_server_error() {
            sentry_anyhow::capture_anyhow(&anyhow::Error::new(err.clone()));
        }
        tracing::error!(error = %err, "analysis request failed");

        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // The UI displays the message as-is and never branches on error kind.
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
