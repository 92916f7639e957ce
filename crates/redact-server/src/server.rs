use std::future::Future;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use redact_core::{Error, JobStatus};
use redact_engine::TaskScheduler;

#[derive(Deserialize)]
struct SubmitRequest {
    text: String,
}

#[derive(Serialize)]
struct StatusResponse<'a> {
    job_id: &'a str,
    status: JobStatus,
}

#[derive(Serialize)]
struct FailedResponse<'a> {
    job_id: &'a str,
    status: JobStatus,
    error: &'a str,
}

pub struct RedactServer {
    pub scheduler: Arc<TaskScheduler>,
    pub api_title: String,
}

#[derive(Clone)]
struct AppState {
    server: Arc<RedactServer>,
}

impl RedactServer {
    pub fn new(scheduler: Arc<TaskScheduler>, api_title: impl Into<String>) -> Self {
        Self {
            scheduler,
            api_title: api_title.into(),
        }
    }

    pub fn router(self: Arc<Self>) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/", get(handle_info))
            .route("/submit", post(handle_submit))
            .route("/status/:job_id", get(handle_status))
            .route("/result/:job_id", get(handle_result))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(AppState { server: self })
    }

    /// Serve until `shutdown` resolves
    pub async fn serve(
        self: Arc<Self>,
        host: &str,
        port: u16,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&addr).await?;

        self.serve_on(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve_on(
        self: Arc<Self>,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        info!("redactd listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}

fn not_found(job_id: &str) -> Response {
    error_response(StatusCode::NOT_FOUND, format!("Job '{}' not found", job_id))
}

/// GET / - service info
async fn handle_info(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "redactd",
        "title": state.server.api_title,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// POST /submit - queue text for redaction
async fn handle_submit(
    State(state): State<AppState>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected submission");
            return error_response(
                StatusCode::BAD_REQUEST,
                Error::Validation(rejection.body_text()).to_string(),
            );
        }
    };

    match state.server.scheduler.submit(req.text) {
        Ok(job_id) => (
            StatusCode::ACCEPTED,
            Json(StatusResponse {
                job_id: &job_id,
                status: JobStatus::Queued,
            }),
        )
            .into_response(),
        Err(e @ (Error::QueueFull | Error::SchedulerClosed)) => {
            warn!(error = %e, "Submission not scheduled");
            error_response(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
        }
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// GET /status/:job_id - current lifecycle state
async fn handle_status(State(state): State<AppState>, Path(job_id): Path<String>) -> Response {
    match state.server.scheduler.store().get_job(&job_id) {
        Ok(job) => Json(StatusResponse {
            job_id: &job.id,
            status: job.status,
        })
        .into_response(),
        Err(_) => not_found(&job_id),
    }
}

/// GET /result/:job_id - redacted text and metadata once completed
async fn handle_result(State(state): State<AppState>, Path(job_id): Path<String>) -> Response {
    let job = match state.server.scheduler.store().get_job(&job_id) {
        Ok(job) => job,
        Err(_) => return not_found(&job_id),
    };

    if let Some(result) = job.redaction() {
        return Json(result).into_response();
    }

    if let Some(error) = job.error() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(FailedResponse {
                job_id: &job.id,
                status: job.status,
                error,
            }),
        )
            .into_response();
    }

    (
        StatusCode::ACCEPTED,
        Json(StatusResponse {
            job_id: &job.id,
            status: job.status,
        }),
    )
        .into_response()
}
