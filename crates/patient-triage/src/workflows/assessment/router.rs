use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::error;

use super::fetcher::PagedPatientSource;
use super::pipeline::{AssessmentError, AssessmentPipeline};
use super::report::AssessmentReport;
use super::submission::AssessmentSubmitter;

/// Shared handle that keeps at most one assessment in flight.
pub struct AssessmentRunner<S, U> {
    pipeline: AssessmentPipeline<S, U>,
    in_flight: Mutex<()>,
}

impl<S, U> AssessmentRunner<S, U>
where
    S: PagedPatientSource + 'static,
    U: AssessmentSubmitter + 'static,
{
    pub fn new(pipeline: AssessmentPipeline<S, U>) -> Self {
        Self {
            pipeline,
            in_flight: Mutex::new(()),
        }
    }

    /// Runs the pipeline, waiting for any run already in progress to finish first.
    pub async fn run(&self) -> Result<AssessmentReport, AssessmentError> {
        let _guard = self.in_flight.lock().await;
        self.pipeline.run().await
    }
}

/// Router exposing the on-demand assessment trigger.
pub fn assessment_router<S, U>(runner: Arc<AssessmentRunner<S, U>>) -> Router
where
    S: PagedPatientSource + 'static,
    U: AssessmentSubmitter + 'static,
{
    Router::new()
        .route("/", get(banner_handler))
        .route("/run-assessment", post(run_handler::<S, U>))
        .with_state(runner)
}

pub(crate) async fn banner_handler() -> &'static str {
    "Healthcare Assessment API"
}

pub(crate) async fn run_handler<S, U>(State(runner): State<Arc<AssessmentRunner<S, U>>>) -> Response
where
    S: PagedPatientSource + 'static,
    U: AssessmentSubmitter + 'static,
{
    match runner.run().await {
        Ok(report) => (StatusCode::OK, axum::Json(report.submission)).into_response(),
        Err(err) => {
            error!(stage = err.stage(), error = %err, "assessment failed");
            let payload = json!({
                "error": err.to_string(),
                "stage": err.stage(),
            });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
    }
}
