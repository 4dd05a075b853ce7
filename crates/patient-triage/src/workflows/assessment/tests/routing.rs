use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::Value;
use tower::ServiceExt;

use super::common::*;
use super::pipeline::{clinic_roster, expected_alerts};
use crate::workflows::assessment::pipeline::AssessmentPipeline;
use crate::workflows::assessment::router::{assessment_router, run_handler, AssessmentRunner};

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn run_handler_returns_submission_response() {
    let source = Arc::new(ScriptedSource::with_pages(paged(&clinic_roster(), 5)));
    let submitter = Arc::new(RecordingSubmitter::default());
    let runner = Arc::new(AssessmentRunner::new(AssessmentPipeline::new(
        source,
        submitter.clone(),
        fast_policy(),
    )));

    let response = run_handler::<ScriptedSource, RecordingSubmitter>(State(runner)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], Value::Bool(true));
    assert_eq!(body["results"]["status"], "PASS");
    assert_eq!(submitter.submissions(), vec![expected_alerts()]);
}

#[tokio::test]
async fn run_handler_returns_bad_gateway_with_failed_stage() {
    let source = Arc::new(ScriptedSource::with_pages(paged(&clinic_roster(), 5)));
    let runner = Arc::new(AssessmentRunner::new(AssessmentPipeline::new(
        source,
        Arc::new(RejectingSubmitter),
        fast_policy(),
    )));

    let response = run_handler::<ScriptedSource, RejectingSubmitter>(State(runner)).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(response).await;
    assert_eq!(body["stage"], "submission");
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("status 400"));
}

#[tokio::test]
async fn router_serves_banner_and_trigger() {
    let source = Arc::new(ScriptedSource::with_pages(paged(&clinic_roster(), 5)));
    let runner = Arc::new(AssessmentRunner::new(AssessmentPipeline::new(
        source,
        Arc::new(RecordingSubmitter::default()),
        fast_policy(),
    )));
    let app = assessment_router(runner);

    let banner = app
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).expect("request"))
        .await
        .expect("banner response");
    assert_eq!(banner.status(), StatusCode::OK);

    let trigger = app
        .oneshot(
            Request::post("/run-assessment")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("trigger response");
    assert_eq!(trigger.status(), StatusCode::OK);
}
