use metrics_exporter_prometheus::PrometheusHandle;
use patient_triage::client::HealthcareApiClient;
use patient_triage::config::AppConfig;
use patient_triage::error::AppError;
use patient_triage::workflows::assessment::{AssessmentPipeline, AssessmentRunner};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type ApiRunner = AssessmentRunner<HealthcareApiClient, HealthcareApiClient>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wires one HTTP client as both the patient source and the submitter.
pub(crate) fn build_runner(config: &AppConfig) -> Result<Arc<ApiRunner>, AppError> {
    let client = Arc::new(HealthcareApiClient::new(&config.api)?);
    let pipeline = AssessmentPipeline::new(client.clone(), client, config.assessment.fetch.clone());
    Ok(Arc::new(AssessmentRunner::new(pipeline)))
}
