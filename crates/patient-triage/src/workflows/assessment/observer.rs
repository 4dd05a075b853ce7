use std::time::Duration;

use tracing::{debug, info, warn};

use super::scoring::ScoreBreakdown;

/// Progress notifications emitted while an assessment runs.
#[derive(Debug, Clone, PartialEq)]
pub enum AssessmentEvent {
    PageFetched {
        page: u32,
        records: usize,
        has_next: bool,
        request_id: Option<String>,
    },
    RateLimited {
        page: u32,
        retry: u32,
        delay: Duration,
    },
    MalformedPage {
        page: u32,
    },
    PagingCapped {
        page: u32,
        total_pages: u32,
    },
    PatientsFetched {
        count: usize,
    },
    PatientScored {
        breakdown: ScoreBreakdown,
        total_risk: u8,
    },
    AlertsGenerated {
        high_risk: usize,
        fever: usize,
        data_quality: usize,
    },
    SubmissionCompleted {
        success: bool,
        message: String,
    },
}

/// Optional hook into pipeline progress. The pipeline never depends on what observers do.
pub trait AssessmentObserver: Send + Sync {
    fn on_event(&self, event: &AssessmentEvent);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl AssessmentObserver for NoopObserver {
    fn on_event(&self, _event: &AssessmentEvent) {}
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl AssessmentObserver for TracingObserver {
    fn on_event(&self, event: &AssessmentEvent) {
        match event {
            AssessmentEvent::PageFetched {
                page,
                records,
                has_next,
                request_id,
            } => info!(
                page,
                records,
                has_next,
                request_id = request_id.as_deref(),
                "fetched patient page"
            ),
            AssessmentEvent::RateLimited { page, retry, delay } => warn!(
                page,
                retry,
                delay_ms = delay.as_millis() as u64,
                "rate limited, retrying page"
            ),
            AssessmentEvent::MalformedPage { page } => {
                warn!(page, "page payload carried no patient list, stopping pagination")
            }
            AssessmentEvent::PagingCapped { page, total_pages } => warn!(
                page,
                total_pages, "hasNext still set at the last reported page, stopping pagination"
            ),
            AssessmentEvent::PatientsFetched { count } => info!(count, "fetched all patients"),
            AssessmentEvent::PatientScored {
                breakdown,
                total_risk,
            } => debug!(
                patient_id = %breakdown.patient_id,
                blood_pressure = breakdown.blood_pressure.label(),
                temperature = breakdown.temperature.label(),
                age = breakdown.age.label(),
                defects = breakdown.defects.len(),
                total_risk,
                "scored patient"
            ),
            AssessmentEvent::AlertsGenerated {
                high_risk,
                fever,
                data_quality,
            } => info!(high_risk, fever, data_quality, "generated alert lists"),
            AssessmentEvent::SubmissionCompleted { success, message } => {
                info!(success, %message, "assessment submitted")
            }
        }
    }
}
