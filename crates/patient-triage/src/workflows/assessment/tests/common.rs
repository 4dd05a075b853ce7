use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::workflows::assessment::domain::{
    AlertLists, Pagination, Patient, PatientPage, ReadingValue,
};
use crate::workflows::assessment::fetcher::{FetchPolicy, PagedPatientSource, SourceError};
use crate::workflows::assessment::submission::{
    AssessmentSubmitter, CategoryScore, SubmissionBreakdown, SubmissionError, SubmissionFeedback,
    SubmissionResponse, SubmissionResults,
};

pub(super) fn patient(
    id: &str,
    blood_pressure: Option<&str>,
    temperature: Option<ReadingValue>,
    age: Option<ReadingValue>,
) -> Patient {
    Patient {
        patient_id: id.to_string(),
        name: format!("TestPatient, {id}"),
        gender: "F".to_string(),
        blood_pressure: blood_pressure.map(ReadingValue::from),
        temperature,
        age,
        visit_date: "2024-01-15".to_string(),
        diagnosis: "Sample_Checkup".to_string(),
        medications: "DemoMed_A 10mg".to_string(),
    }
}

pub(super) fn healthy(id: &str) -> Patient {
    patient(
        id,
        Some("110/70"),
        Some(ReadingValue::Number(98.6)),
        Some(ReadingValue::from(30)),
    )
}

pub(super) fn fast_policy() -> FetchPolicy {
    FetchPolicy {
        page_limit: 5,
        max_rate_limit_retries: 3,
        default_retry_after: Duration::ZERO,
        page_delay: Duration::ZERO,
    }
}

pub(super) fn pagination(page: u32, total: u64, limit: u32) -> Pagination {
    let total_pages = total.div_ceil(u64::from(limit)) as u32;
    Pagination {
        page,
        limit,
        total,
        total_pages,
        has_next: page < total_pages,
        has_previous: page > 1,
    }
}

/// Splits `patients` into canonical pages of `limit` records.
pub(super) fn paged(patients: &[Patient], limit: u32) -> Vec<PatientPage> {
    let total = patients.len() as u64;
    patients
        .chunks(limit as usize)
        .enumerate()
        .map(|(index, chunk)| {
            PatientPage::new(chunk.to_vec(), pagination(index as u32 + 1, total, limit))
        })
        .collect()
}

#[derive(Debug)]
pub(super) enum Scripted {
    Page(PatientPage),
    RateLimited(Option<Duration>),
    Status(u16),
    Unrecognized,
}

/// Paged source answering each page from a queue of scripted replies.
#[derive(Default)]
pub(super) struct ScriptedSource {
    script: Mutex<HashMap<u32, VecDeque<Scripted>>>,
    calls: Mutex<Vec<(u32, u32)>>,
}

impl ScriptedSource {
    pub(super) fn with_pages(pages: Vec<PatientPage>) -> Self {
        let source = Self::default();
        for (index, page) in pages.into_iter().enumerate() {
            source.push(index as u32 + 1, Scripted::Page(page));
        }
        source
    }

    pub(super) fn push(&self, page: u32, reply: Scripted) {
        self.script
            .lock()
            .expect("script mutex poisoned")
            .entry(page)
            .or_default()
            .push_back(reply);
    }

    /// Queues `reply` ahead of whatever is already scripted for `page`.
    pub(super) fn push_front(&self, page: u32, reply: Scripted) {
        self.script
            .lock()
            .expect("script mutex poisoned")
            .entry(page)
            .or_default()
            .push_front(reply);
    }

    pub(super) fn calls(&self) -> Vec<(u32, u32)> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    pub(super) fn calls_for(&self, page: u32) -> usize {
        self.calls()
            .iter()
            .filter(|(requested, _)| *requested == page)
            .count()
    }
}

#[async_trait]
impl PagedPatientSource for ScriptedSource {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<PatientPage, SourceError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push((page, limit));

        let reply = self
            .script
            .lock()
            .expect("script mutex poisoned")
            .get_mut(&page)
            .and_then(VecDeque::pop_front);

        match reply {
            Some(Scripted::Page(response)) => Ok(response),
            Some(Scripted::RateLimited(retry_after)) => Err(SourceError::RateLimited { retry_after }),
            Some(Scripted::Status(status)) => Err(SourceError::Status {
                status,
                body: "scripted failure".to_string(),
            }),
            Some(Scripted::Unrecognized) => Err(SourceError::UnrecognizedResponse { page }),
            None => Err(SourceError::Status {
                status: 404,
                body: format!("no scripted reply for page {page}"),
            }),
        }
    }
}

pub(super) fn graded_response() -> SubmissionResponse {
    let category = |score: f64, max: f64, correct: u32| CategoryScore {
        score,
        max,
        correct,
        submitted: correct,
        matches: correct,
    };

    SubmissionResponse {
        success: true,
        message: "Assessment submitted successfully".to_string(),
        results: Some(SubmissionResults {
            score: 91.94,
            percentage: 91.94,
            status: "PASS".to_string(),
            breakdown: SubmissionBreakdown {
                high_risk: category(48.0, 50.0, 20),
                fever: category(19.0, 25.0, 9),
                data_quality: category(25.0, 25.0, 8),
            },
            feedback: SubmissionFeedback {
                strengths: vec!["Data quality issues identified correctly".to_string()],
                issues: vec!["Fever list missed 1 patient".to_string()],
            },
            attempt_number: 1,
            remaining_attempts: 2,
            is_personal_best: true,
            can_resubmit: true,
        }),
    }
}

/// Submitter that records every payload and answers with a fixed response.
pub(super) struct RecordingSubmitter {
    submissions: Mutex<Vec<AlertLists>>,
    response: SubmissionResponse,
}

impl RecordingSubmitter {
    pub(super) fn new(response: SubmissionResponse) -> Self {
        Self {
            submissions: Mutex::new(Vec::new()),
            response,
        }
    }

    pub(super) fn submissions(&self) -> Vec<AlertLists> {
        self.submissions
            .lock()
            .expect("submission mutex poisoned")
            .clone()
    }
}

impl Default for RecordingSubmitter {
    fn default() -> Self {
        Self::new(graded_response())
    }
}

#[async_trait]
impl AssessmentSubmitter for RecordingSubmitter {
    async fn submit(&self, alerts: &AlertLists) -> Result<SubmissionResponse, SubmissionError> {
        self.submissions
            .lock()
            .expect("submission mutex poisoned")
            .push(alerts.clone());
        Ok(self.response.clone())
    }
}

pub(super) struct RejectingSubmitter;

#[async_trait]
impl AssessmentSubmitter for RejectingSubmitter {
    async fn submit(&self, _alerts: &AlertLists) -> Result<SubmissionResponse, SubmissionError> {
        Err(SubmissionError::Rejected {
            status: 400,
            body: "{\"error\":\"invalid submission\"}".to_string(),
        })
    }
}
