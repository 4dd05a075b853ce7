use std::sync::Arc;

use chrono::Utc;

use super::alerts::AlertClassifier;
use super::fetcher::{FetchError, FetchPolicy, PagedPatientSource, PatientFetcher};
use super::observer::{AssessmentEvent, AssessmentObserver, TracingObserver};
use super::report::AssessmentReport;
use super::scoring::RiskScorer;
use super::submission::{AssessmentSubmitter, SubmissionError};

/// Runs fetch, score, classify and submit as one sequential assessment.
pub struct AssessmentPipeline<S, U> {
    fetcher: PatientFetcher<S>,
    scorer: RiskScorer,
    classifier: AlertClassifier,
    submitter: Arc<U>,
    observer: Arc<dyn AssessmentObserver>,
}

impl<S, U> AssessmentPipeline<S, U>
where
    S: PagedPatientSource + 'static,
    U: AssessmentSubmitter + 'static,
{
    pub fn new(source: Arc<S>, submitter: Arc<U>, policy: FetchPolicy) -> Self {
        Self::with_parts(
            source,
            submitter,
            policy,
            AlertClassifier::default(),
            Arc::new(TracingObserver),
        )
    }

    pub fn with_parts(
        source: Arc<S>,
        submitter: Arc<U>,
        policy: FetchPolicy,
        classifier: AlertClassifier,
        observer: Arc<dyn AssessmentObserver>,
    ) -> Self {
        let fetcher = PatientFetcher::with_observer(source, policy, observer.clone());

        Self {
            fetcher,
            scorer: RiskScorer::new(),
            classifier,
            submitter,
            observer,
        }
    }

    /// Executes every stage in order. The first failing stage aborts the run.
    pub async fn run(&self) -> Result<AssessmentReport, AssessmentError> {
        let patients = self.fetcher.fetch_all_patients().await?;

        let mut scores = Vec::with_capacity(patients.len());
        for patient in &patients {
            let breakdown = self.scorer.explain(patient);
            let score = breakdown.to_score();
            self.observer.on_event(&AssessmentEvent::PatientScored {
                breakdown,
                total_risk: score.total_risk(),
            });
            scores.push(score);
        }

        let alerts = self.classifier.classify(&patients, &scores);
        self.observer.on_event(&AssessmentEvent::AlertsGenerated {
            high_risk: alerts.high_risk_patients.len(),
            fever: alerts.fever_patients.len(),
            data_quality: alerts.data_quality_issues.len(),
        });

        let submission = self.submitter.submit(&alerts).await?;
        self.observer.on_event(&AssessmentEvent::SubmissionCompleted {
            success: submission.success,
            message: submission.message.clone(),
        });

        Ok(AssessmentReport {
            generated_at: Utc::now(),
            patients_fetched: patients.len(),
            alerts,
            submission,
        })
    }
}

/// Stage-tagged assessment failure.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error("fetch stage failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("submission stage failed: {0}")]
    Submission(#[from] SubmissionError),
}

impl AssessmentError {
    pub fn stage(&self) -> &'static str {
        match self {
            AssessmentError::Fetch(_) => "fetch",
            AssessmentError::Submission(_) => "submission",
        }
    }
}
