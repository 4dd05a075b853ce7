//! Patient intake, risk scoring, alert classification and submission.
//!
//! Stages run strictly in sequence: [`PatientFetcher`] pages through a [`PagedPatientSource`],
//! [`RiskScorer`] derives a [`RiskScore`] per patient, [`AlertClassifier`] partitions the
//! results and an [`AssessmentSubmitter`] grades them. [`AssessmentPipeline`] ties the stages
//! together.

pub mod alerts;
pub mod domain;
pub mod fetcher;
pub mod observer;
pub mod pipeline;
pub mod report;
pub mod router;
pub mod scoring;
pub mod submission;

#[cfg(test)]
mod tests;

pub use alerts::{AlertClassifier, AlertThresholds};
pub use domain::{
    AlertLists, Pagination, Patient, PatientPage, ReadingValue, ResponseMetadata, RiskScore,
};
pub use fetcher::{FetchError, FetchPolicy, PagedPatientSource, PatientFetcher, SourceError};
pub use observer::{AssessmentEvent, AssessmentObserver, NoopObserver, TracingObserver};
pub use pipeline::{AssessmentError, AssessmentPipeline};
pub use report::AssessmentReport;
pub use router::{assessment_router, AssessmentRunner};
pub use scoring::{DataQualityDefect, RiskScorer, ScoreBreakdown};
pub use submission::{
    AssessmentSubmitter, CategoryScore, SubmissionBreakdown, SubmissionError, SubmissionFeedback,
    SubmissionResponse, SubmissionResults,
};
