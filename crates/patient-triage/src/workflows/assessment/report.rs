use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::AlertLists;
use super::submission::{CategoryScore, SubmissionResponse};

/// Outcome of one full assessment run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentReport {
    pub generated_at: DateTime<Utc>,
    pub patients_fetched: usize,
    pub alerts: AlertLists,
    pub submission: SubmissionResponse,
}

impl AssessmentReport {
    /// Plain-text summary for terminals and logs.
    pub fn render(&self) -> String {
        let mut lines = vec![
            "Patient triage assessment".to_string(),
            format!(
                "Generated {} from {} patients",
                self.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                self.patients_fetched
            ),
            String::new(),
            "Alert lists".to_string(),
            format!("- High risk: {}", self.alerts.high_risk_patients.len()),
            format!("- Fever: {}", self.alerts.fever_patients.len()),
            format!(
                "- Data quality issues: {}",
                self.alerts.data_quality_issues.len()
            ),
            String::new(),
        ];

        let status = if self.submission.success {
            "SUCCESS"
        } else {
            "FAILED"
        };
        lines.push(format!("Submission: {status}"));
        if !self.submission.message.is_empty() {
            lines.push(format!("Message: {}", self.submission.message));
        }

        if let Some(results) = &self.submission.results {
            lines.push(format!(
                "Score: {}/{} ({}%), status {}",
                results.score,
                results.max_score(),
                results.percentage,
                results.status
            ));

            lines.push(String::new());
            lines.push("Breakdown".to_string());
            lines.push(category_line("High risk", &results.breakdown.high_risk));
            lines.push(category_line("Fever", &results.breakdown.fever));
            lines.push(category_line(
                "Data quality",
                &results.breakdown.data_quality,
            ));

            lines.push(String::new());
            if results.feedback.strengths.is_empty() && results.feedback.issues.is_empty() {
                lines.push("Feedback: none".to_string());
            } else {
                lines.push("Feedback".to_string());
                lines.extend(
                    results
                        .feedback
                        .strengths
                        .iter()
                        .map(|strength| format!("+ {strength}")),
                );
                lines.extend(
                    results
                        .feedback
                        .issues
                        .iter()
                        .map(|issue| format!("- {issue}")),
                );
            }

            lines.push(String::new());
            lines.push(format!(
                "Attempt {} ({} remaining), personal best: {}, can resubmit: {}",
                results.attempt_number,
                results.remaining_attempts,
                yes_no(results.is_personal_best),
                yes_no(results.can_resubmit)
            ));
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

fn category_line(label: &str, category: &CategoryScore) -> String {
    format!(
        "- {label}: {}/{} ({}/{} correct, {} submitted)",
        category.score, category.max, category.matches, category.correct, category.submitted
    )
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
