use super::domain::{AlertLists, Patient, RiskScore};
use super::scoring::parse_temperature;
use serde::{Deserialize, Serialize};

/// Cut-offs used when partitioning patients into alert lists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    pub high_risk_total: u8,
    pub fever_fahrenheit: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            high_risk_total: 5,
            fever_fahrenheit: 99.6,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlertClassifier {
    thresholds: AlertThresholds,
}

impl AlertClassifier {
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> AlertThresholds {
        self.thresholds
    }

    /// Builds the three alert lists. Each list keeps the order of its input collection.
    pub fn classify(&self, patients: &[Patient], scores: &[RiskScore]) -> AlertLists {
        AlertLists {
            high_risk_patients: self.high_risk(scores),
            fever_patients: self.fever(patients),
            data_quality_issues: self.data_quality(scores),
        }
    }

    /// Scores at or above the high-risk total, excluding records with unparsable fields.
    pub fn high_risk(&self, scores: &[RiskScore]) -> Vec<String> {
        scores
            .iter()
            .filter(|score| {
                score.total_risk() >= self.thresholds.high_risk_total
                    && !score.has_data_quality_issue
            })
            .map(|score| score.patient_id.clone())
            .collect()
    }

    /// Reads the raw temperature, so a reading in the unscored (100.9, 101.0) gap still counts.
    pub fn fever(&self, patients: &[Patient]) -> Vec<String> {
        patients
            .iter()
            .filter(|patient| {
                parse_temperature(patient.temperature.as_ref())
                    .map(|temperature| temperature >= self.thresholds.fever_fahrenheit)
                    .unwrap_or(false)
            })
            .map(|patient| patient.patient_id.clone())
            .collect()
    }

    pub fn data_quality(&self, scores: &[RiskScore]) -> Vec<String> {
        scores
            .iter()
            .filter(|score| score.has_data_quality_issue)
            .map(|score| score.patient_id.clone())
            .collect()
    }
}
