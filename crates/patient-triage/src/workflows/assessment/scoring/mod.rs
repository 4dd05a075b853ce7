mod quality;
mod rules;

pub use quality::{data_quality_defects, has_data_quality_issue, DataQualityDefect};
pub use rules::{
    age_band, age_risk, blood_pressure_band, blood_pressure_risk, temperature_band,
    temperature_risk, AgeBand, BloodPressureBand, TemperatureBand,
};

pub(crate) use rules::parse_temperature;

use super::domain::{Patient, RiskScore};
use serde::Serialize;

/// Stateless scorer applying the clinical rubric to raw patient records.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskScorer;

impl RiskScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score_patient(&self, patient: &Patient) -> RiskScore {
        self.explain(patient).to_score()
    }

    /// Scores every patient, preserving input order.
    pub fn score_all(&self, patients: &[Patient]) -> Vec<RiskScore> {
        patients
            .iter()
            .map(|patient| self.score_patient(patient))
            .collect()
    }

    /// Band-level view of a patient's score, suitable for audit logging.
    pub fn explain(&self, patient: &Patient) -> ScoreBreakdown {
        ScoreBreakdown {
            patient_id: patient.patient_id.clone(),
            blood_pressure: blood_pressure_band(patient.blood_pressure.as_ref()),
            temperature: temperature_band(patient.temperature.as_ref()),
            age: age_band(patient.age.as_ref()),
            defects: data_quality_defects(patient),
        }
    }
}

/// Bands and defects behind a [`RiskScore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub patient_id: String,
    pub blood_pressure: BloodPressureBand,
    pub temperature: TemperatureBand,
    pub age: AgeBand,
    pub defects: Vec<DataQualityDefect>,
}

impl ScoreBreakdown {
    pub fn to_score(&self) -> RiskScore {
        RiskScore::new(
            self.patient_id.clone(),
            self.blood_pressure.points(),
            self.temperature.points(),
            self.age.points(),
            !self.defects.is_empty(),
        )
    }
}
