use super::super::domain::Patient;
use super::rules::{parse_age, parse_blood_pressure, parse_temperature};
use serde::Serialize;

/// Field that could not be interpreted during a data-quality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataQualityDefect {
    BloodPressure,
    Temperature,
    Age,
}

impl DataQualityDefect {
    pub fn label(self) -> &'static str {
        match self {
            DataQualityDefect::BloodPressure => "blood pressure",
            DataQualityDefect::Temperature => "temperature",
            DataQualityDefect::Age => "age",
        }
    }
}

/// Shape check over the three scored fields; independent of the risk points they yield.
pub fn data_quality_defects(patient: &Patient) -> Vec<DataQualityDefect> {
    let mut defects = Vec::new();

    if parse_blood_pressure(patient.blood_pressure.as_ref()).is_none() {
        defects.push(DataQualityDefect::BloodPressure);
    }
    if parse_temperature(patient.temperature.as_ref()).is_none() {
        defects.push(DataQualityDefect::Temperature);
    }
    if parse_age(patient.age.as_ref()).is_none() {
        defects.push(DataQualityDefect::Age);
    }

    defects
}

pub fn has_data_quality_issue(patient: &Patient) -> bool {
    !data_quality_defects(patient).is_empty()
}
