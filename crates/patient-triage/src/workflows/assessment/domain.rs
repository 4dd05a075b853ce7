use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Loosely typed clinical reading as delivered by the intake API.
///
/// The API does not validate value types, so ages and temperatures can arrive as JSON numbers,
/// numeric strings, or anything else. Interpretation happens in the scoring rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReadingValue {
    Number(f64),
    Text(String),
    Other(Value),
}

impl ReadingValue {
    /// Float interpretation: numbers as-is, strings by leading numeric prefix.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ReadingValue::Number(value) => Some(*value),
            ReadingValue::Text(raw) => parse_float_prefix(raw),
            ReadingValue::Other(_) => None,
        }
    }

    /// Integer-style interpretation used for ages: strings keep only the leading digits.
    pub fn as_whole(&self) -> Option<f64> {
        match self {
            ReadingValue::Number(value) => Some(*value),
            ReadingValue::Text(raw) => parse_int_prefix(raw).map(|value| value as f64),
            ReadingValue::Other(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ReadingValue::Text(raw) => Some(raw),
            _ => None,
        }
    }
}

impl From<f64> for ReadingValue {
    fn from(value: f64) -> Self {
        ReadingValue::Number(value)
    }
}

impl From<i64> for ReadingValue {
    fn from(value: i64) -> Self {
        ReadingValue::Number(value as f64)
    }
}

impl From<&str> for ReadingValue {
    fn from(value: &str) -> Self {
        ReadingValue::Text(value.to_string())
    }
}

/// Patient record as returned by one page of the intake API.
///
/// Text fields never reject a record: `null` and structured values read as empty, numbers and
/// booleans keep their JSON spelling.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Patient {
    #[serde(deserialize_with = "lenient_text")]
    pub patient_id: String,
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    pub age: Option<ReadingValue>,
    #[serde(deserialize_with = "lenient_text")]
    pub gender: String,
    pub blood_pressure: Option<ReadingValue>,
    pub temperature: Option<ReadingValue>,
    #[serde(deserialize_with = "lenient_text")]
    pub visit_date: String,
    #[serde(deserialize_with = "lenient_text")]
    pub diagnosis: String,
    #[serde(deserialize_with = "lenient_text")]
    pub medications: String,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

/// Paging metadata describing a single response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Informational envelope some responses carry; never consulted for paging.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponseMetadata {
    pub timestamp: String,
    pub version: String,
    pub request_id: String,
}

/// One page of patients. `data` is `None` when the payload did not carry a patient list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PatientPage {
    pub data: Option<Vec<Patient>>,
    pub pagination: Option<Pagination>,
    pub metadata: Option<ResponseMetadata>,
}

impl PatientPage {
    pub fn new(data: Vec<Patient>, pagination: Pagination) -> Self {
        Self {
            data: Some(data),
            pagination: Some(pagination),
            metadata: None,
        }
    }

    pub fn malformed(pagination: Option<Pagination>) -> Self {
        Self {
            data: None,
            pagination,
            metadata: None,
        }
    }
}

/// Derived risk profile for one patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskScore {
    pub patient_id: String,
    pub bp_risk: u8,
    pub temp_risk: u8,
    pub age_risk: u8,
    total_risk: u8,
    pub has_data_quality_issue: bool,
}

impl RiskScore {
    pub fn new(
        patient_id: impl Into<String>,
        bp_risk: u8,
        temp_risk: u8,
        age_risk: u8,
        has_data_quality_issue: bool,
    ) -> Self {
        Self {
            patient_id: patient_id.into(),
            bp_risk,
            temp_risk,
            age_risk,
            total_risk: bp_risk + temp_risk + age_risk,
            has_data_quality_issue,
        }
    }

    pub fn total_risk(&self) -> u8 {
        self.total_risk
    }
}

/// Alert categories submitted for grading. Lists are not mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlertLists {
    pub high_risk_patients: Vec<String>,
    pub fever_patients: Vec<String>,
    pub data_quality_issues: Vec<String>,
}

/// Parses the longest leading integer in `raw`, ignoring leading whitespace.
///
/// Digit runs too long for `i64` saturate instead of failing.
pub(crate) fn parse_int_prefix(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = split_sign(trimmed);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude: i64 = digits[..end].parse().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Parses the longest leading decimal number in `raw`, ignoring leading whitespace.
///
/// A leading `Infinity` (optionally signed) reads as infinite.
pub(crate) fn parse_float_prefix(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    if trimmed[end..].starts_with("Infinity") {
        return Some(if bytes.first() == Some(&b'-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }

    if mantissa_digits == 0 {
        return None;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    trimmed[..end].parse().ok()
}

fn split_sign(raw: &str) -> (bool, &str) {
    if let Some(rest) = raw.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = raw.strip_prefix('+') {
        (false, rest)
    } else {
        (false, raw)
    }
}
