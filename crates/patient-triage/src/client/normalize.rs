use serde_json::{Map, Value};
use tracing::warn;

use crate::workflows::assessment::{
    Pagination, Patient, PatientPage, ResponseMetadata, SourceError,
};

/// Maps a raw `/patients` body onto [`PatientPage`].
///
/// Accepts the canonical `{data, pagination}` shape and the legacy
/// `{patients, current_page, per_page, total_records}` shape. A body that looks canonical but
/// carries no patient list becomes a malformed page; anything else is rejected.
pub(crate) fn normalize_page(body: Value, page: u32, limit: u32) -> Result<PatientPage, SourceError> {
    let Value::Object(object) = body else {
        return Err(SourceError::UnrecognizedResponse { page });
    };

    if let Some(Value::Array(records)) = object.get("data") {
        return Ok(PatientPage {
            data: Some(read_patients(records, page)),
            pagination: read_pagination(&object),
            metadata: object
                .get("metadata")
                .and_then(|value| serde_json::from_value::<ResponseMetadata>(value.clone()).ok()),
        });
    }

    if let Some(Value::Array(records)) = object.get("patients") {
        return Ok(PatientPage {
            data: Some(read_patients(records, page)),
            pagination: Some(legacy_pagination(&object, page, limit)),
            metadata: None,
        });
    }

    if object.contains_key("data") || object.contains_key("pagination") {
        return Ok(PatientPage::malformed(read_pagination(&object)));
    }

    Err(SourceError::UnrecognizedResponse { page })
}

fn read_patients(records: &[Value], page: u32) -> Vec<Patient> {
    records
        .iter()
        .enumerate()
        .filter_map(
            |(index, record)| match serde_json::from_value::<Patient>(record.clone()) {
                Ok(patient) => Some(patient),
                Err(err) => {
                    warn!(page, index, error = %err, "skipping unreadable patient record");
                    None
                }
            },
        )
        .collect()
}

fn read_pagination(object: &Map<String, Value>) -> Option<Pagination> {
    let value = object.get("pagination")?;
    match serde_json::from_value::<Pagination>(value.clone()) {
        Ok(pagination) => Some(pagination),
        Err(err) => {
            warn!(error = %err, "ignoring unreadable pagination block");
            None
        }
    }
}

fn legacy_pagination(object: &Map<String, Value>, page: u32, limit: u32) -> Pagination {
    let current_page = positive(object, "current_page");
    let per_page = positive(object, "per_page").unwrap_or(u64::from(limit)).max(1);
    let total = positive(object, "total_records").unwrap_or(0);
    let total_pages = total.div_ceil(per_page);

    Pagination {
        page: current_page.map(clamp_u32).unwrap_or(page),
        limit: clamp_u32(per_page),
        total,
        total_pages: clamp_u32(total_pages),
        has_next: current_page.map(|current| current < total_pages).unwrap_or(false),
        has_previous: current_page.map(|current| current > 1).unwrap_or(false),
    }
}

/// Reads a non-zero unsigned field; zero and non-numeric values count as absent.
fn positive(object: &Map<String, Value>, key: &str) -> Option<u64> {
    object
        .get(key)
        .and_then(Value::as_u64)
        .filter(|value| *value > 0)
}

fn clamp_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
