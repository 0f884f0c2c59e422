//! Turning raw store documents into typed, defaulted records.

use serde::de::DeserializeOwned;
use serde_json::Value;
use sitepages_shared::{AboutContent, AboutRecord, Result, SiteError};

/// Complete the about text.
///
/// An absent record becomes [`AboutContent::EMPTY`] as a whole. A present
/// record keeps its fields; a missing `institute` or `society` reads as "".
pub fn normalize_about(record: Option<AboutRecord>) -> AboutContent {
    match record {
        None => AboutContent::EMPTY,
        Some(r) => AboutContent {
            institute: r.institute.unwrap_or_default(),
            society: r.society.unwrap_or_default(),
            vision: r.vision,
            mission: r.mission,
        },
    }
}

/// Decode the optional `about` document.
pub fn decode_about(doc: Option<Value>) -> Result<Option<AboutRecord>> {
    doc.map(|d| decode_one(d, "about")).transpose()
}

/// Decode every document of a collection; one bad document fails the batch.
pub fn decode_records<T: DeserializeOwned>(docs: Vec<Value>, kind: &str) -> Result<Vec<T>> {
    docs.into_iter().map(|d| decode_one(d, kind)).collect()
}

fn decode_one<T: DeserializeOwned>(doc: Value, kind: &str) -> Result<T> {
    let id = doc
        .get("_id")
        .and_then(Value::as_str)
        .unwrap_or("?")
        .to_string();
    serde_json::from_value(doc)
        .map_err(|e| SiteError::parse(format!("{kind} record {id}: {e}")))
}
