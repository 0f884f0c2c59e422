//! Core domain types: the records read from the store and the API, and the
//! page shapes handed to the rendering layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// Leadership titles shown on the About page, in display order.
pub const CANONICAL_ROLES: [&str; 3] = ["Chairman", "Secretary", "Principal"];

// ---------------------------------------------------------------------------
// About content
// ---------------------------------------------------------------------------

/// The `about` section document as stored. Every field may be missing, and a
/// scalar of another JSON type is taken as its text.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub institute: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub society: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub vision: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub mission: Option<String>,
}

/// Normalized about text. `institute` and `society` are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutContent {
    pub institute: String,
    pub society: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mission: Option<String>,
}

impl AboutContent {
    /// Substituted when the store has no `about` record.
    pub const EMPTY: Self = Self {
        institute: String::new(),
        society: String::new(),
        vision: None,
        mission: None,
    };
}

impl Default for AboutContent {
    fn default() -> Self {
        Self::EMPTY
    }
}

// ---------------------------------------------------------------------------
// Directors
// ---------------------------------------------------------------------------

/// A member of the board of directors.
///
/// Fields this layer does not know about are kept in `extra` and passed
/// through to rendering unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Director {
    /// Store-assigned identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Display position, ascending. Any JSON number is accepted.
    #[serde(default)]
    pub order: Option<Number>,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub position: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Leadership
// ---------------------------------------------------------------------------

/// A leadership record. `role` is free text; see [`CANONICAL_ROLES`].
///
/// Only `role` is required, since role lookup cannot work without it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leader {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub name: String,
    pub role: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub position: String,
    /// HTML message body.
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Lenient text fields
// ---------------------------------------------------------------------------

/// Display text: `null` is absent, numbers and booleans read as their JSON
/// text. Arrays and objects are still rejected.
fn lenient_text<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(de)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        v @ (Value::Number(_) | Value::Bool(_)) => Ok(Some(v.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected text, found {other}"
        ))),
    }
}

fn text_or_empty<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(lenient_text(de)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Faculty
// ---------------------------------------------------------------------------

/// A faculty or staff member as returned by the faculty API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub designation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    /// Tri-state: absent means teaching, only an explicit `false` means
    /// non-teaching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_teaching: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Faculty {
    /// Whether this member belongs on the teaching staff list.
    pub fn is_teaching_staff(&self) -> bool {
        self.is_teaching != Some(false)
    }
}

// ---------------------------------------------------------------------------
// API envelope
// ---------------------------------------------------------------------------

/// The `{ success, data, error? }` wrapper returned by the first-party API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Page shapes
// ---------------------------------------------------------------------------

/// Data for the About page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AboutPage {
    pub about: AboutContent,
    pub directors: Vec<Director>,
    pub leadership: Vec<Leader>,
}

impl AboutPage {
    /// Rendered when any store read fails.
    pub const EMPTY: Self = Self {
        about: AboutContent::EMPTY,
        directors: Vec::new(),
        leadership: Vec::new(),
    };
}

/// Data for the Faculty page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyPage {
    pub teaching: Vec<Faculty>,
    pub non_teaching: Vec<Faculty>,
}

impl FacultyPage {
    /// Rendered when the faculty API call fails.
    pub const EMPTY: Self = Self {
        teaching: Vec::new(),
        non_teaching: Vec::new(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faculty_json(extra: &str) -> String {
        format!(r#"{{"_id":"f1","name":"Asha Rao","designation":"Lecturer"{extra}}}"#)
    }

    #[test]
    fn faculty_tri_state_flag() {
        let absent: Faculty = serde_json::from_str(&faculty_json("")).expect("absent");
        let yes: Faculty =
            serde_json::from_str(&faculty_json(r#","isTeaching":true"#)).expect("true");
        let no: Faculty =
            serde_json::from_str(&faculty_json(r#","isTeaching":false"#)).expect("false");

        assert_eq!(absent.is_teaching, None);
        assert!(absent.is_teaching_staff());
        assert!(yes.is_teaching_staff());
        assert!(!no.is_teaching_staff());
    }

    #[test]
    fn faculty_serializes_camel_case() {
        let f: Faculty = serde_json::from_str(&faculty_json(
            r#","imageId":"img-9","isTeaching":false,"createdAt":"2024-06-01T10:00:00Z""#,
        ))
        .expect("parse");
        let json = serde_json::to_value(&f).expect("serialize");
        assert_eq!(json["_id"], "f1");
        assert_eq!(json["imageId"], "img-9");
        assert_eq!(json["isTeaching"], false);
        assert!(json.get("email").is_none());
    }

    #[test]
    fn envelope_without_data_defaults_to_empty() {
        let env: ApiEnvelope<Faculty> =
            serde_json::from_str(r#"{"success":false,"error":"db down"}"#).expect("parse");
        assert!(!env.success);
        assert!(env.data.is_empty());
        assert_eq!(env.error.as_deref(), Some("db down"));
    }

    #[test]
    fn faculty_envelope_fixture_validates() {
        let fixture = std::fs::read_to_string("../../../fixtures/json/faculty-envelope.json")
            .expect("read fixture");
        let env: ApiEnvelope<Faculty> = serde_json::from_str(&fixture).expect("parse fixture");
        assert!(env.success);
        assert_eq!(env.data.len(), 4);
        assert_eq!(env.data.iter().filter(|f| f.is_teaching_staff()).count(), 3);
    }

    #[test]
    fn director_keeps_unknown_fields() {
        let d: Director = serde_json::from_str(
            r#"{"_id":"d1","order":2,"name":"R. Mehta","linkedin":"https://example.org/rm"}"#,
        )
        .expect("parse");
        assert_eq!(d.order, Some(Number::from(2)));
        assert_eq!(d.extra["linkedin"], "https://example.org/rm");

        let back = serde_json::to_value(&d).expect("serialize");
        assert_eq!(back["linkedin"], "https://example.org/rm");
    }

    #[test]
    fn director_accepts_fractional_order_and_null_name() {
        let d: Director =
            serde_json::from_str(r#"{"_id":"d2","order":1.5,"name":null}"#).expect("parse");
        assert_eq!(d.order.as_ref().and_then(Number::as_f64), Some(1.5));
        assert_eq!(d.name, "");

        let back = serde_json::to_value(&d).expect("serialize");
        assert_eq!(back["order"], 1.5);
    }

    #[test]
    fn about_record_takes_scalars_as_text() {
        let r: AboutRecord =
            serde_json::from_str(r#"{"institute":42,"society":null,"vision":true}"#)
                .expect("parse");
        assert_eq!(r.institute.as_deref(), Some("42"));
        assert!(r.society.is_none());
        assert_eq!(r.vision.as_deref(), Some("true"));

        assert!(serde_json::from_str::<AboutRecord>(r#"{"mission":["a"]}"#).is_err());
    }

    #[test]
    fn leader_needs_only_a_role() {
        let l: Leader = serde_json::from_str(
            r#"{"_id":"l1","name":"K. Iyer","role":"Principal","message":"<p>Welcome</p>"}"#,
        )
        .expect("parse");
        assert_eq!(l.position, "");
        assert!(l.created_at.is_none());
        assert!(l.updated_at.is_none());

        let no_role = serde_json::from_str::<Leader>(r#"{"_id":"l2","name":"X"}"#);
        assert!(no_role.is_err());
    }

    #[test]
    fn empty_defaults_are_fully_populated() {
        let about = serde_json::to_value(&AboutPage::EMPTY).expect("serialize");
        assert_eq!(about["about"]["institute"], "");
        assert_eq!(about["about"]["society"], "");
        assert_eq!(about["directors"], serde_json::json!([]));
        assert_eq!(about["leadership"], serde_json::json!([]));

        let faculty = serde_json::to_value(&FacultyPage::EMPTY).expect("serialize");
        assert_eq!(faculty, serde_json::json!({"teaching": [], "nonTeaching": []}));
    }
}
