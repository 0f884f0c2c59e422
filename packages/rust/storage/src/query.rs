//! Document query vocabulary: filters, sort specs, and the [`DocumentStore`]
//! trait that readers are written against.

use std::sync::LazyLock;

use libsql::Value as SqlValue;
use regex::Regex;
use serde_json::Value;
use sitepages_shared::{Result, SiteError};

/// Top-level field names usable in filters and sorts.
static FIELD_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid field regex"));

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// A conjunction of top-level field equality tests. The empty filter matches
/// every document in a collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    /// Match every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Match documents whose `field` equals `value`.
    pub fn where_eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and_eq(field, value)
    }

    /// Add another equality test.
    pub fn and_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((field.into(), value.into()));
        self
    }
}

// ---------------------------------------------------------------------------
// SortSpec
// ---------------------------------------------------------------------------

/// Ascending sort on a single top-level field.
///
/// Documents missing the field sort first; ties keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    field: String,
}

impl SortSpec {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

// ---------------------------------------------------------------------------
// DocumentStore
// ---------------------------------------------------------------------------

/// Read-side query interface over named collections of JSON documents.
///
/// Returned documents carry their store-assigned id in the `_id` field.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// First document in `collection` matching `filter`, if any.
    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Value>>;

    /// All documents in `collection` matching `filter`, optionally sorted.
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<&SortSpec>,
    ) -> Result<Vec<Value>>;
}

// ---------------------------------------------------------------------------
// SQL compilation
// ---------------------------------------------------------------------------

/// Compile a collection query to SQL over the `documents` table.
pub(crate) fn build_sql(
    collection: &str,
    filter: &Filter,
    sort: Option<&SortSpec>,
    limit: Option<u32>,
) -> Result<(String, Vec<SqlValue>)> {
    if collection.is_empty() {
        return Err(SiteError::validation("collection name must not be empty"));
    }

    let mut sql = String::from("SELECT id, body FROM documents WHERE collection = ?");
    let mut params: Vec<SqlValue> = vec![SqlValue::Text(collection.to_string())];

    for (field, value) in &filter.clauses {
        sql.push_str(" AND json_extract(body, ?) = ?");
        params.push(SqlValue::Text(json_path(field)?));
        params.push(scalar_param(field, value)?);
    }

    match sort {
        Some(spec) => {
            sql.push_str(" ORDER BY json_extract(body, ?) ASC, rowid ASC");
            params.push(SqlValue::Text(json_path(spec.field())?));
        }
        None => sql.push_str(" ORDER BY rowid ASC"),
    }

    if let Some(limit) = limit {
        sql.push_str(" LIMIT ?");
        params.push(SqlValue::Integer(i64::from(limit)));
    }

    Ok((sql, params))
}

fn json_path(field: &str) -> Result<String> {
    if !FIELD_NAME.is_match(field) {
        return Err(SiteError::validation(format!(
            "invalid field name '{field}': expected a plain identifier"
        )));
    }
    Ok(format!("$.{field}"))
}

/// `json_extract` yields SQL scalars; booleans come back as 0/1.
fn scalar_param(field: &str, value: &Value) -> Result<SqlValue> {
    match value {
        Value::String(s) => Ok(SqlValue::Text(s.clone())),
        Value::Bool(b) => Ok(SqlValue::Integer(i64::from(*b))),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(SqlValue::Integer(i)),
            None => n.as_f64().map(SqlValue::Real).ok_or_else(|| {
                SiteError::validation(format!("unsupported number for '{field}': {n}"))
            }),
        },
        other => Err(SiteError::validation(format!(
            "filter on '{field}' must be a string, number or boolean, got {other}"
        ))),
    }
}
