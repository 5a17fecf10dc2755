//! Google Visualization ("gviz") query responses.
//!
//! The endpoint wraps its JSON in a JavaScript call, e.g.
//! `/*O_o*/\ngoogle.visualization.Query.setResponse({...});`. Cells carry either
//! a literal `v` or a formatted `f` string that may be HTML (image cells carry
//! the character name in `alt`/`title`).

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GvizError {
    #[error("malformed gviz response: {0}")]
    MalformedResponse(String),
    #[error("invalid gviz JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GvizTable {
    #[serde(default)]
    pub cols: Vec<GvizColumn>,
    #[serde(default)]
    pub rows: Vec<GvizRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GvizColumn {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GvizRow {
    #[serde(default)]
    pub c: Vec<Option<GvizCell>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GvizCell {
    /// `Some(Value::Null)` when the key is present with a null value.
    #[serde(default, deserialize_with = "present")]
    pub v: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub f: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Resolved rows plus column labels. Row 0 is the sheet header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matrix {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// Leading `/* */` and `//` comments, then `name.path(<json>)` up to the end.
fn wrapper_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?s)^\s*(?:/\*.*?\*/\s*|//[^\n]*(?:\n|$)\s*)*[A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)*\s*\((.*)\)\s*;?\s*%?\s*$",
        )
        .expect("gviz wrapper pattern is valid")
    })
}

fn alt_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)alt=(?:"|')([^"']+)(?:"|')"#).expect("alt pattern is valid")
    })
}

fn title_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)title=(?:"|')([^"']+)(?:"|')"#).expect("title pattern is valid")
    })
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"))
}

/// Extract and parse the JSON argument of the call wrapper.
pub fn unwrap_gviz(text: &str) -> Result<Value, GvizError> {
    let captures = wrapper_pattern().captures(text).ok_or_else(|| {
        GvizError::MalformedResponse("no function call wrapper around payload".to_string())
    })?;
    let payload = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    Ok(serde_json::from_str(payload)?)
}

/// Unwrap a response body and return its `table` object.
pub fn parse_gviz_table(text: &str) -> Result<GvizTable, GvizError> {
    let mut payload = unwrap_gviz(text)?;

    if payload.get("status").and_then(Value::as_str) == Some("error") {
        let messages: Vec<String> = payload
            .get("errors")
            .and_then(Value::as_array)
            .map(|errors| {
                errors
                    .iter()
                    .filter_map(|e| {
                        e.get("detailed_message")
                            .or_else(|| e.get("message"))
                            .and_then(Value::as_str)
                            .map(str::to_string)
                    })
                    .collect()
            })
            .unwrap_or_default();
        return Err(GvizError::MalformedResponse(format!(
            "query reported an error: {}",
            messages.join("; ")
        )));
    }

    let table = payload
        .get_mut("table")
        .map(Value::take)
        .ok_or_else(|| GvizError::MalformedResponse("payload has no table".to_string()))?;
    Ok(serde_json::from_value(table)?)
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(number_to_string(n)),
        other => Some(other.to_string()),
    }
}

/// Whole floats drop the fraction: `3.0` renders as `"3"`.
fn number_to_string(n: &serde_json::Number) -> String {
    if n.is_f64() {
        if let Some(f) = n.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < 1e15) {
            return format!("{}", f as i64);
        }
    }
    n.to_string()
}

/// `v` wins when present (even as null); otherwise recover a value from `f`.
pub fn resolve_cell(cell: Option<&GvizCell>) -> Option<String> {
    let cell = cell?;
    if let Some(v) = &cell.v {
        return value_to_string(v);
    }
    match cell.f.as_ref()? {
        Value::String(formatted) => resolve_formatted(formatted),
        other => value_to_string(other),
    }
}

fn resolve_formatted(formatted: &str) -> Option<String> {
    for pattern in [alt_pattern(), title_pattern()] {
        if let Some(found) = pattern.captures(formatted).and_then(|c| c.get(1)) {
            return Some(found.as_str().to_string());
        }
    }
    let stripped = tag_pattern().replace_all(formatted, "");
    let stripped = stripped.trim();
    if stripped.is_empty() {
        None
    } else {
        Some(stripped.to_string())
    }
}

pub fn table_to_matrix(table: &GvizTable) -> Matrix {
    let columns = table
        .cols
        .iter()
        .map(|col| {
            col.label
                .clone()
                .filter(|l| !l.is_empty())
                .or_else(|| col.id.clone())
                .unwrap_or_default()
        })
        .collect();
    let rows = table
        .rows
        .iter()
        .map(|row| row.c.iter().map(|cell| resolve_cell(cell.as_ref())).collect())
        .collect();
    Matrix { columns, rows }
}
