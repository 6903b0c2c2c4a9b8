//! Board document encoding and tolerant decoding.
//!
//! # Responsibility
//! - Encode a role snapshot as the portable JSON board document.
//! - Validate an external document's shape, then normalize each element.
//!
//! # Invariants
//! - Shape validation covers every element before any normalization, so a
//!   rejected document never yields partial output.
//! - Decoded roles always carry a legal category and pairwise distinct ids.
//! - When ids collide, the first occurrence keeps its id.

use crate::model::category::Category;
use crate::model::role::{Role, RoleId};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const REQUIRED_FIELDS: [&str; 3] = ["id", "name", "category"];

/// Board document rejected by the shape check, or failed to encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    InvalidJson(String),
    NotAnArray,
    ElementNotObject { index: usize },
    MissingField { index: usize, field: &'static str },
    Encode(String),
}

impl Display for FormatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidJson(details) => write!(f, "board document is not valid JSON: {details}"),
            Self::NotAnArray => write!(f, "board document must be a JSON array of roles"),
            Self::ElementNotObject { index } => {
                write!(f, "board document element {index} is not an object")
            }
            Self::MissingField { index, field } => {
                write!(f, "board document element {index} is missing `{field}`")
            }
            Self::Encode(details) => write!(f, "failed to encode board document: {details}"),
        }
    }
}

impl Error for FormatError {}

/// Counts describing how an accepted document was normalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Number of roles in the decoded document.
    pub imported: usize,
    /// Elements whose `id` was falsy and received a fresh id.
    pub generated_ids: usize,
    /// Elements whose `id` repeated an earlier element and received a fresh id.
    pub reassigned_duplicate_ids: usize,
    /// Elements whose `category` was not a legal label and became `TBD`.
    pub defaulted_categories: usize,
}

impl ImportSummary {
    /// Total field-level corrections applied while decoding.
    pub fn coerced(&self) -> usize {
        self.generated_ids + self.reassigned_duplicate_ids + self.defaulted_categories
    }
}

/// Normalized roles plus the summary of what was coerced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDocument {
    pub roles: Vec<Role>,
    pub summary: ImportSummary,
}

/// Encodes roles as a pretty-printed document for export files.
pub fn encode_document(roles: &[Role]) -> Result<String, FormatError> {
    serde_json::to_string_pretty(roles).map_err(|err| FormatError::Encode(err.to_string()))
}

/// Encodes roles as a compact document for the persisted blob.
pub fn encode_compact(roles: &[Role]) -> Result<String, FormatError> {
    serde_json::to_string(roles).map_err(|err| FormatError::Encode(err.to_string()))
}

/// Parses and normalizes a board document from text.
pub fn decode_document(text: &str) -> Result<DecodedDocument, FormatError> {
    let value: Value =
        serde_json::from_str(text).map_err(|err| FormatError::InvalidJson(err.to_string()))?;
    normalize_document(&value)
}

/// Validates document shape and normalizes every element.
///
/// Shape rules: the top level is an array and every element is an object
/// holding at least the `id`, `name` and `category` keys (any value).
pub fn normalize_document(value: &Value) -> Result<DecodedDocument, FormatError> {
    let elements = validate_shape(value)?;

    let mut summary = ImportSummary {
        imported: elements.len(),
        ..ImportSummary::default()
    };
    let mut seen: HashSet<String> = HashSet::with_capacity(elements.len());
    let mut roles = Vec::with_capacity(elements.len());

    for element in elements {
        let id = match element.get("id").filter(|id| is_truthy(id)).map(js_string) {
            Some(id) if id.is_empty() => {
                summary.generated_ids += 1;
                RoleId::generate()
            }
            Some(id) if seen.contains(id.as_str()) => {
                summary.reassigned_duplicate_ids += 1;
                RoleId::generate()
            }
            Some(id) => RoleId::from(id),
            None => {
                summary.generated_ids += 1;
                RoleId::generate()
            }
        };
        seen.insert(id.as_str().to_string());

        let label = element.get("category").and_then(Value::as_str);
        let category = Category::normalize(label);
        if label != Some(category.as_str()) {
            summary.defaulted_categories += 1;
        }

        roles.push(Role {
            id,
            name: element.get("name").map(js_string).unwrap_or_default(),
            category,
            checked: element.get("checked").is_some_and(is_truthy),
        });
    }

    Ok(DecodedDocument { roles, summary })
}

fn validate_shape(value: &Value) -> Result<Vec<&Map<String, Value>>, FormatError> {
    let items = value.as_array().ok_or(FormatError::NotAnArray)?;
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let object = item
                .as_object()
                .ok_or(FormatError::ElementNotObject { index })?;
            for field in REQUIRED_FIELDS {
                if !object.contains_key(field) {
                    return Err(FormatError::MissingField { index, field });
                }
            }
            Ok(object)
        })
        .collect()
}

/// JavaScript-style truthiness over JSON values.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// JavaScript-style string conversion over JSON values.
fn js_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => {
            if number.is_i64() || number.is_u64() {
                return number.to_string();
            }
            number
                .as_f64()
                .map_or_else(|| number.to_string(), js_number)
        }
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => js_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// `Number.prototype.toString` for finite doubles: plain digits inside
/// `[1e-6, 1e21)`, exponent form with an explicit sign outside it.
fn js_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return n.to_string();
    }
    let formatted = format!("{n:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    }
}
