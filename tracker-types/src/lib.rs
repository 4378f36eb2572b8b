//! Shared types between the tabular editor and the tracker backend
//!
//! These types are used by both:
//! - the tabular cell editor (WASM, or native for tooling and tests)
//! - anything speaking the backend's `/cell` endpoints
//!
//! Serializable with serde for JSON over HTTP

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Constants
// ============================================================================

/// Mount point of the tabular endpoints on the tracker backend.
pub const DEFAULT_TABULAR_PREFIX: &str = "/manage";

/// Collections the backend lets the tabular editor modify.
pub const MODIFIABLE_TABLES: &[&str] = &["group", "station", "form"];

pub fn is_modifiable_table(name: &str) -> bool {
    MODIFIABLE_TABLES.contains(&name)
}

// ============================================================================
// Cell Values
// ============================================================================

/// A value stored in one table cell.
///
/// The DOM only ever holds text, while the backend answers with whatever the
/// column type coerced the value into (integers, booleans, `null` for empty
/// nullable columns). Variant order matters for untagged deserialization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Comparison used to decide whether an edit changed anything.
    ///
    /// Text and numbers compare numerically because a committed integer is
    /// read back from the DOM as text. Booleans only ever equal booleans.
    pub fn loosely_eq(&self, other: &CellValue) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Null | Self::Bool(_), _) | (_, Self::Null | Self::Bool(_)) => false,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            // Exact for integers beyond f64 precision.
            (Self::Integer(i), Self::Text(s)) | (Self::Text(s), Self::Integer(i))
                if s.trim().parse::<i64>().is_ok() =>
            {
                s.trim().parse::<i64>() == Ok(*i)
            }
            (a, b) => match (a.numeric(), b.numeric()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    /// `null` or whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Truthiness as rendered by a checkbox.
    pub fn as_flag(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Integer(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Text(s) => s.trim().eq_ignore_ascii_case("true"),
        }
    }

    fn numeric(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(s) if !s.trim().is_empty() => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

// ============================================================================
// Cell Addressing
// ============================================================================

/// Identifies one editable cell: collection, row key and column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellAddress {
    pub table: String,
    pub row_key: String,
    pub column: String,
}

impl CellAddress {
    pub fn new(
        table: impl Into<String>,
        row_key: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            row_key: row_key.into(),
            column: column.into(),
        }
    }

    /// Path of the cell endpoint relative to the tabular prefix.
    pub fn path(&self) -> String {
        format!("cell/{}/{}/{}", self.table, self.row_key, self.column)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.table, self.row_key, self.column)
    }
}

// ============================================================================
// Cell Update Protocol
// ============================================================================

/// Body of `PUT /cell/{table}/{row}/{column}`.
///
/// `old_value` is the client's belief about the stored value and lets the
/// backend detect lost updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCellRequest {
    pub new_value: CellValue,
    pub old_value: CellValue,
}

/// Successful update: the value the backend actually persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateCellResponse {
    pub new_value: CellValue,
}

/// Body of a failed update.
///
/// On a lost update the backend reports the stored value in `db_value`.
/// Other failures carry at most a `message`, in which case `db_value`
/// decodes to `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CellConflict {
    #[serde(default)]
    pub db_value: CellValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
