//! Editable cells and their per-edit lifecycle.

use tracker_types::{CellAddress, CellValue};

use crate::error::TabularError;

/// How a cell is edited and how its committed value is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Free text typed into a `contenteditable` cell, submitted on blur.
    Text,
    /// A checkbox input, submitted on change.
    Checkbox,
}

impl CellKind {
    /// Interpret the raw `data-current-value` attribute.
    pub fn parse_committed(self, raw: &str) -> CellValue {
        match self {
            CellKind::Text => CellValue::text(raw),
            CellKind::Checkbox => CellValue::Bool(raw.to_lowercase() == "true"),
        }
    }

    /// Attribute text written back when a value is committed.
    pub fn render(self, value: &CellValue) -> String {
        match self {
            CellKind::Text => value.to_string(),
            CellKind::Checkbox => value.as_flag().to_string(),
        }
    }

    pub fn event_type(self) -> &'static str {
        match self {
            CellKind::Text => "blur",
            CellKind::Checkbox => "change",
        }
    }
}

/// The page-side half of a cell: where the committed value lives and what
/// the user currently sees.
pub trait EditableCell {
    fn address(&self) -> &CellAddress;

    fn kind(&self) -> CellKind;

    /// Last value known to be persisted on the backend.
    fn committed_value(&self) -> CellValue;

    /// Value currently shown to (or typed by) the user.
    fn displayed_value(&self) -> CellValue;

    /// Record `value` as committed and show it.
    fn commit(&self, value: &CellValue) -> Result<(), TabularError>;
}

/// Where a cell is within one edit attempt.
///
/// `Clean` and `Committed` are the only states left between user actions;
/// `Resolving` waits on the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Clean,
    Editing,
    Submitting,
    Committed,
    Conflicted,
    Resolving,
}
