//! Manual resolution of lost-update conflicts.

use async_trait::async_trait;
use tracker_types::{CellAddress, CellValue};

/// One of the three values offered after a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictChoice {
    /// What the user just tried to save.
    Attempted,
    /// What the client believed was stored before the edit.
    Previous,
    /// What the backend reports as stored right now.
    Current,
}

impl ConflictChoice {
    /// Display order in the dialog.
    pub const ALL: [ConflictChoice; 3] = [
        ConflictChoice::Attempted,
        ConflictChoice::Previous,
        ConflictChoice::Current,
    ];

    pub fn index(self) -> usize {
        match self {
            ConflictChoice::Attempted => 0,
            ConflictChoice::Previous => 1,
            ConflictChoice::Current => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConflictCandidates {
    pub attempted: CellValue,
    pub previous: CellValue,
    pub current: CellValue,
}

impl ConflictCandidates {
    pub fn new(attempted: CellValue, previous: CellValue, current: CellValue) -> Self {
        Self {
            attempted,
            previous,
            current,
        }
    }

    pub fn default_choice(&self) -> ConflictChoice {
        ConflictChoice::Attempted
    }

    pub fn pick(&self, choice: ConflictChoice) -> &CellValue {
        match choice {
            ConflictChoice::Attempted => &self.attempted,
            ConflictChoice::Previous => &self.previous,
            ConflictChoice::Current => &self.current,
        }
    }

    /// Candidates paired with their choice, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (ConflictChoice, &CellValue)> {
        ConflictChoice::ALL
            .into_iter()
            .map(move |choice| (choice, self.pick(choice)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Selected(ConflictChoice),
    /// Dialog dismissed; the edit stays on screen unsaved.
    Cancelled,
}

/// Asks the user which value should win a conflict.
///
/// Implementations must not block: the future resolves once the user has
/// answered.
#[async_trait(?Send)]
pub trait ConflictPrompt {
    async fn choose(&self, address: &CellAddress, candidates: &ConflictCandidates) -> Resolution;
}

/// Text of the conflict dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogCopy {
    pub title: String,
    pub intro: String,
    pub attempted_label: String,
    pub previous_label: String,
    pub current_label: String,
    pub confirm: String,
    pub cancel: String,
}

impl Default for DialogCopy {
    fn default() -> Self {
        Self {
            title: "Data conflict".to_string(),
            intro: "The data on the server changed since this page was loaded! \
                    Please choose which of the following values should be saved:"
                .to_string(),
            attempted_label: "The value you just entered:".to_string(),
            previous_label: "Previous value from the server:".to_string(),
            current_label: "Current value on the server:".to_string(),
            confirm: "OK".to_string(),
            cancel: "Cancel".to_string(),
        }
    }
}

impl DialogCopy {
    pub fn german() -> Self {
        Self {
            title: "Datenkonflikt".to_string(),
            intro: "Seit dem letzten Seitenaufruf wurden die Daten auf dem Server verändert! \
                    Bitte wählen Sie einen der folgenden Werte aus, welcher gespeichert werden soll:"
                .to_string(),
            attempted_label: "Ihr eben eingegebener Wert:".to_string(),
            previous_label: "Vorheriger Wert vom Server:".to_string(),
            current_label: "Jetziger Wert auf dem Server:".to_string(),
            confirm: "OK".to_string(),
            cancel: "Abbrechen".to_string(),
        }
    }

    pub fn label(&self, choice: ConflictChoice) -> &str {
        match choice {
            ConflictChoice::Attempted => &self.attempted_label,
            ConflictChoice::Previous => &self.previous_label,
            ConflictChoice::Current => &self.current_label,
        }
    }
}
