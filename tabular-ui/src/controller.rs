//! Optimistic-concurrency cell updates.
//!
//! Every edit is sent as `{newValue, oldValue}`; the backend only applies it
//! when `oldValue` still matches what it stores. A rejected write hands the
//! three competing values to the user, and the chosen one is retried against
//! the value the backend reported, never the stale one.
//!
//! # Flow
//!
//! `Clean → Editing → Submitting → Committed`, or on failure
//! `Submitting → Conflicted → Resolving → Submitting` (one retry per answer).

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::Instrument;
use tracker_types::{CellAddress, CellConflict, CellValue, UpdateCellRequest};

use crate::api::{CellApi, CellWriteOutcome};
use crate::cell::{EditState, EditableCell};
use crate::config::TabularConfig;
use crate::conflict::{ConflictCandidates, ConflictPrompt, Resolution};

/// How an edit attempt settled.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// The value matched the committed one; nothing was sent.
    Unchanged,
    /// The backend persisted this value and the cell now shows it.
    Committed(CellValue),
    /// Conflict dialog dismissed or answered without a usable value.
    Abandoned,
}

pub struct TabularCellController<A, P> {
    api: A,
    prompt: P,
    span: tracing::Span,
    states: RefCell<HashMap<CellAddress, EditState>>,
}

impl<A: CellApi, P: ConflictPrompt> TabularCellController<A, P> {
    pub fn new(config: &TabularConfig, api: A, prompt: P) -> Self {
        Self {
            api,
            prompt,
            span: tracing::info_span!("tabulator", endpoint = %config.endpoint()),
            states: RefCell::new(HashMap::new()),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    pub fn state_of(&self, address: &CellAddress) -> EditState {
        self.states
            .borrow()
            .get(address)
            .copied()
            .unwrap_or_default()
    }

    /// Submit whatever the cell currently displays.
    pub async fn submit_displayed<C: EditableCell + ?Sized>(&self, cell: &C) -> EditOutcome {
        let value = cell.displayed_value();
        self.submit_edit(cell, value).await
    }

    /// Send `new_value` unless it equals the committed value, then commit the
    /// backend's answer or hand a rejection to [`Self::resolve_conflict`].
    pub async fn submit_edit<C: EditableCell + ?Sized>(
        &self,
        cell: &C,
        new_value: CellValue,
    ) -> EditOutcome {
        self.submit(cell, new_value)
            .instrument(self.span.clone())
            .await
    }

    /// Ask the user to pick between the attempted, previous and current
    /// values, then retry with the pick paired against `server_value`.
    ///
    /// Each further rejection opens a new dialog; nothing is retried without
    /// an answer.
    pub async fn resolve_conflict<C: EditableCell + ?Sized>(
        &self,
        cell: &C,
        attempted: CellValue,
        previous: CellValue,
        server_value: CellValue,
    ) -> EditOutcome {
        self.resolve(cell, attempted, previous, server_value)
            .instrument(self.span.clone())
            .await
    }

    async fn submit<C: EditableCell + ?Sized>(&self, cell: &C, new_value: CellValue) -> EditOutcome {
        let address = cell.address();
        let old_value = cell.committed_value();
        tracing::debug!(cell = %address, old = %old_value, new = %new_value, "Setting cell value");
        self.set_state(address, EditState::Editing);

        if new_value.loosely_eq(&old_value) {
            tracing::debug!(cell = %address, "No update needed (old value equals new value)");
            self.commit(cell, &old_value);
            self.set_state(address, EditState::Clean);
            return EditOutcome::Unchanged;
        }

        let sent = self.send(address, &new_value, &old_value).await;
        match sent {
            Ok(persisted) => {
                self.commit(cell, &persisted);
                EditOutcome::Committed(persisted)
            }
            Err(conflict) => {
                self.resolve(cell, new_value, old_value, conflict.db_value)
                    .await
            }
        }
    }

    async fn resolve<C: EditableCell + ?Sized>(
        &self,
        cell: &C,
        mut attempted: CellValue,
        mut previous: CellValue,
        mut server_value: CellValue,
    ) -> EditOutcome {
        let address = cell.address();
        loop {
            let candidates = ConflictCandidates::new(attempted, previous, server_value);
            self.set_state(address, EditState::Resolving);

            let choice = match self.prompt.choose(address, &candidates).await {
                Resolution::Selected(choice) => choice,
                Resolution::Cancelled => {
                    tracing::info!(cell = %address, "Conflict resolution cancelled, edit left unsaved");
                    self.set_state(address, EditState::Clean);
                    return EditOutcome::Abandoned;
                }
            };

            let selected = candidates.pick(choice).clone();
            if selected.is_blank() {
                tracing::error!(cell = %address, ?choice, "No value received for conflict resolution");
                self.set_state(address, EditState::Clean);
                return EditOutcome::Abandoned;
            }

            let current = candidates.current;
            let sent = self.send(address, &selected, &current).await;
            match sent {
                Ok(persisted) => {
                    self.commit(cell, &persisted);
                    return EditOutcome::Committed(persisted);
                }
                Err(conflict) => {
                    attempted = selected;
                    previous = current;
                    server_value = conflict.db_value;
                }
            }
        }
    }

    /// One PUT. Every failure comes back as a conflict, transport errors
    /// included, with `db_value` null when the backend did not provide one.
    async fn send(
        &self,
        address: &CellAddress,
        new_value: &CellValue,
        old_value: &CellValue,
    ) -> Result<CellValue, CellConflict> {
        self.set_state(address, EditState::Submitting);
        let request = UpdateCellRequest {
            new_value: new_value.clone(),
            old_value: old_value.clone(),
        };

        match self.api.put_cell(address, &request).await {
            Ok(CellWriteOutcome::Committed { new_value }) => {
                tracing::info!(cell = %address, value = %new_value, "Successfully updated the cell");
                Ok(new_value)
            }
            Ok(CellWriteOutcome::Rejected { status, conflict }) => {
                tracing::warn!(
                    cell = %address,
                    status,
                    db_value = %conflict.db_value,
                    detail = ?conflict.message,
                    "Error updating the cell"
                );
                self.set_state(address, EditState::Conflicted);
                Err(conflict)
            }
            Err(e) => {
                // TODO: offer a plain retry for transport errors once the
                // backend distinguishes them from lost updates.
                tracing::warn!(cell = %address, error = %e, "Cell update did not reach the backend");
                self.set_state(address, EditState::Conflicted);
                Err(CellConflict {
                    db_value: CellValue::Null,
                    message: Some(e.to_string()),
                })
            }
        }
    }

    fn commit<C: EditableCell + ?Sized>(&self, cell: &C, value: &CellValue) {
        let address = cell.address();
        tracing::debug!(cell = %address, value = %value, "Committing value");
        if let Err(e) = cell.commit(value) {
            tracing::error!(cell = %address, "Failed to commit value: {e}");
        }
        self.set_state(address, EditState::Committed);
    }

    fn set_state(&self, address: &CellAddress, state: EditState) {
        self.states.borrow_mut().insert(address.clone(), state);
    }
}
