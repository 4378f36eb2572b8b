//! Scripted stand-ins for the backend, the page and the user.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;

use async_trait::async_trait;
use tabular_ui::{
    CellApi, CellKind, CellWriteOutcome, ConflictCandidates, ConflictPrompt, EditableCell,
    Resolution, TabularError,
};
use tracker_types::{CellAddress, CellConflict, CellValue, UpdateCellRequest};

pub fn committed(value: impl Into<CellValue>) -> Result<CellWriteOutcome, TabularError> {
    Ok(CellWriteOutcome::Committed {
        new_value: value.into(),
    })
}

pub fn conflict(status: u16, db_value: impl Into<CellValue>) -> Result<CellWriteOutcome, TabularError> {
    Ok(CellWriteOutcome::Rejected {
        status,
        conflict: CellConflict {
            db_value: db_value.into(),
            message: None,
        },
    })
}

pub fn request(new_value: impl Into<CellValue>, old_value: impl Into<CellValue>) -> UpdateCellRequest {
    UpdateCellRequest {
        new_value: new_value.into(),
        old_value: old_value.into(),
    }
}

/// Backend answering from a script and recording every PUT.
#[derive(Default)]
pub struct ScriptedApi {
    replies: RefCell<VecDeque<Result<CellWriteOutcome, TabularError>>>,
    sent: RefCell<Vec<(CellAddress, UpdateCellRequest)>>,
}

impl ScriptedApi {
    pub fn new(replies: Vec<Result<CellWriteOutcome, TabularError>>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            sent: RefCell::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<UpdateCellRequest> {
        self.sent.borrow().iter().map(|(_, req)| req.clone()).collect()
    }

    pub fn addresses(&self) -> Vec<CellAddress> {
        self.sent.borrow().iter().map(|(addr, _)| addr.clone()).collect()
    }
}

#[async_trait(?Send)]
impl CellApi for ScriptedApi {
    async fn put_cell(
        &self,
        address: &CellAddress,
        request: &UpdateCellRequest,
    ) -> Result<CellWriteOutcome, TabularError> {
        self.sent
            .borrow_mut()
            .push((address.clone(), request.clone()));
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TabularError::Transport("no scripted reply".to_string())))
    }
}

/// User answering conflict dialogs from a script.
#[derive(Default)]
pub struct ScriptedPrompt {
    answers: RefCell<VecDeque<Resolution>>,
    shown: RefCell<Vec<ConflictCandidates>>,
}

impl ScriptedPrompt {
    pub fn new(answers: Vec<Resolution>) -> Self {
        Self {
            answers: RefCell::new(answers.into()),
            shown: RefCell::new(Vec::new()),
        }
    }

    pub fn shown(&self) -> Vec<ConflictCandidates> {
        self.shown.borrow().clone()
    }
}

#[async_trait(?Send)]
impl ConflictPrompt for ScriptedPrompt {
    async fn choose(&self, _address: &CellAddress, candidates: &ConflictCandidates) -> Resolution {
        self.shown.borrow_mut().push(candidates.clone());
        self.answers
            .borrow_mut()
            .pop_front()
            .unwrap_or(Resolution::Cancelled)
    }
}

/// A cell without a page behind it.
pub struct MemoryCell {
    address: CellAddress,
    kind: CellKind,
    committed: RefCell<CellValue>,
    displayed: RefCell<CellValue>,
}

impl MemoryCell {
    pub fn new(kind: CellKind, committed: impl Into<CellValue>) -> Self {
        let committed = committed.into();
        Self {
            address: CellAddress::new("group", "12", "points"),
            kind,
            displayed: RefCell::new(committed.clone()),
            committed: RefCell::new(committed),
        }
    }

    pub fn text(committed: &str) -> Self {
        Self::new(CellKind::Text, committed)
    }

    pub fn checkbox(committed: bool) -> Self {
        let mut cell = Self::new(CellKind::Checkbox, committed);
        cell.address = CellAddress::new("group", "12", "cancelled");
        cell
    }

    /// Simulate the user typing without committing.
    pub fn type_value(&self, value: impl Into<CellValue>) {
        *self.displayed.borrow_mut() = value.into();
    }

    pub fn committed(&self) -> CellValue {
        self.committed.borrow().clone()
    }

    pub fn displayed(&self) -> CellValue {
        self.displayed.borrow().clone()
    }
}

impl EditableCell for MemoryCell {
    fn address(&self) -> &CellAddress {
        &self.address
    }

    fn kind(&self) -> CellKind {
        self.kind
    }

    fn committed_value(&self) -> CellValue {
        self.committed()
    }

    fn displayed_value(&self) -> CellValue {
        self.displayed()
    }

    fn commit(&self, value: &CellValue) -> Result<(), TabularError> {
        *self.committed.borrow_mut() = value.clone();
        *self.displayed.borrow_mut() = value.clone();
        Ok(())
    }
}
