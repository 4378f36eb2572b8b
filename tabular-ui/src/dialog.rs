use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use tracker_types::CellAddress;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlInputElement};

use crate::conflict::{ConflictCandidates, ConflictChoice, ConflictPrompt, DialogCopy, Resolution};
use crate::error::TabularError;

pub const DIALOG_CLASS: &str = "tabular-conflict-dialog";

/// Modal conflict dialog built from plain DOM nodes.
///
/// Candidate values are inserted as text, never as markup.
pub struct DomConflictDialog {
    document: Document,
    copy: DialogCopy,
}

impl DomConflictDialog {
    pub fn new(document: Document, copy: DialogCopy) -> Self {
        Self { document, copy }
    }

    fn element(&self, tag: &str, text: Option<&str>) -> Result<Element, TabularError> {
        let element = self.document.create_element(tag)?;
        if let Some(text) = text {
            element.set_text_content(Some(text));
        }
        Ok(element)
    }

    fn radio(&self, group: &str, choice: ConflictChoice, checked: bool) -> Result<HtmlInputElement, TabularError> {
        let input = self
            .document
            .create_element("input")?
            .dyn_into::<HtmlInputElement>()
            .map_err(|_| TabularError::Dom("created input is not an HtmlInputElement".to_string()))?;
        input.set_type("radio");
        input.set_name(group);
        input.set_value(&choice.index().to_string());
        input.set_checked(checked);
        Ok(input)
    }

    async fn show(
        &self,
        address: &CellAddress,
        candidates: &ConflictCandidates,
    ) -> Result<Resolution, TabularError> {
        let body = self
            .document
            .body()
            .ok_or_else(|| TabularError::Dom("document has no body".to_string()))?;

        let overlay = self.element("div", None)?;
        overlay.set_class_name(DIALOG_CLASS);
        overlay.set_attribute("role", "dialog")?;
        overlay.append_child(&self.element("h3", Some(&self.copy.title))?)?;
        overlay.append_child(&self.element("p", Some(&self.copy.intro))?)?;

        let group = format!("selected-value-{address}");
        let mut inputs = Vec::with_capacity(3);
        for (choice, value) in candidates.iter() {
            let row = self.element("label", None)?;
            let input = self.radio(&group, choice, choice == candidates.default_choice())?;
            row.append_child(&input)?;
            row.append_child(&self.element("strong", Some(self.copy.label(choice)))?)?;
            row.append_child(&self.element("span", Some(&format!(" {value}")))?)?;
            overlay.append_child(&row)?;
            overlay.append_child(&self.element("br", None)?)?;
            inputs.push(input);
        }

        let confirm = self.element("button", Some(&self.copy.confirm))?;
        let cancel = self.element("button", Some(&self.copy.cancel))?;
        overlay.append_child(&confirm)?;
        overlay.append_child(&cancel)?;

        let (tx, rx) = oneshot::channel::<Resolution>();
        let tx = Rc::new(RefCell::new(Some(tx)));

        let on_confirm = {
            let tx = tx.clone();
            Closure::wrap(Box::new(move |_event: Event| {
                let selected = inputs
                    .iter()
                    .position(|input| input.checked())
                    .and_then(ConflictChoice::from_index);
                let resolution = match selected {
                    Some(choice) => Resolution::Selected(choice),
                    None => {
                        tracing::error!("No value received for conflict resolution");
                        Resolution::Cancelled
                    }
                };
                if let Some(tx) = tx.borrow_mut().take() {
                    let _ = tx.send(resolution);
                }
            }) as Box<dyn FnMut(Event)>)
        };
        let on_cancel = Closure::wrap(Box::new(move |_event: Event| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(Resolution::Cancelled);
            }
        }) as Box<dyn FnMut(Event)>);

        confirm.add_event_listener_with_callback("click", on_confirm.as_ref().unchecked_ref())?;
        cancel.add_event_listener_with_callback("click", on_cancel.as_ref().unchecked_ref())?;

        // Only a fully wired overlay reaches the page.
        body.append_child(&overlay)?;

        let resolution = rx.await.unwrap_or(Resolution::Cancelled);

        // Detach before the closures drop at the end of scope.
        overlay.remove();
        Ok(resolution)
    }
}

#[async_trait(?Send)]
impl ConflictPrompt for DomConflictDialog {
    async fn choose(&self, address: &CellAddress, candidates: &ConflictCandidates) -> Resolution {
        match self.show(address, candidates).await {
            Ok(resolution) => resolution,
            Err(e) => {
                tracing::error!(cell = %address, "Failed to show conflict dialog: {e}");
                Resolution::Cancelled
            }
        }
    }
}
