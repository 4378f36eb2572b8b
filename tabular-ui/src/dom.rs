//! Binding of server-rendered `.tabularcell` elements to the controller.
//!
//! The page provides the addressing: `data-name` on the table, `id` on each
//! row, `data-cell-name` and `data-current-value` on each cell.

use std::rc::Rc;

use tracker_types::{CellAddress, CellValue};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, HtmlInputElement};

use crate::api::CellApi;
use crate::cell::{CellKind, EditableCell};
use crate::conflict::ConflictPrompt;
use crate::controller::TabularCellController;
use crate::error::TabularError;

pub const TABLE_NAME_ATTR: &str = "data-name";
pub const CELL_NAME_ATTR: &str = "data-cell-name";
pub const CURRENT_VALUE_ATTR: &str = "data-current-value";
pub const CELL_SELECTOR: &str = "tbody .tabularcell";

#[derive(Debug, Clone)]
pub struct DomCell {
    element: Element,
    kind: CellKind,
    address: CellAddress,
}

impl DomCell {
    pub fn from_element(element: Element) -> Result<Self, TabularError> {
        let kind = kind_of(&element).ok_or_else(|| {
            TabularError::Dom(format!(
                "unsupported tabular cell <{}>",
                element.tag_name().to_lowercase()
            ))
        })?;
        let column = element
            .get_attribute(CELL_NAME_ATTR)
            .ok_or_else(|| TabularError::Dom(format!("cell has no {CELL_NAME_ATTR}")))?;
        let row = element
            .closest("tr")?
            .ok_or_else(|| TabularError::Dom("cell is not inside a row".to_string()))?;
        let table = element
            .closest("table")?
            .and_then(|t| t.get_attribute(TABLE_NAME_ATTR))
            .ok_or_else(|| TabularError::Dom(format!("table has no {TABLE_NAME_ATTR}")))?;

        Ok(Self {
            address: CellAddress::new(table, row.id(), column),
            element,
            kind,
        })
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    fn input(&self) -> Option<&HtmlInputElement> {
        self.element.dyn_ref::<HtmlInputElement>()
    }
}

fn kind_of(element: &Element) -> Option<CellKind> {
    match element.tag_name().as_str() {
        "TD" => Some(CellKind::Text),
        "INPUT" => element
            .dyn_ref::<HtmlInputElement>()
            .filter(|input| input.type_() == "checkbox")
            .map(|_| CellKind::Checkbox),
        _ => None,
    }
}

impl EditableCell for DomCell {
    fn address(&self) -> &CellAddress {
        &self.address
    }

    fn kind(&self) -> CellKind {
        self.kind
    }

    fn committed_value(&self) -> CellValue {
        let raw = self.element.get_attribute(CURRENT_VALUE_ATTR).unwrap_or_default();
        self.kind.parse_committed(&raw)
    }

    fn displayed_value(&self) -> CellValue {
        match self.kind {
            CellKind::Text => CellValue::Text(self.element.text_content().unwrap_or_default()),
            CellKind::Checkbox => CellValue::Bool(self.input().is_some_and(|i| i.checked())),
        }
    }

    fn commit(&self, value: &CellValue) -> Result<(), TabularError> {
        self.element
            .set_attribute(CURRENT_VALUE_ATTR, &self.kind.render(value))?;
        match self.kind {
            CellKind::Text => self.element.set_text_content(Some(&value.to_string())),
            CellKind::Checkbox => {
                if let Some(input) = self.input() {
                    input.set_checked(value.as_flag());
                }
            }
        }
        Ok(())
    }
}

/// Make every cell in the table body editable and route its edits through
/// `controller`. Returns how many cells were attached.
pub fn decorate<A, P>(
    table: &Element,
    controller: Rc<TabularCellController<A, P>>,
) -> Result<usize, TabularError>
where
    A: CellApi + 'static,
    P: ConflictPrompt + 'static,
{
    let nodes = table.query_selector_all(CELL_SELECTOR)?;
    let mut attached = 0;

    for index in 0..nodes.length() {
        let Some(element) = nodes.item(index).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let cell = match DomCell::from_element(element) {
            Ok(cell) => cell,
            Err(e) => {
                tracing::warn!("Skipping tabular cell: {e}");
                continue;
            }
        };

        if cell.kind() == CellKind::Text {
            cell.element().set_attribute("contenteditable", "true")?;
        }
        attach_listener(cell, controller.clone())?;
        attached += 1;
    }

    tracing::debug!(
        table = %table.get_attribute(TABLE_NAME_ATTR).unwrap_or_default(),
        attached,
        "Decorated tabular cells"
    );
    Ok(attached)
}

fn attach_listener<A, P>(
    cell: DomCell,
    controller: Rc<TabularCellController<A, P>>,
) -> Result<(), TabularError>
where
    A: CellApi + 'static,
    P: ConflictPrompt + 'static,
{
    let target = cell.element().clone();
    let event_type = cell.kind().event_type();

    let listener = Closure::wrap(Box::new(move |_event: Event| {
        let cell = cell.clone();
        let controller = controller.clone();
        spawn_local(async move {
            controller.submit_displayed(&cell).await;
        });
    }) as Box<dyn FnMut(Event)>);

    target.add_event_listener_with_callback(event_type, listener.as_ref().unchecked_ref())?;

    // Leak the closure; cells live as long as the page.
    listener.forget();
    Ok(())
}
