//! Browser tests for the DOM cell binding
//!
//! Run with: wasm-pack test --headless --firefox tabular-ui

#![cfg(target_arch = "wasm32")]

use std::rc::Rc;

use async_trait::async_trait;
use tabular_ui::{
    attach_tabulator, decorate, CellKind, ConflictCandidates, ConflictChoice, ConflictPrompt,
    DialogCopy, DomCell, DomConflictDialog, EditableCell, HttpCellApi, Resolution,
    TabularCellController, TabularConfig, DIALOG_CLASS,
};
use tracker_types::{CellAddress, CellValue};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

wasm_bindgen_test_configure!(run_in_browser);

const TABLE: &str = r#"
<table data-name="group">
  <tbody>
    <tr id="12">
      <td class="tabularcell" data-cell-name="name" data-current-value="Wolves">Wolves</td>
      <td><input type="checkbox" class="tabularcell" data-cell-name="cancelled" data-current-value="False" /></td>
      <td class="tabularcell">no column</td>
    </tr>
  </tbody>
  <tfoot>
    <tr>
      <td class="tabularcell" data-cell-name="name" data-current-value=""></td>
    </tr>
  </tfoot>
</table>
"#;

struct NeverAsked;

#[async_trait(?Send)]
impl ConflictPrompt for NeverAsked {
    async fn choose(&self, _address: &CellAddress, _candidates: &ConflictCandidates) -> Resolution {
        Resolution::Cancelled
    }
}

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn mount() -> Element {
    let document = document();
    let container = document.create_element("div").unwrap();
    container.set_inner_html(TABLE);
    document.body().unwrap().append_child(&container).unwrap();
    container
}

fn select(root: &Element, selector: &str) -> Element {
    root.query_selector(selector).unwrap().unwrap()
}

#[wasm_bindgen_test]
fn text_cell_resolves_address_from_page() {
    let root = mount();
    let cell = DomCell::from_element(select(&root, "td[data-cell-name=name]")).unwrap();

    assert_eq!(cell.kind(), CellKind::Text);
    assert_eq!(cell.address(), &CellAddress::new("group", "12", "name"));
    assert_eq!(cell.committed_value(), CellValue::text("Wolves"));
    assert_eq!(cell.displayed_value(), CellValue::text("Wolves"));
}

#[wasm_bindgen_test]
fn text_cell_commit_updates_attribute_and_text() {
    let root = mount();
    let element = select(&root, "td[data-cell-name=name]");
    let cell = DomCell::from_element(element.clone()).unwrap();

    cell.commit(&CellValue::Integer(42)).unwrap();

    assert_eq!(element.get_attribute("data-current-value").as_deref(), Some("42"));
    assert_eq!(element.text_content().as_deref(), Some("42"));
}

#[wasm_bindgen_test]
fn checkbox_cell_reads_and_commits_flag() {
    let root = mount();
    let element = select(&root, "input[data-cell-name=cancelled]");
    let cell = DomCell::from_element(element.clone()).unwrap();

    assert_eq!(cell.kind(), CellKind::Checkbox);
    assert_eq!(cell.committed_value(), CellValue::Bool(false));

    cell.commit(&CellValue::Bool(true)).unwrap();

    let input = element.dyn_into::<HtmlInputElement>().unwrap();
    assert!(input.checked());
    assert_eq!(input.get_attribute("data-current-value").as_deref(), Some("true"));
    assert_eq!(cell.displayed_value(), CellValue::Bool(true));
}

#[wasm_bindgen_test]
fn cell_without_column_name_is_rejected() {
    let root = mount();
    let element = select(&root, "td.tabularcell:not([data-cell-name])");

    assert!(DomCell::from_element(element).is_err());
}

#[wasm_bindgen_test]
fn decorate_attaches_body_cells_only() {
    let root = mount();
    let table = select(&root, "table");
    let config = TabularConfig::default();
    let controller = Rc::new(TabularCellController::new(
        &config,
        HttpCellApi::new(&config),
        NeverAsked,
    ));

    let attached = decorate(&table, controller).unwrap();

    assert_eq!(attached, 2);
    let body_cell = select(&root, "tbody td[data-cell-name=name]");
    assert_eq!(body_cell.get_attribute("contenteditable").as_deref(), Some("true"));
    let foot_cell = select(&root, "tfoot td");
    assert!(foot_cell.get_attribute("contenteditable").is_none());
}

#[wasm_bindgen_test]
fn attach_tabulator_decorates_table_by_id() {
    let root = mount();
    select(&root, "table").set_id("tabular-attach");

    let attached = attach_tabulator("tabular-attach", None, Some("de".to_string())).unwrap();

    assert_eq!(attached, 2);
    assert!(attach_tabulator("no-such-table", None, None).is_err());
}

fn click(selector: &str) {
    document()
        .query_selector(selector)
        .unwrap()
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap()
        .click();
}

fn candidates() -> ConflictCandidates {
    ConflictCandidates::new(CellValue::text("7"), CellValue::text("5"), CellValue::Integer(9))
}

#[wasm_bindgen_test]
async fn dialog_returns_checked_candidate_and_leaves_page() {
    let dialog = DomConflictDialog::new(document(), DialogCopy::default());
    let address = CellAddress::new("group", "12", "points");
    let candidates = candidates();

    let (resolution, ()) = futures::join!(dialog.choose(&address, &candidates), async {
        let current = format!(".{DIALOG_CLASS} input[value=\"2\"]");
        document()
            .query_selector(&current)
            .unwrap()
            .unwrap()
            .dyn_into::<HtmlInputElement>()
            .unwrap()
            .set_checked(true);
        click(&format!(".{DIALOG_CLASS} button"));
    });

    assert_eq!(resolution, Resolution::Selected(ConflictChoice::Current));
    assert!(document()
        .query_selector(&format!(".{DIALOG_CLASS}"))
        .unwrap()
        .is_none());
}

#[wasm_bindgen_test]
async fn dialog_cancel_leaves_page() {
    let dialog = DomConflictDialog::new(document(), DialogCopy::german());
    let address = CellAddress::new("group", "12", "points");
    let candidates = candidates();

    let (resolution, ()) = futures::join!(dialog.choose(&address, &candidates), async {
        let overlay = document()
            .query_selector(&format!(".{DIALOG_CLASS}"))
            .unwrap()
            .unwrap();
        assert_eq!(overlay.query_selector_all("input[type=radio]").unwrap().length(), 3);
        click(&format!(".{DIALOG_CLASS} button:last-of-type"));
    });

    assert_eq!(resolution, Resolution::Cancelled);
    assert!(document()
        .query_selector(&format!(".{DIALOG_CLASS}"))
        .unwrap()
        .is_none());
}
