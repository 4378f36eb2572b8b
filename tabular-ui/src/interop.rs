use std::rc::Rc;

use tracker_types::DEFAULT_TABULAR_PREFIX;
use wasm_bindgen::prelude::*;

use crate::api::HttpCellApi;
use crate::config::TabularConfig;
use crate::conflict::DialogCopy;
use crate::controller::TabularCellController;
use crate::dialog::DomConflictDialog;
use crate::dom::decorate;

pub type DomTabulator = TabularCellController<HttpCellApi, DomConflictDialog>;

/// Attach the inline editor to the table with id `table_id`.
///
/// `prefix` defaults to `/manage`; `locale` `"de"` switches the conflict
/// dialog to German. Returns the number of cells made editable.
#[wasm_bindgen(js_name = attachTabulator)]
pub fn attach_tabulator(
    table_id: &str,
    prefix: Option<String>,
    locale: Option<String>,
) -> Result<u32, JsValue> {
    let mut config =
        TabularConfig::from_location(prefix.unwrap_or_else(|| DEFAULT_TABULAR_PREFIX.to_string()));
    if locale.as_deref() == Some("de") {
        config.dialog = DialogCopy::german();
    }

    // Initialize logging for WASM; a second table on the page reuses it.
    dioxus_logger::init(config.log_level).ok();

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document unavailable"))?;
    let table = document
        .get_element_by_id(table_id)
        .ok_or_else(|| JsValue::from_str(&format!("no table with id '{table_id}'")))?;

    let controller: Rc<DomTabulator> = Rc::new(TabularCellController::new(
        &config,
        HttpCellApi::new(&config),
        DomConflictDialog::new(document, config.dialog.clone()),
    ));

    let attached = decorate(&table, controller).map_err(|e| JsValue::from_str(&e.to_string()))?;
    tracing::info!(table_id, attached, "Tabulator attached");
    Ok(attached as u32)
}
