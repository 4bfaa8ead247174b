//! Export numbering WASM bindings.
//!
//! The browser owns the target directory (File System Access API), so it
//! lists the existing names itself and asks for the filenames to write.
//!
//! ```typescript
//! const existing = [];
//! for await (const name of dirHandle.keys()) existing.push(name);
//! const names = plan_filenames(
//!   { base_name: "panel_", numbering_mode: "continue" }, existing, panels.length);
//! ```

use crate::types::to_js_error;
use panelcut_core::export::{
    next_number_from_names, resolve_start_number, sequence_filenames, ExportPlan, PlanError,
};
use wasm_bindgen::prelude::*;

/// Filenames for `count` panels under `plan`, given the names already in
/// the target directory.
///
/// `plan` is a partial export plan object; missing fields take their
/// defaults (base name "panel_", overwrite mode, start number 1). The
/// directory field is ignored.
#[wasm_bindgen]
pub fn plan_filenames(
    plan: JsValue,
    existing: Vec<String>,
    count: usize,
) -> Result<Vec<String>, JsValue> {
    let plan: ExportPlan = serde_wasm_bindgen::from_value(plan).map_err(to_js_error)?;
    filenames_for(&plan, &existing, count).map_err(to_js_error)
}

/// One past the highest `<base_name><NNN>.jpg` among `existing`.
#[wasm_bindgen]
pub fn next_sequence_number(base_name: &str, existing: Vec<String>) -> Option<u32> {
    next_number_from_names(base_name, &existing)
}

fn filenames_for(
    plan: &ExportPlan,
    existing: &[String],
    count: usize,
) -> Result<Vec<String>, PlanError> {
    plan.validate_fields()?;
    let start = resolve_start_number(plan, existing);
    Ok(sequence_filenames(&plan.base_name, start, count))
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_plan_filenames_from_object() {
        let plan = js_sys::Object::new();
        js_sys::Reflect::set(&plan, &"numbering_mode".into(), &"continue".into()).unwrap();

        let names = plan_filenames(plan.into(), vec!["panel_004.jpg".to_string()], 1).unwrap();
        assert_eq!(names, vec!["panel_005.jpg"]);
    }
}
