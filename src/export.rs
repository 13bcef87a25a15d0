//! CSV export of a solved placement.
//!
//! Native builds go through a save dialog and `csv::Writer`; wasm builds
//! build the same records into a Blob download. Only a finished result is
//! exported, never search state.

use std::error::Error;

/// One record per queen: the rank number and the square in algebraic
/// notation (file from the column, rank from the row).
pub fn solution_records(cols: &[usize]) -> Vec<(String, String)> {
    cols.iter()
        .enumerate()
        .map(|(row, &col)| {
            let file = (b'a' + col as u8) as char;
            ((row + 1).to_string(), format!("{}{}", file, row + 1))
        })
        .collect()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn export_solution(n: usize, cols: &[usize]) -> Result<(), Box<dyn Error>> {
    let Some(path) = rfd::FileDialog::new()
        .add_filter("CSV", &["csv"])
        .set_file_name(format!("nqueens_{n}.csv"))
        .save_file()
    else {
        // Dialog dismissed; nothing to write.
        return Ok(());
    };

    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["Row", "Square"])?;
    for (row, square) in solution_records(cols) {
        wtr.write_record([row, square])?;
    }
    wtr.flush()?;
    log::info!("exported {n}-queens solution to csv");
    Ok(())
}

#[cfg(target_arch = "wasm32")]
pub fn export_solution(n: usize, cols: &[usize]) -> Result<(), Box<dyn Error>> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::JsValue;

    let mut csv_content = String::from("Row,Square\n");
    for (row, square) in solution_records(cols) {
        csv_content.push_str(&format!("{row},{square}\n"));
    }

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let parts = js_sys::Array::of1(&JsValue::from_str(&csv_content));
    let blob = web_sys::Blob::new_with_str_sequence_and_options(
        &parts,
        web_sys::BlobPropertyBag::new().type_("text/csv"),
    )
    .map_err(js_err)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(js_err)?;
    let anchor = document
        .create_element("a")
        .map_err(js_err)?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|_| "created element is not an anchor")?;
    anchor.set_href(&url);
    anchor.set_download(&format!("nqueens_{n}.csv"));
    anchor.click();
    web_sys::Url::revoke_object_url(&url).map_err(js_err)?;
    log::info!("exported {n}-queens solution to csv");
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn js_err(value: wasm_bindgen::JsValue) -> Box<dyn Error> {
    format!("{value:?}").into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_use_algebraic_notation() {
        let records = solution_records(&[1, 3, 0, 2]);
        assert_eq!(records.len(), 4);
        assert_eq!(records[0], ("1".to_string(), "b1".to_string()));
        assert_eq!(records[1], ("2".to_string(), "d2".to_string()));
        assert_eq!(records[2], ("3".to_string(), "a3".to_string()));
        assert_eq!(records[3], ("4".to_string(), "c4".to_string()));
    }

    #[test]
    fn empty_solution_yields_no_records() {
        assert!(solution_records(&[]).is_empty());
    }
}
