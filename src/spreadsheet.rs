use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::{debug, warn};

use crate::convert::Extract;
use crate::error::ConvertError;
use crate::markdown::{render_table, MarkdownDocument};

pub struct SpreadsheetExtractor;

impl Extract for SpreadsheetExtractor {
    fn extract(&self, path: &Path) -> Result<MarkdownDocument, ConvertError> {
        workbook_to_markdown(path)
    }
}

/// One `## <sheet>` section per sheet, in file order. The first row of a
/// sheet is its header; a sheet without data rows keeps its heading and
/// contributes no table. Any open or read failure aborts the whole
/// extraction.
pub fn workbook_to_markdown(path: &Path) -> Result<MarkdownDocument, ConvertError> {
    let mut workbook = open_workbook_auto(path).map_err(|err| ConvertError::read(path, err))?;
    let sheet_names = workbook.sheet_names().to_owned();
    let mut document = MarkdownDocument::default();
    for name in sheet_names {
        debug!("reading sheet: {name}");
        let range = workbook
            .worksheet_range(&name)
            .map_err(|err| ConvertError::read(path, err))?;
        document.push(format!("\n## {name}\n"));
        let mut rows = range.rows();
        let header: Vec<String> = match rows.next() {
            Some(cells) => cells.iter().map(cell_text).collect(),
            None => {
                warn!("sheet {name} is empty");
                continue;
            }
        };
        let data: Vec<Vec<String>> = rows
            .map(|row| row.iter().map(cell_text).collect())
            .collect();
        if data.is_empty() {
            warn!("sheet {name} is empty");
            continue;
        }
        for line in render_table(&header, &data) {
            document.push(line);
        }
    }
    Ok(document)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.clone(),
        other => other.to_string(),
    }
}
