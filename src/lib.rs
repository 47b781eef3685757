// Library entrypoint for the converter core and integration tests.
mod convert;
mod error;
mod markdown;
#[cfg(feature = "spreadsheet")]
mod spreadsheet;
#[cfg(feature = "word")]
mod word;

pub use convert::{convert_file, convert_path, supported_extensions, Extract, Format};
pub use error::ConvertError;
pub use markdown::{linkify_urls, render_table, MarkdownDocument};
#[cfg(feature = "spreadsheet")]
pub use spreadsheet::{workbook_to_markdown, SpreadsheetExtractor};
#[cfg(feature = "word")]
pub use word::{document_to_markdown, WordExtractor};
