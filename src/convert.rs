use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ConvertError;
use crate::markdown::MarkdownDocument;

const SUPPORTED_EXTENSIONS: &[&str] = &[".docx", ".xls", ".xlsx"];

/// Recognized input formats, each bound to an extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Spreadsheet,
    WordDocument,
}

impl Format {
    /// Resolve the format from the input's file extension,
    /// case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self, ConvertError> {
        let extension = normalize_extension(path);
        match extension.as_str() {
            ".xlsx" | ".xls" => Ok(Format::Spreadsheet),
            ".docx" => Ok(Format::WordDocument),
            _ => Err(ConvertError::UnsupportedFormat { extension }),
        }
    }

    fn extractor(self) -> Option<&'static dyn Extract> {
        match self {
            Format::Spreadsheet => {
                #[cfg(feature = "spreadsheet")]
                {
                    Some(&crate::spreadsheet::SpreadsheetExtractor)
                }
                #[cfg(not(feature = "spreadsheet"))]
                {
                    None
                }
            }
            Format::WordDocument => {
                #[cfg(feature = "word")]
                {
                    Some(&crate::word::WordExtractor)
                }
                #[cfg(not(feature = "word"))]
                {
                    None
                }
            }
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Spreadsheet => f.write_str("spreadsheet"),
            Format::WordDocument => f.write_str("word document"),
        }
    }
}

/// Capability interface binding a format to its reader.
pub trait Extract {
    fn extract(&self, path: &Path) -> Result<MarkdownDocument, ConvertError>;
}

pub fn supported_extensions() -> Vec<String> {
    let mut exts = SUPPORTED_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect::<Vec<_>>();
    exts.sort();
    exts
}

/// Convert the input document without writing anything, so callers can chain
/// the result into other pipelines in memory.
pub fn convert_path(input: &Path) -> Result<MarkdownDocument, ConvertError> {
    let format = Format::from_path(input)?;
    let extractor = format
        .extractor()
        .ok_or(ConvertError::DependencyMissing { format })?;
    info!("detected {format} input: {}", input.display());
    extractor.extract(input)
}

/// Convert the input document and write the joined Markdown to `target`
/// (default: the input path with its extension replaced by `.md`), creating
/// parent directories as needed. Returns the Markdown text as well.
pub fn convert_file(input: &Path, target: Option<&Path>) -> Result<String, ConvertError> {
    let document = convert_path(input)?;
    let output = match target {
        Some(path) => path.to_path_buf(),
        None => derive_output_path(input),
    };
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|err| ConvertError::write(&output, err))?;
            info!("created directory: {}", parent.display());
        }
    }
    let markdown = document.to_string();
    fs::write(&output, &markdown).map_err(|err| ConvertError::write(&output, err))?;
    info!("wrote markdown to {}", output.display());
    Ok(markdown)
}

fn derive_output_path(input: &Path) -> PathBuf {
    input.with_extension("md")
}

fn normalize_extension(path: &Path) -> String {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!(".{}", ext.to_lowercase()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{derive_output_path, supported_extensions, Format};
    use crate::error::ConvertError;
    use std::path::Path;

    #[test]
    fn extension_routing_is_case_insensitive() {
        assert_eq!(
            Format::from_path(Path::new("Report.XLSX")).expect("format"),
            Format::Spreadsheet
        );
        assert_eq!(
            Format::from_path(Path::new("data.xls")).expect("format"),
            Format::Spreadsheet
        );
        assert_eq!(
            Format::from_path(Path::new("notes.DocX")).expect("format"),
            Format::WordDocument
        );
    }

    #[test]
    fn unrecognized_extension_is_unsupported() {
        let err = Format::from_path(Path::new("report.pdf")).expect_err("pdf must not route");
        match err {
            ConvertError::UnsupportedFormat { extension } => assert_eq!(extension, ".pdf"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_extension_is_unsupported() {
        let err = Format::from_path(Path::new("report")).expect_err("no extension");
        assert!(matches!(
            err,
            ConvertError::UnsupportedFormat { extension } if extension.is_empty()
        ));
    }

    #[test]
    fn output_path_replaces_extension() {
        assert_eq!(
            derive_output_path(Path::new("report.xlsx")),
            Path::new("report.md")
        );
        assert_eq!(
            derive_output_path(Path::new("dir/notes.docx")),
            Path::new("dir/notes.md")
        );
    }

    #[test]
    fn supported_extensions_are_sorted() {
        let exts = supported_extensions();
        assert_eq!(exts, vec![".docx", ".xls", ".xlsx"]);
    }
}
