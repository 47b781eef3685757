use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use anyhow::{anyhow, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader as XmlReader;
use tracing::warn;
use zip::ZipArchive;

use crate::convert::Extract;
use crate::error::ConvertError;
use crate::markdown::{linkify_urls, render_table, MarkdownDocument};

pub struct WordExtractor;

impl Extract for WordExtractor {
    fn extract(&self, path: &Path) -> Result<MarkdownDocument, ConvertError> {
        document_to_markdown(path)
    }
}

#[derive(Debug, Default)]
struct WordDocument {
    paragraphs: Vec<Paragraph>,
    tables: Vec<Table>,
}

#[derive(Debug, Default)]
struct Paragraph {
    runs: Vec<Run>,
}

#[derive(Debug)]
struct Run {
    text: String,
    target: Option<String>,
}

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Vec<String>>,
}

impl Paragraph {
    fn flatten(&self) -> String {
        let mut text = String::new();
        for run in &self.runs {
            match &run.target {
                Some(url) => text.push_str(&format!("[{}]({url})", run.text)),
                None => text.push_str(&run.text),
            }
        }
        text
    }
}

/// Paragraph text first, then every table under a numbered heading. The two
/// passes follow the document's body model, not its interleaved order.
pub fn document_to_markdown(path: &Path) -> Result<MarkdownDocument, ConvertError> {
    let word = read_document(path).map_err(|err| ConvertError::read(path, err))?;
    let mut document = MarkdownDocument::default();
    for paragraph in &word.paragraphs {
        let text = linkify_urls(&paragraph.flatten());
        if !text.trim().is_empty() {
            document.push(text);
        }
    }
    for (index, table) in word.tables.iter().enumerate() {
        document.push(format!("\n### Table {}\n", index + 1));
        let Some((header, data)) = table.rows.split_first() else {
            warn!("table {} is empty", index + 1);
            continue;
        };
        for line in render_table(header, data) {
            document.push(line);
        }
    }
    Ok(document)
}

fn read_document(path: &Path) -> Result<WordDocument> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file).map_err(|err| anyhow!("invalid archive: {err}"))?;
    let links = match read_archive_entry(&mut archive, "word/_rels/document.xml.rels")? {
        Some(xml) => parse_relationships(&xml)?,
        None => HashMap::new(),
    };
    let xml = read_archive_entry(&mut archive, "word/document.xml")?
        .ok_or_else(|| anyhow!("missing word/document.xml"))?;
    parse_body(&xml, &links)
}

fn read_archive_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(err) => return Err(anyhow!("invalid archive: {err}")),
    };
    let mut buffer = Vec::new();
    entry.read_to_end(&mut buffer)?;
    Ok(Some(String::from_utf8_lossy(&buffer).to_string()))
}

/// Relationship id to target map from the document's rels part. Hyperlink
/// targets live here, keyed by the `r:id` the body refers to.
fn parse_relationships(xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = XmlReader::from_str(xml);
    let mut buf = Vec::new();
    let mut targets = HashMap::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let name = e.name();
                if local_name(name.as_ref()) == b"Relationship" {
                    let id = attr_value(&reader, e, b"Id");
                    let target = attr_value(&reader, e, b"Target");
                    if let (Some(id), Some(target)) = (id, target) {
                        targets.insert(id, target);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(anyhow!("relationship parse failed: {err}")),
            _ => {}
        }
        buf.clear();
    }
    Ok(targets)
}

fn parse_body(xml: &str, links: &HashMap<String, String>) -> Result<WordDocument> {
    let mut reader = XmlReader::from_str(xml);
    let mut buf = Vec::new();
    let mut document = WordDocument::default();

    let mut table_depth = 0usize;
    let mut in_text = false;
    let mut in_cell = false;
    let mut link_target: Option<String> = None;

    let mut paragraph = Paragraph::default();
    let mut cell = String::new();
    let mut row: Vec<String> = Vec::new();
    let mut table = Table::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"tbl" => {
                        table_depth += 1;
                        if table_depth == 1 {
                            table = Table::default();
                        }
                    }
                    b"tr" if table_depth == 1 => row = Vec::new(),
                    b"tc" if table_depth == 1 => {
                        in_cell = true;
                        cell.clear();
                    }
                    b"p" if table_depth == 0 => paragraph = Paragraph::default(),
                    b"hyperlink" if table_depth == 0 => {
                        link_target =
                            attr_value(&reader, e, b"id").and_then(|id| links.get(&id).cloned());
                    }
                    b"t" => in_text = true,
                    b"tab" => append_text(&mut paragraph, &mut cell, in_cell, table_depth, "\t"),
                    b"br" => append_text(&mut paragraph, &mut cell, in_cell, table_depth, "\n"),
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"tab" => append_text(&mut paragraph, &mut cell, in_cell, table_depth, "\t"),
                    b"br" => append_text(&mut paragraph, &mut cell, in_cell, table_depth, "\n"),
                    _ => {}
                }
            }
            Ok(Event::Text(e)) => {
                if in_text {
                    let text = e
                        .unescape()
                        .map_err(|err| anyhow!("document parse failed: {err}"))?;
                    if in_cell {
                        cell.push_str(text.as_ref());
                    } else if table_depth == 0 {
                        paragraph.runs.push(Run {
                            text: text.into_owned(),
                            target: link_target.clone(),
                        });
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"t" => in_text = false,
                    b"hyperlink" => link_target = None,
                    b"p" => {
                        if in_cell {
                            if !cell.is_empty() && !cell.ends_with('\n') {
                                cell.push('\n');
                            }
                        } else if table_depth == 0 {
                            document.paragraphs.push(std::mem::take(&mut paragraph));
                        }
                    }
                    b"tc" if table_depth == 1 => {
                        if in_cell {
                            in_cell = false;
                            row.push(cell.trim().to_string());
                        }
                    }
                    b"tr" if table_depth == 1 => table.rows.push(std::mem::take(&mut row)),
                    b"tbl" => {
                        table_depth = table_depth.saturating_sub(1);
                        if table_depth == 0 {
                            document.tables.push(std::mem::take(&mut table));
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(anyhow!("document parse failed: {err}")),
            _ => {}
        }
        buf.clear();
    }

    Ok(document)
}

fn append_text(
    paragraph: &mut Paragraph,
    cell: &mut String,
    in_cell: bool,
    table_depth: usize,
    text: &str,
) {
    if in_cell {
        cell.push_str(text);
    } else if table_depth == 0 {
        paragraph.runs.push(Run {
            text: text.to_string(),
            target: None,
        });
    }
}

fn split_tag_name(name: &[u8]) -> (Option<&[u8]>, &[u8]) {
    if let Some(idx) = name.iter().position(|b| *b == b':') {
        (Some(&name[..idx]), &name[idx + 1..])
    } else {
        (None, name)
    }
}

fn local_name(name: &[u8]) -> &[u8] {
    split_tag_name(name).1
}

fn attr_value<B: std::io::BufRead>(
    reader: &XmlReader<B>,
    element: &BytesStart,
    key: &[u8],
) -> Option<String> {
    for attr in element.attributes().with_checks(false) {
        let attr = attr.ok()?;
        let (_, local) = split_tag_name(attr.key.as_ref());
        if local == key {
            if let Ok(value) = attr.decode_and_unescape_value(reader) {
                return Some(value.into_owned());
            }
        }
    }
    None
}
