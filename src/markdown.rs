use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Ordered Markdown blocks; the final artifact is the blocks joined by
/// newlines. Heading blocks carry their own surrounding blank lines so the
/// join stays a plain `\n`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkdownDocument {
    blocks: Vec<String>,
}

impl MarkdownDocument {
    pub fn push(&mut self, block: impl Into<String>) {
        self.blocks.push(block.into());
    }

    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl fmt::Display for MarkdownDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.blocks.join("\n"))
    }
}

fn url_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://[\w\-./?%&=#:]+").expect("url pattern"))
}

/// Rewrite every bare http(s) URL in `text` as a `[url](url)` Markdown link.
/// Matching is purely lexical: URLs already inside link constructs are
/// rewritten too.
pub fn linkify_urls(text: &str) -> String {
    url_pattern()
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let url = &caps[0];
            format!("[{url}]({url})")
        })
        .into_owned()
}

/// Render a pipe-table: header line, separator line with one `---` per
/// header column, then one line per data row. Cell text is emitted as-is; a
/// literal `|` inside a cell will split the rendered column.
pub fn render_table(header: &[String], rows: &[Vec<String>]) -> Vec<String> {
    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(header));
    lines.push(format!("| {} |", vec!["---"; header.len()].join(" | ")));
    for row in rows {
        lines.push(format_row(row));
    }
    lines
}

fn format_row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}
