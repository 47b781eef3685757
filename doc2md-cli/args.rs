use clap::Parser;
use std::path::PathBuf;

/// Convert an Excel workbook or Word document into Markdown.
/// 将 Excel 或 Word 文档内容转换为 Markdown 格式。
#[derive(Debug, Parser)]
#[command(author, version, bin_name = "doc2md")]
pub struct Cli {
    /// Source document path (Excel or Word file) / 源文档路径（Excel 或 Word 文件）。
    #[arg(long, short = 's')]
    pub source: PathBuf,

    /// Target Markdown file path, derived from the source when omitted / 目标 Markdown 文件路径（可选）。
    #[arg(long, short = 't')]
    pub target: Option<PathBuf>,
}
