use crate::error::Result;
use crate::io::atomic_write;
use crate::scan::ScanResult;
use crate::todo::{FileTodos, FolderGroup, CHECKLIST_MARKER};
use std::path::Path;

/// Body written when a scan found nothing. Contains no headings.
pub const NO_TODOS_MARKER: &str = "No open todos.";

/// Render a scan result as one Markdown document.
///
/// Folders become `#` headings and notes `##` headings, both in name order.
/// Blocks are separated by exactly one blank line and the document ends with
/// a single newline.
pub fn render(result: &ScanResult) -> String {
    if result.is_empty() {
        return format!("{NO_TODOS_MARKER}\n");
    }
    result
        .folders()
        .map(render_folder)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_folder(group: &FolderGroup) -> String {
    let files = group.files().map(render_file).collect::<Vec<_>>().join("\n");
    format!("# {}\n{files}", group.name)
}

fn render_file(file: &FileTodos) -> String {
    let mut out = format!("## {}\n", file.file_name);
    for item in &file.items {
        out.push_str(CHECKLIST_MARKER);
        out.push(' ');
        out.push_str(item.as_str());
        out.push('\n');
    }
    out
}

/// Render `result` and atomically replace `output` with it.
pub fn write_todos(result: &ScanResult, output: &Path) -> Result<()> {
    let doc = render(result);
    atomic_write(output, doc.as_bytes())?;
    tracing::debug!(path = %output.display(), bytes = doc.len(), "wrote todo summary");
    Ok(())
}
