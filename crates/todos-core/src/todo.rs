use serde::Serialize;
use std::collections::BTreeMap;

/// The literal prefix of an unchecked checklist item.
pub const CHECKLIST_MARKER: &str = "* [ ]";

// ---------------------------------------------------------------------------
// TodoItem
// ---------------------------------------------------------------------------

/// Text of one open checklist item, trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TodoItem(String);

impl TodoItem {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TodoItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a single line, returning the todo text if it is an open checklist item.
///
/// Leading whitespace is ignored. The marker must be followed by whitespace or
/// the end of the line, so `* [ ]task` and `* [x] done` are rejected.
pub fn parse_line(line: &str) -> Option<TodoItem> {
    let rest = line.trim_start().strip_prefix(CHECKLIST_MARKER)?;
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let text = rest.trim();
    if text.is_empty() {
        return None;
    }
    Some(TodoItem(text.to_string()))
}

/// Extract all open todos from a note, top to bottom.
pub fn extract_todos(content: &str) -> Vec<TodoItem> {
    content.lines().filter_map(parse_line).collect()
}

// ---------------------------------------------------------------------------
// FileTodos / FolderGroup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileTodos {
    pub file_name: String,
    pub items: Vec<TodoItem>,
}

impl FileTodos {
    /// Returns `None` when the note has no open items.
    pub fn from_content(file_name: impl Into<String>, content: &str) -> Option<Self> {
        let items = extract_todos(content);
        if items.is_empty() {
            return None;
        }
        Some(Self {
            file_name: file_name.into(),
            items,
        })
    }
}

/// A folder's notes, keyed and ordered by file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderGroup {
    pub name: String,
    files: BTreeMap<String, FileTodos>,
}

impl FolderGroup {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, file: FileTodos) {
        self.files.insert(file.file_name.clone(), file);
    }

    pub fn files(&self) -> impl Iterator<Item = &FileTodos> {
        self.files.values()
    }

    pub fn file(&self, file_name: &str) -> Option<&FileTodos> {
        self.files.get(file_name)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn todo_count(&self) -> usize {
        self.files.values().map(|f| f.items.len()).sum()
    }
}
