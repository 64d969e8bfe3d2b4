//! Walks a notes tree and collects open todos per folder and file.

use crate::config::{ScanOptions, FALLBACK_ROOT_LABEL, MARKDOWN_EXTENSION};
use crate::error::{Result, RootProblem, TodosError};
use crate::todo::{FileTodos, FolderGroup};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// ---------------------------------------------------------------------------
// FileReadWarning
// ---------------------------------------------------------------------------

/// A note (or directory entry) that could not be read. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReadWarning {
    pub path: PathBuf,
    pub reason: String,
}

impl fmt::Display for FileReadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not read {}: {}", self.path.display(), self.reason)
    }
}

// ---------------------------------------------------------------------------
// ScanResult
// ---------------------------------------------------------------------------

/// Where a folder group comes from. Notes directly in the root keep their own
/// key so a subfolder sharing the root label never merges with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum FolderOrigin {
    Root,
    Subfolder,
}

type FolderKey = (String, FolderOrigin);

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanResult {
    #[serde(serialize_with = "serialize_folders")]
    folders: BTreeMap<FolderKey, FolderGroup>,
    /// Notes successfully read, with or without open todos.
    pub files_scanned: usize,
    pub warnings: Vec<FileReadWarning>,
}

impl ScanResult {
    /// Folder groups in lexicographic order of their display name. A root
    /// group sorts before a subfolder group with the same name.
    pub fn folders(&self) -> impl Iterator<Item = &FolderGroup> {
        self.folders.values()
    }

    /// The subfolder group with display name `name`, falling back to the root
    /// group when no subfolder has that name.
    pub fn folder(&self, name: &str) -> Option<&FolderGroup> {
        self.folders
            .get(&(name.to_string(), FolderOrigin::Subfolder))
            .or_else(|| self.folders.get(&(name.to_string(), FolderOrigin::Root)))
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    pub fn files_with_todos(&self) -> usize {
        self.folders.values().map(FolderGroup::file_count).sum()
    }

    pub fn total_todos(&self) -> usize {
        self.folders.values().map(FolderGroup::todo_count).sum()
    }

    fn add(&mut self, key: FolderKey, file: FileTodos) {
        let name = key.0.clone();
        self.folders
            .entry(key)
            .or_insert_with(|| FolderGroup::new(name))
            .insert(file);
    }

    fn warn(&mut self, path: PathBuf, reason: String) {
        let warning = FileReadWarning { path, reason };
        tracing::debug!(
            path = %warning.path.display(),
            reason = %warning.reason,
            "skipping unreadable entry"
        );
        self.warnings.push(warning);
    }
}

// ---------------------------------------------------------------------------
// scan
// ---------------------------------------------------------------------------

/// Scan `root` recursively for Markdown notes and collect their open todos.
///
/// Fails only if `root` is not a readable directory. Unreadable notes,
/// undecodable notes and broken directory entries become warnings.
pub fn scan(root: &Path, options: &ScanOptions) -> Result<ScanResult> {
    validate_root(root)?;
    let root_label = resolve_root_label(root, options);
    tracing::debug!(root = %root.display(), %root_label, "scanning notes");

    let mut result = ScanResult::default();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                result.warn(path, err.to_string());
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.path();
        if !file_name.ends_with(MARKDOWN_EXTENSION) || options.is_excluded(path) {
            continue;
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(err) => {
                result.warn(path.to_path_buf(), err.to_string());
                continue;
            }
        };
        result.files_scanned += 1;

        let Some(file) = FileTodos::from_content(file_name, &content) else {
            continue;
        };
        tracing::debug!(path = %path.display(), todos = file.items.len(), "found open todos");
        result.add(folder_key(root, path, &root_label), file);
    }

    Ok(result)
}

fn validate_root(root: &Path) -> Result<()> {
    let invalid = |reason| TodosError::InvalidRoot {
        path: root.to_path_buf(),
        reason,
    };
    let meta = std::fs::metadata(root).map_err(|e| invalid(RootProblem::from_io(&e)))?;
    if !meta.is_dir() {
        return Err(invalid(RootProblem::NotADirectory));
    }
    std::fs::read_dir(root).map_err(|e| invalid(RootProblem::from_io(&e)))?;
    Ok(())
}

fn resolve_root_label(root: &Path, options: &ScanOptions) -> String {
    if let Some(label) = &options.root_label {
        return label.clone();
    }
    std::fs::canonicalize(root)
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| FALLBACK_ROOT_LABEL.to_string())
}

/// Key of the folder holding `path`: its parent relative to `root`,
/// `/`-separated, or the root label for notes directly in the root.
fn folder_key(root: &Path, path: &Path, root_label: &str) -> FolderKey {
    match path.parent().and_then(|p| p.strip_prefix(root).ok()) {
        Some(rel) if !rel.as_os_str().is_empty() => {
            let name = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            (name, FolderOrigin::Subfolder)
        }
        _ => (root_label.to_string(), FolderOrigin::Root),
    }
}

fn serialize_folders<S: Serializer>(
    folders: &BTreeMap<FolderKey, FolderGroup>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_seq(folders.values())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, rel: &str, content: &str) {
        let path = dir.path().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn todos(result: &ScanResult, folder: &str, file: &str) -> Vec<String> {
        result
            .folder(folder)
            .and_then(|g| g.file(file))
            .map(|f| f.items.iter().map(|t| t.to_string()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn extracts_open_items_per_folder_and_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "notes/work.md", "* [ ] Call Bob\n* [x] Done thing\n");

        let result = scan(dir.path(), &ScanOptions::new()).unwrap();
        assert_eq!(todos(&result, "notes", "work.md"), vec!["Call Bob"]);
        assert_eq!(result.files_scanned, 1);
        assert_eq!(result.files_with_todos(), 1);
        assert_eq!(result.total_todos(), 1);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn folders_are_sorted_by_name() {
        let dir = TempDir::new().unwrap();
        write(&dir, "zulu/a.md", "* [ ] z\n");
        write(&dir, "alpha/b.md", "* [ ] a\n");

        let result = scan(dir.path(), &ScanOptions::new()).unwrap();
        let names: Vec<&str> = result.folders().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zulu"]);
    }

    #[test]
    fn notes_without_open_items_are_dropped() {
        let dir = TempDir::new().unwrap();
        write(&dir, "notes/done.md", "* [x] finished\n- [ ] wrong marker\n");
        write(&dir, "other/plain.md", "just prose\n");

        let result = scan(dir.path(), &ScanOptions::new()).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.files_scanned, 2);
        assert_eq!(result.total_todos(), 0);
    }

    #[test]
    fn only_lowercase_md_extension_is_scanned() {
        let dir = TempDir::new().unwrap();
        write(&dir, "notes/a.md", "* [ ] yes\n");
        write(&dir, "notes/b.MD", "* [ ] no\n");
        write(&dir, "notes/c.txt", "* [ ] no\n");
        write(&dir, "notes/d.markdown", "* [ ] no\n");

        let result = scan(dir.path(), &ScanOptions::new()).unwrap();
        assert_eq!(result.files_scanned, 1);
        assert_eq!(result.total_todos(), 1);
    }

    #[test]
    fn nested_folders_use_relative_path() {
        let dir = TempDir::new().unwrap();
        write(&dir, "projects/alpha/plan.md", "* [ ] ship it\n");

        let result = scan(dir.path(), &ScanOptions::new()).unwrap();
        assert_eq!(todos(&result, "projects/alpha", "plan.md"), vec!["ship it"]);
    }

    #[test]
    fn root_notes_use_root_directory_name() {
        let dir = TempDir::new().unwrap();
        write(&dir, "inbox.md", "* [ ] triage\n");
        let expected = std::fs::canonicalize(dir.path())
            .unwrap()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();

        let result = scan(dir.path(), &ScanOptions::new()).unwrap();
        assert_eq!(todos(&result, &expected, "inbox.md"), vec!["triage"]);
    }

    #[test]
    fn root_label_override() {
        let dir = TempDir::new().unwrap();
        write(&dir, "inbox.md", "* [ ] triage\n");

        let opts = ScanOptions::new().with_root_label("Inbox");
        let result = scan(dir.path(), &opts).unwrap();
        assert_eq!(todos(&result, "Inbox", "inbox.md"), vec!["triage"]);
    }

    #[test]
    fn excluded_path_is_skipped_but_same_name_elsewhere_is_read() {
        let dir = TempDir::new().unwrap();
        write(&dir, "open_todos.md", "# x\n## y.md\n* [ ] old output\n");
        write(&dir, "notes/open_todos.md", "* [ ] kept\n");
        write(&dir, "notes/real.md", "* [ ] real\n");

        let opts = ScanOptions::new().exclude(dir.path().join("open_todos.md"));
        let result = scan(dir.path(), &opts).unwrap();
        assert_eq!(result.total_todos(), 2);
        assert_eq!(result.files_scanned, 2);
        assert_eq!(todos(&result, "notes", "open_todos.md"), vec!["kept"]);
        assert_eq!(todos(&result, "notes", "real.md"), vec!["real"]);
    }

    #[test]
    fn root_group_never_merges_with_same_named_subfolder() {
        let dir = TempDir::new().unwrap();
        write(&dir, "work.md", "* [ ] root item\n");
        write(&dir, "notes/work.md", "* [ ] sub item\n");

        let opts = ScanOptions::new().with_root_label("notes");
        let result = scan(dir.path(), &opts).unwrap();
        assert_eq!(result.files_scanned, 2);
        assert_eq!(result.files_with_todos(), 2);
        assert_eq!(result.total_todos(), 2);

        let groups: Vec<(&str, Vec<String>)> = result
            .folders()
            .map(|g| {
                let items = g
                    .files()
                    .flat_map(|f| f.items.iter().map(|t| t.to_string()))
                    .collect();
                (g.name.as_str(), items)
            })
            .collect();
        assert_eq!(
            groups,
            vec![
                ("notes", vec!["root item".to_string()]),
                ("notes", vec!["sub item".to_string()]),
            ]
        );
        assert_eq!(todos(&result, "notes", "work.md"), vec!["sub item"]);
    }

    #[test]
    fn undecodable_note_is_a_warning() {
        let dir = TempDir::new().unwrap();
        write(&dir, "notes/good.md", "* [ ] fine\n");
        std::fs::write(dir.path().join("notes/bad.md"), [0xff, 0xfe, 0x2a, 0x20]).unwrap();

        let result = scan(dir.path(), &ScanOptions::new()).unwrap();
        assert_eq!(result.total_todos(), 1);
        assert_eq!(result.files_scanned, 1);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].path.ends_with("notes/bad.md"));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_loop_is_a_warning() {
        let dir = TempDir::new().unwrap();
        write(&dir, "notes/a.md", "* [ ] a\n");
        std::os::unix::fs::symlink(dir.path().join("notes"), dir.path().join("notes/loop"))
            .unwrap();

        let result = scan(dir.path(), &ScanOptions::new()).unwrap();
        assert_eq!(result.total_todos(), 1);
        assert!(!result.warnings.is_empty());
    }

    #[test]
    fn missing_root_is_invalid() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = scan(&missing, &ScanOptions::new()).unwrap_err();
        match err {
            TodosError::InvalidRoot { path, reason } => {
                assert_eq!(path, missing);
                assert_eq!(reason, RootProblem::DoesNotExist);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn file_root_is_invalid() {
        let dir = TempDir::new().unwrap();
        write(&dir, "note.md", "* [ ] x\n");
        let err = scan(&dir.path().join("note.md"), &ScanOptions::new()).unwrap_err();
        assert!(matches!(
            err,
            TodosError::InvalidRoot {
                reason: RootProblem::NotADirectory,
                ..
            }
        ));
    }

    #[test]
    fn empty_tree_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let result = scan(dir.path(), &ScanOptions::new()).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.files_scanned, 0);
    }

    #[test]
    fn result_serializes_counts_and_folders() {
        let dir = TempDir::new().unwrap();
        write(&dir, "notes/work.md", "* [ ] Call Bob\n");
        let result = scan(dir.path(), &ScanOptions::new()).unwrap();

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["files_scanned"], 1);
        assert_eq!(json["folders"][0]["name"], "notes");
        assert_eq!(
            json["folders"][0]["files"]["work.md"]["items"][0],
            "Call Bob"
        );
    }
}
