use std::path::{Path, PathBuf};

/// File extension a note must carry to be scanned. Matched case-sensitively.
pub const MARKDOWN_EXTENSION: &str = ".md";

/// Default name of the consolidated output document.
pub const DEFAULT_OUTPUT_FILE: &str = "open_todos.md";

/// Label used for notes directly in the root when the root has no usable name.
pub const FALLBACK_ROOT_LABEL: &str = "root";

// ---------------------------------------------------------------------------
// ScanOptions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Display name for the folder group holding notes that live directly in
    /// the scan root. Defaults to the root directory's own name.
    pub root_label: Option<String>,
    /// Resolved paths of files that are never read as notes.
    exclude_paths: Vec<PathBuf>,
}

impl ScanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root_label(mut self, label: impl Into<String>) -> Self {
        self.root_label = Some(label.into());
        self
    }

    /// Skip the file at `path`. The file does not need to exist yet; relative
    /// paths are resolved against the current directory.
    pub fn exclude(mut self, path: impl AsRef<Path>) -> Self {
        self.exclude_paths.push(resolve_path(path.as_ref()));
        self
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        if self.exclude_paths.is_empty() {
            return false;
        }
        let resolved = resolve_path(path);
        self.exclude_paths.iter().any(|p| *p == resolved)
    }
}

/// Canonical form of `path`, or of its parent joined with the file name when
/// the file itself does not exist.
fn resolve_path(path: &Path) -> PathBuf {
    if let Ok(p) = std::fs::canonicalize(path) {
        return p;
    }
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    match (std::fs::canonicalize(parent), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}
