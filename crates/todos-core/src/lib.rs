//! Collects open `* [ ]` todos from a tree of Markdown notes into one document.

pub mod config;
pub mod error;
pub mod io;
pub mod render;
pub mod scan;
pub mod todo;

pub use config::ScanOptions;
pub use error::{Result, RootProblem, TodosError};
pub use render::{render, write_todos};
pub use scan::{scan, FileReadWarning, ScanResult};
pub use todo::{FileTodos, FolderGroup, TodoItem};
