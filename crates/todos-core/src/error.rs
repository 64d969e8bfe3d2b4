use std::fmt;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TodosError {
    #[error("invalid notes root '{}': {}", .path.display(), .reason)]
    InvalidRoot { path: PathBuf, reason: RootProblem },

    #[error("failed to write '{}'", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a scan root was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootProblem {
    DoesNotExist,
    NotADirectory,
    PermissionDenied,
    Other(String),
}

impl RootProblem {
    pub fn from_io(err: &std::io::Error) -> Self {
        match err.kind() {
            ErrorKind::NotFound => RootProblem::DoesNotExist,
            ErrorKind::PermissionDenied => RootProblem::PermissionDenied,
            _ => RootProblem::Other(err.to_string()),
        }
    }
}

impl fmt::Display for RootProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RootProblem::DoesNotExist => f.write_str("path does not exist"),
            RootProblem::NotADirectory => f.write_str("path is not a directory"),
            RootProblem::PermissionDenied => f.write_str("permission denied"),
            RootProblem::Other(msg) => f.write_str(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, TodosError>;
