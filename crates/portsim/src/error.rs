use std::fmt;
use std::path::PathBuf;

use portsim_core::PortfolioError;

/// Failure to load one portfolio file. The portfolio is skipped.
#[derive(Debug)]
pub enum LoadError {
    Io { path: PathBuf, message: String },
    MissingColumn(&'static str),
    MalformedRow { line: usize, expected: usize, found: usize },
    MalformedValue {
        line: usize,
        column: &'static str,
        value: String,
    },
    Portfolio(PortfolioError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, message } => {
                write!(f, "cannot read {}: {message}", path.display())
            }
            LoadError::MissingColumn(column) => write!(f, "missing column '{column}'"),
            LoadError::MalformedRow {
                line,
                expected,
                found,
            } => write!(
                f,
                "line {line}: expected at least {expected} fields, found {found}"
            ),
            LoadError::MalformedValue {
                line,
                column,
                value,
            } => write!(f, "line {line}: invalid {column} '{value}'"),
            LoadError::Portfolio(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Portfolio(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PortfolioError> for LoadError {
    fn from(err: PortfolioError) -> Self {
        LoadError::Portfolio(err)
    }
}

/// Failure to write a report file
#[derive(Debug)]
pub enum ExportError {
    Io { path: PathBuf, message: String },
    Serialize(String),
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        ExportError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Io { path, message } => {
                write!(f, "cannot write {}: {message}", path.display())
            }
            ExportError::Serialize(msg) => write!(f, "serialization error: {msg}"),
        }
    }
}

impl std::error::Error for ExportError {}
