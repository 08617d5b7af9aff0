//! Typed error handling for deadfn.
//!
//! Provides structured errors that library consumers can match on, with the
//! recoverable/fatal split the executor relies on: per-TU failures are
//! recoverable and never unwind past TU granularity, infrastructure failures
//! abort the run.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for deadfn operations.
#[derive(Error, Debug)]
pub enum DeadfnError {
    /// I/O error when reading observation files or config
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Malformed observation file for a single TU
    #[error("Observation error in {path}: {message}")]
    Observations { path: PathBuf, message: String },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// The executor could not be brought up at all
    #[error("Executor error: {message}")]
    Executor { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DeadfnError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create an observation-file error.
    pub fn observations(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Observations {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an executor error.
    pub fn executor(message: impl Into<String>) -> Self {
        Self::Executor {
            message: message.into(),
        }
    }

    /// Check if this error is recoverable: the affected TU contributes no
    /// observations but the run continues.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Observations { .. } | Self::Config { .. })
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Observations { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for deadfn results.
pub type DeadfnResult<T> = Result<T, DeadfnError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> DeadfnResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> DeadfnResult<T> {
        self.map_err(|e| DeadfnError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error() {
        let err = DeadfnError::io(
            PathBuf::from("/build/tu_0001.json"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        );
        assert!(matches!(err, DeadfnError::Io { .. }));
        assert_eq!(err.path(), Some(&PathBuf::from("/build/tu_0001.json")));
        assert!(err.to_string().contains("/build/tu_0001.json"));
    }

    #[test]
    fn test_is_recoverable() {
        assert!(DeadfnError::observations("/build/tu.json", "truncated").is_recoverable());
        assert!(DeadfnError::config("/proj/deadfn.toml", "bad toml").is_recoverable());
        assert!(!DeadfnError::executor("cannot build worker pool").is_recoverable());
    }

    #[test]
    fn test_io_result_ext() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        let deadfn_result = result.with_path("/build/missing.json");
        assert!(deadfn_result.is_err());
        assert!(deadfn_result.unwrap_err().is_recoverable());
    }
}
