use std::path::PathBuf;

/// Convenience result type used across the migrator.
pub type MigrateResult<T> = Result<T, MigrateError>;

/// Top-level error taxonomy for document and file migration.
#[derive(thiserror::Error, Debug)]
pub enum MigrateError {
    /// The file is not valid JSON text.
    #[error("json error in '{}': {source}", .path.display())]
    Json {
        /// File that failed to parse.
        path: PathBuf,
        /// Decoder error.
        source: serde_json::Error,
    },

    /// Reading or writing a file failed.
    #[error("io error on '{}': {source}", .path.display())]
    Io {
        /// File being read or written.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The document lost a node a step relies on between `applies` and `apply`.
    #[error("document error: {0}")]
    Document(String),
}

impl MigrateError {
    /// Build a [`MigrateError::Document`] value.
    pub fn document(msg: impl Into<String>) -> Self {
        Self::Document(msg.into())
    }

    /// Build a [`MigrateError::Json`] value for `path`.
    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }

    /// Build a [`MigrateError::Io`] value for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error came from decoding the file text.
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
