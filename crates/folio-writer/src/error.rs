//! Error types for site file writing.

use std::path::PathBuf;

/// Error writing a site file.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// Filesystem operation failed.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// File or directory being written.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML serialization error.
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl WriteError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
