use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Payload growth to {requested} bytes exceeds the {limit} byte limit.")]
    Overflow { requested: usize, limit: usize },
    #[error("Payload lock poisoned: {message}")]
    LockPoisoned { message: String },
    #[error("Failed to read payload file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
