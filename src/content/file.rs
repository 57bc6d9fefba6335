use std::path::Path;

use bytes::Bytes;

use crate::error::ContentError;

use super::GrowableContent;

/// Fixed payload loaded once from disk. It never grows.
#[derive(Debug, Clone)]
pub struct FileContent {
    payload: Bytes,
}

impl FileContent {
    /// Reads the payload file into memory.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read.
    pub fn from_path(path: &Path) -> Result<Self, ContentError> {
        let payload = std::fs::read(path).map_err(|err| ContentError::ReadFile {
            path: path.to_path_buf(),
            source: err,
        })?;
        Ok(Self {
            payload: Bytes::from(payload),
        })
    }

    #[must_use]
    pub const fn from_bytes(payload: Bytes) -> Self {
        Self { payload }
    }
}

impl GrowableContent for FileContent {
    fn grow(&self) -> Result<Bytes, ContentError> {
        Ok(self.payload.clone())
    }

    fn current_size(&self) -> usize {
        self.payload.len()
    }
}
