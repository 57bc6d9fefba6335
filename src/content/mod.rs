//! Request payloads that can grow between requests.
//!
//! A single payload instance is shared by every worker of a run, so growth
//! is globally synchronized: one escalating size rather than one per worker.
mod file;
mod growth;

#[cfg(test)]
mod tests;

use bytes::Bytes;

use crate::error::ContentError;

pub use file::FileContent;
pub use growth::{Content, DEFAULT_MAX_PAYLOAD};

/// Name of the request header that carries the header payload.
pub const PAYLOAD_HEADER_NAME: &str = "Sample-Header";

/// A payload that may grow each time a worker asks for it.
pub trait GrowableContent: Send + Sync {
    /// Returns the payload for the next request, growing it first when a
    /// growth strategy is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Overflow`] when growth would exceed the payload
    /// limit, or [`ContentError::LockPoisoned`] when a peer panicked while
    /// growing the shared buffer.
    fn grow(&self) -> Result<Bytes, ContentError>;

    /// Size in bytes of the payload the next `grow` starts from.
    fn current_size(&self) -> usize;
}
