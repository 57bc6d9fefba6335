use std::sync::Mutex;

use bytes::Bytes;
use rand::Rng;
use rand::distributions::Alphanumeric;
use tracing::debug;

use crate::error::ContentError;

use super::GrowableContent;

/// Default upper bound for a grown payload (64 MiB).
pub const DEFAULT_MAX_PAYLOAD: usize = 64 * 1024 * 1024;

#[derive(Debug)]
struct GrowthState {
    size: usize,
    payload: Option<Bytes>,
}

/// Randomly generated payload with an increment or multiplier growth policy.
///
/// The increment wins when both are set; a multiplier of 0 or 1 means no
/// multiplicative growth.
#[derive(Debug)]
pub struct Content {
    increment: usize,
    multiplier: usize,
    max_size: usize,
    state: Mutex<GrowthState>,
}

impl Content {
    #[must_use]
    pub const fn new(size: usize, increment: usize, multiplier: usize) -> Self {
        Self::with_limit(size, increment, multiplier, DEFAULT_MAX_PAYLOAD)
    }

    #[must_use]
    pub const fn with_limit(
        size: usize,
        increment: usize,
        multiplier: usize,
        max_size: usize,
    ) -> Self {
        Self {
            increment,
            multiplier,
            max_size,
            state: Mutex::new(GrowthState {
                size,
                payload: None,
            }),
        }
    }

    fn next_size(&self, size: usize) -> Result<Option<usize>, ContentError> {
        let next = if self.increment > 0 {
            size.checked_add(self.increment)
        } else if self.multiplier > 1 {
            size.checked_mul(self.multiplier)
        } else {
            return Ok(None);
        };
        match next {
            Some(next) if next <= self.max_size => Ok(Some(next)),
            Some(next) => Err(ContentError::Overflow {
                requested: next,
                limit: self.max_size,
            }),
            None => Err(ContentError::Overflow {
                requested: usize::MAX,
                limit: self.max_size,
            }),
        }
    }
}

impl GrowableContent for Content {
    fn grow(&self) -> Result<Bytes, ContentError> {
        let mut state = self
            .state
            .lock()
            .map_err(|err| ContentError::LockPoisoned {
                message: err.to_string(),
            })?;

        let Some(current) = state.payload.clone() else {
            if state.size > self.max_size {
                return Err(ContentError::Overflow {
                    requested: state.size,
                    limit: self.max_size,
                });
            }
            let payload = Bytes::from(random_bytes(state.size));
            state.payload = Some(payload.clone());
            return Ok(payload);
        };

        let Some(next) = self.next_size(state.size)? else {
            return Ok(current);
        };

        let mut buffer = Vec::with_capacity(next);
        buffer.extend_from_slice(&current);
        let missing = next.saturating_sub(buffer.len());
        buffer.extend(random_bytes(missing));
        let payload = Bytes::from(buffer);
        debug!("Payload grew from {} to {} bytes", state.size, next);
        state.size = next;
        state.payload = Some(payload.clone());
        Ok(payload)
    }

    fn current_size(&self) -> usize {
        self.state.lock().map_or(0, |state| state.size)
    }
}

fn random_bytes(len: usize) -> Vec<u8> {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .collect()
}
