use std::time::Duration;

/// Header/body payload sizes a request attempt carried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PayloadSizes {
    pub header: Option<usize>,
    pub body: Option<usize>,
}

/// Outcome of one request attempt, sent from a worker to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitterEvent {
    Response {
        status: u16,
        elapsed: Duration,
        bytes: u64,
        payload: PayloadSizes,
    },
    Failure {
        /// Present when the server answered with an unexpected status.
        status: Option<u16>,
        message: String,
        payload: PayloadSizes,
    },
}

impl EmitterEvent {
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            EmitterEvent::Response { status, .. } => Some(*status),
            EmitterEvent::Failure { status, .. } => *status,
        }
    }

    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, EmitterEvent::Failure { .. })
    }
}
