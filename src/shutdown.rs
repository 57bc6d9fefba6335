use tokio::sync::{broadcast, watch};

/// Fan-out of operator interrupts (SIGINT/SIGTERM) to the dispatcher.
pub type ShutdownSender = broadcast::Sender<()>;
pub type ShutdownReceiver = broadcast::Receiver<()>;

/// One-shot stop broadcast shared by every worker of a run.
///
/// Once stopped it stays stopped; every listener observes it without
/// blocking, any number of times.
#[derive(Debug)]
pub struct StopSignal {
    tx: watch::Sender<bool>,
}

#[derive(Debug, Clone)]
pub struct StopListener {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    #[must_use]
    pub fn listener(&self) -> StopListener {
        StopListener {
            rx: self.tx.subscribe(),
        }
    }

    /// Marks the run as stopped. Returns `true` only for the call that
    /// actually flipped the flag.
    pub fn stop(&self) -> bool {
        self.tx.send_if_modified(|stopped| {
            if *stopped {
                false
            } else {
                *stopped = true;
                true
            }
        })
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl StopListener {
    /// Non-blocking check of the stop flag.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }
}
