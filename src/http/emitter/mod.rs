//! Request workers.
//!
//! Each worker runs as its own task and reports one [`EmitterEvent`] per
//! request attempt. A worker signals completion exactly once, through the
//! [`CompletionGuard`] held by its [`WorkerContext`], whichever way it exits.
mod counter;
mod execution;
mod generic;
mod replay;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::metrics::EmitterEvent;
use crate::shutdown::StopListener;

pub use counter::RequestCounter;
pub use generic::GenericEmitter;
pub use replay::ReplayEmitter;

#[derive(Debug)]
pub enum Emitter {
    Generic(GenericEmitter),
    Replay(ReplayEmitter),
}

impl Emitter {
    pub async fn start(self, context: WorkerContext) {
        match self {
            Emitter::Generic(emitter) => emitter.run(&context).await,
            Emitter::Replay(emitter) => emitter.run(&context).await,
        }
    }
}

pub struct WorkerContext {
    pub worker_id: usize,
    pub counter: Arc<RequestCounter>,
    pub stop: StopListener,
    pub events: mpsc::Sender<EmitterEvent>,
    pub done: CompletionGuard,
}

impl WorkerContext {
    /// Sends an event; `false` once the receiving side is gone.
    pub(crate) async fn emit(&self, event: EmitterEvent) -> bool {
        self.events.send(event).await.is_ok()
    }
}

/// Reports a worker as finished when dropped.
#[derive(Debug)]
pub struct CompletionGuard {
    worker_id: usize,
    done_tx: mpsc::UnboundedSender<usize>,
}

impl CompletionGuard {
    #[must_use]
    pub const fn new(worker_id: usize, done_tx: mpsc::UnboundedSender<usize>) -> Self {
        Self { worker_id, done_tx }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if self.done_tx.send(self.worker_id).is_err() {
            debug!("Worker {}: completion receiver closed", self.worker_id);
        }
    }
}
