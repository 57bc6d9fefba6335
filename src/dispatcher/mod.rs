//! Runs a pool of emitters to completion and aggregates their events.
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep};
use tracing::{debug, error, info};

use crate::http::{CompletionGuard, Emitter, RequestCounter, WorkerContext};
use crate::metrics::{RunReport, RunStats};
use crate::shutdown::{ShutdownReceiver, ShutdownSender, StopSignal};
use crate::shutdown_handlers::{setup_signal_shutdown_handler, shutdown_channel};


/// Event channel slots per worker.
const EVENTS_PER_WORKER: usize = 64;
const MIN_EVENTS_CAPACITY: usize = 1024;

pub struct Dispatcher {
    emitters: Vec<Emitter>,
    counter: Arc<RequestCounter>,
    stats: RunStats,
    stop: StopSignal,
    timeout: Option<Duration>,
    shutdown_tx: ShutdownSender,
    shutdown_rx: ShutdownReceiver,
    handle_signals: bool,
}

impl Dispatcher {
    /// `timeout` bounds the whole run; `None` waits for the workers to finish
    /// on their own.
    #[must_use]
    pub fn new(emitters: Vec<Emitter>, timeout: Option<Duration>) -> Self {
        let (shutdown_tx, shutdown_rx) = shutdown_channel();
        Self {
            emitters,
            counter: Arc::new(RequestCounter::new()),
            stats: RunStats::new(Instant::now()),
            stop: StopSignal::new(),
            timeout,
            shutdown_tx,
            shutdown_rx,
            handle_signals: true,
        }
    }

    /// Skips SIGINT/SIGTERM registration; interrupts then only arrive
    /// through [`Dispatcher::interrupt_handle`].
    #[must_use]
    pub fn without_signal_handlers(mut self) -> Self {
        self.handle_signals = false;
        self
    }

    #[must_use]
    pub fn interrupt_handle(&self) -> ShutdownSender {
        self.shutdown_tx.clone()
    }

    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.emitters.len()
    }

    /// Runs every emitter until it completes, then prints and returns the
    /// report.
    pub async fn run(self) -> RunReport {
        let Self {
            emitters,
            counter,
            mut stats,
            stop,
            timeout,
            shutdown_tx,
            mut shutdown_rx,
            handle_signals,
        } = self;

        let signal_handle = handle_signals.then(|| setup_signal_shutdown_handler(&shutdown_tx));

        let workers = emitters.len();
        let capacity = workers
            .saturating_mul(EVENTS_PER_WORKER)
            .max(MIN_EVENTS_CAPACITY);
        let (events_tx, mut events_rx) = mpsc::channel(capacity);
        let (done_tx, mut done_rx) = mpsc::unbounded_channel();

        info!("Starting {} workers", workers);
        let handles: Vec<JoinHandle<()>> = emitters
            .into_iter()
            .enumerate()
            .map(|(worker_id, emitter)| {
                let context = WorkerContext {
                    worker_id,
                    counter: Arc::clone(&counter),
                    stop: stop.listener(),
                    events: events_tx.clone(),
                    done: CompletionGuard::new(worker_id, done_tx.clone()),
                };
                tokio::spawn(emitter.start(context))
            })
            .collect();
        drop(events_tx);
        drop(done_tx);

        let deadline = sleep(timeout.unwrap_or(Duration::ZERO));
        tokio::pin!(deadline);
        let mut deadline_armed = timeout.is_some();
        let mut outstanding = workers;

        while outstanding > 0 {
            tokio::select! {
                biased;

                Some(event) = events_rx.recv() => stats.record(&event),
                done = done_rx.recv() => {
                    let Some(worker_id) = done else {
                        break;
                    };
                    outstanding = outstanding.saturating_sub(1);
                    debug!("Worker {} completed, {} outstanding", worker_id, outstanding);
                }
                result = shutdown_rx.recv(), if !stop.is_stopped() => {
                    if !matches!(result, Err(RecvError::Closed)) && stop.stop() {
                        info!("Received interrupt, stopping workers");
                    }
                }
                () = &mut deadline, if deadline_armed => {
                    deadline_armed = false;
                    if stop.stop() {
                        info!("Run timeout reached, stopping workers");
                    }
                }
            }
        }

        while let Ok(event) = events_rx.try_recv() {
            stats.record(&event);
        }

        for handle in handles {
            if let Err(err) = handle.await {
                error!("Worker task failed: {}", err);
            }
        }
        if let Some(handle) = signal_handle {
            handle.abort();
        }

        debug!("Processed {} events", stats.processed());
        let report = stats.finish(counter.load());
        report.print();
        report
    }
}
