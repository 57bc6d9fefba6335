use std::sync::Arc;

use reqwest::Client;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::http::UrlQueue;
use crate::metrics::{EmitterEvent, PayloadSizes};

use super::WorkerContext;
use super::execution::drain_response_body;

/// Worker that GETs URLs from a shared queue until it is drained.
#[derive(Debug)]
pub struct ReplayEmitter {
    queue: Arc<UrlQueue>,
    client: Client,
}

impl ReplayEmitter {
    #[must_use]
    pub const fn new(queue: Arc<UrlQueue>, client: Client) -> Self {
        Self { queue, client }
    }

    pub(super) async fn run(&self, context: &WorkerContext) {
        while let Some(url) = self.queue.take() {
            context.counter.record();
            let start = Instant::now();
            let event = match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    match drain_response_body(response).await {
                        Ok(bytes) => {
                            let elapsed = start.elapsed();
                            debug!(
                                "Worker {}: {} answered {} in {:.2?}",
                                context.worker_id, url, status, elapsed
                            );
                            EmitterEvent::Response {
                                status,
                                elapsed,
                                bytes,
                                payload: PayloadSizes::default(),
                            }
                        }
                        Err(err) => {
                            warn!("Worker {}: reading {} failed: {}", context.worker_id, url, err);
                            EmitterEvent::Failure {
                                status: None,
                                message: err.to_string(),
                                payload: PayloadSizes::default(),
                            }
                        }
                    }
                }
                Err(err) => {
                    warn!("Worker {}: GET {} failed: {}", context.worker_id, url, err);
                    EmitterEvent::Failure {
                        status: None,
                        message: err.to_string(),
                        payload: PayloadSizes::default(),
                    }
                }
            };

            if !context.emit(event).await {
                return;
            }
            if context.stop.is_stopped() {
                debug!("Worker {} observed stop", context.worker_id);
                return;
            }
        }
        debug!("Worker {}: URL queue drained", context.worker_id);
    }
}
