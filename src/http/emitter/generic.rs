use std::sync::Arc;

use bytes::Bytes;
use reqwest::Client;
use reqwest::header::HeaderValue;
use tokio::time::Instant;
use tracing::{debug, error, warn};
use url::Url;

use crate::args::HttpMethod;
use crate::content::{GrowableContent, PAYLOAD_HEADER_NAME};
use crate::metrics::{EmitterEvent, PayloadSizes};

use super::WorkerContext;
use super::execution::{drain_response_body, read_diagnostic_body};

/// Worker that hammers one destination, growing its payloads every request.
pub struct GenericEmitter {
    destination: Url,
    method: HttpMethod,
    limit: u64,
    client: Client,
    header: Option<Arc<dyn GrowableContent>>,
    body: Option<Arc<dyn GrowableContent>>,
}

impl std::fmt::Debug for GenericEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenericEmitter")
            .field("destination", &self.destination.as_str())
            .field("method", &self.method)
            .field("limit", &self.limit)
            .field("header", &self.header.is_some())
            .field("body", &self.body.is_some())
            .finish()
    }
}

enum Outcome {
    Continue,
    Stop,
}

impl GenericEmitter {
    /// `limit` is the run-wide request ceiling; `0` means unlimited.
    #[must_use]
    pub const fn new(destination: Url, method: HttpMethod, limit: u64, client: Client) -> Self {
        Self {
            destination,
            method,
            limit,
            client,
            header: None,
            body: None,
        }
    }

    #[must_use]
    pub fn with_header(mut self, content: Arc<dyn GrowableContent>) -> Self {
        self.header = Some(content);
        self
    }

    #[must_use]
    pub fn with_body(mut self, content: Arc<dyn GrowableContent>) -> Self {
        self.body = Some(content);
        self
    }

    pub(super) async fn run(&self, context: &WorkerContext) {
        loop {
            if !context.counter.try_reserve(self.limit) {
                debug!(
                    "Worker {} reached the request limit of {}",
                    context.worker_id, self.limit
                );
                return;
            }

            if matches!(self.send_once(context).await, Outcome::Stop) {
                return;
            }

            if context.stop.is_stopped() {
                debug!("Worker {} observed stop", context.worker_id);
                return;
            }
        }
    }

    async fn send_once(&self, context: &WorkerContext) -> Outcome {
        let mut payload = PayloadSizes::default();

        let header = match grow(self.header.as_deref()) {
            Ok(header) => header,
            Err(message) => return self.abandon(context, message, payload).await,
        };
        let body = if self.method.allows_body() {
            match grow(self.body.as_deref()) {
                Ok(body) => body,
                Err(message) => return self.abandon(context, message, payload).await,
            }
        } else {
            None
        };

        let mut request = self
            .client
            .request(self.method.to_reqwest(), self.destination.clone());
        if let Some(header) = header {
            payload.header = Some(header.len());
            match HeaderValue::from_maybe_shared(header) {
                Ok(value) => request = request.header(PAYLOAD_HEADER_NAME, value),
                Err(err) => {
                    let message = format!("Invalid header payload: {}", err);
                    return self.abandon(context, message, payload).await;
                }
            }
        }
        if let Some(body) = body {
            payload.body = Some(body.len());
            request = request.body(body);
        }

        let start = Instant::now();
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                return self
                    .fail(context, None, format!("Request failed: {}", err), payload)
                    .await;
            }
        };

        let status = response.status().as_u16();
        if status != 200 && status != 302 {
            let diagnostic = read_diagnostic_body(response).await;
            let message = format!("Unexpected status {}: {}", status, diagnostic);
            return self.fail(context, Some(status), message, payload).await;
        }

        match drain_response_body(response).await {
            Ok(bytes) => {
                let elapsed = start.elapsed();
                debug!(
                    "Worker {}: status {} in {:.2?}, header {:?} body {:?}",
                    context.worker_id, status, elapsed, payload.header, payload.body
                );
                let event = EmitterEvent::Response {
                    status,
                    elapsed,
                    bytes,
                    payload,
                };
                if context.emit(event).await {
                    Outcome::Continue
                } else {
                    Outcome::Stop
                }
            }
            Err(err) => {
                let message = format!("Failed to read response body: {}", err);
                self.fail(context, None, message, payload).await
            }
        }
    }

    /// Gives back the reserved slot for a request that was never sent.
    async fn abandon(
        &self,
        context: &WorkerContext,
        message: String,
        payload: PayloadSizes,
    ) -> Outcome {
        context.counter.release();
        self.fail(context, None, message, payload).await
    }

    async fn fail(
        &self,
        context: &WorkerContext,
        status: Option<u16>,
        message: String,
        payload: PayloadSizes,
    ) -> Outcome {
        if status.is_some() {
            warn!(
                "Worker {} stopping on {} {}: {}",
                context.worker_id,
                self.method.as_str(),
                self.destination,
                message
            );
        } else {
            error!(
                "Worker {} stopping on {} {}: {}",
                context.worker_id,
                self.method.as_str(),
                self.destination,
                message
            );
        }
        let event = EmitterEvent::Failure {
            status,
            message,
            payload,
        };
        if !context.emit(event).await {
            debug!("Worker {}: event receiver closed", context.worker_id);
        }
        Outcome::Stop
    }
}

fn grow(content: Option<&dyn GrowableContent>) -> Result<Option<Bytes>, String> {
    content
        .map(|content| content.grow())
        .transpose()
        .map_err(|err| err.to_string())
}
