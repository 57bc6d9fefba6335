use std::collections::BTreeMap;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use super::histogram::LatencyHistogram;
use super::report::{PayloadBounds, RunReport};
use super::types::{EmitterEvent, PayloadSizes};

/// Running aggregation of worker events.
///
/// Only the dispatcher loop touches it. Every field is a count, sum, min or
/// max, so the final report does not depend on event order.
#[derive(Debug)]
pub struct RunStats {
    started_at: Instant,
    processed: u64,
    errors: u64,
    status_counts: BTreeMap<u16, u64>,
    total_bytes: u64,
    min_latency: Option<Duration>,
    max_latency: Duration,
    latency_sum: Duration,
    latency_samples: u64,
    histogram: Option<LatencyHistogram>,
    header: PayloadBounds,
    body: PayloadBounds,
}

impl RunStats {
    #[must_use]
    pub fn new(started_at: Instant) -> Self {
        let histogram = match LatencyHistogram::new() {
            Ok(histogram) => Some(histogram),
            Err(err) => {
                warn!("Latency percentiles disabled: {}", err);
                None
            }
        };
        Self {
            started_at,
            processed: 0,
            errors: 0,
            status_counts: BTreeMap::new(),
            total_bytes: 0,
            min_latency: None,
            max_latency: Duration::ZERO,
            latency_sum: Duration::ZERO,
            latency_samples: 0,
            histogram,
            header: PayloadBounds::default(),
            body: PayloadBounds::default(),
        }
    }

    pub fn record(&mut self, event: &EmitterEvent) {
        self.processed = self.processed.saturating_add(1);

        if let Some(status) = event.status() {
            let count = self.status_counts.entry(status).or_insert(0);
            *count = count.saturating_add(1);
        }

        match event {
            EmitterEvent::Response {
                elapsed,
                bytes,
                payload,
                ..
            } => {
                self.record_latency(*elapsed);
                self.total_bytes = self.total_bytes.saturating_add(*bytes);
                self.record_payload(*payload, true);
            }
            EmitterEvent::Failure {
                status, payload, ..
            } => {
                self.errors = self.errors.saturating_add(1);
                // Only a server answer says anything about the payload size.
                if status.is_some() {
                    self.record_payload(*payload, false);
                }
            }
        }
    }

    fn record_latency(&mut self, elapsed: Duration) {
        self.min_latency = Some(self.min_latency.map_or(elapsed, |min| min.min(elapsed)));
        self.max_latency = self.max_latency.max(elapsed);
        self.latency_sum = self.latency_sum.saturating_add(elapsed);
        self.latency_samples = self.latency_samples.saturating_add(1);
        if let Some(histogram) = self.histogram.as_mut() {
            let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
            if let Err(err) = histogram.record(micros) {
                debug!("{}", err);
            }
        }
    }

    fn record_payload(&mut self, payload: PayloadSizes, accepted: bool) {
        if let Some(size) = payload.header {
            self.header.observe(size, accepted);
        }
        if let Some(size) = payload.body {
            self.body.observe(size, accepted);
        }
    }

    #[must_use]
    pub const fn processed(&self) -> u64 {
        self.processed
    }

    /// Builds the final report. `admitted` is the value of the global request
    /// counter at the end of the run.
    #[must_use]
    pub fn finish(&self, admitted: u64) -> RunReport {
        let avg_latency = u32::try_from(self.latency_samples)
            .ok()
            .and_then(|samples| self.latency_sum.checked_div(samples))
            .unwrap_or_else(|| average_wide(self.latency_sum, self.latency_samples));
        let (p50, p90, p99) = self
            .histogram
            .as_ref()
            .map_or((0, 0, 0), LatencyHistogram::percentiles);

        RunReport {
            duration: self.started_at.elapsed(),
            processed: self.processed,
            admitted,
            errors: self.errors,
            status_counts: self.status_counts.clone(),
            min_latency: self.min_latency.unwrap_or(Duration::ZERO),
            max_latency: self.max_latency,
            avg_latency,
            p50_latency: Duration::from_micros(p50),
            p90_latency: Duration::from_micros(p90),
            p99_latency: Duration::from_micros(p99),
            total_bytes: self.total_bytes,
            bytes_per_sec: bandwidth(self.total_bytes, self.latency_sum),
            header: self.header,
            body: self.body,
        }
    }
}

/// Average for sample counts beyond `u32`; zero when there are no samples.
fn average_wide(sum: Duration, samples: u64) -> Duration {
    let nanos = sum
        .as_nanos()
        .checked_div(u128::from(samples))
        .unwrap_or(0);
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}

/// Bytes per second of cumulative request time.
fn bandwidth(total_bytes: u64, latency_sum: Duration) -> u64 {
    let scaled = u128::from(total_bytes)
        .saturating_mul(1_000_000_000)
        .checked_div(latency_sum.as_nanos())
        .unwrap_or(0);
    u64::try_from(scaled).unwrap_or(u64::MAX)
}
