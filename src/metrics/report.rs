use std::collections::BTreeMap;
use std::time::Duration;

/// Largest payload the target accepted and smallest one it rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PayloadBounds {
    pub largest_accepted: Option<usize>,
    pub smallest_rejected: Option<usize>,
}

impl PayloadBounds {
    pub(super) fn observe(&mut self, size: usize, accepted: bool) {
        let slot = if accepted {
            &mut self.largest_accepted
        } else {
            &mut self.smallest_rejected
        };
        *slot = Some(match (*slot, accepted) {
            (Some(current), true) => current.max(size),
            (Some(current), false) => current.min(size),
            (None, _) => size,
        });
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.largest_accepted.is_none() && self.smallest_rejected.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub duration: Duration,
    pub processed: u64,
    pub admitted: u64,
    pub errors: u64,
    pub status_counts: BTreeMap<u16, u64>,
    pub min_latency: Duration,
    pub max_latency: Duration,
    pub avg_latency: Duration,
    pub p50_latency: Duration,
    pub p90_latency: Duration,
    pub p99_latency: Duration,
    pub total_bytes: u64,
    pub bytes_per_sec: u64,
    pub header: PayloadBounds,
    pub body: PayloadBounds,
}

impl RunReport {
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        lines.push(format!("Processed requests: {}", self.processed));
        lines.push(format!("Issued requests: {}", self.admitted));
        if self.status_counts.is_empty() {
            lines.push("Status codes: none".to_owned());
        } else {
            lines.push("Status codes:".to_owned());
            for (status, count) in &self.status_counts {
                lines.push(format!("  {}: {}", status, count));
            }
        }
        lines.push(format!("Errors: {}", self.errors));
        lines.push(format!("Max request time: {:.2?}", self.max_latency));
        lines.push(format!("Min request time: {:.2?}", self.min_latency));
        lines.push(format!("Average request time: {:.2?}", self.avg_latency));
        lines.push(format!(
            "Latency p50/p90/p99: {:.2?} / {:.2?} / {:.2?}",
            self.p50_latency, self.p90_latency, self.p99_latency
        ));
        lines.push(format!("Received: {} bytes", self.total_bytes));
        lines.push(format!("Bandwidth: {} bytes/s", self.bytes_per_sec));
        push_payload_line(&mut lines, "Header", &self.header);
        push_payload_line(&mut lines, "Body", &self.body);
        lines.push(format!("Elapsed: {:.2?}", self.duration));
        lines
    }

    pub fn print(&self) {
        for line in self.lines() {
            println!("{}", line);
        }
    }
}

fn push_payload_line(lines: &mut Vec<String>, label: &str, bounds: &PayloadBounds) {
    if bounds.is_empty() {
        return;
    }
    lines.push(format!(
        "{} payload: largest accepted {}, smallest rejected {}",
        label,
        format_size(bounds.largest_accepted),
        format_size(bounds.smallest_rejected)
    ));
}

fn format_size(size: Option<usize>) -> String {
    size.map_or_else(|| "none".to_owned(), |size| format!("{} bytes", size))
}
