use super::*;
use std::time::Duration;
use tokio::time::Instant;

fn response(status: u16, millis: u64, bytes: u64) -> EmitterEvent {
    EmitterEvent::Response {
        status,
        elapsed: Duration::from_millis(millis),
        bytes,
        payload: PayloadSizes::default(),
    }
}

fn failure(status: Option<u16>) -> EmitterEvent {
    EmitterEvent::Failure {
        status,
        message: "boom".to_owned(),
        payload: PayloadSizes::default(),
    }
}

fn sized(event: EmitterEvent, header: Option<usize>, body: Option<usize>) -> EmitterEvent {
    let sizes = PayloadSizes { header, body };
    match event {
        EmitterEvent::Response {
            status,
            elapsed,
            bytes,
            ..
        } => EmitterEvent::Response {
            status,
            elapsed,
            bytes,
            payload: sizes,
        },
        EmitterEvent::Failure {
            status, message, ..
        } => EmitterEvent::Failure {
            status,
            message,
            payload: sizes,
        },
    }
}

fn aggregate(events: &[EmitterEvent], admitted: u64) -> RunReport {
    let mut stats = RunStats::new(Instant::now());
    for event in events {
        stats.record(event);
    }
    stats.finish(admitted)
}

#[test]
fn empty_run_reports_zeroes() -> Result<(), String> {
    let report = aggregate(&[], 0);
    if report.processed != 0 || report.errors != 0 {
        return Err(format!("Unexpected counts: {:?}", report));
    }
    if report.avg_latency != Duration::ZERO || report.min_latency != Duration::ZERO {
        return Err(format!("Expected zero latency, got {:?}", report));
    }
    if report.bytes_per_sec != 0 {
        return Err(format!("Expected zero bandwidth, got {}", report.bytes_per_sec));
    }
    if !report.status_counts.is_empty() {
        return Err("Expected no status codes".to_owned());
    }
    Ok(())
}

#[test]
fn aggregates_latency_and_bytes() -> Result<(), String> {
    let report = aggregate(
        &[response(200, 10, 100), response(200, 30, 300), response(302, 20, 0)],
        3,
    );
    if report.processed != 3 || report.admitted != 3 {
        return Err(format!("Unexpected counts: {:?}", report));
    }
    if report.min_latency != Duration::from_millis(10) {
        return Err(format!("Unexpected min: {:?}", report.min_latency));
    }
    if report.max_latency != Duration::from_millis(30) {
        return Err(format!("Unexpected max: {:?}", report.max_latency));
    }
    if report.avg_latency != Duration::from_millis(20) {
        return Err(format!("Unexpected avg: {:?}", report.avg_latency));
    }
    if report.total_bytes != 400 {
        return Err(format!("Unexpected bytes: {}", report.total_bytes));
    }
    // 400 bytes over 60ms of request time.
    if report.bytes_per_sec != 6666 {
        return Err(format!("Unexpected bandwidth: {}", report.bytes_per_sec));
    }
    if report.status_counts.get(&200) != Some(&2) || report.status_counts.get(&302) != Some(&1) {
        return Err(format!("Unexpected statuses: {:?}", report.status_counts));
    }
    Ok(())
}

#[test]
fn min_latency_is_seeded_from_first_sample() -> Result<(), String> {
    let report = aggregate(&[response(200, 500, 0)], 1);
    if report.min_latency != Duration::from_millis(500) {
        return Err(format!("Unexpected min: {:?}", report.min_latency));
    }
    Ok(())
}

#[test]
fn failures_count_as_errors() -> Result<(), String> {
    let report = aggregate(
        &[
            response(200, 10, 10),
            failure(Some(500)),
            failure(None),
        ],
        3,
    );
    if report.errors != 2 || report.processed != 3 {
        return Err(format!("Unexpected counts: {:?}", report));
    }
    if report.status_counts.get(&500) != Some(&1) {
        return Err(format!("Expected 500 in statuses: {:?}", report.status_counts));
    }
    if report.status_counts.values().sum::<u64>() != 2 {
        return Err("Transport failure must not add a status".to_owned());
    }
    if report.max_latency != Duration::from_millis(10) || report.avg_latency != report.max_latency
    {
        return Err(format!("Failures must not add latency: {:?}", report));
    }
    if report.total_bytes != 10 {
        return Err(format!("Failures must not add bytes: {}", report.total_bytes));
    }
    Ok(())
}

#[test]
fn report_does_not_depend_on_event_order() -> Result<(), String> {
    let events = vec![
        response(200, 12, 40),
        failure(Some(413)),
        response(302, 3, 0),
        sized(response(200, 9, 5), Some(64), None),
        sized(failure(Some(431)), Some(128), None),
        failure(None),
    ];
    let mut reversed = events.clone();
    reversed.reverse();

    let forward = aggregate(&events, 6);
    let backward = aggregate(&reversed, 6);
    let strip = |report: RunReport| RunReport {
        duration: Duration::ZERO,
        ..report
    };
    if strip(forward.clone()) != strip(backward) {
        return Err(format!("Order changed the report: {:?}", forward));
    }
    Ok(())
}

#[test]
fn payload_bounds_track_accepted_and_rejected_sizes() -> Result<(), String> {
    let report = aggregate(
        &[
            sized(response(200, 1, 0), Some(10), Some(100)),
            sized(response(200, 1, 0), Some(20), Some(200)),
            sized(failure(Some(431)), Some(80), None),
            sized(failure(Some(413)), Some(40), Some(400)),
        ],
        4,
    );
    let expected_header = PayloadBounds {
        largest_accepted: Some(20),
        smallest_rejected: Some(40),
    };
    let expected_body = PayloadBounds {
        largest_accepted: Some(200),
        smallest_rejected: Some(400),
    };
    if report.header != expected_header {
        return Err(format!("Unexpected header bounds: {:?}", report.header));
    }
    if report.body != expected_body {
        return Err(format!("Unexpected body bounds: {:?}", report.body));
    }
    Ok(())
}

#[test]
fn report_lines_include_totals() -> Result<(), String> {
    let report = aggregate(&[response(200, 10, 100), failure(Some(500))], 2);
    let lines = report.lines();
    let expected = [
        "Processed requests: 2",
        "Issued requests: 2",
        "  200: 1",
        "  500: 1",
        "Errors: 1",
        "Received: 100 bytes",
    ];
    for needle in expected {
        if !lines.iter().any(|line| line == needle) {
            return Err(format!("Missing line {:?} in {:?}", needle, lines));
        }
    }
    if lines.iter().any(|line| line.starts_with("Body payload")) {
        return Err("Body line should be omitted without body sizes".to_owned());
    }
    Ok(())
}

#[test]
fn histogram_reports_percentiles() -> Result<(), String> {
    let mut histogram = LatencyHistogram::new()?;
    if histogram.percentiles() != (0, 0, 0) {
        return Err("Empty histogram should report zeroes".to_owned());
    }
    for value in 1..=100_u64 {
        histogram.record(value.saturating_mul(1000))?;
    }
    let (p50, p90, p99) = histogram.percentiles();
    if !(p50 <= p90 && p90 <= p99) {
        return Err(format!("Percentiles out of order: {} {} {}", p50, p90, p99));
    }
    if !(49_000..=51_000).contains(&p50) {
        return Err(format!("Unexpected p50: {}", p50));
    }
    if histogram.count() != 100 {
        return Err(format!("Unexpected count: {}", histogram.count()));
    }
    Ok(())
}

#[test]
fn transport_failure_does_not_skew_latency_or_bandwidth() -> Result<(), String> {
    let report = aggregate(&[response(200, 10, 1000), failure(None)], 2);
    if report.max_latency != Duration::from_millis(10) {
        return Err(format!("Unexpected max: {:?}", report.max_latency));
    }
    if report.avg_latency != Duration::from_millis(10) {
        return Err(format!("Unexpected avg: {:?}", report.avg_latency));
    }
    if report.bytes_per_sec != 100_000 {
        return Err(format!("Unexpected bandwidth: {}", report.bytes_per_sec));
    }
    Ok(())
}

#[test]
fn transport_failure_is_not_a_rejected_payload() -> Result<(), String> {
    let report = aggregate(
        &[
            sized(response(200, 1, 0), Some(5), None),
            sized(failure(None), Some(10), None),
        ],
        2,
    );
    let expected = PayloadBounds {
        largest_accepted: Some(5),
        smallest_rejected: None,
    };
    if report.header != expected {
        return Err(format!("Unexpected header bounds: {:?}", report.header));
    }
    Ok(())
}

#[test]
fn report_percentiles_follow_recorded_latencies() -> Result<(), String> {
    let report = aggregate(
        &[response(200, 100, 0), response(200, 200, 0), response(200, 300, 0)],
        3,
    );
    let within = |actual: Duration, expected_ms: u64| {
        let expected = Duration::from_millis(expected_ms);
        actual >= expected.saturating_sub(Duration::from_millis(1))
            && actual <= expected.saturating_add(Duration::from_millis(1))
    };
    if !within(report.p50_latency, 200) {
        return Err(format!("Unexpected p50: {:?}", report.p50_latency));
    }
    if !within(report.p99_latency, 300) {
        return Err(format!("Unexpected p99: {:?}", report.p99_latency));
    }
    Ok(())
}
