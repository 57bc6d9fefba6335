use std::sync::Arc;
use std::thread;

use bytes::Bytes;

use super::*;
use crate::error::ContentError;

fn grow_sizes(content: &dyn GrowableContent, rounds: usize) -> Result<Vec<usize>, String> {
    let mut sizes = Vec::with_capacity(rounds);
    for _ in 0..rounds {
        let payload = content
            .grow()
            .map_err(|err| format!("grow failed: {}", err))?;
        sizes.push(payload.len());
    }
    Ok(sizes)
}

#[test]
fn increment_grows_linearly() -> Result<(), String> {
    let content = Content::new(10, 5, 0);
    let sizes = grow_sizes(&content, 3)?;
    if sizes != vec![10, 15, 20] {
        return Err(format!("Unexpected sizes: {:?}", sizes));
    }
    Ok(())
}

#[test]
fn multiplier_grows_geometrically() -> Result<(), String> {
    let content = Content::new(2, 0, 3);
    let sizes = grow_sizes(&content, 4)?;
    if sizes != vec![2, 6, 18, 54] {
        return Err(format!("Unexpected sizes: {:?}", sizes));
    }
    Ok(())
}

#[test]
fn increment_takes_priority_over_multiplier() -> Result<(), String> {
    let content = Content::new(4, 1, 10);
    let sizes = grow_sizes(&content, 3)?;
    if sizes != vec![4, 5, 6] {
        return Err(format!("Unexpected sizes: {:?}", sizes));
    }
    Ok(())
}

#[test]
fn static_payload_is_reused() -> Result<(), String> {
    let content = Content::new(8, 0, 1);
    let first = content.grow().map_err(|err| err.to_string())?;
    let second = content.grow().map_err(|err| err.to_string())?;
    if first != second {
        return Err("Static payload changed between calls".to_owned());
    }
    if content.current_size() != 8 {
        return Err(format!("Unexpected size {}", content.current_size()));
    }
    Ok(())
}

#[test]
fn grown_payload_keeps_its_prefix() -> Result<(), String> {
    let content = Content::new(16, 16, 0);
    let first = content.grow().map_err(|err| err.to_string())?;
    let second = content.grow().map_err(|err| err.to_string())?;
    if !second.starts_with(&first) {
        return Err("Grown payload did not extend the previous one".to_owned());
    }
    if !second.iter().all(u8::is_ascii_alphanumeric) {
        return Err("Payload contains non alphanumeric bytes".to_owned());
    }
    Ok(())
}

#[test]
fn growth_past_limit_is_rejected() -> Result<(), String> {
    let content = Content::with_limit(10, 0, 2, 30);
    let sizes = grow_sizes(&content, 2)?;
    if sizes != vec![10, 20] {
        return Err(format!("Unexpected sizes: {:?}", sizes));
    }
    match content.grow() {
        Err(ContentError::Overflow { requested, limit }) => {
            if requested != 40 || limit != 30 {
                return Err(format!("Unexpected overflow {} / {}", requested, limit));
            }
        }
        Err(err) => return Err(format!("Unexpected error: {}", err)),
        Ok(payload) => return Err(format!("Expected overflow, got {} bytes", payload.len())),
    }
    if content.current_size() != 20 {
        return Err("Overflow must leave the payload untouched".to_owned());
    }
    Ok(())
}

#[test]
fn arithmetic_overflow_is_reported() -> Result<(), String> {
    let content = Content::with_limit(1, usize::MAX, 0, usize::MAX);
    content.grow().map_err(|err| err.to_string())?;
    match content.grow() {
        Err(ContentError::Overflow { .. }) => {}
        Err(err) => return Err(format!("Unexpected error: {}", err)),
        Ok(_) => return Err("Expected overflow".to_owned()),
    }
    match content.grow() {
        Err(ContentError::Overflow { .. }) => Ok(()),
        Err(err) => Err(format!("Unexpected error: {}", err)),
        Ok(_) => Err("Expected overflow to repeat".to_owned()),
    }
}

#[test]
fn initial_size_above_limit_is_rejected() -> Result<(), String> {
    let content = Content::with_limit(64, 0, 0, 32);
    match content.grow() {
        Err(ContentError::Overflow { requested: 64, limit: 32 }) => Ok(()),
        other => Err(format!("Unexpected result: {:?}", other.map(|p| p.len()))),
    }
}

#[test]
fn concurrent_growth_is_linearized() -> Result<(), String> {
    const THREADS: usize = 8;
    const ROUNDS: usize = 25;
    let content = Arc::new(Content::new(1, 1, 0));

    let mut handles = Vec::with_capacity(THREADS);
    for _ in 0..THREADS {
        let content = Arc::clone(&content);
        handles.push(thread::spawn(move || -> Result<Vec<usize>, String> {
            let mut seen = Vec::with_capacity(ROUNDS);
            for _ in 0..ROUNDS {
                let payload = content.grow().map_err(|err| err.to_string())?;
                seen.push(payload.len());
            }
            Ok(seen)
        }));
    }

    let mut all = Vec::with_capacity(THREADS * ROUNDS);
    for handle in handles {
        let seen = handle
            .join()
            .map_err(|_panic| "grow thread panicked".to_owned())??;
        if seen.windows(2).any(|pair| matches!(pair, [a, b] if b <= a)) {
            return Err(format!("Sizes not increasing per thread: {:?}", seen));
        }
        all.extend(seen);
    }
    all.sort_unstable();
    let expected: Vec<usize> = (1..=THREADS * ROUNDS).collect();
    if all != expected {
        return Err("Each growth step must be observed exactly once".to_owned());
    }
    Ok(())
}

#[test]
fn file_content_never_grows() -> Result<(), String> {
    let content = FileContent::from_bytes(Bytes::from_static(b"fixed body"));
    for _ in 0..3 {
        let payload = content.grow().map_err(|err| err.to_string())?;
        if payload.as_ref() != b"fixed body" {
            return Err("File payload changed".to_owned());
        }
    }
    if content.current_size() != 10 {
        return Err(format!("Unexpected size {}", content.current_size()));
    }
    Ok(())
}

#[test]
fn file_content_reads_from_disk() -> Result<(), String> {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("body.bin");
    std::fs::write(&path, b"from disk").map_err(|err| err.to_string())?;
    let content = FileContent::from_path(&path).map_err(|err| err.to_string())?;
    let payload = content.grow().map_err(|err| err.to_string())?;
    if payload.as_ref() != b"from disk" {
        return Err("Unexpected file payload".to_owned());
    }
    if FileContent::from_path(&dir.path().join("missing")).is_ok() {
        return Err("Expected error for missing file".to_owned());
    }
    Ok(())
}
