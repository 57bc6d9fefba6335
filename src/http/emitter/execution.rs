use futures_util::StreamExt;

/// Diagnostic bodies are cut after this many bytes.
const DIAGNOSTIC_BODY_LIMIT: usize = 512;

pub(super) async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}

/// Reads the start of an unexpected response for error reporting.
pub(super) async fn read_diagnostic_body(response: reqwest::Response) -> String {
    let mut stream = response.bytes_stream();
    let mut collected: Vec<u8> = Vec::new();
    while let Some(chunk) = stream.next().await {
        let Ok(bytes) = chunk else {
            break;
        };
        let room = DIAGNOSTIC_BODY_LIMIT.saturating_sub(collected.len());
        collected.extend(bytes.iter().take(room));
        if collected.len() >= DIAGNOSTIC_BODY_LIMIT {
            break;
        }
    }
    String::from_utf8_lossy(&collected).trim().to_owned()
}
