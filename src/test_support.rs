//! Local HTTP/1.1 server for unit tests.
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};

const IO_TIMEOUT: Duration = Duration::from_secs(5);

pub(crate) fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub sample_header: Option<usize>,
    pub proxy_authorization: Option<String>,
    pub body_len: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct MockConfig {
    pub status: u16,
    pub body: &'static str,
    pub delay: Duration,
    /// Answer 431 once the sample header grows past this size.
    pub max_header: Option<usize>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            status: 200,
            body: "ok",
            delay: Duration::ZERO,
            max_header: None,
        }
    }
}

pub(crate) struct MockServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    task: JoinHandle<()>,
}

impl MockServer {
    pub(crate) async fn start(config: MockConfig) -> Result<Self, String> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|err| format!("Failed to bind mock server: {}", err))?;
        let addr = listener
            .local_addr()
            .map_err(|err| format!("Failed to read mock server addr: {}", err))?;
        let requests = Arc::new(Mutex::new(Vec::new()));
        let shared = Arc::clone(&requests);
        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let shared = Arc::clone(&shared);
                let config = config.clone();
                tokio::spawn(async move {
                    drop(handle_connection(stream, &config, &shared).await);
                });
            }
        });
        Ok(Self {
            addr,
            requests,
            task,
        })
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub(crate) fn requests(&self) -> Result<Vec<RecordedRequest>, String> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .map_err(|err| format!("Mock server state poisoned: {}", err))
    }

    pub(crate) fn request_count(&self) -> Result<usize, String> {
        self.requests().map(|requests| requests.len())
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    config: &MockConfig,
    requests: &Mutex<Vec<RecordedRequest>>,
) -> Result<(), String> {
    let mut buffer = Vec::with_capacity(1024);
    let head_end = loop {
        let mut chunk = [0_u8; 4096];
        let read = timeout(IO_TIMEOUT, stream.read(&mut chunk))
            .await
            .map_err(|_err| "read timed out".to_owned())?
            .map_err(|err| format!("read failed: {}", err))?;
        if read == 0 {
            return Ok(());
        }
        buffer.extend_from_slice(chunk.get(..read).unwrap_or_default());
        if let Some(pos) = buffer.windows(4).position(|bytes| bytes == b"\r\n\r\n") {
            break pos.saturating_add(4);
        }
    };

    let head = String::from_utf8_lossy(buffer.get(..head_end).unwrap_or_default()).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split(' ');
    let method = request_line.next().unwrap_or_default().to_owned();
    let path = request_line.next().unwrap_or_default().to_owned();

    let mut content_length = 0_usize;
    let mut sample_header = None;
    let mut proxy_authorization = None;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match name.trim().to_ascii_lowercase().as_str() {
            "content-length" => content_length = value.parse().unwrap_or(0),
            "sample-header" => sample_header = Some(value.len()),
            "proxy-authorization" => proxy_authorization = Some(value.to_owned()),
            _ => {}
        }
    }

    let mut body_len = buffer.len().saturating_sub(head_end);
    while body_len < content_length {
        let mut chunk = [0_u8; 4096];
        let read = timeout(IO_TIMEOUT, stream.read(&mut chunk))
            .await
            .map_err(|_err| "body read timed out".to_owned())?
            .map_err(|err| format!("body read failed: {}", err))?;
        if read == 0 {
            break;
        }
        body_len = body_len.saturating_add(read);
    }

    let status = match (config.max_header, sample_header) {
        (Some(max), Some(size)) if size > max => 431,
        _ => config.status,
    };
    if let Ok(mut guard) = requests.lock() {
        guard.push(RecordedRequest {
            method,
            path,
            sample_header,
            proxy_authorization,
            body_len,
        });
    }

    if !config.delay.is_zero() {
        sleep(config.delay).await;
    }
    let response = format!(
        "HTTP/1.1 {} Mock\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        config.body.len(),
        config.body
    );
    timeout(IO_TIMEOUT, stream.write_all(response.as_bytes()))
        .await
        .map_err(|_err| "write timed out".to_owned())?
        .map_err(|err| format!("write failed: {}", err))?;
    Ok(())
}
