use clap::{Args, Parser, Subcommand};
use std::time::Duration;

use crate::content::DEFAULT_MAX_PAYLOAD;

use super::parsers::parse_duration_arg;
use super::types::HttpMethod;

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Async HTTP stress tester: grow request headers and bodies to find server or proxy limits, or replay URL lists to measure throughput."
)]
pub struct ProbeArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Path to config file (TOML or JSON)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Enable debug logging (per-request payload sizes)
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Hammer one destination, optionally growing header/body payloads
    Test(TestArgs),
    /// Replay a list of URLs across a pool of workers
    Load(LoadArgs),
}

#[derive(Debug, Args, Clone, Default)]
pub struct ProxyArgs {
    /// Proxy server URL; may embed basic credentials (user:pass@host)
    #[arg(long, short = 'p')]
    pub proxy: Option<String>,

    /// Proxy user login
    #[arg(long = "proxy-user")]
    pub proxy_user: Option<String>,

    /// Proxy user password
    #[arg(long = "proxy-pass")]
    pub proxy_pass: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct TestArgs {
    /// Requests destination
    #[arg(long, short = 'd')]
    pub dest: Option<String>,

    /// Number of concurrent workers
    #[arg(long, short = 'w', default_value_t = 1)]
    pub workers: usize,

    /// Total requests across all workers, 0 = unlimited
    #[arg(long, short = 'l', default_value_t = 0)]
    pub limit: u64,

    /// Request method
    #[arg(long, short = 'm', default_value = "get", ignore_case = true)]
    pub method: HttpMethod,

    /// Maximum test duration in seconds, 0 = endless
    #[arg(long, short = 't', default_value_t = 0)]
    pub timeout: u64,

    /// Initial request header payload size (bytes), 0 = no header payload
    #[arg(long = "header-size", default_value_t = 0)]
    pub header_size: usize,

    /// Bytes added to the header payload after each request
    #[arg(long = "header-inc-rate", default_value_t = 0)]
    pub header_inc_rate: usize,

    /// Header payload multiplier applied after each request
    #[arg(long = "header-multi-rate", default_value_t = 1)]
    pub header_multi_rate: usize,

    /// Initial request body payload size (bytes), 0 = no body payload
    #[arg(long = "body-size", short = 'b', default_value_t = 0)]
    pub body_size: usize,

    /// Bytes added to the body payload after each request
    #[arg(long = "body-inc-rate", default_value_t = 0)]
    pub body_inc_rate: usize,

    /// Body payload multiplier applied after each request
    #[arg(long = "body-multi-rate", default_value_t = 1)]
    pub body_multi_rate: usize,

    /// Read the request body from a file instead of generating it
    #[arg(long = "body-from-file", conflicts_with = "body_size")]
    pub body_from_file: Option<String>,

    /// Upper bound for a grown payload (bytes)
    #[arg(long = "max-payload", default_value_t = DEFAULT_MAX_PAYLOAD)]
    pub max_payload: usize,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(long = "request-timeout", default_value = "10s", value_parser = parse_duration_arg)]
    pub request_timeout: Duration,

    #[command(flatten)]
    pub proxy: ProxyArgs,
}

#[derive(Debug, Args, Clone)]
pub struct LoadArgs {
    /// Path to the URL list (XML/TOML/JSON request list or newline-delimited)
    #[arg(long, short = 'l')]
    pub list: Option<String>,

    /// Number of concurrent workers
    #[arg(long, short = 'w', default_value_t = 1)]
    pub workers: usize,

    /// Maximum test duration in seconds, 0 = endless
    #[arg(long, short = 't', default_value_t = 0)]
    pub timeout: u64,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(long = "request-timeout", default_value = "10s", value_parser = parse_duration_arg)]
    pub request_timeout: Duration,

    #[command(flatten)]
    pub proxy: ProxyArgs,
}
