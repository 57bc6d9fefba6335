//! Core library for the `loadprobe` CLI.
//!
//! `loadprobe` drives a pool of concurrent HTTP workers against a target.
//! Generic workers hammer one destination while growing a header and/or body
//! payload after every request, which finds the size at which a server or
//! proxy starts rejecting requests. Replay workers share a fixed list of URLs
//! and measure throughput. The [`dispatcher::Dispatcher`] owns the pool, stops
//! it on interrupt or timeout, and aggregates a [`metrics::RunReport`].
pub mod args;
pub mod config;
pub mod content;
pub mod dispatcher;
pub mod error;
pub mod http;
pub mod logger;
pub mod metrics;
pub mod shutdown;
pub mod shutdown_handlers;

#[cfg(test)]
mod test_support;
