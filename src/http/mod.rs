//! HTTP clients, proxy handling and the request workers.
mod client;
pub mod emitter;
mod proxy;
mod url_queue;


pub use client::build_client;
pub use emitter::{
    CompletionGuard, Emitter, GenericEmitter, ReplayEmitter, RequestCounter, WorkerContext,
};
pub use proxy::{ProxyCredentials, ProxyTarget};
pub use url_queue::UrlQueue;
