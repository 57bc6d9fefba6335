use std::time::Duration;

use reqwest::{Client, redirect};
use tracing::error;

use crate::args::DEFAULT_USER_AGENT;
use crate::error::HttpError;

use super::proxy::ProxyTarget;

/// Upper bound for the TCP connect phase of a request.
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds the HTTP/1.1 client one worker uses for its whole run.
///
/// Redirects are not followed so a 302 is observed as such.
///
/// # Errors
///
/// Returns an error when the proxy is invalid or the client cannot be built.
pub fn build_client(
    request_timeout: Duration,
    proxy: Option<&ProxyTarget>,
) -> Result<Client, HttpError> {
    let mut client_builder = Client::builder()
        .timeout(request_timeout)
        .connect_timeout(request_timeout.min(MAX_CONNECT_TIMEOUT))
        .user_agent(DEFAULT_USER_AGENT)
        .redirect(redirect::Policy::none())
        .http1_only();

    client_builder = match proxy {
        Some(proxy) => client_builder.proxy(proxy.to_reqwest()?),
        None => client_builder.no_proxy(),
    };

    client_builder.build().map_err(|err| {
        error!("Failed to build HTTP client: {}", err);
        HttpError::BuildClientFailed { source: err }
    })
}
