use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("Invalid proxy '{url}': {source}")]
    InvalidProxy {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Invalid proxy credentials: {source}")]
    InvalidProxyCredentials {
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },
    #[error("Failed to read URL list '{path}': {source}")]
    ReadUrlList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("URL list '{path}' was empty.")]
    UrlListEmpty { path: PathBuf },
}
