use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing destination (set --dest or provide it in config).")]
    MissingDestination,
    #[error("Missing URL list (set --list or provide it in config).")]
    MissingUrlList,
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("URL '{url}' is missing a host.")]
    UrlMissingHost { url: String },
    #[error("Unsupported URL scheme '{scheme}'. Use http or https.")]
    UnsupportedScheme { scheme: String },
    #[error("Invalid proxy URL '{url}': {source}")]
    InvalidProxyUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Proxy URL '{url}' cannot carry credentials.")]
    ProxyCredentialsRejected { url: String },
    #[error("Worker count must be >= 1.")]
    ZeroWorkers,
    #[error("Body testing is not allowed for {method} requests.")]
    BodyNotAllowed { method: &'static str },
    #[error("Cannot combine --body-size with --body-from-file.")]
    BodySizeAndFileConflict,
    #[error("Initial {section} size must be > 0.")]
    ZeroInitialSize { section: &'static str },
    #[error("Initial {section} size {size} exceeds the {limit} byte payload limit.")]
    InitialSizeTooLarge {
        section: &'static str,
        size: usize,
        limit: usize,
    },
    #[error("Invalid method '{value}'. Use get, head, post, put, patch, or delete.")]
    InvalidMethod { value: String },
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("Failed to build runtime: {source}")]
    RuntimeBuildFailed {
        #[source]
        source: std::io::Error,
    },
}
