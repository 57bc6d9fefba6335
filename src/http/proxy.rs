use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use reqwest::header::{HeaderMap, HeaderValue, PROXY_AUTHORIZATION};
use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::{HttpError, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyCredentials {
    pub user: String,
    pub password: Option<String>,
}

impl ProxyCredentials {
    /// `Basic base64(user:password)`; a missing password encodes as empty.
    #[must_use]
    pub fn basic_value(&self) -> String {
        let pair = format!("{}:{}", self.user, self.password.as_deref().unwrap_or(""));
        format!("Basic {}", B64.encode(pair))
    }
}

/// Proxy endpoint every worker of a run connects through.
#[derive(Debug, Clone)]
pub struct ProxyTarget {
    url: Url,
    credentials: Option<ProxyCredentials>,
}

impl ProxyTarget {
    /// Parses a proxy endpoint. A bare `host:port` is treated as plain HTTP.
    /// Explicit `user`/`password` win over credentials embedded in the URL.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL cannot be parsed, has no host, or uses a
    /// scheme other than http/https.
    pub fn parse(
        raw: &str,
        user: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        let normalized = if raw.starts_with("http://") || raw.starts_with("https://") {
            raw.to_owned()
        } else {
            format!("http://{}", raw)
        };
        let mut url = Url::parse(&normalized).map_err(|err| ValidationError::InvalidProxyUrl {
            url: raw.to_owned(),
            source: err,
        })?;
        if url.host_str().is_none() {
            return Err(ValidationError::UrlMissingHost {
                url: raw.to_owned(),
            });
        }

        let embedded = if url.username().is_empty() {
            None
        } else {
            Some(ProxyCredentials {
                user: decode_userinfo(url.username()),
                password: url.password().map(decode_userinfo),
            })
        };
        let credentials = match user.filter(|value| !value.is_empty()) {
            Some(user) => Some(ProxyCredentials {
                user: user.to_owned(),
                password: password.map(ToOwned::to_owned),
            }),
            None => embedded,
        };

        if url.set_username("").is_err() || url.set_password(None).is_err() {
            return Err(ValidationError::ProxyCredentialsRejected {
                url: raw.to_owned(),
            });
        }

        Ok(Self { url, credentials })
    }

    /// Proxy URL with credentials stripped.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub const fn credentials(&self) -> Option<&ProxyCredentials> {
        self.credentials.as_ref()
    }

    /// Builds the reqwest proxy; credentials ride on every proxied request as
    /// a `Proxy-Authorization` header.
    ///
    /// # Errors
    ///
    /// Returns an error when reqwest rejects the proxy URL or the encoded
    /// credentials are not a valid header value.
    pub fn to_reqwest(&self) -> Result<reqwest::Proxy, HttpError> {
        let mut proxy =
            reqwest::Proxy::all(self.url.as_str()).map_err(|err| HttpError::InvalidProxy {
                url: self.url.to_string(),
                source: err,
            })?;
        if let Some(credentials) = self.credentials.as_ref() {
            let value = HeaderValue::from_str(&credentials.basic_value())
                .map_err(|err| HttpError::InvalidProxyCredentials { source: err })?;
            let mut headers = HeaderMap::new();
            headers.insert(PROXY_AUTHORIZATION, value);
            proxy = proxy.headers(headers);
        }
        Ok(proxy)
    }
}

impl std::fmt::Display for ProxyTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.credentials.as_ref() {
            Some(credentials) => write!(f, "{} (user {})", self.url, credentials.user),
            None => write!(f, "{}", self.url),
        }
    }
}

/// URL userinfo is kept percent-encoded; the proxy expects the raw text.
fn decode_userinfo(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}
