use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{AppError, AppResult, ConfigError, HttpError};

use super::loader::parse_document;

/// Structured request list. Entries may also carry `method` and `version`;
/// replay always issues GET over HTTP/1.1 so those keys are ignored.
#[derive(Debug, Deserialize)]
struct RequestList {
    #[serde(default, alias = "requests")]
    request: Vec<RequestEntry>,
}

#[derive(Debug, Deserialize)]
struct RequestEntry {
    url: String,
}

/// XML request list: `<for><request><http url=".." method=".." version=".."/></request></for>`,
/// either wrapped in an outer root element or with `<for>` as the root.
#[derive(Debug, Deserialize)]
struct XmlRequestList {
    #[serde(rename = "for", default)]
    block: Option<XmlRequests>,
    #[serde(default)]
    request: Vec<XmlRequest>,
}

#[derive(Debug, Deserialize)]
struct XmlRequests {
    #[serde(default)]
    request: Vec<XmlRequest>,
}

#[derive(Debug, Deserialize)]
struct XmlRequest {
    http: XmlHttp,
}

#[derive(Debug, Deserialize)]
struct XmlHttp {
    #[serde(rename = "@url")]
    url: String,
}

fn parse_xml_list(path: &Path, content: &str) -> AppResult<Vec<String>> {
    let list: XmlRequestList = quick_xml::de::from_str(content).map_err(|err| {
        AppError::config(ConfigError::ParseXml {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    let nested = list.block.map(|block| block.request).unwrap_or_default();
    Ok(nested
        .into_iter()
        .chain(list.request)
        .map(|entry| entry.http.url)
        .collect())
}

/// Reads the URLs a `load` run replays.
///
/// `.xml`, `.toml` and `.json` files hold a list of `request` entries; any
/// other file is read as one URL per line, skipping blanks and `#` comments.
///
/// # Errors
///
/// Returns an error when the file cannot be read or parsed, or holds no URL.
pub fn load_url_list(path: &Path) -> AppResult<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        AppError::http(HttpError::ReadUrlList {
            path: path.to_path_buf(),
            source: err,
        })
    })?;

    let urls: Vec<String> = match path.extension().and_then(|ext| ext.to_str()) {
        Some("xml") => parse_xml_list(path, &content)?
            .into_iter()
            .map(|url| url.trim().to_owned())
            .filter(|url| !url.is_empty())
            .collect(),
        Some("toml" | "json") => parse_document::<RequestList>(path, &content)?
            .request
            .into_iter()
            .map(|entry| entry.url.trim().to_owned())
            .filter(|url| !url.is_empty())
            .collect(),
        Some(_) | None => content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(ToOwned::to_owned)
            .collect(),
    };

    if urls.is_empty() {
        return Err(AppError::http(HttpError::UrlListEmpty {
            path: path.to_path_buf(),
        }));
    }
    debug!("Loaded {} URLs from {}", urls.len(), path.display());
    Ok(urls)
}
