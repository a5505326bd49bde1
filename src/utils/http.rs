// src/utils/http.rs

//! HTTP client utilities.

use reqwest::header::{CONTENT_TYPE, HeaderMap};
use url::Url;

use crate::error::Result;
use crate::models::ApiConfig;

/// Create the asynchronous HTTP client used for every outbound request.
///
/// No client-wide timeout is set; detail attempts carry their own.
pub fn create_async_client(config: &ApiConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .build()?;
    Ok(client)
}

/// Build the detail URL for one id, e.g. `.../appdetails?appids=42`.
pub fn detail_url(base: &str, id_param: &str, id: u64) -> Result<Url> {
    let url = Url::parse_with_params(base, &[(id_param, id.to_string())])?;
    Ok(url)
}

/// Content type of a response, if present and readable.
pub fn content_type(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// Whether a content type denotes a JSON payload.
pub fn is_json(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"))
}
