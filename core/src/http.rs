//! Request descriptors and HTTP transport types.
//!
//! # Design
//! A `RequestDescriptor` is the `{url, method, data?, params?}` value every
//! `BookClient::build_*` method produces. It carries the endpoint path only;
//! turning it into a concrete URL (base URL, query string) is the job of
//! whichever dispatcher executes it, through `resolve_url`.
//!
//! All fields use owned types so descriptors can be moved into async
//! dispatchers and across threads without lifetime concerns.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::ApiError;

/// HTTP method for a request. Serializes to the lowercase verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outbound call described as plain data.
///
/// `data` is the JSON body and is only set for create/update; `params` is a
/// JSON object of query parameters and is only set for delete/find/list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    pub url: String,
    pub method: HttpMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl RequestDescriptor {
    /// Join `base_url` with the endpoint path and append `params` as a
    /// query string.
    pub fn resolve_url(&self, base_url: &str) -> Result<Url, ApiError> {
        let raw = format!("{}{}", base_url.trim_end_matches('/'), self.url);
        let mut url = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))?;

        let pairs = self.params.as_ref().map(query_pairs).unwrap_or_default();
        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in &pairs {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

/// Flatten a JSON params object into query pairs.
///
/// Arrays are sent as repeated `key[]` entries, `null` values are dropped and
/// nested objects travel as their JSON text. Keys come out in the map's
/// iteration order.
pub fn query_pairs(params: &Value) -> Vec<(String, String)> {
    let Some(map) = params.as_object() else {
        return Vec::new();
    };

    let mut pairs = Vec::new();
    for (key, value) in map {
        match value {
            Value::Array(items) => {
                let key = format!("{key}[]");
                pairs.extend(items.iter().filter_map(scalar).map(|v| (key.clone(), v)));
            }
            other => {
                if let Some(v) = scalar(other) {
                    pairs.push((key.clone(), v));
                }
            }
        }
    }
    pairs
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// An HTTP response described as plain data.
///
/// Produced by a dispatcher (or a host executing a descriptor itself), then
/// passed to `BookClient::parse_*` methods for decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}
