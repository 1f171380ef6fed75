//! Request execution and the uniform response wrapper.
//!
//! Every call goes through [`ServeRestClient::send`](crate::ServeRestClient),
//! which logs the outgoing request and the response, then captures the
//! exchange as an [`ApiResponse`] regardless of status code.

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Log previews of bodies are cut to this many characters.
const LOG_PREVIEW_CHARS: usize = 200;

/// A completed HTTP exchange.
///
/// `body` is the parsed JSON body, or an empty object when the body is not
/// valid JSON.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    text: String,
    body: Value,
    headers: HeaderMap,
}

impl ApiResponse {
    /// Build a response from its raw parts, parsing the body best-effort.
    #[must_use]
    pub fn from_parts(status: StatusCode, headers: HeaderMap, text: String) -> Self {
        let body = serde_json::from_str(&text).unwrap_or_else(|_| Value::Object(Map::new()));
        Self {
            status,
            text,
            body,
            headers,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Raw response text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parsed JSON body (empty object if unparseable).
    #[must_use]
    pub const fn body(&self) -> &Value {
        &self.body
    }

    /// Response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Whether the parsed body carries no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.body {
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Null => true,
            _ => false,
        }
    }

    /// A top-level field of the body.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.body.get(key).filter(|value| !value.is_null())
    }

    /// A top-level string field of the body.
    #[must_use]
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(Value::as_str)
    }

    /// The human-readable `message` the API attaches to most responses.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.str_field("message")
    }

    /// The `_id` of a created entity.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.str_field("_id")
    }

    /// Decode the whole body into `T`.
    ///
    /// # Errors
    ///
    /// Returns the decoding error if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.body)
    }

    /// Decode the list stored under `key` (e.g. `usuarios` in a search result).
    ///
    /// A missing key yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns the decoding error if an element does not match `T`.
    pub fn list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, serde_json::Error> {
        self.field(key)
            .map_or_else(|| Ok(Vec::new()), |items| Vec::<T>::deserialize(items))
    }
}

/// Cut a body down for logging, marking the cut with an ellipsis.
pub(crate) fn preview(body: &str) -> String {
    if body.chars().count() <= LOG_PREVIEW_CHARS {
        return body.to_string();
    }
    let mut cut: String = body.chars().take(LOG_PREVIEW_CHARS).collect();
    cut.push_str("...");
    cut
}

/// Render request headers for logging with credentials masked.
pub(crate) fn redacted_headers(headers: &HeaderMap) -> String {
    let rendered: Vec<String> = headers
        .iter()
        .map(|(name, value)| {
            if *name == reqwest::header::AUTHORIZATION {
                format!("{name}: [REDACTED]")
            } else {
                format!("{name}: {}", value.to_str().unwrap_or("<binary>"))
            }
        })
        .collect();
    rendered.join(", ")
}
