//! HTTP request/response data types.

use bytes::Bytes;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use std::fmt;

use crate::error::ApiError;

/// HTTP verb of a call. Fixed when the runner is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// GET and DELETE carry their payload in the query string; POST and PUT
    /// send it as a JSON body.
    pub fn encodes_payload_as_query(self) -> bool {
        matches!(self, Self::Get | Self::Delete)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved request, before any interceptor runs.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: Method,
    /// Absolute URL, including the query string for GET/DELETE.
    pub url: String,
    /// Family defaults merged with the call headers.
    pub headers: HeaderMap,
    /// JSON body for POST/PUT. Always `None` for GET/DELETE.
    pub body: Option<serde_json::Value>,
}

impl PreparedRequest {
    /// The query part of the URL, without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.url.split_once('?').map(|(_, q)| q)
    }
}

/// Response body as handed to the success hook.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Parsed body. Non-JSON text is kept as a JSON string and an empty body
    /// becomes `Null`.
    Json(serde_json::Value),
    /// Raw bytes, for downloadable calls.
    Bytes(Bytes),
}

impl ResponseBody {
    /// Parse a textual body leniently.
    pub fn from_text(text: &str) -> Self {
        if text.trim().is_empty() {
            return Self::Json(serde_json::Value::Null);
        }
        match serde_json::from_str(text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Json(serde_json::Value::String(text.to_string())),
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Bytes(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            Self::Json(_) => None,
        }
    }

    pub fn into_json(self) -> Option<serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Bytes(_) => None,
        }
    }

    pub fn into_bytes(self) -> Option<Bytes> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            Self::Json(_) => None,
        }
    }

    /// Deserialize the body into `T`. Byte bodies are parsed as JSON.
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        match self {
            Self::Json(value) => serde_json::from_value(value)
                .map_err(|e| ApiError::Deserialization(e.to_string())),
            Self::Bytes(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| ApiError::Deserialization(e.to_string())),
        }
    }
}

impl From<serde_json::Value> for ResponseBody {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl From<Bytes> for ResponseBody {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}
