//! HTTP Headers Utility
//!
//! Builds the outgoing header set for a call: family defaults first, then
//! call headers layered on top.

use crate::error::ApiError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;

/// HTTP header builder for API requests
pub struct HttpHeaderBuilder {
    headers: HeaderMap,
}

impl HttpHeaderBuilder {
    /// Create a new header builder
    pub fn new() -> Self {
        Self {
            headers: HeaderMap::new(),
        }
    }

    /// Add a custom header, replacing any value under the same name
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, ApiError> {
        let (name, value) = parse_header(name, value)?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Add multiple custom headers from a HashMap
    pub fn with_custom_headers(
        mut self,
        custom_headers: &HashMap<String, String>,
    ) -> Result<Self, ApiError> {
        for (key, value) in custom_headers {
            let (name, value) = parse_header(key, value)?;
            self.headers.insert(name, value);
        }
        Ok(self)
    }

    /// Build the final HeaderMap
    pub fn build(self) -> HeaderMap {
        self.headers
    }
}

impl Default for HttpHeaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), ApiError> {
    let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
        ApiError::Configuration(format!("Invalid header name '{name}': {e}"))
    })?;
    let header_value = HeaderValue::from_str(value).map_err(|e| {
        ApiError::Configuration(format!("Invalid header value for '{name}': {e}"))
    })?;
    Ok((header_name, header_value))
}

/// Resolve the outgoing headers: `defaults` first, `call` headers win on
/// conflicting names (compared case-insensitively).
pub fn resolve_headers(
    defaults: &HashMap<String, String>,
    call: &HashMap<String, String>,
) -> Result<HeaderMap, ApiError> {
    let mut normalized = HashMap::with_capacity(defaults.len());
    merge_header_maps(&mut normalized, defaults.clone());
    Ok(HttpHeaderBuilder::new()
        .with_custom_headers(&normalized)?
        .with_custom_headers(call)?
        .build())
}

/// Shallow-merge `extra` into `base`, normalizing names to lowercase so that
/// `Accept` and `accept` land on the same key.
///
/// When `extra` itself spells one name several ways, entries are applied in
/// byte order of their original names, so the all-lowercase spelling wins.
pub fn merge_header_maps(base: &mut HashMap<String, String>, extra: HashMap<String, String>) {
    let mut entries: Vec<_> = extra.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    for (k, v) in entries {
        base.insert(k.to_ascii_lowercase(), v);
    }
}
