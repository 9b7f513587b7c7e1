//! Query-string encoding for GET/DELETE payloads.
//!
//! Follows the `qs` conventions used by browser API clients: nested objects
//! become `a[b]=v`, arrays become `a[0]=v`, keys keep the caller's insertion
//! order and both keys and values are RFC 3986 percent-encoded.

use serde_json::Value;

/// Encode a payload mapping into a query string (without the leading `?`).
///
/// Top-level arrays use their indices as keys. Top-level scalars and `null`
/// have no keys and encode to an empty string.
pub fn to_query_string(payload: &Value) -> String {
    let mut pairs = Vec::new();
    match payload {
        Value::Object(map) => {
            for (key, value) in map {
                collect_pairs(key, value, &mut pairs);
            }
        }
        Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                collect_pairs(&index.to_string(), value, &mut pairs);
            }
        }
        _ => {}
    }
    pairs.join("&")
}

/// Append `url` with the encoded payload, if the payload yields any pairs.
pub fn append_query(url: &str, payload: &Value) -> String {
    let query = to_query_string(payload);
    if query.is_empty() {
        return url.to_string();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{query}")
}

fn collect_pairs(prefix: &str, value: &Value, pairs: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                collect_pairs(&format!("{prefix}[{key}]"), nested, pairs);
            }
        }
        Value::Array(items) => {
            for (index, nested) in items.iter().enumerate() {
                collect_pairs(&format!("{prefix}[{index}]"), nested, pairs);
            }
        }
        Value::Null => pairs.push(format!("{}=", urlencoding::encode(prefix))),
        Value::String(s) => pairs.push(encode_pair(prefix, s)),
        Value::Bool(b) => pairs.push(encode_pair(prefix, &b.to_string())),
        Value::Number(n) => pairs.push(encode_pair(prefix, &number_text(n))),
    }
}

/// Integers print as-is. Floats use the shortest form, so `1.0` is `1`.
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() => f.to_string(),
        _ => n.to_string(),
    }
}

fn encode_pair(key: &str, value: &str) -> String {
    format!(
        "{}={}",
        urlencoding::encode(key),
        urlencoding::encode(value)
    )
}
