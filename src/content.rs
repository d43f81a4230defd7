//! Content encodings and media types.
//!
//! Both registries pair a check with a conversion so the keywords can
//! propagate decoded/parsed values through annotations.
use base64::Engine;
use serde_json::Value;

/// A content encoding: decodes a string, `None` when the input is invalid.
pub trait ContentEncoding: Send + Sync + 'static {
    fn decode(&self, value: &str) -> Option<String>;
}

impl<F> ContentEncoding for F
where
    F: Fn(&str) -> Option<String> + Send + Sync + 'static,
{
    #[inline]
    fn decode(&self, value: &str) -> Option<String> {
        self(value)
    }
}

/// A content media type: parses a string into a JSON value, `None` when the
/// input cannot be parsed.
pub trait ContentMediaType: Send + Sync + 'static {
    fn parse(&self, value: &str) -> Option<Value>;
}

impl<F> ContentMediaType for F
where
    F: Fn(&str) -> Option<Value> + Send + Sync + 'static,
{
    #[inline]
    fn parse(&self, value: &str) -> Option<Value> {
        self(value)
    }
}

fn from_base64(value: &str) -> Option<String> {
    let decoded = base64::engine::general_purpose::STANDARD.decode(value).ok()?;
    String::from_utf8(decoded).ok()
}

fn from_json(value: &str) -> Option<Value> {
    serde_json::from_str(value).ok()
}

/// Built-in encodings: `base64`.
pub(crate) fn builtin_encoding(name: &str) -> Option<fn(&str) -> Option<String>> {
    match name {
        "base64" => Some(from_base64),
        _ => None,
    }
}

/// Built-in media types: `application/json`.
pub(crate) fn builtin_media_type(name: &str) -> Option<fn(&str) -> Option<Value>> {
    match name {
        "application/json" => Some(from_json),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{from_base64, from_json};
    use serde_json::json;

    #[test]
    fn base64_decodes_utf8_payloads() {
        assert_eq!(from_base64("aGVsbG8="), Some("hello".to_string()));
        assert_eq!(from_base64("not base64!"), None);
    }

    #[test]
    fn json_parses_documents() {
        assert_eq!(from_json(r#"{"a": 1}"#), Some(json!({"a": 1})));
        assert_eq!(from_json("{"), None);
    }
}
