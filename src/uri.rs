//! URI handling: absolute/relative resolution and fragment manipulation.
use fluent_uri::UriRef;
use once_cell::sync::Lazy;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::error::SchemaError;

pub(crate) type Uri = fluent_uri::Uri<String>;

/// Base URI for schemas that do not declare one.
pub(crate) static DEFAULT_ROOT_URI: Lazy<Uri> =
    Lazy::new(|| Uri::parse("json-schema:///".to_string()).expect("Invalid URI"));

/// Characters that need escaping inside a URI fragment.
const FRAGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'%')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'^')
    .add(b'[')
    .add(b']');

/// Parse a string into an absolute URI, resolving relative inputs against
/// the default root.
pub(crate) fn from_str(uri: &str) -> Result<Uri, SchemaError> {
    let reference =
        UriRef::parse(uri).map_err(|error| SchemaError::invalid_uri(uri, error))?;
    if reference.has_scheme() {
        Ok(fluent_uri::Uri::parse(reference.as_str())
            .map_err(|error| SchemaError::invalid_uri(uri, error))?
            .normalize())
    } else {
        Ok(reference
            .resolve_against(&DEFAULT_ROOT_URI.borrow())
            .map_err(|error| SchemaError::invalid_uri(uri, error))?
            .normalize())
    }
}

/// Resolve `reference` against `base` and return the target URI.
///
/// A fragment-only reference replaces the base's fragment directly, which
/// also covers opaque bases such as `urn:` that reference transformation
/// cannot handle.
pub(crate) fn resolve_against(base: &Uri, reference: &str) -> Result<Uri, SchemaError> {
    if reference.is_empty() {
        return from_str(fragmentless_str(base.as_str()));
    }
    if let Some(fragment) = reference.strip_prefix('#') {
        let mut target = fragmentless_str(base.as_str()).to_string();
        target.push('#');
        target.push_str(fragment);
        return Uri::parse(target.clone())
            .map_err(|error| SchemaError::invalid_uri(target, error));
    }
    let parsed =
        UriRef::parse(reference).map_err(|error| SchemaError::invalid_uri(reference, error))?;
    let base = from_str(fragmentless_str(base.as_str()))?;
    Ok(parsed
        .resolve_against(&base.borrow())
        .map_err(|error| SchemaError::invalid_uri(reference, error))?
        .normalize())
}

/// The URI string without its fragment.
pub(crate) fn fragmentless_str(uri: &str) -> &str {
    uri.split_once('#').map_or(uri, |(base, _)| base)
}

/// Split a URI string into its fragmentless part and raw fragment.
pub(crate) fn split_fragment(uri: &str) -> (&str, Option<&str>) {
    match uri.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (uri, None),
    }
}

/// Percent-decode a raw fragment.
pub(crate) fn decode_fragment(fragment: &str) -> String {
    percent_decode_str(fragment)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| fragment.to_string())
}

/// Append a percent-encoded fragment to `buffer`.
pub(crate) fn encode_fragment_to(fragment: &str, buffer: &mut String) {
    for piece in utf8_percent_encode(fragment, FRAGMENT) {
        buffer.push_str(piece);
    }
}

#[cfg(test)]
mod tests {
    use super::{from_str, resolve_against, split_fragment};
    use test_case::test_case;

    #[test_case("https://example.com/root.json", "other.json", "https://example.com/other.json")]
    #[test_case("https://example.com/a/b.json", "../c.json", "https://example.com/c.json")]
    #[test_case("https://example.com/a", "#/defs/x", "https://example.com/a#/defs/x")]
    #[test_case("https://example.com/a#frag", "#other", "https://example.com/a#other")]
    #[test_case("urn:uuid:deadbeef-1234-0000-0000-4321feebdaed", "#anchor", "urn:uuid:deadbeef-1234-0000-0000-4321feebdaed#anchor")]
    #[test_case("https://example.com/a", "https://other.test/b", "https://other.test/b")]
    fn resolution(base: &str, reference: &str, expected: &str) {
        let base = from_str(base).expect("valid base");
        let resolved = resolve_against(&base, reference).expect("resolvable");
        assert_eq!(resolved.as_str(), expected);
    }

    #[test]
    fn relative_inputs_land_under_the_default_root() {
        let uri = from_str("relative/schema.json").expect("valid");
        assert_eq!(uri.as_str(), "json-schema:///relative/schema.json");
    }

    #[test]
    fn fragment_splitting() {
        assert_eq!(
            split_fragment("https://example.com/a#/b/c"),
            ("https://example.com/a", Some("/b/c"))
        );
        assert_eq!(
            split_fragment("https://example.com/a"),
            ("https://example.com/a", None)
        );
    }
}
