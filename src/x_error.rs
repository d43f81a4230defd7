//! The `x-error` overlay: per-schema custom error messages.
use ahash::AHashMap;
use serde_json::{Map, Value};

/// A parsed `x-error` value: a single message for every failure produced
/// from the schema, or a per-keyword map with `^` (schema-level source) and
/// `*` (fallback) entries.
#[derive(Debug, Clone)]
pub(crate) enum XError {
    Single(Box<str>),
    Map(AHashMap<String, Box<str>>),
}

impl XError {
    /// Parse the overlay from a schema object, when present.
    pub(crate) fn parse(schema: &Map<String, Value>) -> Option<XError> {
        match schema.get("x-error")? {
            Value::String(message) => Some(XError::Single(message.as_str().into())),
            Value::Object(map) => {
                let entries = map
                    .iter()
                    .filter_map(|(keyword, message)| {
                        message
                            .as_str()
                            .map(|message| (keyword.clone(), message.into()))
                    })
                    .collect::<AHashMap<String, Box<str>>>();
                if entries.is_empty() {
                    None
                } else {
                    Some(XError::Map(entries))
                }
            }
            _ => None,
        }
    }

    /// Select the message template for a failure: the keyword entry first,
    /// then `^` when the failing source is the schema itself, then `*`.
    pub(crate) fn select(&self, keyword: Option<&str>) -> Option<&str> {
        match self {
            XError::Single(message) => Some(message),
            XError::Map(entries) => {
                if let Some(keyword) = keyword {
                    if let Some(message) = entries.get(keyword) {
                        return Some(message);
                    }
                } else if let Some(message) = entries.get("^") {
                    return Some(message);
                }
                entries.get("*").map(AsRef::as_ref)
            }
        }
    }
}

/// Variables available for `%{…}` interpolation.
pub(crate) struct Variables<'a> {
    pub(crate) instance: &'a Value,
    pub(crate) instance_location: String,
    pub(crate) formatted_instance_location: String,
    pub(crate) keyword_value: &'a Value,
    pub(crate) keyword_location: String,
    pub(crate) absolute_keyword_location: String,
    pub(crate) details: Option<Value>,
}

/// Substitute `%{name}` occurrences in `template`.
pub(crate) fn interpolate(template: &str, variables: &Variables<'_>) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("%{") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                match name {
                    "instance" => output.push_str(&variables.instance.to_string()),
                    "instanceLocation" => output.push_str(&variables.instance_location),
                    "formattedInstanceLocation" => {
                        output.push_str(&variables.formatted_instance_location);
                    }
                    "keywordValue" => output.push_str(&variables.keyword_value.to_string()),
                    "keywordLocation" => output.push_str(&variables.keyword_location),
                    "absoluteKeywordLocation" => {
                        output.push_str(&variables.absolute_keyword_location);
                    }
                    "details" => match &variables.details {
                        Some(details) => output.push_str(&details.to_string()),
                        None => output.push_str("null"),
                    },
                    unknown => {
                        output.push_str("%{");
                        output.push_str(unknown);
                        output.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                output.push_str("%{");
                rest = after;
            }
        }
    }
    output.push_str(rest);
    output
}

#[cfg(test)]
mod tests {
    use super::{interpolate, Variables, XError};
    use serde_json::json;

    fn variables<'a>(instance: &'a serde_json::Value, keyword_value: &'a serde_json::Value) -> Variables<'a> {
        Variables {
            instance,
            instance_location: "/age".to_string(),
            formatted_instance_location: "`/age`".to_string(),
            keyword_value,
            keyword_location: "/properties/age/minimum".to_string(),
            absolute_keyword_location: "https://ex/s#/properties/age/minimum".to_string(),
            details: None,
        }
    }

    #[test]
    fn single_message_applies_to_every_keyword() {
        let schema = json!({"x-error": "nope"});
        let overlay = XError::parse(schema.as_object().expect("object")).expect("present");
        assert_eq!(overlay.select(Some("minimum")), Some("nope"));
        assert_eq!(overlay.select(None), Some("nope"));
    }

    #[test]
    fn map_selection_prefers_keyword_then_caret_then_star() {
        let schema = json!({"x-error": {
            "minimum": "too small",
            "^": "bad schema",
            "*": "fallback",
        }});
        let overlay = XError::parse(schema.as_object().expect("object")).expect("present");
        assert_eq!(overlay.select(Some("minimum")), Some("too small"));
        assert_eq!(overlay.select(Some("maximum")), Some("fallback"));
        assert_eq!(overlay.select(None), Some("bad schema"));
    }

    #[test]
    fn interpolation_substitutes_known_variables() {
        let instance = json!(3);
        let keyword_value = json!(18);
        let message = interpolate(
            "%{instance} at %{formattedInstanceLocation} must be at least %{keywordValue}",
            &variables(&instance, &keyword_value),
        );
        assert_eq!(message, "3 at `/age` must be at least 18");
    }

    #[test]
    fn unknown_variables_are_left_in_place() {
        let instance = json!(null);
        let keyword_value = json!(null);
        let message = interpolate("%{nope} and %{instanceLocation}", &variables(&instance, &keyword_value));
        assert_eq!(message, "%{nope} and /age");
    }
}
