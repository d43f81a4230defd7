//! Validators for `contentEncoding`, `contentMediaType` and
//! `contentSchema`.
//!
//! Decoded and parsed values travel through annotations; without a
//! registered decoder or parser the keywords are annotations only.
use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::{
    compiler::{CompileCtx, Seg},
    content::{self, ContentEncoding, ContentMediaType},
    context::{EvalContext, Frame},
    error::{ErrorKind, SchemaError},
    keywords::{BoxedEvaluator, Evaluate},
    node::SchemaId,
    output::OutputUnit,
    paths::Location,
};

enum Decoder {
    Builtin(fn(&str) -> Option<String>),
    Custom(Arc<dyn ContentEncoding>),
    None,
}

pub(crate) struct ContentEncodingEvaluator {
    encoding: Box<str>,
    decoder: Decoder,
}

impl Evaluate for ContentEncodingEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        _frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        let Value::String(item) = instance else {
            return Some(OutputUnit::pass(
                ctx.source(),
                "contentEncoding",
                instance_location,
                keyword_location,
            ));
        };
        let decoded = match &self.decoder {
            Decoder::Builtin(decode) => decode(item),
            Decoder::Custom(decoder) => decoder.decode(item),
            // No decoder registered: annotate with the content as-is
            Decoder::None => Some(item.clone()),
        };
        Some(match decoded {
            Some(decoded) => OutputUnit::pass(
                ctx.source(),
                "contentEncoding",
                instance_location,
                keyword_location,
            )
            .with_annotation(json!(decoded)),
            None => OutputUnit::fail(
                ctx.source(),
                "contentEncoding",
                instance_location,
                keyword_location,
                ErrorKind::ContentEncoding {
                    encoding: self.encoding.clone(),
                },
            ),
        })
    }
}

enum Parser {
    Builtin(fn(&str) -> Option<Value>),
    Custom(Arc<dyn ContentMediaType>),
    None,
}

pub(crate) struct ContentMediaTypeEvaluator {
    media_type: Box<str>,
    parser: Parser,
}

impl Evaluate for ContentMediaTypeEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        if !instance.is_string() {
            return Some(OutputUnit::pass(
                ctx.source(),
                "contentMediaType",
                instance_location,
                keyword_location,
            ));
        }
        // Work on the decoded form when contentEncoding produced one
        let decoded = frame.annotation("contentEncoding").and_then(Value::as_str);
        let item = decoded
            .or_else(|| instance.as_str())
            .expect("a string instance");
        let parsed = match &self.parser {
            Parser::Builtin(parse) => parse(item),
            Parser::Custom(parser) => parser.parse(item),
            Parser::None => {
                return Some(
                    OutputUnit::pass(
                        ctx.source(),
                        "contentMediaType",
                        instance_location,
                        keyword_location,
                    )
                    .with_annotation(json!(self.media_type.as_ref())),
                );
            }
        };
        Some(match parsed {
            Some(parsed) => OutputUnit::pass(
                ctx.source(),
                "contentMediaType",
                instance_location,
                keyword_location,
            )
            .with_annotation(parsed),
            None => OutputUnit::fail(
                ctx.source(),
                "contentMediaType",
                instance_location,
                keyword_location,
                ErrorKind::ContentMediaType {
                    media_type: self.media_type.clone(),
                },
            ),
        })
    }
}

pub(crate) struct ContentSchemaEvaluator {
    subschema: SchemaId,
}

impl Evaluate for ContentSchemaEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        if !instance.is_string() {
            return Some(OutputUnit::pass(
                ctx.source(),
                "contentSchema",
                instance_location,
                keyword_location,
            ));
        }
        // Without a parsed document there is nothing to validate against
        let Some(parsed) = frame
            .annotation("contentMediaType")
            .filter(|parsed| !parsed.is_string())
            .cloned()
        else {
            return Some(OutputUnit::pass(
                ctx.source(),
                "contentSchema",
                instance_location,
                keyword_location,
            ));
        };
        let source = ctx.source();
        let inner = ctx.evaluate(self.subschema, &parsed, instance_location, keyword_location);
        let valid = inner.valid;
        Some(
            OutputUnit::applicator(
                source,
                "contentSchema",
                instance_location,
                keyword_location,
                valid,
                vec![mark_synthetic(inner, &parsed)],
            )
            .with_synthetic_instance(parsed),
        )
    }
}

fn mark_synthetic(mut unit: OutputUnit, parsed: &Value) -> OutputUnit {
    if unit.synthetic_instance.is_none() {
        unit.synthetic_instance = Some(parsed.clone());
    }
    let children = std::mem::take(&mut unit.nested);
    unit.nested = children
        .into_iter()
        .map(|child| mark_synthetic(child, parsed))
        .collect();
    unit
}

pub(crate) fn compile_encoding(
    ctx: &mut CompileCtx<'_>,
    _parent: &Map<String, Value>,
    value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    let Value::String(encoding) = value else {
        return Ok(None);
    };
    let decoder = if let Some(custom) = ctx.options().content_encodings.get(encoding.as_str()) {
        Decoder::Custom(Arc::clone(custom))
    } else if let Some(builtin) = content::builtin_encoding(encoding) {
        Decoder::Builtin(builtin)
    } else {
        Decoder::None
    };
    Ok(Some(Box::new(ContentEncodingEvaluator {
        encoding: encoding.as_str().into(),
        decoder,
    })))
}

pub(crate) fn compile_media_type(
    ctx: &mut CompileCtx<'_>,
    _parent: &Map<String, Value>,
    value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    let Value::String(media_type) = value else {
        return Ok(None);
    };
    let parser = if let Some(custom) = ctx.options().content_media_types.get(media_type.as_str()) {
        Parser::Custom(Arc::clone(custom))
    } else if let Some(builtin) = content::builtin_media_type(media_type) {
        Parser::Builtin(builtin)
    } else {
        Parser::None
    };
    Ok(Some(Box::new(ContentMediaTypeEvaluator {
        media_type: media_type.as_str().into(),
        parser,
    })))
}

pub(crate) fn compile_schema(
    ctx: &mut CompileCtx<'_>,
    parent: &Map<String, Value>,
    value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    let subschema = ctx.subschema(value, &[Seg::Key("contentSchema")])?;
    if !parent.contains_key("contentMediaType") {
        return Ok(None);
    }
    Ok(Some(Box::new(ContentSchemaEvaluator { subschema })))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::json;

    #[test]
    fn base64_payloads_are_checked() {
        let schema = json!({"contentEncoding": "base64"});
        tests_util::is_valid(&schema, &json!("aGVsbG8="));
        tests_util::is_not_valid(&schema, &json!("not base64!"));
        tests_util::is_valid(&schema, &json!(42));
    }

    #[test]
    fn media_type_parses_decoded_content() {
        let schema = json!({"contentEncoding": "base64", "contentMediaType": "application/json"});
        // eyJhIjogMX0= is {"a": 1}
        tests_util::is_valid(&schema, &json!("eyJhIjogMX0="));
        // aGVsbG8= is plain "hello"
        tests_util::is_not_valid(&schema, &json!("aGVsbG8="));
    }

    #[test]
    fn content_schema_validates_the_parsed_document() {
        let schema = json!({
            "contentMediaType": "application/json",
            "contentSchema": {"required": ["a"]}
        });
        tests_util::is_valid(&schema, &json!("{\"a\": 1}"));
        tests_util::is_not_valid(&schema, &json!("{\"b\": 1}"));
    }

    #[test]
    fn unregistered_encodings_are_annotations_only() {
        let schema = json!({"contentEncoding": "quoted-printable"});
        tests_util::is_valid(&schema, &json!("anything=20goes"));
    }
}
