//! Compile-time handling for `$defs` and `$comment`.
//!
//! `$defs` members are compiled so their identities register and pointer
//! fragments can land on them, but nothing evaluates at validation time.
use serde_json::{Map, Value};

use crate::{
    compiler::{CompileCtx, Seg},
    error::SchemaError,
    keywords::BoxedEvaluator,
};

pub(crate) fn compile(
    ctx: &mut CompileCtx<'_>,
    _parent: &Map<String, Value>,
    value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    if let Value::Object(definitions) = value {
        let keyword = ctx.current_keyword().to_string();
        for (name, definition) in definitions {
            ctx.subschema(definition, &[Seg::Key(keyword.as_str()), Seg::Key(name)])?;
        }
    }
    Ok(None)
}

pub(crate) fn compile_comment(
    _ctx: &mut CompileCtx<'_>,
    _parent: &Map<String, Value>,
    _value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    Ok(None)
}
