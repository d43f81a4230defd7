//! Error types.
//!
//! Two tiers: [`SchemaError`] is raised for schema-authoring, configuration
//! and reference-resolution problems while building a validator; validation
//! outcomes are never raised and travel as [`ErrorKind`] values inside the
//! result tree.
use std::{error::Error as StdError, fmt, io};

use serde_json::{Number, Value};

use crate::primitive_type::PrimitiveType;

/// An error that can occur while compiling a schema or resolving references.
#[derive(Debug)]
pub enum SchemaError {
    /// A reference URI could not be resolved to a schema.
    UnknownRef { reference: String },
    /// The resolver returned no document and no built-in matched.
    InvalidRefResolution { reference: String },
    /// A JSON Pointer fragment does not identify a schema position.
    InvalidRefPointer { pointer: String },
    /// A pattern could not be compiled under the selected regex dialect.
    InvalidRegexpResolution { pattern: String },
    /// A pattern contains constructs invalid under ECMA 262.
    InvalidEcmaRegexp { pattern: String },
    /// A meta-schema requires a vocabulary this engine does not know.
    UnknownVocabulary { vocabulary: String },
    /// The OpenAPI document declares a version other than 3.1.x.
    UnsupportedOpenApiVersion { version: String },
    /// An output format name outside `flag`, `basic`, `detailed`, `verbose`
    /// and `classic`.
    UnknownOutputFormat { format: String },
    /// A `file://` URI with a host or an unmappable path.
    InvalidFileUri { uri: String },
    /// The schema failed meta-schema validation.
    InvalidSchema { message: String },
    /// A URI failed to parse or resolve.
    InvalidUri { uri: String, reason: String },
    /// The retriever failed to fetch an external document.
    Retrieve {
        uri: String,
        source: Box<dyn StdError + Send + Sync>,
    },
    /// An external document is not valid JSON.
    JsonParse(serde_json::Error),
    /// Reading a schema file failed.
    Io(io::Error),
}

impl SchemaError {
    pub(crate) fn invalid_uri(uri: impl Into<String>, reason: impl fmt::Display) -> SchemaError {
        SchemaError::InvalidUri {
            uri: uri.into(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::UnknownRef { reference } => {
                write!(f, "unresolvable ref: {reference}")
            }
            SchemaError::InvalidRefResolution { reference } => {
                write!(f, "invalid ref resolution: {reference}")
            }
            SchemaError::InvalidRefPointer { pointer } => {
                write!(f, "invalid ref pointer: {pointer}")
            }
            SchemaError::InvalidRegexpResolution { pattern } => {
                write!(f, "invalid regexp resolution: {pattern}")
            }
            SchemaError::InvalidEcmaRegexp { pattern } => {
                write!(f, "invalid ECMA 262 regexp: {pattern}")
            }
            SchemaError::UnknownVocabulary { vocabulary } => {
                write!(f, "unknown vocabulary: {vocabulary}")
            }
            SchemaError::UnsupportedOpenApiVersion { version } => {
                write!(f, "unsupported OpenAPI version: {version}")
            }
            SchemaError::UnknownOutputFormat { format } => {
                write!(f, "unknown output format: {format}")
            }
            SchemaError::InvalidFileUri { uri } => {
                write!(f, "invalid file URI: {uri}")
            }
            SchemaError::InvalidSchema { message } => {
                write!(f, "invalid schema: {message}")
            }
            SchemaError::InvalidUri { uri, reason } => {
                write!(f, "invalid URI '{uri}': {reason}")
            }
            SchemaError::Retrieve { uri, source } => {
                write!(f, "failed to retrieve '{uri}': {source}")
            }
            SchemaError::JsonParse(error) => {
                write!(f, "failed to parse JSON: {error}")
            }
            SchemaError::Io(error) => {
                write!(f, "failed to read schema: {error}")
            }
        }
    }
}

impl StdError for SchemaError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            SchemaError::Retrieve { source, .. } => Some(&**source),
            SchemaError::JsonParse(error) => Some(error),
            SchemaError::Io(error) => Some(error),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(error: serde_json::Error) -> Self {
        SchemaError::JsonParse(error)
    }
}

impl From<io::Error> for SchemaError {
    fn from(error: io::Error) -> Self {
        SchemaError::Io(error)
    }
}

/// The expected type set of a failed `type` keyword.
#[derive(Debug, Clone)]
pub enum TypeKind {
    Single(PrimitiveType),
    Multiple(Vec<PrimitiveType>),
}

/// Kinds of validation failures.
///
/// These are values inside invalid result units; validation itself never
/// returns an error.
#[derive(Debug, Clone)]
pub enum ErrorKind {
    /// The instance does not match the expected type(s).
    Type { expected: TypeKind },
    /// The instance is not one of the enumerated values.
    Enum { options: Value },
    /// The instance does not equal the expected constant.
    Const { expected: Value },
    /// The number is not an exact multiple of the divisor.
    MultipleOf { multiple_of: Number },
    Maximum { limit: Number },
    Minimum { limit: Number },
    ExclusiveMaximum { limit: Number },
    ExclusiveMinimum { limit: Number },
    MaxLength { limit: u64 },
    MinLength { limit: u64 },
    /// The string does not match the pattern anywhere.
    Pattern { pattern: Box<str> },
    MaxItems { limit: u64 },
    MinItems { limit: u64 },
    MaxProperties { limit: u64 },
    MinProperties { limit: u64 },
    /// Required properties are absent.
    Required { missing: Vec<String> },
    /// Properties required by a present property are absent.
    DependentRequired { missing: Vec<String> },
    UniqueItems,
    /// Not enough array items matched the `contains` subschema.
    Contains,
    MinContains { limit: u64, found: usize },
    MaxContains { limit: u64, found: usize },
    /// The instance matched a schema it must not match.
    Not,
    /// More than one `oneOf` branch matched.
    OneOfMultipleValid,
    /// A `false` schema; the keyword that linked it, when known, names the
    /// failure.
    FalseSchema { keyword: Option<Box<str>> },
    Format { format: Box<str> },
    ContentEncoding { encoding: Box<str> },
    ContentMediaType { media_type: Box<str> },
    /// The discriminator property is absent from the instance.
    DiscriminatorMissingProperty { property: Box<str> },
    /// The discriminator value does not name a resolvable schema.
    DiscriminatorUnknownValue { value: String },
}

impl ErrorKind {
    /// Short tag identifying the failure in classic output.
    pub fn tag(&self) -> &'static str {
        match self {
            ErrorKind::Type { expected } => match expected {
                TypeKind::Single(single) => single.as_str(),
                TypeKind::Multiple(_) => "type",
            },
            ErrorKind::Enum { .. } => "enum",
            ErrorKind::Const { .. } => "const",
            ErrorKind::MultipleOf { .. } => "multipleof",
            ErrorKind::Maximum { .. } => "maximum",
            ErrorKind::Minimum { .. } => "minimum",
            ErrorKind::ExclusiveMaximum { .. } => "exclusivemaximum",
            ErrorKind::ExclusiveMinimum { .. } => "exclusiveminimum",
            ErrorKind::MaxLength { .. } => "maxlength",
            ErrorKind::MinLength { .. } => "minlength",
            ErrorKind::Pattern { .. } => "pattern",
            ErrorKind::MaxItems { .. } => "maxitems",
            ErrorKind::MinItems { .. } => "minitems",
            ErrorKind::MaxProperties { .. } => "maxproperties",
            ErrorKind::MinProperties { .. } => "minproperties",
            ErrorKind::Required { .. } => "required",
            ErrorKind::DependentRequired { .. } => "dependentrequired",
            ErrorKind::UniqueItems => "uniqueitems",
            ErrorKind::Contains => "contains",
            ErrorKind::MinContains { .. } => "mincontains",
            ErrorKind::MaxContains { .. } => "maxcontains",
            ErrorKind::Not => "not",
            ErrorKind::OneOfMultipleValid => "oneof",
            ErrorKind::FalseSchema { .. } => "schema",
            ErrorKind::Format { .. } => "format",
            ErrorKind::ContentEncoding { .. } => "contentencoding",
            ErrorKind::ContentMediaType { .. } => "contentmediatype",
            ErrorKind::DiscriminatorMissingProperty { .. }
            | ErrorKind::DiscriminatorUnknownValue { .. } => "discriminator",
        }
    }

    /// Structured details attached to classic entries, when any.
    pub fn details(&self) -> Option<Value> {
        match self {
            ErrorKind::Required { missing } | ErrorKind::DependentRequired { missing } => {
                Some(serde_json::json!({ "missing_keys": missing }))
            }
            _ => None,
        }
    }

    /// The built-in human-readable message; `location` is the formatted
    /// instance location (`root` or a backquoted pointer).
    pub(crate) fn message(&self, location: &str) -> String {
        match self {
            ErrorKind::Type { expected } => match expected {
                TypeKind::Single(single) => {
                    format!("value at {location} is not {} {single}", single.article())
                }
                TypeKind::Multiple(types) => {
                    let names = types
                        .iter()
                        .map(PrimitiveType::as_str)
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!("value at {location} is not one of the types: {names}")
                }
            },
            ErrorKind::Enum { options } => {
                format!("value at {location} is not one of: {options}")
            }
            ErrorKind::Const { expected } => {
                format!("value at {location} is not: {expected}")
            }
            ErrorKind::MultipleOf { multiple_of } => {
                format!("number at {location} is not a multiple of {multiple_of}")
            }
            ErrorKind::Maximum { limit } => {
                format!("number at {location} is greater than {limit}")
            }
            ErrorKind::Minimum { limit } => {
                format!("number at {location} is less than {limit}")
            }
            ErrorKind::ExclusiveMaximum { limit } => {
                format!("number at {location} is greater than or equal to {limit}")
            }
            ErrorKind::ExclusiveMinimum { limit } => {
                format!("number at {location} is less than or equal to {limit}")
            }
            ErrorKind::MaxLength { limit } => {
                format!("string at {location} is longer than {limit} characters")
            }
            ErrorKind::MinLength { limit } => {
                format!("string at {location} is shorter than {limit} characters")
            }
            ErrorKind::Pattern { pattern } => {
                format!("string at {location} does not match pattern: {pattern}")
            }
            ErrorKind::MaxItems { limit } => {
                format!("array at {location} has more than {limit} items")
            }
            ErrorKind::MinItems { limit } => {
                format!("array at {location} has less than {limit} items")
            }
            ErrorKind::MaxProperties { limit } => {
                format!("object at {location} has more than {limit} properties")
            }
            ErrorKind::MinProperties { limit } => {
                format!("object at {location} has less than {limit} properties")
            }
            ErrorKind::Required { missing } | ErrorKind::DependentRequired { missing } => {
                format!(
                    "object at {location} is missing required properties: {}",
                    missing.join(", ")
                )
            }
            ErrorKind::UniqueItems => {
                format!("array at {location} contains duplicate items")
            }
            ErrorKind::Contains => {
                format!("array at {location} does not contain enough matching items")
            }
            ErrorKind::MinContains { limit, found } => {
                format!("array at {location} contains {found} matching items, expected at least {limit}")
            }
            ErrorKind::MaxContains { limit, found } => {
                format!("array at {location} contains {found} matching items, expected at most {limit}")
            }
            ErrorKind::Not => {
                format!("value at {location} matches the schema in the `not` keyword")
            }
            ErrorKind::OneOfMultipleValid => {
                format!("value at {location} matches more than one of the schemas listed in the `oneOf` keyword")
            }
            ErrorKind::FalseSchema { keyword } => match keyword {
                Some(keyword) => {
                    format!("value at {location} is not allowed by the `{keyword}` schema")
                }
                None => format!("value at {location} is not allowed"),
            },
            ErrorKind::Format { format } => {
                format!("value at {location} does not match format: {format}")
            }
            ErrorKind::ContentEncoding { encoding } => {
                format!("value at {location} is not encoded as {encoding}")
            }
            ErrorKind::ContentMediaType { media_type } => {
                format!("value at {location} is not {media_type}")
            }
            ErrorKind::DiscriminatorMissingProperty { property } => {
                format!("object at {location} is missing the discriminator property `{property}`")
            }
            ErrorKind::DiscriminatorUnknownValue { value } => {
                format!("object at {location} has a discriminator value that does not name a known schema: {value}")
            }
        }
    }
}
