//! Logic for retrieving external resources referenced by `$ref`.
use core::fmt;

use serde_json::Value;

/// Trait for fetching documents that are not part of the compiled graph.
///
/// Implementors receive an absolute URI with no fragment and return the
/// parsed JSON document. Fetching happens during compilation only.
pub trait Retrieve: Send + Sync {
    /// Attempt to retrieve a resource from the given URI.
    ///
    /// # Errors
    ///
    /// If the resource couldn't be retrieved or an error occurred.
    fn retrieve(&self, uri: &str) -> Result<Value, Box<dyn std::error::Error + Send + Sync>>;
}

#[derive(Debug, Clone)]
struct UnretrievableError;

impl fmt::Display for UnretrievableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("this retriever does not fetch resources")
    }
}

impl std::error::Error for UnretrievableError {}

/// A retriever that never fetches; lookups fall through to the built-in
/// meta-schema registry.
#[derive(Debug, PartialEq, Eq)]
pub struct Unretrievable;

impl Retrieve for Unretrievable {
    fn retrieve(&self, _: &str) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(UnretrievableError))
    }
}

/// The bundled retriever: HTTP(S) through `reqwest` and `file://` through
/// the local filesystem, each behind its feature flag.
#[derive(Debug, PartialEq, Eq)]
pub struct DefaultRetriever;

impl Retrieve for DefaultRetriever {
    #[allow(unused_variables)]
    fn retrieve(&self, uri: &str) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let scheme = uri.split(':').next().unwrap_or_default();
        match scheme {
            "http" | "https" => {
                #[cfg(feature = "resolve-http")]
                {
                    Ok(reqwest::blocking::get(uri)?.json()?)
                }
                #[cfg(not(feature = "resolve-http"))]
                Err("`resolve-http` feature or a custom retriever is required to resolve external schemas via HTTP".into())
            }
            "file" => {
                #[cfg(feature = "resolve-file")]
                {
                    let url = url::Url::parse(uri)?;
                    let path = url
                        .to_file_path()
                        .map_err(|()| crate::error::SchemaError::InvalidFileUri {
                            uri: uri.to_string(),
                        })?;
                    let file = std::fs::File::open(path)?;
                    Ok(serde_json::from_reader(file)?)
                }
                #[cfg(not(feature = "resolve-file"))]
                {
                    Err("`resolve-file` feature or a custom retriever is required to resolve external schemas via files".into())
                }
            }
            scheme => Err(format!("unknown scheme {scheme}").into()),
        }
    }
}
