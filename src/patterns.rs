//! Dialect-selectable regex compilation.
use std::{fmt, sync::Arc};

use ahash::AHashMap;

use crate::{ecma, error::SchemaError};

/// A user-supplied pattern compiler, the callable form of the regex
/// resolver contract.
pub trait PatternEngine: Send + Sync {
    /// Compile `pattern` or fail with a [`SchemaError`].
    fn compile(&self, pattern: &str) -> Result<CompiledPattern, SchemaError>;
}

impl<F> PatternEngine for F
where
    F: Fn(&str) -> Result<CompiledPattern, SchemaError> + Send + Sync,
{
    fn compile(&self, pattern: &str) -> Result<CompiledPattern, SchemaError> {
        self(pattern)
    }
}

/// A compiled pattern from either backend.
#[derive(Debug)]
pub enum CompiledPattern {
    /// Compiled by the backtracking engine (the `native` dialect).
    Native(fancy_regex::Regex),
    /// Compiled by the linear-time engine after ECMA 262 translation.
    Ecma(regex::Regex),
}

impl CompiledPattern {
    /// Unanchored match anywhere in `haystack`. Exceeding the backtracking
    /// limit counts as no match.
    pub fn is_match(&self, haystack: &str) -> bool {
        match self {
            CompiledPattern::Native(regex) => regex.is_match(haystack).unwrap_or(false),
            CompiledPattern::Ecma(regex) => regex.is_match(haystack),
        }
    }
}

/// Which regex dialect `pattern` and `patternProperties` use.
#[derive(Clone, Default)]
pub enum RegexDialect {
    /// Compile patterns directly with the host engine.
    #[default]
    Native,
    /// Translate patterns from ECMA 262 before compiling.
    Ecma,
    /// Delegate compilation entirely.
    Custom(Arc<dyn PatternEngine>),
}

impl fmt::Debug for RegexDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegexDialect::Native => f.write_str("Native"),
            RegexDialect::Ecma => f.write_str("Ecma"),
            RegexDialect::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl RegexDialect {
    pub(crate) fn compile(&self, pattern: &str) -> Result<CompiledPattern, SchemaError> {
        match self {
            RegexDialect::Native => fancy_regex::Regex::new(pattern)
                .map(CompiledPattern::Native)
                .map_err(|_| SchemaError::InvalidRegexpResolution {
                    pattern: pattern.to_string(),
                }),
            RegexDialect::Ecma => {
                let translated = ecma::translate(pattern)?;
                regex::Regex::new(&translated)
                    .map(CompiledPattern::Ecma)
                    .map_err(|_| SchemaError::InvalidRegexpResolution {
                        pattern: pattern.to_string(),
                    })
            }
            RegexDialect::Custom(engine) => engine.compile(pattern),
        }
    }
}

/// Per-compilation cache of resolved patterns, keyed by pattern source.
/// Populated while building a validator; validation only reads the compiled
/// patterns through their `Arc`s.
#[derive(Default)]
pub(crate) struct PatternCache {
    entries: AHashMap<String, Arc<CompiledPattern>>,
}

impl PatternCache {
    pub(crate) fn resolve(
        &mut self,
        dialect: &RegexDialect,
        pattern: &str,
    ) -> Result<Arc<CompiledPattern>, SchemaError> {
        if let Some(compiled) = self.entries.get(pattern) {
            return Ok(Arc::clone(compiled));
        }
        let compiled = Arc::new(dialect.compile(pattern)?);
        self.entries
            .insert(pattern.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }
}

#[cfg(test)]
mod tests {
    use super::{PatternCache, RegexDialect};

    #[test]
    fn native_dialect_supports_lookarounds() {
        let compiled = RegexDialect::Native
            .compile(r"^(?=a)a+$")
            .expect("supported by the backtracking engine");
        assert!(compiled.is_match("aaa"));
        assert!(!compiled.is_match("b"));
    }

    #[test]
    fn ecma_dialect_translates_before_compiling() {
        let compiled = RegexDialect::Ecma.compile(r"^\d+$").expect("translatable");
        assert!(compiled.is_match("123"));
        assert!(!compiled.is_match("١٢٣"), "non-ASCII digits must not match");
    }

    #[test]
    fn ecma_dialect_rejects_invalid_escapes() {
        assert!(RegexDialect::Ecma.compile(r"\a").is_err());
    }

    #[test]
    fn matches_are_unanchored() {
        let compiled = RegexDialect::Native.compile("b+").expect("valid");
        assert!(compiled.is_match("abc"));
    }

    #[test]
    fn cache_reuses_compilations() {
        let mut cache = PatternCache::default();
        let first = cache
            .resolve(&RegexDialect::Native, "^x")
            .expect("compilable");
        let second = cache
            .resolve(&RegexDialect::Native, "^x")
            .expect("compilable");
        assert!(std::sync::Arc::ptr_eq(&first, &second));
    }
}
