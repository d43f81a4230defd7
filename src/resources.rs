//! Lexical and dynamic resource tables.
use ahash::AHashMap;

use crate::node::SchemaId;

/// URI tables populated while compiling a document graph.
///
/// `lexical` maps every URI introduced by `$id`, `$anchor` and
/// `$dynamicAnchor`, plus the canonical pointer URI of every compiled node;
/// `dynamic` holds only `$dynamicAnchor` entries and is consulted by
/// `$dynamicRef` while walking the dynamic scope. Both are written during
/// compilation only.
#[derive(Debug, Default)]
pub(crate) struct Resources {
    lexical: AHashMap<String, SchemaId>,
    dynamic: AHashMap<String, SchemaId>,
}

impl Resources {
    /// Register a lexical URI. First registration wins so that resource
    /// roots keep their identity when pointer aliases collide.
    pub(crate) fn register_lexical(&mut self, uri: String, id: SchemaId) {
        self.lexical.entry(uri).or_insert(id);
    }

    pub(crate) fn register_dynamic(&mut self, uri: String, id: SchemaId) {
        self.dynamic.entry(uri).or_insert(id);
    }

    pub(crate) fn lookup_lexical(&self, uri: &str) -> Option<SchemaId> {
        self.lexical.get(uri).copied()
    }

    pub(crate) fn lookup_dynamic(&self, uri: &str) -> Option<SchemaId> {
        self.dynamic.get(uri).copied()
    }
}
