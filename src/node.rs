//! The compiled schema tree: an arena of nodes addressed by id.
//!
//! References between schemas are ids into the arena rather than owning
//! pointers, so the cycles that `$ref` naturally produces need no special
//! handling. Nodes are immutable once [`crate::compiler`] finishes.
use std::sync::Arc;

use serde_json::Value;

use crate::{
    keywords::BoxedEvaluator,
    paths::{escape_token, JsonPointer, PathChunk},
    uri::Uri,
    vocabularies::MetaSchema,
    x_error::XError,
};

/// Index of a schema in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SchemaId(pub(crate) usize);

/// What a compiled schema evaluates as.
pub(crate) enum Form {
    /// The `true` schema: always valid.
    True,
    /// The `false` schema: always invalid.
    False,
    /// An object schema with its keywords in evaluation order.
    Keywords(Box<[CompiledKeyword]>),
}

pub(crate) struct CompiledKeyword {
    pub(crate) name: Box<str>,
    pub(crate) evaluator: BoxedEvaluator,
}

/// A compiled schema node.
pub(crate) struct SchemaNode {
    /// The value this node was compiled from.
    pub(crate) value: Value,
    /// Base URI of the enclosing resource (set by the nearest `$id`).
    pub(crate) base_uri: Arc<Uri>,
    /// Pointer from the document root.
    pub(crate) document_pointer: JsonPointer,
    /// Pointer from the enclosing resource root.
    pub(crate) resource_pointer: JsonPointer,
    /// Root value of the owning document.
    pub(crate) document_root: Arc<Value>,
    /// Effective meta-schema of the owning resource.
    pub(crate) meta: Arc<MetaSchema>,
    pub(crate) form: Form,
    pub(crate) x_error: Option<XError>,
    pub(crate) dynamic_anchor: Option<Box<str>>,
    /// The keyword that attached this node to its parent, when any; `false`
    /// schemas delegate their error message to it.
    pub(crate) linking_keyword: Option<Box<str>>,
}

impl SchemaNode {
    /// The canonical URI of this node: resource base plus pointer fragment.
    pub(crate) fn canonical_uri(&self) -> String {
        let mut uri = crate::uri::fragmentless_str(self.base_uri.as_str()).to_string();
        if !self.resource_pointer.is_empty() {
            uri.push('#');
            append_pointer_fragment(&self.resource_pointer, &mut uri);
        }
        uri
    }

    /// The absolute location of this node, or of one of its keywords.
    pub(crate) fn absolute_location(&self, keyword: Option<&str>) -> String {
        let mut uri = crate::uri::fragmentless_str(self.base_uri.as_str()).to_string();
        uri.push('#');
        append_pointer_fragment(&self.resource_pointer, &mut uri);
        if let Some(keyword) = keyword {
            uri.push('/');
            crate::uri::encode_fragment_to(&escape_token(keyword), &mut uri);
        }
        uri
    }
}

pub(crate) fn append_pointer_fragment(pointer: &JsonPointer, buffer: &mut String) {
    for chunk in pointer.iter() {
        buffer.push('/');
        match chunk {
            PathChunk::Property(name) => {
                crate::uri::encode_fragment_to(&escape_token(name), buffer);
            }
            PathChunk::Index(index) => {
                buffer.push_str(itoa::Buffer::new().format(*index));
            }
        }
    }
}

/// Owner of every compiled node in a validator.
#[derive(Default)]
pub(crate) struct Arena {
    nodes: Vec<SchemaNode>,
}

impl Arena {
    pub(crate) fn reserve_node(&mut self, node: SchemaNode) -> SchemaId {
        let id = SchemaId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub(crate) fn get(&self, id: SchemaId) -> &SchemaNode {
        &self.nodes[id.0]
    }

    pub(crate) fn get_mut(&mut self, id: SchemaId) -> &mut SchemaNode {
        &mut self.nodes[id.0]
    }
}
