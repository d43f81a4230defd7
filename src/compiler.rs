//! The schema compiler: walks schema documents into the arena, records
//! identities, and resolves every reference to a fix-point.
use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use once_cell::sync::OnceCell;
use serde_json::Value;

use crate::{
    error::SchemaError,
    keywords::{self, unknown},
    meta,
    node::{Arena, CompiledKeyword, Form, SchemaId, SchemaNode},
    options::ValidationOptions,
    paths::{self, JsonPointer},
    patterns::{CompiledPattern, PatternCache},
    resources::Resources,
    uri::{self, Uri},
    vocabularies::{self, MetaSchema, Vocabulary},
    x_error::XError,
};

/// Keywords consumed while setting up a schema node, before keyword
/// dispatch.
const STRUCTURAL: &[&str] = &[
    "$schema",
    "$vocabulary",
    "$id",
    "$anchor",
    "$dynamicAnchor",
    "x-error",
];

/// A path step below the current schema.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Seg<'s> {
    Key(&'s str),
    Index(usize),
}

/// The not-yet-resolved target of a `$ref`/`$dynamicRef`.
///
/// The cell is installed during the compile fix-point; evaluators only read
/// it afterwards.
#[derive(Debug, Clone)]
pub(crate) struct PendingTarget {
    uri: String,
    cell: Arc<OnceCell<SchemaId>>,
}

impl PendingTarget {
    pub(crate) fn resolved(&self) -> SchemaId {
        *self
            .cell
            .get()
            .expect("references are resolved during compilation")
    }
}

/// A compiled document and the URI it lives under.
pub(crate) struct Document {
    pub(crate) base: Arc<Uri>,
    pub(crate) root_value: Arc<Value>,
    pub(crate) root: SchemaId,
}

/// Position and context while compiling one schema value.
#[derive(Clone)]
struct Scope {
    base: Arc<Uri>,
    document_root: Arc<Value>,
    document_pointer: JsonPointer,
    resource_pointer: JsonPointer,
    meta: Arc<MetaSchema>,
    is_document_root: bool,
    linking_keyword: Option<Box<str>>,
    /// The enclosing schema's `x-error`; boolean subschemas cannot carry
    /// their own overlay and inherit it.
    inherited_x_error: Option<XError>,
}

pub(crate) struct Compiler {
    options: ValidationOptions,
    pub(crate) arena: Arena,
    pub(crate) resources: Resources,
    pub(crate) documents: Vec<Document>,
    pending: Vec<PendingTarget>,
    patterns: PatternCache,
    metas: AHashMap<String, Arc<MetaSchema>>,
}

impl Compiler {
    pub(crate) fn new(options: ValidationOptions) -> Compiler {
        Compiler {
            options,
            arena: Arena::default(),
            resources: Resources::default(),
            documents: Vec::new(),
            pending: Vec::new(),
            patterns: PatternCache::default(),
            metas: AHashMap::new(),
        }
    }

    pub(crate) fn into_parts(self) -> (ValidationOptions, Arena, Resources, Vec<Document>) {
        (self.options, self.arena, self.resources, self.documents)
    }

    /// The base URI the root document compiles under.
    pub(crate) fn root_base(&self) -> Result<Uri, SchemaError> {
        match &self.options.base_uri {
            Some(base) => uri::from_str(base),
            None => Ok(uri::DEFAULT_ROOT_URI.clone()),
        }
    }

    /// Compile a whole document under `base` and return its root schema.
    pub(crate) fn compile_document(
        &mut self,
        value: Value,
        base: Uri,
        meta_override: Option<Arc<MetaSchema>>,
    ) -> Result<SchemaId, SchemaError> {
        let meta = match meta_override {
            Some(meta) => meta,
            None => self.document_meta(&value)?,
        };
        let base = Arc::new(base);
        let root_value = Arc::new(value);
        let scope = Scope {
            base: Arc::clone(&base),
            document_root: Arc::clone(&root_value),
            document_pointer: JsonPointer::default(),
            resource_pointer: JsonPointer::default(),
            meta,
            is_document_root: true,
            linking_keyword: None,
            inherited_x_error: None,
        };
        let contents = Arc::clone(&root_value);
        let root = self.compile_schema(&contents, scope)?;
        let base = Arc::clone(&self.arena.get(root).base_uri);
        self.documents.push(Document {
            base,
            root_value,
            root,
        });
        Ok(root)
    }

    /// The meta-schema of a document: its `$schema`, the configured
    /// default, or Draft 2020-12.
    fn document_meta(&mut self, value: &Value) -> Result<Arc<MetaSchema>, SchemaError> {
        if let Some(declared) = value.get("$schema").and_then(Value::as_str) {
            let declared = declared.to_string();
            return self.meta_schema(&declared);
        }
        match self.options.meta_schema.clone() {
            Some(configured) => self.meta_schema(&configured),
            None => Ok(self.vocabulary_override(Arc::clone(&vocabularies::DRAFT_2020_12))),
        }
    }

    /// Resolve a meta-schema URI to its vocabulary set, fetching and
    /// reading `$vocabulary` for custom meta-schemas.
    pub(crate) fn meta_schema(&mut self, uri: &str) -> Result<Arc<MetaSchema>, SchemaError> {
        if let Some(builtin) = vocabularies::builtin(uri) {
            return Ok(self.vocabulary_override(builtin));
        }
        if let Some(cached) = self.metas.get(uri) {
            return Ok(Arc::clone(cached));
        }
        let document = match meta::document(uri) {
            Some(embedded) => embedded.clone(),
            None => self.fetch(uri::fragmentless_str(uri))?,
        };
        let view = self.vocabulary_override(vocabularies::from_document(uri, &document)?);
        self.metas.insert(uri.to_string(), Arc::clone(&view));
        Ok(view)
    }

    /// Apply the `vocabulary` option, when set, over whatever the
    /// meta-schema declares.
    fn vocabulary_override(&self, meta: Arc<MetaSchema>) -> Arc<MetaSchema> {
        match &self.options.vocabularies {
            Some(entries) => Arc::new(MetaSchema {
                uri: meta.uri.clone(),
                vocabularies: entries.as_slice().into(),
            }),
            None => meta,
        }
    }

    fn fetch(&self, uri: &str) -> Result<Value, SchemaError> {
        self.options
            .retriever
            .retrieve(uri)
            .map_err(|source| SchemaError::Retrieve {
                uri: uri.to_string(),
                source,
            })
    }

    fn compile_schema(&mut self, value: &Value, scope: Scope) -> Result<SchemaId, SchemaError> {
        let map = match value {
            Value::Bool(allows) => {
                let is_document_root = scope.is_document_root;
                let base = Arc::clone(&scope.base);
                let id = self.arena.reserve_node(SchemaNode {
                    value: value.clone(),
                    base_uri: Arc::clone(&scope.base),
                    document_pointer: scope.document_pointer,
                    resource_pointer: scope.resource_pointer,
                    document_root: scope.document_root,
                    meta: scope.meta,
                    form: if *allows { Form::True } else { Form::False },
                    x_error: scope.inherited_x_error,
                    dynamic_anchor: None,
                    linking_keyword: scope.linking_keyword,
                });
                if is_document_root {
                    self.resources
                        .register_lexical(uri::fragmentless_str(base.as_str()).to_string(), id);
                }
                self.register_canonical(id);
                return Ok(id);
            }
            Value::Object(map) => map,
            _ => {
                return Err(SchemaError::InvalidSchema {
                    message: format!(
                        "schema at {} must be an object or a boolean",
                        scope.document_pointer.format()
                    ),
                })
            }
        };

        let id_value = map
            .get("$id")
            .and_then(Value::as_str)
            .map(uri::fragmentless_str)
            .filter(|id| !id.is_empty());

        // $schema is honored at document and resource roots
        let mut meta = Arc::clone(&scope.meta);
        if scope.is_document_root || id_value.is_some() {
            if let Some(declared) = map.get("$schema").and_then(Value::as_str) {
                let declared = declared.to_string();
                meta = self.meta_schema(&declared)?;
            }
        }

        // $id opens a new resource
        let mut base = Arc::clone(&scope.base);
        let mut resource_pointer = scope.resource_pointer.clone();
        if let Some(id_value) = id_value {
            base = Arc::new(uri::resolve_against(&base, id_value)?);
            resource_pointer = JsonPointer::default();
        }

        let overlay = XError::parse(map);
        let id = self.arena.reserve_node(SchemaNode {
            value: value.clone(),
            base_uri: Arc::clone(&base),
            document_pointer: scope.document_pointer.clone(),
            resource_pointer: resource_pointer.clone(),
            document_root: Arc::clone(&scope.document_root),
            meta: Arc::clone(&meta),
            form: Form::True,
            x_error: overlay.clone(),
            dynamic_anchor: map
                .get("$dynamicAnchor")
                .and_then(Value::as_str)
                .map(Into::into),
            linking_keyword: scope.linking_keyword.clone(),
        });

        if scope.is_document_root {
            self.resources
                .register_lexical(uri::fragmentless_str(scope.base.as_str()).to_string(), id);
        }
        if id_value.is_some() {
            self.resources
                .register_lexical(uri::fragmentless_str(base.as_str()).to_string(), id);
        }
        self.register_canonical(id);
        if let Some(anchor) = map.get("$anchor").and_then(Value::as_str) {
            self.resources
                .register_lexical(anchored(&base, anchor), id);
        }
        if let Some(anchor) = map.get("$dynamicAnchor").and_then(Value::as_str) {
            let uri = anchored(&base, anchor);
            self.resources.register_lexical(uri.clone(), id);
            self.resources.register_dynamic(uri, id);
        }

        let node_scope = Scope {
            base,
            document_root: scope.document_root,
            document_pointer: scope.document_pointer,
            resource_pointer,
            meta,
            is_document_root: false,
            linking_keyword: None,
            inherited_x_error: overlay,
        };
        let mut claimed: AHashSet<&str> = AHashSet::new();
        let mut compiled = Vec::with_capacity(map.len());
        let vocabularies = node_scope.meta.vocabularies.clone();
        for vocabulary in vocabularies.iter() {
            for &(name, compile) in keywords::keywords_for(vocabulary) {
                let Some(keyword_value) = map.get(name) else {
                    continue;
                };
                if !claimed.insert(name) {
                    continue;
                }
                let mut ctx = CompileCtx {
                    compiler: self,
                    scope: &node_scope,
                    keyword: name,
                };
                if let Some(evaluator) = compile(&mut ctx, map, keyword_value)? {
                    compiled.push(CompiledKeyword {
                        name: name.into(),
                        evaluator,
                    });
                }
            }
        }
        // Whatever no active vocabulary claimed stays around as an
        // annotation; it may still be a $ref target
        for (name, keyword_value) in map {
            if claimed.contains(name.as_str()) || STRUCTURAL.contains(&name.as_str()) {
                continue;
            }
            let mut ctx = CompileCtx {
                compiler: self,
                scope: &node_scope,
                keyword: name.as_str(),
            };
            if let Some(evaluator) = unknown::compile(&mut ctx, map, keyword_value)? {
                compiled.push(CompiledKeyword {
                    name: name.as_str().into(),
                    evaluator,
                });
            }
        }
        self.arena.get_mut(id).form = Form::Keywords(compiled.into_boxed_slice());
        Ok(id)
    }

    fn register_canonical(&mut self, id: SchemaId) {
        let node = self.arena.get(id);
        if node.resource_pointer.is_empty() {
            return;
        }
        let canonical = node.canonical_uri();
        self.resources.register_lexical(canonical, id);
    }

    /// Drain the pending reference queue, fetching and compiling external
    /// documents as needed, until every target is installed.
    pub(crate) fn resolve_pending(&mut self) -> Result<(), SchemaError> {
        while let Some(pending) = self.pending.pop() {
            if pending.cell.get().is_some() {
                continue;
            }
            let id = self.resolve_reference(&pending.uri)?;
            let _ = pending.cell.set(id);
        }
        Ok(())
    }

    /// Resolve an absolute reference URI to a schema, per the lookup
    /// precedence: lexical table, fragmentless lexical table, fetched
    /// document, built-in meta-schema registry.
    pub(crate) fn resolve_reference(&mut self, reference: &str) -> Result<SchemaId, SchemaError> {
        if let Some(id) = self.resources.lookup_lexical(reference) {
            return Ok(id);
        }
        let (base, fragment) = uri::split_fragment(reference);
        match fragment {
            None | Some("") => {
                if let Some(id) = self.resources.lookup_lexical(base) {
                    return Ok(id);
                }
                self.fetch_and_compile(base)?;
                self.resources
                    .lookup_lexical(base)
                    .ok_or_else(|| SchemaError::UnknownRef {
                        reference: reference.to_string(),
                    })
            }
            Some(fragment) if fragment.starts_with('/') => {
                let root = match self.resources.lookup_lexical(base) {
                    Some(root) => root,
                    None => {
                        self.fetch_and_compile(base)?;
                        self.resources.lookup_lexical(base).ok_or_else(|| {
                            SchemaError::UnknownRef {
                                reference: reference.to_string(),
                            }
                        })?
                    }
                };
                let pointer = uri::decode_fragment(fragment);
                self.resolve_pointer(root, &pointer)
            }
            Some(_) => {
                if self.resources.lookup_lexical(base).is_none() {
                    self.fetch_and_compile(base)?;
                }
                self.resources
                    .lookup_lexical(reference)
                    .ok_or_else(|| SchemaError::UnknownRef {
                        reference: reference.to_string(),
                    })
            }
        }
    }

    fn fetch_and_compile(&mut self, base: &str) -> Result<(), SchemaError> {
        let document = match self.fetch(base) {
            Ok(document) => document,
            Err(error) => match meta::document(base) {
                Some(embedded) => embedded.clone(),
                None => {
                    return Err(if matches!(error, SchemaError::Retrieve { .. }) {
                        SchemaError::InvalidRefResolution {
                            reference: base.to_string(),
                        }
                    } else {
                        error
                    })
                }
            },
        };
        self.compile_document(document, uri::from_str(base)?, None)?;
        Ok(())
    }

    /// Navigate a JSON Pointer fragment below a resource root. Positions
    /// compiled eagerly resolve through the canonical table; pointers into
    /// raw regions (unknown keywords) compile their target on demand.
    pub(crate) fn resolve_pointer(
        &mut self,
        root: SchemaId,
        pointer: &str,
    ) -> Result<SchemaId, SchemaError> {
        let tokens = paths::split(pointer).ok_or_else(|| SchemaError::InvalidRefPointer {
            pointer: pointer.to_string(),
        })?;
        if tokens.is_empty() {
            return Ok(root);
        }
        let node = self.arena.get(root);
        let mut target_pointer = node.resource_pointer.clone();
        for token in &tokens {
            target_pointer.push(token.as_ref());
        }
        let canonical = {
            let mut buffer = uri::fragmentless_str(node.base_uri.as_str()).to_string();
            buffer.push('#');
            crate::node::append_pointer_fragment(&target_pointer, &mut buffer);
            buffer
        };
        if let Some(id) = self.resources.lookup_lexical(&canonical) {
            return Ok(id);
        }
        let Some(value) = paths::lookup(&node.value, &tokens) else {
            return Err(SchemaError::InvalidRefPointer {
                pointer: pointer.to_string(),
            });
        };
        if !(value.is_object() || value.is_boolean()) {
            return Err(SchemaError::InvalidRefPointer {
                pointer: pointer.to_string(),
            });
        }
        let mut document_pointer = node.document_pointer.clone();
        for token in &tokens {
            document_pointer.push(token.as_ref());
        }
        let scope = Scope {
            base: Arc::clone(&node.base_uri),
            document_root: Arc::clone(&node.document_root),
            document_pointer,
            resource_pointer: target_pointer,
            meta: Arc::clone(&node.meta),
            is_document_root: false,
            linking_keyword: tokens.first().map(|token| token.as_ref().into()),
            inherited_x_error: None,
        };
        let value = value.clone();
        self.compile_schema(&value, scope)
    }

    fn pattern(&mut self, pattern: &str) -> Result<Arc<CompiledPattern>, SchemaError> {
        let dialect = self.options.regex_dialect.clone();
        self.patterns.resolve(&dialect, pattern)
    }
}

fn anchored(base: &Uri, anchor: &str) -> String {
    format!("{}#{anchor}", uri::fragmentless_str(base.as_str()))
}

/// What keyword compile functions see: the compiler plus the position of
/// the schema that owns the keyword.
pub(crate) struct CompileCtx<'c> {
    compiler: &'c mut Compiler,
    scope: &'c Scope,
    keyword: &'c str,
}

impl CompileCtx<'_> {
    pub(crate) fn current_keyword(&self) -> &str {
        self.keyword
    }

    pub(crate) fn options(&self) -> &ValidationOptions {
        &self.compiler.options
    }

    pub(crate) fn has_vocabulary(&self, vocabulary: &Vocabulary) -> bool {
        self.scope.meta.vocabularies.contains(vocabulary)
    }

    /// Whether `format` asserts: the option wins, otherwise the
    /// format-assertion vocabulary decides.
    pub(crate) fn asserts_formats(&self) -> bool {
        self.compiler
            .options
            .validate_formats
            .unwrap_or_else(|| self.has_vocabulary(&Vocabulary::FormatAssertion))
    }

    /// Compile a subschema located `path` below the current schema.
    pub(crate) fn subschema(
        &mut self,
        value: &Value,
        path: &[Seg<'_>],
    ) -> Result<SchemaId, SchemaError> {
        let mut document_pointer = self.scope.document_pointer.clone();
        let mut resource_pointer = self.scope.resource_pointer.clone();
        for seg in path {
            match seg {
                Seg::Key(key) => {
                    document_pointer.push(*key);
                    resource_pointer.push(*key);
                }
                Seg::Index(index) => {
                    document_pointer.push(*index);
                    resource_pointer.push(*index);
                }
            }
        }
        let linking_keyword = match path.first() {
            Some(Seg::Key(key)) => Some((*key).into()),
            _ => None,
        };
        let scope = Scope {
            base: Arc::clone(&self.scope.base),
            document_root: Arc::clone(&self.scope.document_root),
            document_pointer,
            resource_pointer,
            meta: Arc::clone(&self.scope.meta),
            is_document_root: false,
            linking_keyword,
            inherited_x_error: self.scope.inherited_x_error.clone(),
        };
        self.compiler.compile_schema(value, scope)
    }

    /// Compile a pattern under the configured dialect, with caching.
    pub(crate) fn pattern(&mut self, pattern: &str) -> Result<Arc<CompiledPattern>, SchemaError> {
        self.compiler.pattern(pattern)
    }

    /// Record a reference for the fix-point and hand back its future
    /// target.
    pub(crate) fn reference(&mut self, reference: &str) -> Result<PendingTarget, SchemaError> {
        let resolved = uri::resolve_against(&self.scope.base, reference)?;
        let target = PendingTarget {
            uri: resolved.as_str().to_string(),
            cell: Arc::new(OnceCell::new()),
        };
        self.compiler.pending.push(target.clone());
        Ok(target)
    }
}
