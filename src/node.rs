//! Graph node model.
//!
//! A [`Node`] is a named node ([`Iri`]), an anonymous node ([`BlankId`]) or a
//! [`Literal`]. Anonymous identifiers come from a [`BlankAllocator`] and carry
//! no meaning outside the process that allocated them.
//!
//! Literal identity is lexical: two literals are equal when their lexical
//! forms, language tags (lower-cased at construction) and effective datatypes
//! are equal. `"01"^^xsd:integer` and `"1"^^xsd:integer` are different
//! literals even though they denote the same number.

use std::cmp::Ordering as CmpOrdering;
use std::hash::{Hash, Hasher};
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use crate::error::GraphError;
use crate::vocab;

// ---------------------------------------------------------------------------
// Named nodes
// ---------------------------------------------------------------------------

/// A global identifier. Cheap to clone.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri(Arc<str>);

impl Iri {
    pub fn new(iri: impl Into<Arc<str>>) -> Self {
        Self(iri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Iri {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Iri {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl PartialEq<str> for Iri {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Iri {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl std::fmt::Debug for Iri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", vocab::short(&self.0))
    }
}

impl std::fmt::Display for Iri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

// ---------------------------------------------------------------------------
// Anonymous nodes
// ---------------------------------------------------------------------------

/// Store-local identifier of an anonymous node.
///
/// Uses `NonZeroU64` so that `Option<BlankId>` is the same size as `BlankId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct BlankId(NonZeroU64);

impl BlankId {
    /// Returns `None` if `raw` is zero.
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(BlankId)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl std::fmt::Display for BlankId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "_:b{}", self.0)
    }
}

/// Thread-safe anonymous node allocator.
///
/// Produces monotonically increasing ids starting from 1. Stores draw from one
/// process-wide allocator, so an import never aliases an anonymous node of the
/// store importing it.
#[derive(Debug)]
pub struct BlankAllocator {
    next: AtomicU64,
}

impl BlankAllocator {
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Allocate the next anonymous node id.
    ///
    /// Returns an error once the id space is exhausted (after 2^64 - 1
    /// allocations). The counter parks at zero, so no id is issued twice.
    pub fn next_id(&self) -> Result<BlankId, GraphError> {
        self.next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                (n != 0).then(|| n.wrapping_add(1))
            })
            .ok()
            .and_then(BlankId::new)
            .ok_or(GraphError::BlankIdsExhausted)
    }
}

impl Default for BlankAllocator {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Literals
// ---------------------------------------------------------------------------

/// Decoded value of a literal, computed on first use.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Boolean(bool),
    Integer(i128),
    Double(f64),
    Text(String),
    /// The lexical form is not valid for the datatype, or the datatype is unknown.
    Opaque,
}

/// A typed literal value.
pub struct Literal {
    lexical: Arc<str>,
    lang: Option<Arc<str>>,
    datatype: Iri,
    decoded: OnceLock<LiteralValue>,
}

impl Literal {
    /// Build a literal from its three components.
    ///
    /// A non-empty language tag is lower-cased and forces `rdf:langString`.
    /// An empty tag, or no tag and no datatype, yields a plain `xsd:string`.
    pub fn new(lexical: impl Into<Arc<str>>, lang: Option<&str>, datatype: Option<Iri>) -> Self {
        let lang = lang.filter(|l| !l.is_empty()).map(|l| Arc::from(l.to_lowercase()));
        let datatype = match (&lang, datatype) {
            (Some(_), _) => Iri::new(vocab::RDF_LANG_STRING),
            (None, Some(dt)) if dt == vocab::RDF_LANG_STRING => Iri::new(vocab::XSD_STRING),
            (None, Some(dt)) => dt,
            (None, None) => Iri::new(vocab::XSD_STRING),
        };
        Self {
            lexical: lexical.into(),
            lang,
            datatype,
            decoded: OnceLock::new(),
        }
    }

    /// A plain string literal.
    pub fn plain(lexical: impl Into<Arc<str>>) -> Self {
        Self::new(lexical, None, None)
    }

    /// A language-tagged string.
    pub fn lang(lexical: impl Into<Arc<str>>, tag: &str) -> Self {
        Self::new(lexical, Some(tag), None)
    }

    /// A literal with an explicit datatype.
    pub fn typed(lexical: impl Into<Arc<str>>, datatype: impl Into<Iri>) -> Self {
        Self::new(lexical, None, Some(datatype.into()))
    }

    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    /// The language tag, lower-cased, if any.
    pub fn language(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    /// The effective datatype.
    pub fn datatype(&self) -> &Iri {
        &self.datatype
    }

    /// The decoded value, memoized on first call.
    pub fn value(&self) -> &LiteralValue {
        self.decoded.get_or_init(|| decode(&self.lexical, &self.datatype))
    }

    fn key(&self) -> (&str, Option<&str>, &Iri) {
        (&self.lexical, self.lang.as_deref(), &self.datatype)
    }
}

fn decode(lexical: &str, datatype: &Iri) -> LiteralValue {
    match datatype.as_str() {
        vocab::XSD_STRING | vocab::RDF_LANG_STRING | vocab::RDF_PLAIN_LITERAL => {
            LiteralValue::Text(lexical.to_string())
        }
        vocab::XSD_BOOLEAN => match lexical.trim() {
            "true" | "1" => LiteralValue::Boolean(true),
            "false" | "0" => LiteralValue::Boolean(false),
            _ => LiteralValue::Opaque,
        },
        vocab::XSD_INTEGER
        | vocab::XSD_INT
        | vocab::XSD_LONG
        | vocab::XSD_SHORT
        | vocab::XSD_BYTE
        | vocab::XSD_NON_NEGATIVE_INTEGER
        | vocab::XSD_POSITIVE_INTEGER => lexical
            .trim()
            .parse::<i128>()
            .map(LiteralValue::Integer)
            .unwrap_or(LiteralValue::Opaque),
        vocab::XSD_DECIMAL | vocab::XSD_DOUBLE | vocab::XSD_FLOAT => lexical
            .trim()
            .parse::<f64>()
            .map(LiteralValue::Double)
            .unwrap_or(LiteralValue::Opaque),
        _ => LiteralValue::Opaque,
    }
}

impl Clone for Literal {
    fn clone(&self) -> Self {
        // The memoized value is dropped; clones are cheap to re-decode.
        Self {
            lexical: Arc::clone(&self.lexical),
            lang: self.lang.clone(),
            datatype: self.datatype.clone(),
            decoded: OnceLock::new(),
        }
    }
}

impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Literal {}

impl Hash for Literal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Literal {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl Ord for Literal {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        self.key().cmp(&other.key())
    }
}

impl std::fmt::Debug for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", &*self.lexical)?;
        match &self.lang {
            Some(lang) => write!(f, "@{lang}"),
            None if self.datatype == vocab::XSD_STRING => Ok(()),
            None => write!(f, "^^{}", vocab::short(self.datatype.as_str())),
        }
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// Any node of the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {
    Iri(Iri),
    Blank(BlankId),
    Literal(Literal),
}

impl Node {
    /// Shorthand for a named node.
    pub fn iri(iri: impl Into<Arc<str>>) -> Self {
        Node::Iri(Iri::new(iri))
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Node::Iri(_))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Node::Blank(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Node::Literal(_))
    }

    /// Named and anonymous nodes may appear as subjects; literals may not.
    pub fn is_resource(&self) -> bool {
        !self.is_literal()
    }

    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Node::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_blank(&self) -> Option<BlankId> {
        match self {
            Node::Blank(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Node::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Whether this is the named node `iri`.
    pub fn is(&self, iri: &str) -> bool {
        matches!(self, Node::Iri(i) if i == iri)
    }
}

impl From<Iri> for Node {
    fn from(iri: Iri) -> Self {
        Node::Iri(iri)
    }
}

impl From<&Iri> for Node {
    fn from(iri: &Iri) -> Self {
        Node::Iri(iri.clone())
    }
}

impl From<BlankId> for Node {
    fn from(id: BlankId) -> Self {
        Node::Blank(id)
    }
}

impl From<Literal> for Node {
    fn from(lit: Literal) -> Self {
        Node::Literal(lit)
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Iri(iri) => write!(f, "{iri}"),
            Node::Blank(id) => write!(f, "{id}"),
            Node::Literal(lit) => write!(f, "{lit}"),
        }
    }
}
