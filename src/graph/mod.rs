//! Triple store interface and the in-memory store.
//!
//! The engine only ever talks to a [`TripleStore`]: pattern lookup, add,
//! remove, membership and the imports closure. [`index::MemGraph`] is the
//! in-memory implementation, indexed by subject, predicate and object.
//!
//! All reads return owned snapshots (`Vec<Triple>`), so callers may mutate the
//! store while walking a previous result.

pub mod index;

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use crate::error::OntResult;
use crate::node::{Iri, Node};
use crate::vocab;

/// A (subject, predicate, object) statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    /// Named or anonymous node.
    pub subject: Node,
    /// Always a named node.
    pub predicate: Iri,
    /// Any node.
    pub object: Node,
}

impl Triple {
    pub fn new(subject: impl Into<Node>, predicate: impl Into<Iri>, object: impl Into<Node>) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Whether this triple matches a pattern (`None` is a wildcard).
    pub fn matches(&self, subject: Option<&Node>, predicate: Option<&Iri>, object: Option<&Node>) -> bool {
        subject.is_none_or(|s| *s == self.subject)
            && predicate.is_none_or(|p| *p == self.predicate)
            && object.is_none_or(|o| *o == self.object)
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// The store interface the view engine consumes.
///
/// `find`/`contains` span the store and its transitive imports; `find_local`
/// and mutation only touch the store's own triples.
pub trait TripleStore: Send + Sync {
    /// Pattern lookup over this store and all of its imports.
    fn find(&self, subject: Option<&Node>, predicate: Option<&Iri>, object: Option<&Node>) -> Vec<Triple>;

    /// Pattern lookup over this store's own triples.
    fn find_local(&self, subject: Option<&Node>, predicate: Option<&Iri>, object: Option<&Node>) -> Vec<Triple>;

    /// Membership over this store and all of its imports.
    fn contains(&self, triple: &Triple) -> bool;

    /// Membership over this store's own triples.
    fn contains_local(&self, triple: &Triple) -> bool;

    /// Add a triple. Returns `false` if it was already present locally.
    fn add(&self, triple: Triple) -> bool;

    /// Remove a local triple. Returns `false` if it was absent.
    fn remove(&self, triple: &Triple) -> bool;

    /// Allocate a fresh anonymous node, unique across every store in the
    /// process.
    fn create_blank(&self) -> OntResult<Node>;

    /// Number of local triples.
    fn len(&self) -> usize;

    /// Directly imported stores.
    fn imports(&self) -> Vec<Arc<dyn TripleStore>>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A store is independent when it imports nothing.
    fn is_independent(&self) -> bool {
        self.imports().is_empty()
    }

    /// Objects of `(subject, predicate, ?)`.
    fn objects(&self, subject: &Node, predicate: &str) -> Vec<Node> {
        self.find(Some(subject), Some(&Iri::new(predicate)), None)
            .into_iter()
            .map(|t| t.object)
            .collect()
    }

    /// Subjects of `(?, predicate, object)`.
    fn subjects(&self, predicate: &str, object: &Node) -> Vec<Node> {
        self.find(None, Some(&Iri::new(predicate)), Some(object))
            .into_iter()
            .map(|t| t.subject)
            .collect()
    }

    /// Whether `(subject, predicate, object)` is present anywhere.
    fn has(&self, subject: &Node, predicate: &str, object: &Node) -> bool {
        self.contains(&Triple::new(subject.clone(), predicate, object.clone()))
    }

    /// All `rdf:type` objects of `subject`.
    fn types(&self, subject: &Node) -> Vec<Node> {
        self.objects(subject, vocab::RDF_TYPE)
    }

    /// Whether `subject` carries `rdf:type type_iri`.
    fn has_type(&self, subject: &Node, type_iri: &str) -> bool {
        self.has(subject, vocab::RDF_TYPE, &Node::iri(type_iri))
    }
}

/// Transitive imports of `root`, each store once, in breadth-first order.
///
/// `root` itself is never part of the result, even when an import cycle leads
/// back to it.
pub fn imports_closure(root: &dyn TripleStore) -> Vec<Arc<dyn TripleStore>> {
    let mut seen: HashSet<*const ()> = HashSet::new();
    seen.insert(root as *const dyn TripleStore as *const ());
    let mut out = Vec::new();
    let mut queue: VecDeque<Arc<dyn TripleStore>> = root.imports().into();
    while let Some(graph) = queue.pop_front() {
        if !seen.insert(Arc::as_ptr(&graph) as *const ()) {
            continue;
        }
        queue.extend(graph.imports());
        out.push(graph);
    }
    out
}
