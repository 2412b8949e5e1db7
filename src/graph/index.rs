//! In-memory triple store with subject, predicate and object indexes.
//!
//! Uses `DashMap` for the three lookup indexes so that every operation takes
//! `&self`; views hold a shared reference to the store and mutate through it.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use dashmap::DashMap;

use crate::error::OntResult;
use crate::node::{BlankAllocator, Iri, Node};

use super::{imports_closure, Triple, TripleStore};

static BLANKS: BlankAllocator = BlankAllocator::new();

/// In-memory triple store.
///
/// Holds its own triples plus a list of imported stores. Lookups through the
/// [`TripleStore`] interface see the union of both; mutation is local.
pub struct MemGraph {
    /// Subject → triples with that subject.
    by_subject: DashMap<Node, HashSet<Triple>>,
    /// Predicate → triples with that predicate.
    by_predicate: DashMap<Iri, HashSet<Triple>>,
    /// Object → triples with that object.
    by_object: DashMap<Node, HashSet<Triple>>,
    triple_count: AtomicUsize,
    imports: RwLock<Vec<Arc<dyn TripleStore>>>,
}

impl MemGraph {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            by_subject: DashMap::new(),
            by_predicate: DashMap::new(),
            by_object: DashMap::new(),
            triple_count: AtomicUsize::new(0),
            imports: RwLock::new(Vec::new()),
        }
    }

    /// Add an imported store. Import cycles are tolerated by lookups.
    pub fn add_import(&self, graph: Arc<dyn TripleStore>) {
        self.imports.write().expect("imports lock poisoned").push(graph);
    }

    /// Drop every import that is the same store as `graph`.
    pub fn remove_import(&self, graph: &Arc<dyn TripleStore>) {
        self.imports
            .write()
            .expect("imports lock poisoned")
            .retain(|g| !Arc::ptr_eq(g, graph));
    }

    /// Every local triple, sorted.
    pub fn all_triples(&self) -> Vec<Triple> {
        self.find_local(None, None, None)
    }
}

impl TripleStore for MemGraph {
    fn find(&self, subject: Option<&Node>, predicate: Option<&Iri>, object: Option<&Node>) -> Vec<Triple> {
        let mut found = self.find_local(subject, predicate, object);
        let imports = imports_closure(self);
        if imports.is_empty() {
            return found;
        }
        let mut seen: HashSet<Triple> = found.iter().cloned().collect();
        for graph in imports {
            for t in graph.find_local(subject, predicate, object) {
                if seen.insert(t.clone()) {
                    found.push(t);
                }
            }
        }
        found.sort();
        found
    }

    fn find_local(&self, subject: Option<&Node>, predicate: Option<&Iri>, object: Option<&Node>) -> Vec<Triple> {
        // Pick the most selective index available.
        let mut found: Vec<Triple> = if let Some(s) = subject {
            self.by_subject
                .get(s)
                .map(|set| set.iter().filter(|t| t.matches(None, predicate, object)).cloned().collect())
                .unwrap_or_default()
        } else if let Some(o) = object {
            self.by_object
                .get(o)
                .map(|set| set.iter().filter(|t| t.matches(None, predicate, None)).cloned().collect())
                .unwrap_or_default()
        } else if let Some(p) = predicate {
            self.by_predicate
                .get(p)
                .map(|set| set.iter().cloned().collect())
                .unwrap_or_default()
        } else {
            self.by_subject
                .iter()
                .flat_map(|entry| entry.value().iter().cloned().collect::<Vec<_>>())
                .collect()
        };
        found.sort();
        found
    }

    fn contains(&self, triple: &Triple) -> bool {
        self.contains_local(triple) || imports_closure(self).iter().any(|g| g.contains_local(triple))
    }

    fn contains_local(&self, triple: &Triple) -> bool {
        self.by_subject
            .get(&triple.subject)
            .is_some_and(|set| set.contains(triple))
    }

    fn add(&self, triple: Triple) -> bool {
        let inserted = self
            .by_subject
            .entry(triple.subject.clone())
            .or_default()
            .insert(triple.clone());
        if !inserted {
            return false;
        }
        self.by_predicate
            .entry(triple.predicate.clone())
            .or_default()
            .insert(triple.clone());
        self.by_object
            .entry(triple.object.clone())
            .or_default()
            .insert(triple);
        self.triple_count.fetch_add(1, Ordering::Relaxed);
        true
    }

    fn remove(&self, triple: &Triple) -> bool {
        let removed = self
            .by_subject
            .get_mut(&triple.subject)
            .is_some_and(|mut set| set.remove(triple));
        if !removed {
            return false;
        }
        self.by_subject.remove_if(&triple.subject, |_, set| set.is_empty());
        if let Some(mut set) = self.by_predicate.get_mut(&triple.predicate) {
            set.remove(triple);
        }
        self.by_predicate.remove_if(&triple.predicate, |_, set| set.is_empty());
        if let Some(mut set) = self.by_object.get_mut(&triple.object) {
            set.remove(triple);
        }
        self.by_object.remove_if(&triple.object, |_, set| set.is_empty());
        self.triple_count.fetch_sub(1, Ordering::Relaxed);
        true
    }

    fn create_blank(&self) -> OntResult<Node> {
        Ok(Node::Blank(BLANKS.next_id()?))
    }

    fn len(&self) -> usize {
        self.triple_count.load(Ordering::Relaxed)
    }

    fn imports(&self) -> Vec<Arc<dyn TripleStore>> {
        self.imports.read().expect("imports lock poisoned").clone()
    }
}

impl Default for MemGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemGraph")
            .field("triples", &self.len())
            .field("imports", &self.imports().len())
            .finish()
    }
}
