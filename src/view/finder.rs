//! Candidate finders.
//!
//! A [`Finder`] cheaply enumerates nodes that *might* support a view, before
//! the view's [`Filter`](super::predicate::Filter) decides. Finders are
//! restartable (call [`Finder::find`] again) and do not deduplicate.

use std::sync::Arc;

use crate::node::{Iri, Node};
use crate::vocab;

use super::ViewContext;

/// Lazy sequence of candidate nodes.
pub type NodeIter<'a> = Box<dyn Iterator<Item = Node> + 'a>;

type FinderFn = dyn Fn(ViewContext<'_>) -> NodeIter<'static> + Send + Sync;

/// A shareable candidate enumerator.
#[derive(Clone)]
pub struct Finder(Arc<FinderFn>);

impl Finder {
    pub fn new(f: impl Fn(ViewContext<'_>) -> NodeIter<'static> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Enumerate candidates over the context's store.
    pub fn find(&self, ctx: ViewContext<'_>) -> NodeIter<'static> {
        (self.0)(ctx)
    }

    /// Candidates of `self`, then of `other`.
    pub fn chain(self, other: Finder) -> Finder {
        Finder::new(move |ctx| Box::new(self.find(ctx).chain(other.find(ctx))))
    }

    /// Subjects carrying `rdf:type type_iri`.
    pub fn by_type(type_iri: &'static str) -> Finder {
        Finder::new(move |ctx| {
            let triples = ctx.graph.find(None, Some(&Iri::new(vocab::RDF_TYPE)), Some(&Node::iri(type_iri)));
            Box::new(triples.into_iter().map(|t| t.subject))
        })
    }

    /// Subjects carrying any of `type_iris`.
    pub fn by_types(type_iris: &'static [&'static str]) -> Finder {
        type_iris
            .iter()
            .map(|t| Finder::by_type(*t))
            .reduce(Finder::chain)
            .unwrap_or_else(Finder::nothing)
    }

    /// Subjects of triples using `predicate`.
    pub fn by_predicate(predicate: &'static str) -> Finder {
        Finder::new(move |ctx| {
            let triples = ctx.graph.find(None, Some(&Iri::new(predicate)), None);
            Box::new(triples.into_iter().map(|t| t.subject))
        })
    }

    /// Every subject and object in the store.
    pub fn anything() -> Finder {
        Finder::new(|ctx| {
            let triples = ctx.graph.find(None, None, None);
            Box::new(triples.into_iter().flat_map(|t| [t.subject, t.object]))
        })
    }

    pub fn nothing() -> Finder {
        Finder::new(|_| Box::new(std::iter::empty()))
    }
}

impl std::fmt::Debug for Finder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Finder(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::graph::index::MemGraph;
    use crate::graph::{Triple, TripleStore};
    use crate::view::personality::Personality;

    fn declare(graph: &MemGraph, iri: &str, ty: &str) {
        graph.add(Triple::new(Node::iri(iri), vocab::RDF_TYPE, Node::iri(ty)));
    }

    #[test]
    fn empty_store_yields_nothing() {
        let graph = MemGraph::new();
        let personality = Personality::standard(&ModelConfig::default());
        let ctx = ViewContext::new(&graph, &personality);
        assert_eq!(Finder::anything().find(ctx).count(), 0);
        assert_eq!(Finder::by_type(vocab::OWL_CLASS).find(ctx).count(), 0);
    }

    #[test]
    fn by_type_and_chain() {
        let graph = MemGraph::new();
        declare(&graph, "urn:a", vocab::OWL_CLASS);
        declare(&graph, "urn:b", vocab::RDFS_DATATYPE);
        let personality = Personality::standard(&ModelConfig::default());
        let ctx = ViewContext::new(&graph, &personality);

        let classes: Vec<Node> = Finder::by_type(vocab::OWL_CLASS).find(ctx).collect();
        assert_eq!(classes, vec![Node::iri("urn:a")]);

        let both = Finder::by_types(&[vocab::OWL_CLASS, vocab::RDFS_DATATYPE]);
        assert_eq!(both.find(ctx).count(), 2);
        // restartable
        assert_eq!(both.find(ctx).count(), 2);
    }

    #[test]
    fn anything_does_not_deduplicate() {
        let graph = MemGraph::new();
        declare(&graph, "urn:a", vocab::OWL_CLASS);
        declare(&graph, "urn:b", vocab::OWL_CLASS);
        let personality = Personality::standard(&ModelConfig::default());
        let ctx = ViewContext::new(&graph, &personality);
        // owl:Class appears as object twice
        let all: Vec<Node> = Finder::anything().find(ctx).collect();
        assert_eq!(all.len(), 4);
    }
}
