//! Root-statement discovery.
//!
//! Walks backwards from a node or triple to the top-level statements it takes
//! part in. A triple whose subject is named, or is an anonymous individual, is
//! a root. A triple under any other anonymous node is scaffolding: the walk
//! continues with every triple that has that node as its object. An anonymous
//! node nobody references is a root cluster of its own, so its triples become
//! roots. Annotation carriers resolve to the base triple of their root
//! annotation.
//!
//! Each anonymous node is expanded at most once, which bounds the walk on
//! graphs with anonymous cycles.

use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::graph::Triple;
use crate::node::Node;
use crate::statement::Statement;
use crate::view::{View, ViewContext, ViewType};
use crate::vocab;

/// Reverse index from triples and nodes to their root statements.
#[derive(Debug, Clone, Copy)]
pub struct RootIndex<'a> {
    ctx: ViewContext<'a>,
}

impl<'a> RootIndex<'a> {
    pub fn new(ctx: ViewContext<'a>) -> Self {
        Self { ctx }
    }

    /// Roots of every triple mentioning `target` as subject or object.
    ///
    /// Roots have a named or anonymous-individual subject, except for an
    /// unreferenced anonymous cluster, whose own triples are returned.
    pub fn roots_of(&self, target: &Node) -> Vec<Statement> {
        let graph = self.ctx.graph;
        let mut seeds = Vec::new();
        if target.is_resource() {
            seeds.extend(graph.find(Some(target), None, None));
        }
        seeds.extend(graph.find(None, None, Some(target)));
        self.closure(seeds)
    }

    /// Roots of one triple (the triple itself if it is a root).
    pub fn roots_of_triple(&self, triple: &Triple) -> Vec<Statement> {
        self.closure(vec![triple.clone()])
    }

    /// Roots of several triples at once, sharing one walk.
    pub fn roots_of_all(&self, triples: impl IntoIterator<Item = Triple>) -> Vec<Statement> {
        self.closure(triples.into_iter().collect())
    }

    /// Whether triples under `subject` are roots.
    pub fn is_root_subject(&self, subject: &Node) -> bool {
        match subject {
            Node::Iri(_) => true,
            Node::Blank(_) => self.ctx.can_view(subject, ViewType::AnonymousIndividual),
            Node::Literal(_) => false,
        }
    }

    /// Whether `triple` only records which statement an annotation node
    /// reifies. Such triples do not make their object referenced.
    fn is_reification_of(&self, triple: &Triple) -> bool {
        matches!(
            triple.predicate.as_str(),
            vocab::OWL_ANNOTATED_SOURCE | vocab::OWL_ANNOTATED_TARGET
        ) && self.ctx.can_view(&triple.subject, ViewType::Annotation)
    }

    /// Breadth-first closure from `seeds`. The result is sorted and free of
    /// duplicates.
    fn closure(&self, seeds: Vec<Triple>) -> Vec<Statement> {
        let graph = self.ctx.graph;
        let mut roots: BTreeSet<Statement> = BTreeSet::new();
        let mut visited: HashSet<Triple> = HashSet::new();
        let mut expanded: HashSet<Node> = HashSet::new();
        let mut queue: VecDeque<Triple> = seeds.into();

        while let Some(triple) = queue.pop_front() {
            if !visited.insert(triple.clone()) {
                continue;
            }
            let subject = triple.subject.clone();
            if self.is_root_subject(&subject) {
                roots.insert(Statement::root(triple));
                continue;
            }
            if let Some(annotation) = self
                .ctx
                .try_view(&subject, ViewType::Annotation)
                .and_then(View::into_annotation)
            {
                match annotation.root().base() {
                    Ok(base) => queue.push_back(base),
                    Err(e) => tracing::debug!(node = %subject, error = %e, "skipping broken reification"),
                }
                continue;
            }
            if !expanded.insert(subject.clone()) {
                tracing::trace!(node = %subject, "anonymous node already expanded");
                continue;
            }
            let referencing: Vec<Triple> = graph
                .find(None, None, Some(&subject))
                .into_iter()
                .filter(|t| !self.is_reification_of(t))
                .collect();
            if referencing.is_empty() {
                // unreferenced anonymous cluster: its own triples are the roots
                for own in graph.find(Some(&subject), None, None) {
                    roots.insert(Statement::root(own));
                }
            } else {
                queue.extend(referencing);
            }
        }
        roots.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::Annotations;
    use crate::config::ModelConfig;
    use crate::graph::index::MemGraph;
    use crate::graph::TripleStore;
    use crate::node::Literal;
    use crate::view::personality::Personality;

    fn iri(s: &str) -> Node {
        Node::iri(s)
    }

    #[test]
    fn named_subject_is_its_own_root() {
        let graph = MemGraph::new();
        let t = Triple::new(iri("urn:A"), vocab::RDFS_SUB_CLASS_OF, iri("urn:B"));
        graph.add(t.clone());
        let personality = Personality::standard(&ModelConfig::default());
        let index = RootIndex::new(ViewContext::new(&graph, &personality));
        assert_eq!(index.roots_of_triple(&t), vec![Statement::root(t.clone())]);
        assert_eq!(index.roots_of(&iri("urn:B")), vec![Statement::root(t)]);
    }

    #[test]
    fn restriction_resolves_to_subclass_axiom() {
        // A subClassOf [ onProperty p ; someValuesFrom B ]
        let graph = MemGraph::new();
        let r = graph.create_blank().unwrap();
        let axiom = Triple::new(iri("urn:A"), vocab::RDFS_SUB_CLASS_OF, r.clone());
        graph.add(axiom.clone());
        graph.add(Triple::new(r.clone(), vocab::RDF_TYPE, iri(vocab::OWL_RESTRICTION)));
        graph.add(Triple::new(r.clone(), vocab::OWL_ON_PROPERTY, iri("urn:p")));
        graph.add(Triple::new(r, vocab::OWL_SOME_VALUES_FROM, iri("urn:B")));
        let personality = Personality::standard(&ModelConfig::default());
        let index = RootIndex::new(ViewContext::new(&graph, &personality));

        assert_eq!(index.roots_of(&iri("urn:B")), vec![Statement::root(axiom.clone())]);
        assert_eq!(index.roots_of(&iri("urn:p")), vec![Statement::root(axiom)]);
    }

    #[test]
    fn list_cells_resolve_through_rest_chain() {
        let graph = MemGraph::new();
        let c1 = graph.create_blank().unwrap();
        let c2 = graph.create_blank().unwrap();
        let chain = Triple::new(iri("urn:p"), vocab::OWL_PROPERTY_CHAIN_AXIOM, c1.clone());
        graph.add(chain.clone());
        graph.add(Triple::new(c1.clone(), vocab::RDF_FIRST, iri("urn:q")));
        graph.add(Triple::new(c1, vocab::RDF_REST, c2.clone()));
        graph.add(Triple::new(c2.clone(), vocab::RDF_FIRST, iri("urn:r")));
        graph.add(Triple::new(c2, vocab::RDF_REST, iri(vocab::RDF_NIL)));
        let personality = Personality::standard(&ModelConfig::default());
        let index = RootIndex::new(ViewContext::new(&graph, &personality));

        assert_eq!(index.roots_of(&iri("urn:r")), vec![Statement::root(chain)]);
    }

    #[test]
    fn orphan_group_falls_back_to_own_triples() {
        let graph = MemGraph::new();
        let group = graph.create_blank().unwrap();
        let cell = graph.create_blank().unwrap();
        let ty = Triple::new(group.clone(), vocab::RDF_TYPE, iri(vocab::OWL_ALL_DISJOINT_CLASSES));
        let members = Triple::new(group, vocab::OWL_MEMBERS, cell.clone());
        graph.add(ty.clone());
        graph.add(members.clone());
        graph.add(Triple::new(cell.clone(), vocab::RDF_FIRST, iri("urn:A")));
        graph.add(Triple::new(cell, vocab::RDF_REST, iri(vocab::RDF_NIL)));
        let personality = Personality::standard(&ModelConfig::default());
        let index = RootIndex::new(ViewContext::new(&graph, &personality));

        let mut expected = vec![Statement::root(ty), Statement::root(members)];
        expected.sort();
        assert_eq!(index.roots_of(&iri("urn:A")), expected);
    }

    #[test]
    fn anonymous_cycle_terminates() {
        let graph = MemGraph::new();
        let a = graph.create_blank().unwrap();
        let b = graph.create_blank().unwrap();
        graph.add(Triple::new(a.clone(), "urn:p", b.clone()));
        graph.add(Triple::new(b.clone(), "urn:q", a.clone()));
        graph.add(Triple::new(b.clone(), "urn:r", iri("urn:T")));
        let entry = Triple::new(iri("urn:X"), "urn:s", a);
        let personality = Personality::standard(&ModelConfig::default());
        let index = RootIndex::new(ViewContext::new(&graph, &personality));

        // closed cycle: no referrer from outside
        let roots = index.roots_of(&iri("urn:T"));
        assert!(roots.iter().all(|s| index.is_root_subject(s.subject())));

        graph.add(entry.clone());
        assert_eq!(index.roots_of(&iri("urn:T")), vec![Statement::root(entry)]);
    }

    #[test]
    fn anonymous_individual_is_a_root_subject() {
        let graph = MemGraph::new();
        graph.add(Triple::new(iri("urn:C"), vocab::RDF_TYPE, iri(vocab::OWL_CLASS)));
        let x = graph.create_blank().unwrap();
        let assertion = Triple::new(x.clone(), vocab::RDF_TYPE, iri("urn:C"));
        graph.add(assertion.clone());
        let personality = Personality::standard(&ModelConfig::default());
        let index = RootIndex::new(ViewContext::new(&graph, &personality));
        assert!(index.roots_of(&x).contains(&Statement::root(assertion)));
    }

    #[test]
    fn annotation_carriers_resolve_to_base() {
        let graph = MemGraph::new();
        let decl = Triple::new(iri("urn:C"), vocab::RDF_TYPE, iri(vocab::OWL_CLASS));
        graph.add(decl.clone());
        let personality = Personality::standard(&ModelConfig::default());
        let ctx = ViewContext::new(&graph, &personality);
        let service = Annotations::new(ctx);
        let outer = service.add(&decl, vocab::RDFS_COMMENT, Literal::plain("c")).unwrap();
        let inner = service.add(outer.triple(), vocab::RDFS_LABEL, Literal::plain("l")).unwrap();

        let index = RootIndex::new(ctx);
        assert_eq!(index.roots_of_triple(inner.triple()), vec![Statement::root(decl.clone())]);
        assert_eq!(index.roots_of(&Node::Literal(Literal::plain("l"))), vec![Statement::root(decl)]);
    }

    #[test]
    fn annotated_orphan_group_keeps_its_roots() {
        let graph = MemGraph::new();
        let group = graph.create_blank().unwrap();
        let cell = graph.create_blank().unwrap();
        let ty = Triple::new(group.clone(), vocab::RDF_TYPE, iri(vocab::OWL_ALL_DISJOINT_CLASSES));
        let members = Triple::new(group, vocab::OWL_MEMBERS, cell.clone());
        graph.add(ty.clone());
        graph.add(members.clone());
        graph.add(Triple::new(cell.clone(), vocab::RDF_FIRST, iri("urn:A")));
        graph.add(Triple::new(cell, vocab::RDF_REST, iri(vocab::RDF_NIL)));
        let personality = Personality::standard(&ModelConfig::default());
        let ctx = ViewContext::new(&graph, &personality);
        let index = RootIndex::new(ctx);
        let before = index.roots_of(&iri("urn:A"));

        Annotations::new(ctx)
            .add(&ty, vocab::RDFS_COMMENT, Literal::plain("x"))
            .unwrap();

        let mut expected = vec![Statement::root(ty.clone()), Statement::root(members)];
        expected.sort();
        assert_eq!(before, expected);
        assert_eq!(index.roots_of(&iri("urn:A")), expected);
        assert!(index.roots_of(&Node::Literal(Literal::plain("x"))).contains(&Statement::root(ty)));
    }

    #[test]
    fn annotated_scaffolding_still_resolves_to_referrer() {
        let graph = MemGraph::new();
        let r = graph.create_blank().unwrap();
        let axiom = Triple::new(iri("urn:A"), vocab::RDFS_SUB_CLASS_OF, r.clone());
        let on_property = Triple::new(r.clone(), vocab::OWL_ON_PROPERTY, iri("urn:p"));
        graph.add(axiom.clone());
        graph.add(Triple::new(r.clone(), vocab::RDF_TYPE, iri(vocab::OWL_RESTRICTION)));
        graph.add(on_property.clone());
        graph.add(Triple::new(r, vocab::OWL_SOME_VALUES_FROM, iri("urn:B")));
        let personality = Personality::standard(&ModelConfig::default());
        let ctx = ViewContext::new(&graph, &personality);
        Annotations::new(ctx)
            .add(&on_property, vocab::RDFS_COMMENT, Literal::plain("y"))
            .unwrap();

        let index = RootIndex::new(ctx);
        assert_eq!(index.roots_of(&iri("urn:p")), vec![Statement::root(axiom.clone())]);
        assert_eq!(index.roots_of_triple(&on_property), vec![Statement::root(axiom)]);
    }
}
