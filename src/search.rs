//! Axiom shapes and the per-kind reference index.
//!
//! A [`Searcher`] answers two questions for one entity kind: which entities of
//! that kind does the model have, and which axioms mention a given one. Axioms
//! are root statements (see [`crate::root`]) that an [`AxiomShapes`] table
//! recognizes.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::annotation::Annotations;
use crate::entity::{is_class_like, Entity, EntityKind};
use crate::graph::{imports_closure, Triple};
use crate::node::{Iri, Node};
use crate::root::RootIndex;
use crate::statement::Statement;
use crate::view::{View, ViewContext, ViewType};
use crate::vocab;

/// The axiom shapes of the standard table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AxiomKind {
    Declaration,
    SubClassOf,
    EquivalentClasses,
    DisjointClasses,
    SubPropertyOf,
    EquivalentProperties,
    DisjointProperties,
    InverseProperties,
    PropertyDomain,
    PropertyRange,
    PropertyChain,
    ClassAssertion,
    ObjectPropertyAssertion,
    DataPropertyAssertion,
    AnnotationAssertion,
    SameIndividual,
    DifferentIndividuals,
}

/// A root statement recognized as an axiom, with the annotations of one of
/// its reifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Axiom {
    pub kind: AxiomKind,
    pub statement: Statement,
    /// Annotation triples carried by `reification` (or by every reification
    /// when annotations are not split).
    pub annotations: Vec<Statement>,
    pub reification: Option<Node>,
}

/// Pluggable axiom-shape table.
pub trait AxiomShapes: Send + Sync {
    /// The axiom shape of a root statement, if it has one.
    fn classify(&self, statement: &Statement, ctx: ViewContext<'_>) -> Option<AxiomKind>;

    /// Turn a classified statement into axioms.
    ///
    /// Without splitting there is one axiom holding every annotation. With
    /// splitting, a statement reified more than once yields one axiom per
    /// reification.
    fn split(&self, kind: AxiomKind, statement: Statement, split: bool, ctx: ViewContext<'_>) -> Vec<Axiom> {
        let service = Annotations::new(ctx);
        let nodes = service.nodes(statement.triple());
        if !split || nodes.len() < 2 {
            let annotations = service.list(statement.triple());
            return vec![Axiom {
                kind,
                statement,
                annotations,
                reification: nodes.into_iter().next(),
            }];
        }
        nodes
            .into_iter()
            .map(|node| {
                let annotations = ctx
                    .try_view(&node, ViewType::Annotation)
                    .and_then(View::into_annotation)
                    .map(|a| a.properties())
                    .unwrap_or_default();
                Axiom {
                    kind,
                    statement: statement.clone(),
                    annotations,
                    reification: Some(node),
                }
            })
            .collect()
    }
}

/// The OWL 2 mapping of axioms to triples, for the shapes listed in
/// [`AxiomKind`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardShapes;

impl AxiomShapes for StandardShapes {
    fn classify(&self, statement: &Statement, ctx: ViewContext<'_>) -> Option<AxiomKind> {
        if !statement.is_root() {
            return None;
        }
        let (subject, predicate, object) = (statement.subject(), statement.predicate(), statement.object());
        let kind = match predicate.as_str() {
            vocab::RDF_TYPE => return classify_type(subject, object, ctx),
            vocab::RDFS_SUB_CLASS_OF => AxiomKind::SubClassOf,
            vocab::OWL_EQUIVALENT_CLASS => AxiomKind::EquivalentClasses,
            vocab::OWL_DISJOINT_WITH => AxiomKind::DisjointClasses,
            vocab::RDFS_SUB_PROPERTY_OF => AxiomKind::SubPropertyOf,
            vocab::OWL_EQUIVALENT_PROPERTY => AxiomKind::EquivalentProperties,
            vocab::OWL_PROPERTY_DISJOINT_WITH => AxiomKind::DisjointProperties,
            vocab::OWL_INVERSE_OF if subject.is_iri() => AxiomKind::InverseProperties,
            vocab::RDFS_DOMAIN => AxiomKind::PropertyDomain,
            vocab::RDFS_RANGE => AxiomKind::PropertyRange,
            vocab::OWL_PROPERTY_CHAIN_AXIOM => AxiomKind::PropertyChain,
            vocab::OWL_SAME_AS => AxiomKind::SameIndividual,
            vocab::OWL_DIFFERENT_FROM => AxiomKind::DifferentIndividuals,
            _ => return classify_assertion(predicate, object, ctx),
        };
        Some(kind)
    }
}

fn classify_type(subject: &Node, object: &Node, ctx: ViewContext<'_>) -> Option<AxiomKind> {
    let Some(ty) = object.as_iri() else {
        return is_class_like(object, ctx).then_some(AxiomKind::ClassAssertion);
    };
    if subject.is_iri() && EntityKind::from_declaration_type(ty.as_str()).is_some() {
        return Some(AxiomKind::Declaration);
    }
    match ty.as_str() {
        vocab::OWL_ALL_DISJOINT_CLASSES => Some(AxiomKind::DisjointClasses),
        vocab::OWL_ALL_DISJOINT_PROPERTIES => Some(AxiomKind::DisjointProperties),
        vocab::OWL_ALL_DIFFERENT => Some(AxiomKind::DifferentIndividuals),
        _ => is_class_like(object, ctx).then_some(AxiomKind::ClassAssertion),
    }
}

fn classify_assertion(predicate: &Iri, object: &Node, ctx: ViewContext<'_>) -> Option<AxiomKind> {
    let p = Node::Iri(predicate.clone());
    if object.is_resource() && ctx.can_view(&p, EntityKind::ObjectProperty.view_type()) {
        return Some(AxiomKind::ObjectPropertyAssertion);
    }
    if object.is_literal() && ctx.can_view(&p, EntityKind::DataProperty.view_type()) {
        return Some(AxiomKind::DataPropertyAssertion);
    }
    ctx.can_view(&p, EntityKind::AnnotationProperty.view_type())
        .then_some(AxiomKind::AnnotationAssertion)
}

// ---------------------------------------------------------------------------
// Searcher
// ---------------------------------------------------------------------------

/// Reference index for one entity kind.
#[derive(Clone)]
pub struct Searcher<'a> {
    ctx: ViewContext<'a>,
    kind: EntityKind,
    shapes: Arc<dyn AxiomShapes>,
    split: bool,
}

impl<'a> Searcher<'a> {
    pub fn new(ctx: ViewContext<'a>, kind: EntityKind) -> Self {
        Self {
            ctx,
            kind,
            shapes: Arc::new(StandardShapes),
            split: false,
        }
    }

    pub fn with_shapes(mut self, shapes: Arc<dyn AxiomShapes>) -> Self {
        self.shapes = shapes;
        self
    }

    /// Whether a statement reified several times yields one axiom per
    /// reification.
    pub fn split_annotations(mut self, split: bool) -> Self {
        self.split = split;
        self
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Every entity of this kind the model knows about, sorted by IRI.
    ///
    /// That is the locally declared ones, the builtins that some local root
    /// statement refers to, and, when the store has imports, the entities
    /// declared in an import and referenced by one of its root statements.
    pub fn entities(&self) -> Vec<Entity<'a>> {
        let view = self.kind.view_type();
        let mut found: BTreeMap<Iri, Entity<'a>> = BTreeMap::new();
        let keep = |node: Node, found: &mut BTreeMap<Iri, Entity<'a>>| {
            let Some(iri) = node.as_iri().cloned() else {
                return;
            };
            if found.contains_key(&iri) {
                return;
            }
            if let Some(entity) = self.ctx.try_view(&node, view).and_then(View::into_entity) {
                found.insert(iri, entity);
            }
        };

        for node in self.declared_in(self.ctx) {
            keep(node, &mut found);
        }
        for builtin in self.kind.builtins() {
            let node = Node::iri(*builtin);
            if self.locally_referenced(&node) {
                keep(node, &mut found);
            }
        }
        if !self.ctx.graph.is_independent() {
            for import in imports_closure(self.ctx.graph) {
                let ictx = ViewContext::new(import.as_ref(), self.ctx.personality);
                for node in self.declared_in(ictx) {
                    if !RootIndex::new(ictx).roots_of(&node).is_empty() {
                        keep(node, &mut found);
                    }
                }
            }
        }
        tracing::trace!(kind = %self.kind, count = found.len(), "collected entities");
        found.into_values().collect()
    }

    /// Whether `node` is one of [`entities`](Self::entities).
    pub fn contains(&self, node: &Node) -> bool {
        node.as_iri()
            .is_some_and(|iri| self.entities().iter().any(|e| e.iri() == iri))
    }

    /// Every axiom mentioning `entity`, directly or through anonymous
    /// structure. Property entities also count their uses as a predicate.
    pub fn axioms_for(&self, entity: &Entity<'_>) -> Vec<Axiom> {
        let node = entity.node();
        let index = RootIndex::new(self.ctx);
        let mut seeds = self.ctx.graph.find(Some(&node), None, None);
        seeds.extend(self.ctx.graph.find(None, None, Some(&node)));
        if entity.kind().is_property() {
            seeds.extend(self.ctx.graph.find(None, Some(entity.iri()), None));
        }
        index
            .roots_of_all(seeds)
            .into_iter()
            .filter_map(|s| self.shapes.classify(&s, self.ctx).map(|kind| (kind, s)))
            .flat_map(|(kind, s)| self.shapes.split(kind, s, self.split, self.ctx))
            .collect()
    }

    /// Local candidates for this kind in `ctx`'s store.
    fn declared_in(&self, ctx: ViewContext<'_>) -> Vec<Node> {
        let typed = match self.kind {
            EntityKind::NamedIndividual => ctx.graph.find_local(None, Some(&Iri::new(vocab::RDF_TYPE)), None),
            kind => ctx
                .graph
                .find_local(None, None, Some(&Node::iri(kind.declaration_type())))
                .into_iter()
                .filter(|t| t.predicate == vocab::RDF_TYPE)
                .collect(),
        };
        let mut nodes: Vec<Node> = typed
            .into_iter()
            .map(|t| t.subject)
            .filter(Node::is_iri)
            .collect();
        nodes.dedup();
        nodes
    }

    fn locally_referenced(&self, node: &Node) -> bool {
        let graph = self.ctx.graph;
        let mut local: Vec<Triple> = graph.find_local(Some(node), None, None);
        local.extend(graph.find_local(None, None, Some(node)));
        if let Some(iri) = node.as_iri() {
            local.extend(graph.find_local(None, Some(iri), None));
        }
        !local.is_empty() && !RootIndex::new(self.ctx).roots_of_all(local).is_empty()
    }
}

impl std::fmt::Debug for Searcher<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Searcher")
            .field("kind", &self.kind)
            .field("split", &self.split)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::disjoint::{DisjointGroup, DisjointKind};
    use crate::graph::index::MemGraph;
    use crate::graph::TripleStore;
    use crate::node::Literal;
    use crate::view::personality::Personality;

    fn declare(graph: &MemGraph, iri: &str, kind: EntityKind) -> Node {
        let node = Node::iri(iri);
        graph.add(Triple::new(node.clone(), vocab::RDF_TYPE, Node::iri(kind.declaration_type())));
        node
    }

    fn iris(entities: &[Entity<'_>]) -> Vec<String> {
        entities.iter().map(|e| e.iri().as_str().to_string()).collect()
    }

    #[test]
    fn classes_include_referenced_builtins_only() {
        let graph = MemGraph::new();
        let a = declare(&graph, "urn:A", EntityKind::Class);
        declare(&graph, "urn:B", EntityKind::Class);
        graph.add(Triple::new(a, vocab::RDFS_SUB_CLASS_OF, Node::iri(vocab::OWL_THING)));
        let personality = Personality::standard(&ModelConfig::default());
        let ctx = ViewContext::new(&graph, &personality);

        let searcher = Searcher::new(ctx, EntityKind::Class);
        assert_eq!(iris(&searcher.entities()), vec![vocab::OWL_THING, "urn:A", "urn:B"]);
        assert!(!searcher.contains(&Node::iri(vocab::OWL_NOTHING)));
        assert!(searcher.contains(&Node::iri("urn:B")));
    }

    #[test]
    fn individuals_found_through_class_membership() {
        let graph = MemGraph::new();
        let c = declare(&graph, "urn:C", EntityKind::Class);
        graph.add(Triple::new(Node::iri("urn:i"), vocab::RDF_TYPE, c));
        let personality = Personality::standard(&ModelConfig::default());
        let ctx = ViewContext::new(&graph, &personality);

        let searcher = Searcher::new(ctx, EntityKind::NamedIndividual);
        assert_eq!(iris(&searcher.entities()), vec!["urn:i"]);
    }

    #[test]
    fn imported_entities_count_when_not_independent() {
        let graph = MemGraph::new();
        declare(&graph, "urn:Local", EntityKind::Class);
        let import = Arc::new(MemGraph::new());
        declare(&import, "urn:Imported", EntityKind::Class);
        let personality = Personality::standard(&ModelConfig::default());

        {
            let ctx = ViewContext::new(&graph, &personality);
            assert_eq!(iris(&Searcher::new(ctx, EntityKind::Class).entities()), vec!["urn:Local"]);
        }
        graph.add_import(import);
        let ctx = ViewContext::new(&graph, &personality);
        assert_eq!(
            iris(&Searcher::new(ctx, EntityKind::Class).entities()),
            vec!["urn:Imported", "urn:Local"]
        );
    }

    #[test]
    fn axioms_through_anonymous_structure() {
        let graph = MemGraph::new();
        let a = declare(&graph, "urn:A", EntityKind::Class);
        let b = declare(&graph, "urn:B", EntityKind::Class);
        let p = declare(&graph, "urn:p", EntityKind::ObjectProperty);
        let r = graph.create_blank().unwrap();
        graph.add(Triple::new(a.clone(), vocab::RDFS_SUB_CLASS_OF, r.clone()));
        graph.add(Triple::new(r.clone(), vocab::RDF_TYPE, Node::iri(vocab::OWL_RESTRICTION)));
        graph.add(Triple::new(r.clone(), vocab::OWL_ON_PROPERTY, p.clone()));
        graph.add(Triple::new(r, vocab::OWL_SOME_VALUES_FROM, b.clone()));
        graph.add(Triple::new(Node::iri("urn:x"), "urn:p", Node::iri("urn:y")));
        let personality = Personality::standard(&ModelConfig::default());
        let ctx = ViewContext::new(&graph, &personality);
        DisjointGroup::create(ctx, DisjointKind::Classes, &[a.clone(), b.clone()]).unwrap();

        let classes = Searcher::new(ctx, EntityKind::Class);
        let b_entity = ctx.view(&b, ViewType::Entity(EntityKind::Class)).unwrap().into_entity().unwrap();
        let kinds: Vec<AxiomKind> = classes.axioms_for(&b_entity).iter().map(|ax| ax.kind).collect();
        assert!(kinds.contains(&AxiomKind::Declaration));
        assert!(kinds.contains(&AxiomKind::SubClassOf));
        assert!(kinds.contains(&AxiomKind::DisjointClasses));

        let properties = Searcher::new(ctx, EntityKind::ObjectProperty);
        let p_entity = ctx.view(&p, EntityKind::ObjectProperty.view_type()).unwrap().into_entity().unwrap();
        let kinds: Vec<AxiomKind> = properties.axioms_for(&p_entity).iter().map(|ax| ax.kind).collect();
        assert!(kinds.contains(&AxiomKind::SubClassOf));
        assert!(kinds.contains(&AxiomKind::ObjectPropertyAssertion));
    }

    #[test]
    fn split_yields_one_axiom_per_reification() {
        let graph = MemGraph::new();
        let a = declare(&graph, "urn:A", EntityKind::Class);
        let personality = Personality::standard(&ModelConfig::default());
        let ctx = ViewContext::new(&graph, &personality);
        let decl = Triple::new(a.clone(), vocab::RDF_TYPE, Node::iri(vocab::OWL_CLASS));
        // two independent reifications, as loaded data may carry
        for text in ["one", "two"] {
            let node = graph.create_blank().unwrap();
            graph.add(Triple::new(node.clone(), vocab::RDF_TYPE, Node::iri(vocab::OWL_AXIOM)));
            graph.add(Triple::new(node.clone(), vocab::OWL_ANNOTATED_SOURCE, a.clone()));
            graph.add(Triple::new(node.clone(), vocab::OWL_ANNOTATED_PROPERTY, Node::iri(vocab::RDF_TYPE)));
            graph.add(Triple::new(node.clone(), vocab::OWL_ANNOTATED_TARGET, Node::iri(vocab::OWL_CLASS)));
            graph.add(Triple::new(node, vocab::RDFS_COMMENT, Literal::plain(text)));
        }
        let entity = ctx.view(&a, ViewType::Entity(EntityKind::Class)).unwrap().into_entity().unwrap();

        let joined = Searcher::new(ctx, EntityKind::Class).axioms_for(&entity);
        let declarations: Vec<&Axiom> = joined.iter().filter(|ax| ax.statement.triple() == &decl).collect();
        assert_eq!(declarations.len(), 1);
        assert_eq!(declarations[0].annotations.len(), 2);

        let split = Searcher::new(ctx, EntityKind::Class)
            .split_annotations(true)
            .axioms_for(&entity);
        let declarations: Vec<&Axiom> = split.iter().filter(|ax| ax.statement.triple() == &decl).collect();
        assert_eq!(declarations.len(), 2);
        assert!(declarations.iter().all(|ax| ax.annotations.len() == 1));
    }

    #[test]
    fn annotation_assertions_classified() {
        let graph = MemGraph::new();
        let a = declare(&graph, "urn:A", EntityKind::Class);
        let label = Triple::new(a.clone(), vocab::RDFS_LABEL, Literal::plain("A"));
        graph.add(label.clone());
        let personality = Personality::standard(&ModelConfig::default());
        let ctx = ViewContext::new(&graph, &personality);
        assert_eq!(
            StandardShapes.classify(&Statement::root(label), ctx),
            Some(AxiomKind::AnnotationAssertion)
        );
        let searcher = Searcher::new(ctx, EntityKind::AnnotationProperty);
        assert_eq!(iris(&searcher.entities()), vec![vocab::RDFS_LABEL]);
    }

    #[test]
    fn annotated_disjoint_group_still_reported_for_members() {
        let graph = MemGraph::new();
        let a = declare(&graph, "urn:A", EntityKind::Class);
        let b = declare(&graph, "urn:B", EntityKind::Class);
        let personality = Personality::standard(&ModelConfig::default());
        let ctx = ViewContext::new(&graph, &personality);
        let group = DisjointGroup::create(ctx, DisjointKind::Classes, &[a.clone(), b.clone()]).unwrap();
        let main = group.main_statement();
        crate::annotation::Annotations::new(ctx)
            .add(main.triple(), vocab::RDFS_COMMENT, Literal::plain("x"))
            .unwrap();

        let searcher = Searcher::new(ctx, EntityKind::Class);
        for member in [&a, &b] {
            let entity = ctx.view(member, ViewType::Entity(EntityKind::Class)).unwrap().into_entity().unwrap();
            let axioms = searcher.axioms_for(&entity);
            let disjoint: Vec<&Axiom> = axioms
                .iter()
                .filter(|ax| ax.kind == AxiomKind::DisjointClasses)
                .collect();
            assert_eq!(disjoint.len(), 1, "missing disjointness axiom for {member}");
            assert_eq!(disjoint[0].statement.triple(), main.triple());
            assert_eq!(disjoint[0].annotations.len(), 1);
        }
    }
}
