//! View factories.
//!
//! A [`ViewFactory`] decides whether a node supports one view type, locates
//! every node that does, and materializes the typed facade. [`CommonFactory`]
//! assembles one from a [`Finder`], a [`Filter`] and a [`Maker`];
//! [`UnionFactory`] composes several factories into one.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{OntResult, ViewError};
use crate::graph::Triple;
use crate::node::Node;

use super::finder::{Finder, NodeIter};
use super::predicate::Filter;
use super::{View, ViewContext, ViewType};

/// Test, locate, materialize and (optionally) create one view type.
pub trait ViewFactory: Send + Sync {
    /// The view type this factory produces.
    fn view_type(&self) -> ViewType;

    /// Whether `node` currently supports the view.
    fn test(&self, node: &Node, ctx: ViewContext<'_>) -> bool;

    /// Cheap, possibly over-approximating candidate enumeration.
    fn candidates(&self, ctx: ViewContext<'_>) -> NodeIter<'static>;

    /// Build the facade. Fails with a view mismatch if `test` fails.
    fn materialize<'a>(&self, node: &Node, ctx: ViewContext<'a>) -> OntResult<View<'a>>;

    /// Candidates restricted by `test`. Not deduplicated.
    fn locate<'a>(&'a self, ctx: ViewContext<'a>) -> NodeIter<'a> {
        Box::new(self.candidates(ctx).filter(move |n| self.test(n, ctx)))
    }

    /// Assert the minimal triples for `node` to pass `test`, then materialize.
    fn create<'a>(&self, _node: &Node, _ctx: ViewContext<'a>) -> OntResult<View<'a>> {
        Err(ViewError::NotConstructible {
            view: self.view_type().to_string(),
        }
        .into())
    }
}

/// Build the mismatch error for `node` and `view`.
pub(crate) fn mismatch(node: &Node, view: ViewType) -> crate::error::OntError {
    ViewError::Mismatch {
        node: node.to_string(),
        view: view.to_string(),
    }
    .into()
}

// ---------------------------------------------------------------------------
// Makers and initializers
// ---------------------------------------------------------------------------

type MakerFn = dyn for<'a> Fn(&Node, ViewContext<'a>) -> OntResult<View<'a>> + Send + Sync;

/// Constructs the facade for a node that already passed the factory's test.
#[derive(Clone)]
pub struct Maker(Arc<MakerFn>);

impl Maker {
    pub fn new<F>(f: F) -> Self
    where
        F: for<'a> Fn(&Node, ViewContext<'a>) -> OntResult<View<'a>> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn make<'a>(&self, node: &Node, ctx: ViewContext<'a>) -> OntResult<View<'a>> {
        (self.0)(node, ctx)
    }
}

type InitFn = dyn Fn(&Node, ViewContext<'_>) -> Vec<Triple> + Send + Sync;

/// Produces the minimal triples that make a node pass the factory's test.
#[derive(Clone)]
pub struct Initializer(Arc<InitFn>);

impl Initializer {
    pub fn new(f: impl Fn(&Node, ViewContext<'_>) -> Vec<Triple> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn triples(&self, node: &Node, ctx: ViewContext<'_>) -> Vec<Triple> {
        (self.0)(node, ctx)
    }
}

// ---------------------------------------------------------------------------
// CommonFactory
// ---------------------------------------------------------------------------

/// A factory assembled from a finder, a filter, a maker and an optional
/// initializer.
#[derive(Clone)]
pub struct CommonFactory {
    view_type: ViewType,
    finder: Finder,
    filter: Filter,
    maker: Maker,
    init: Option<Initializer>,
}

impl CommonFactory {
    pub fn new(view_type: ViewType, finder: Finder, filter: Filter, maker: Maker) -> Self {
        Self {
            view_type,
            finder,
            filter,
            maker,
            init: None,
        }
    }

    /// Make the view constructible through `init`.
    pub fn with_initializer(mut self, init: Initializer) -> Self {
        self.init = Some(init);
        self
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn finder(&self) -> &Finder {
        &self.finder
    }
}

impl ViewFactory for CommonFactory {
    fn view_type(&self) -> ViewType {
        self.view_type
    }

    fn test(&self, node: &Node, ctx: ViewContext<'_>) -> bool {
        self.filter.test(node, ctx)
    }

    fn candidates(&self, ctx: ViewContext<'_>) -> NodeIter<'static> {
        self.finder.find(ctx)
    }

    fn materialize<'a>(&self, node: &Node, ctx: ViewContext<'a>) -> OntResult<View<'a>> {
        if !self.test(node, ctx) {
            return Err(mismatch(node, self.view_type));
        }
        self.maker.make(node, ctx)
    }

    /// Adds the initializer's triples. If the node still fails the test (for
    /// example because of a punning exclusion) the triples this call added are
    /// removed again and the mismatch is reported.
    fn create<'a>(&self, node: &Node, ctx: ViewContext<'a>) -> OntResult<View<'a>> {
        let Some(init) = &self.init else {
            return Err(ViewError::NotConstructible {
                view: self.view_type.to_string(),
            }
            .into());
        };
        if self.test(node, ctx) {
            return self.maker.make(node, ctx);
        }
        let added: Vec<Triple> = init
            .triples(node, ctx)
            .into_iter()
            .filter(|t| ctx.graph.add(t.clone()))
            .collect();
        if !self.test(node, ctx) {
            for t in &added {
                ctx.graph.remove(t);
            }
            return Err(mismatch(node, self.view_type));
        }
        tracing::trace!(node = %node, view = %self.view_type, added = added.len(), "created view");
        self.maker.make(node, ctx)
    }
}

impl std::fmt::Debug for CommonFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommonFactory")
            .field("view_type", &self.view_type)
            .field("constructible", &self.init.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// UnionFactory
// ---------------------------------------------------------------------------

/// The union of several factories under one view type.
///
/// `test` holds if any delegate's holds, `locate` is the deduplicated
/// concatenation of the delegates' results, and `materialize` goes to the
/// first delegate whose test holds.
#[derive(Clone)]
pub struct UnionFactory {
    view_type: ViewType,
    delegates: Vec<Arc<dyn ViewFactory>>,
}

impl UnionFactory {
    pub fn new(view_type: ViewType, delegates: Vec<Arc<dyn ViewFactory>>) -> Self {
        Self { view_type, delegates }
    }

    pub fn delegates(&self) -> &[Arc<dyn ViewFactory>] {
        &self.delegates
    }
}

impl ViewFactory for UnionFactory {
    fn view_type(&self) -> ViewType {
        self.view_type
    }

    fn test(&self, node: &Node, ctx: ViewContext<'_>) -> bool {
        self.delegates.iter().any(|d| d.test(node, ctx))
    }

    fn candidates(&self, ctx: ViewContext<'_>) -> NodeIter<'static> {
        let parts: Vec<NodeIter<'static>> = self.delegates.iter().map(|d| d.candidates(ctx)).collect();
        let mut seen = HashSet::new();
        Box::new(parts.into_iter().flatten().filter(move |n| seen.insert(n.clone())))
    }

    fn locate<'a>(&'a self, ctx: ViewContext<'a>) -> NodeIter<'a> {
        let parts: Vec<NodeIter<'a>> = self.delegates.iter().map(|d| d.locate(ctx)).collect();
        let mut seen = HashSet::new();
        Box::new(parts.into_iter().flatten().filter(move |n| seen.insert(n.clone())))
    }

    fn materialize<'a>(&self, node: &Node, ctx: ViewContext<'a>) -> OntResult<View<'a>> {
        match self.delegates.iter().find(|d| d.test(node, ctx)) {
            Some(delegate) => delegate.materialize(node, ctx),
            None => Err(mismatch(node, self.view_type)),
        }
    }
}

impl std::fmt::Debug for UnionFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let members: Vec<ViewType> = self.delegates.iter().map(|d| d.view_type()).collect();
        f.debug_struct("UnionFactory")
            .field("view_type", &self.view_type)
            .field("delegates", &members)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::entity::{Entity, EntityKind};
    use crate::error::{ErrorKind, OntError};
    use crate::graph::index::MemGraph;
    use crate::graph::TripleStore;
    use crate::view::personality::Personality;
    use crate::vocab;

    fn class_like(ty: &'static str, kind: EntityKind) -> CommonFactory {
        CommonFactory::new(
            ViewType::Entity(kind),
            Finder::by_type(ty),
            Filter::is_iri().and(Filter::has_type(ty)),
            Maker::new(move |n, ctx| Entity::from_node(n, kind, ctx).map(View::Entity)),
        )
        .with_initializer(Initializer::new(move |n, _| {
            vec![Triple::new(n.clone(), vocab::RDF_TYPE, Node::iri(ty))]
        }))
    }

    #[test]
    fn materialize_checks_the_test_first() {
        let graph = MemGraph::new();
        let personality = Personality::standard(&ModelConfig::default());
        let ctx = ViewContext::new(&graph, &personality);
        let factory = class_like(vocab::OWL_CLASS, EntityKind::Class);

        let err = factory.materialize(&Node::iri("urn:c"), ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ViewMismatch);

        let view = factory.create(&Node::iri("urn:c"), ctx).unwrap();
        assert_eq!(view.view_type(), ViewType::Entity(EntityKind::Class));
        assert!(factory.test(&Node::iri("urn:c"), ctx));
        assert_eq!(factory.locate(ctx).count(), 1);
    }

    #[test]
    fn create_is_idempotent() {
        let graph = MemGraph::new();
        let personality = Personality::standard(&ModelConfig::default());
        let ctx = ViewContext::new(&graph, &personality);
        let factory = class_like(vocab::OWL_CLASS, EntityKind::Class);
        factory.create(&Node::iri("urn:c"), ctx).unwrap();
        factory.create(&Node::iri("urn:c"), ctx).unwrap();
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn create_rolls_back_when_test_still_fails() {
        let graph = MemGraph::new();
        let personality = Personality::standard(&ModelConfig::default());
        let ctx = ViewContext::new(&graph, &personality);
        // initializer asserts the wrong type
        let factory = CommonFactory::new(
            ViewType::Entity(EntityKind::Class),
            Finder::nothing(),
            Filter::has_type(vocab::OWL_CLASS),
            Maker::new(|n, ctx| Entity::from_node(n, EntityKind::Class, ctx).map(View::Entity)),
        )
        .with_initializer(Initializer::new(|n, _| {
            vec![Triple::new(n.clone(), vocab::RDF_TYPE, Node::iri(vocab::RDFS_DATATYPE))]
        }));

        let err = factory.create(&Node::iri("urn:c"), ctx).unwrap_err();
        assert!(matches!(err, OntError::View(ViewError::Mismatch { .. })));
        assert!(graph.is_empty());
    }

    #[test]
    fn factory_without_initializer_is_not_constructible() {
        let graph = MemGraph::new();
        let personality = Personality::standard(&ModelConfig::default());
        let ctx = ViewContext::new(&graph, &personality);
        let factory = CommonFactory::new(
            ViewType::Entity(EntityKind::Class),
            Finder::nothing(),
            Filter::new(|_, _| true),
            Maker::new(|n, ctx| Entity::from_node(n, EntityKind::Class, ctx).map(View::Entity)),
        );
        let err = factory.create(&Node::iri("urn:c"), ctx).unwrap_err();
        assert!(matches!(err, OntError::View(ViewError::NotConstructible { .. })));
    }

    #[test]
    fn union_dedups_and_delegates_to_first_match() {
        let graph = MemGraph::new();
        let personality = Personality::standard(&ModelConfig::default());
        let ctx = ViewContext::new(&graph, &personality);
        let class = Arc::new(class_like(vocab::OWL_CLASS, EntityKind::Class));
        let individual = Arc::new(class_like(vocab::OWL_NAMED_INDIVIDUAL, EntityKind::NamedIndividual));
        // punned: both a class and an individual
        class.create(&Node::iri("urn:x"), ctx).unwrap();
        individual.create(&Node::iri("urn:x"), ctx).unwrap();
        individual.create(&Node::iri("urn:y"), ctx).unwrap();

        let delegates: Vec<Arc<dyn ViewFactory>> = vec![class, individual];
        let union = UnionFactory::new(ViewType::AnyEntity, delegates);
        let located: Vec<Node> = union.locate(ctx).collect();
        assert_eq!(located, vec![Node::iri("urn:x"), Node::iri("urn:y")]);
        assert!(union.test(&Node::iri("urn:y"), ctx));
        assert!(!union.test(&Node::iri("urn:z"), ctx));

        let view = union.materialize(&Node::iri("urn:x"), ctx).unwrap();
        assert_eq!(view.view_type(), ViewType::Entity(EntityKind::Class));
        assert!(union.materialize(&Node::iri("urn:z"), ctx).is_err());
        assert!(union.create(&Node::iri("urn:z"), ctx).is_err());
    }
}
