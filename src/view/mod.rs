//! Typed projection engine.
//!
//! A *view* is a typed facade over one node, valid only while the graph
//! satisfies the view's defining shape. Which views a node supports is decided
//! by the [`ViewFactory`](factory::ViewFactory) registered for each
//! [`ViewType`] in a [`Personality`](personality::Personality).
//!
//! - [`predicate`]: composable node predicates
//! - [`finder`]: candidate enumeration
//! - [`factory`]: finder + predicate + maker, and unions of factories
//! - [`personality`]: the registry, one per punning profile
//!
//! Views never reinterpret a node unchecked: [`ViewContext::view`] tests
//! before it materializes, and [`ViewContext::try_view`] returns an `Option`.

pub mod factory;
pub mod finder;
pub mod personality;
pub mod predicate;

use std::collections::HashSet;

use crate::annotation::Annotation;
use crate::disjoint::{DisjointGroup, DisjointKind};
use crate::entity::{Entity, EntityKind};
use crate::error::{OntResult, ViewError};
use crate::graph::TripleStore;
use crate::individual::{AnonymousIndividual, InverseProperty};
use crate::node::Node;

use self::factory::ViewFactory;
use self::personality::Personality;

// ---------------------------------------------------------------------------
// View types
// ---------------------------------------------------------------------------

/// Identifier of a facade. Each has exactly one factory per personality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViewType {
    /// A named entity of one kind.
    Entity(EntityKind),
    /// Any named entity (union).
    AnyEntity,
    /// An anonymous node standing for an individual.
    AnonymousIndividual,
    /// Named or anonymous individual (union).
    Individual,
    /// `_:x owl:inverseOf P`.
    InverseProperty,
    /// Named object property or inverse (union).
    ObjectPropertyExpression,
    /// A disjointness group of one kind.
    Disjoint(DisjointKind),
    /// Any disjointness group (union).
    AnyDisjoint,
    /// A reified annotation node.
    Annotation,
}

impl ViewType {
    /// The component types of a union view type; empty for concrete types.
    pub fn members(self) -> Vec<ViewType> {
        match self {
            ViewType::AnyEntity => EntityKind::ALL.into_iter().map(ViewType::Entity).collect(),
            ViewType::Individual => vec![
                ViewType::Entity(EntityKind::NamedIndividual),
                ViewType::AnonymousIndividual,
            ],
            ViewType::ObjectPropertyExpression => vec![
                ViewType::Entity(EntityKind::ObjectProperty),
                ViewType::InverseProperty,
            ],
            ViewType::AnyDisjoint => DisjointKind::ALL.into_iter().map(ViewType::Disjoint).collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_union(self) -> bool {
        !self.members().is_empty()
    }

    /// Every view type the engine knows, concrete types first.
    pub fn all() -> Vec<ViewType> {
        let mut all: Vec<ViewType> = EntityKind::ALL.into_iter().map(ViewType::Entity).collect();
        all.push(ViewType::AnonymousIndividual);
        all.push(ViewType::InverseProperty);
        all.extend(DisjointKind::ALL.into_iter().map(ViewType::Disjoint));
        all.push(ViewType::Annotation);
        all.extend([
            ViewType::AnyEntity,
            ViewType::Individual,
            ViewType::ObjectPropertyExpression,
            ViewType::AnyDisjoint,
        ]);
        all
    }
}

impl std::fmt::Display for ViewType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewType::Entity(kind) => write!(f, "{kind}"),
            ViewType::AnyEntity => write!(f, "Entity"),
            ViewType::AnonymousIndividual => write!(f, "AnonymousIndividual"),
            ViewType::Individual => write!(f, "Individual"),
            ViewType::InverseProperty => write!(f, "InverseObjectProperty"),
            ViewType::ObjectPropertyExpression => write!(f, "ObjectPropertyExpression"),
            ViewType::Disjoint(kind) => write!(f, "{kind}"),
            ViewType::AnyDisjoint => write!(f, "Disjoint"),
            ViewType::Annotation => write!(f, "Annotation"),
        }
    }
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// A materialized view: the tagged union of every facade.
#[derive(Debug, Clone)]
pub enum View<'a> {
    Entity(Entity<'a>),
    AnonymousIndividual(AnonymousIndividual<'a>),
    InverseProperty(InverseProperty<'a>),
    Disjoint(DisjointGroup<'a>),
    Annotation(Annotation<'a>),
}

impl<'a> View<'a> {
    /// The viewed node.
    pub fn node(&self) -> Node {
        match self {
            View::Entity(e) => e.node(),
            View::AnonymousIndividual(i) => i.node().clone(),
            View::InverseProperty(p) => p.node().clone(),
            View::Disjoint(d) => d.node().clone(),
            View::Annotation(a) => a.node().clone(),
        }
    }

    /// The concrete type of this view.
    pub fn view_type(&self) -> ViewType {
        match self {
            View::Entity(e) => ViewType::Entity(e.kind()),
            View::AnonymousIndividual(_) => ViewType::AnonymousIndividual,
            View::InverseProperty(_) => ViewType::InverseProperty,
            View::Disjoint(d) => ViewType::Disjoint(d.kind()),
            View::Annotation(_) => ViewType::Annotation,
        }
    }

    pub fn as_entity(&self) -> Option<&Entity<'a>> {
        match self {
            View::Entity(e) => Some(e),
            _ => None,
        }
    }

    pub fn into_entity(self) -> Option<Entity<'a>> {
        match self {
            View::Entity(e) => Some(e),
            _ => None,
        }
    }

    pub fn into_anonymous_individual(self) -> Option<AnonymousIndividual<'a>> {
        match self {
            View::AnonymousIndividual(i) => Some(i),
            _ => None,
        }
    }

    pub fn into_inverse_property(self) -> Option<InverseProperty<'a>> {
        match self {
            View::InverseProperty(p) => Some(p),
            _ => None,
        }
    }

    pub fn into_disjoint(self) -> Option<DisjointGroup<'a>> {
        match self {
            View::Disjoint(d) => Some(d),
            _ => None,
        }
    }

    pub fn into_annotation(self) -> Option<Annotation<'a>> {
        match self {
            View::Annotation(a) => Some(a),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// A store paired with the personality that interprets it.
///
/// Cheap to copy; every view carries one.
#[derive(Clone, Copy)]
pub struct ViewContext<'a> {
    pub graph: &'a dyn TripleStore,
    pub personality: &'a Personality,
}

impl<'a> ViewContext<'a> {
    pub fn new(graph: &'a dyn TripleStore, personality: &'a Personality) -> Self {
        Self { graph, personality }
    }

    /// The factory registered for `view`.
    pub fn factory(&self, view: ViewType) -> OntResult<&'a dyn ViewFactory> {
        self.personality
            .factory(view)
            .ok_or_else(|| ViewError::Unregistered { view: view.to_string() }.into())
    }

    /// Whether `node` can be viewed as `view`. Unregistered types answer `false`.
    pub fn can_view(&self, node: &Node, view: ViewType) -> bool {
        self.personality
            .factory(view)
            .is_some_and(|f| f.test(node, *self))
    }

    /// Test, then materialize. Fails with a view mismatch if the test fails.
    pub fn view(&self, node: &Node, view: ViewType) -> OntResult<View<'a>> {
        self.factory(view)?.materialize(node, *self)
    }

    /// Like [`ViewContext::view`], but `None` instead of an error.
    pub fn try_view(&self, node: &Node, view: ViewType) -> Option<View<'a>> {
        let factory = self.personality.factory(view)?;
        if factory.test(node, *self) {
            factory.materialize(node, *self).ok()
        } else {
            None
        }
    }

    /// Assert the minimal triples for `node` to support `view`, then materialize.
    pub fn create(&self, node: &Node, view: ViewType) -> OntResult<View<'a>> {
        self.factory(view)?.create(node, *self)
    }

    /// Every node currently supporting `view`, deduplicated, in discovery order.
    pub fn locate(&self, view: ViewType) -> Vec<Node> {
        let Some(factory) = self.personality.factory(view) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        factory
            .locate(*self)
            .filter(|n| seen.insert(n.clone()))
            .collect()
    }

    /// Every view of type `view`, as an owned snapshot.
    pub fn views(&self, view: ViewType) -> Vec<View<'a>> {
        self.locate(view)
            .into_iter()
            .filter_map(|n| self.try_view(&n, view))
            .collect()
    }
}

impl std::fmt::Debug for ViewContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewContext")
            .field("triples", &self.graph.len())
            .field("profile", &self.personality.profile())
            .finish()
    }
}
