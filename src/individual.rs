//! Anonymous individuals and inverse object property expressions.
//!
//! Both are views over anonymous nodes. An anonymous node is an individual
//! when it is typed with some class, or when it takes part in a property
//! assertion; it is never a structural node (class expression, list cell,
//! group, reification). An inverse expression is `_:x owl:inverseOf P` with
//! exactly one named object property `P`.

use std::sync::Arc;

use crate::entity::{is_class_like, EntityKind, ObjectProperty};
use crate::error::OntResult;
use crate::graph::Triple;
use crate::node::{Iri, Node};
use crate::statement::Statement;
use crate::view::factory::{mismatch, CommonFactory, Maker, ViewFactory};
use crate::view::finder::Finder;
use crate::view::predicate::Filter;
use crate::view::{View, ViewContext, ViewType};
use crate::vocab;

pub(crate) fn factories() -> Vec<Arc<dyn ViewFactory>> {
    vec![
        Arc::new(anonymous_individual_factory()),
        Arc::new(inverse_property_factory()),
    ]
}

// ---------------------------------------------------------------------------
// Anonymous individuals
// ---------------------------------------------------------------------------

fn anonymous_individual_factory() -> CommonFactory {
    CommonFactory::new(
        ViewType::AnonymousIndividual,
        blank_nodes(),
        Filter::is_blank().and(Filter::new(is_anonymous_individual)),
        Maker::new(|n, ctx| {
            Ok(View::AnonymousIndividual(AnonymousIndividual {
                node: n.clone(),
                ctx,
            }))
        }),
    )
}

/// Every anonymous subject or object in the store.
fn blank_nodes() -> Finder {
    Finder::new(|ctx| {
        let triples = ctx.graph.find(None, None, None);
        Box::new(
            triples
                .into_iter()
                .flat_map(|t| [t.subject, t.object])
                .filter(Node::is_blank),
        )
    })
}

fn is_anonymous_individual(node: &Node, ctx: ViewContext<'_>) -> bool {
    let types = ctx.graph.types(node);
    if types.iter().any(|t| t.as_iri().is_some_and(|i| vocab::is_reserved_type(i.as_str()))) {
        return false;
    }
    if !ctx.graph.objects(node, vocab::RDF_FIRST).is_empty() {
        return false;
    }
    if types.iter().any(|t| is_class_like(t, ctx)) {
        return true;
    }
    let as_subject = ctx.graph.find(Some(node), None, None).into_iter().any(|t| {
        is_assertion_property(&t.predicate, EntityKind::ObjectProperty, ctx)
            || is_assertion_property(&t.predicate, EntityKind::DataProperty, ctx)
    });
    as_subject
        || ctx
            .graph
            .find(None, None, Some(node))
            .into_iter()
            .any(|t| is_assertion_property(&t.predicate, EntityKind::ObjectProperty, ctx))
}

fn is_assertion_property(predicate: &Iri, kind: EntityKind, ctx: ViewContext<'_>) -> bool {
    ctx.can_view(&Node::Iri(predicate.clone()), kind.view_type())
}

/// An anonymous node standing for an individual.
#[derive(Debug, Clone)]
pub struct AnonymousIndividual<'a> {
    node: Node,
    ctx: ViewContext<'a>,
}

impl<'a> AnonymousIndividual<'a> {
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Class types, named or anonymous.
    pub fn types(&self) -> Vec<Node> {
        self.ctx
            .graph
            .types(&self.node)
            .into_iter()
            .filter(|t| is_class_like(t, self.ctx))
            .collect()
    }

    pub fn add_type(&self, class: &Node) -> Statement {
        let triple = Triple::new(self.node.clone(), vocab::RDF_TYPE, class.clone());
        self.ctx.graph.add(triple.clone());
        Statement::root(triple)
    }
}

// ---------------------------------------------------------------------------
// Inverse object properties
// ---------------------------------------------------------------------------

fn inverse_property_factory() -> CommonFactory {
    CommonFactory::new(
        ViewType::InverseProperty,
        Finder::by_predicate(vocab::OWL_INVERSE_OF),
        Filter::is_blank().and(Filter::new(|n, ctx| {
            let direct = ctx.graph.objects(n, vocab::OWL_INVERSE_OF);
            direct.len() == 1 && ctx.can_view(&direct[0], EntityKind::ObjectProperty.view_type())
        })),
        Maker::new(|n, ctx| {
            Ok(View::InverseProperty(InverseProperty {
                node: n.clone(),
                ctx,
            }))
        }),
    )
}

/// `_:x owl:inverseOf P`.
#[derive(Debug, Clone)]
pub struct InverseProperty<'a> {
    node: Node,
    ctx: ViewContext<'a>,
}

impl<'a> InverseProperty<'a> {
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// The named property this expression inverts.
    pub fn direct(&self) -> OntResult<ObjectProperty<'a>> {
        let objects = self.ctx.graph.objects(&self.node, vocab::OWL_INVERSE_OF);
        let [direct] = objects.as_slice() else {
            return Err(mismatch(&self.node, ViewType::InverseProperty));
        };
        self.ctx
            .view(direct, EntityKind::ObjectProperty.view_type())?
            .into_entity()
            .and_then(|e| e.into_object_property())
            .ok_or_else(|| mismatch(direct, EntityKind::ObjectProperty.view_type()))
    }
}
