//! Composable view predicates.
//!
//! A [`Filter`] is a pure `(node, context) → bool` function. Filters combine
//! with [`Filter::and`], [`Filter::or`] and [`Filter::accumulate`] without side
//! effects; evaluation short-circuits left to right.

use std::sync::Arc;

use crate::node::Node;

use super::ViewContext;

type FilterFn = dyn Fn(&Node, ViewContext<'_>) -> bool + Send + Sync;

/// A shareable node predicate.
#[derive(Clone)]
pub struct Filter(Arc<FilterFn>);

impl Filter {
    pub fn new(f: impl Fn(&Node, ViewContext<'_>) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Evaluate the predicate.
    pub fn test(&self, node: &Node, ctx: ViewContext<'_>) -> bool {
        (self.0)(node, ctx)
    }

    /// Both predicates hold (`other` is not evaluated if `self` fails).
    pub fn and(self, other: Filter) -> Filter {
        Filter::new(move |n, ctx| self.test(n, ctx) && other.test(n, ctx))
    }

    /// Either predicate holds (`other` is not evaluated if `self` holds).
    pub fn or(self, other: Filter) -> Filter {
        Filter::new(move |n, ctx| self.test(n, ctx) || other.test(n, ctx))
    }

    /// Conjunction of every filter, evaluated in order. Empty means "true".
    pub fn accumulate(filters: impl IntoIterator<Item = Filter>) -> Filter {
        let filters: Vec<Filter> = filters.into_iter().collect();
        Filter::new(move |n, ctx| filters.iter().all(|f| f.test(n, ctx)))
    }

    // -----------------------------------------------------------------------
    // Standard predicates
    // -----------------------------------------------------------------------

    pub fn is_iri() -> Filter {
        Filter::new(|n, _| n.is_iri())
    }

    pub fn is_blank() -> Filter {
        Filter::new(|n, _| n.is_blank())
    }

    /// The node carries `rdf:type type_iri`.
    pub fn has_type(type_iri: &'static str) -> Filter {
        Filter::new(move |n, ctx| ctx.graph.has_type(n, type_iri))
    }

    /// The node is the subject of at least one `predicate` triple.
    pub fn has_predicate(predicate: &'static str) -> Filter {
        Filter::new(move |n, ctx| !ctx.graph.objects(n, predicate).is_empty())
    }
}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Filter(..)")
    }
}
