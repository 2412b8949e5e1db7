//! N-ary disjointness groups.
//!
//! `_:g rdf:type owl:AllDisjointClasses ; owl:members (A B C)` and the
//! property and individual variants. Object and data property groups share
//! `owl:AllDisjointProperties`; the first member decides which one a group is.
//! Individual groups (`owl:AllDifferent`) may carry their members under
//! `owl:members` or the older `owl:distinctMembers`, see
//! [`DisjointGroup::get_list`].

use std::sync::Arc;

use crate::annotation::Annotations;
use crate::entity::EntityKind;
use crate::error::{DisjointError, OntError, OntResult};
use crate::graph::Triple;
use crate::list::TypedList;
use crate::node::{Iri, Node};
use crate::statement::Statement;
use crate::view::factory::{CommonFactory, Maker, ViewFactory};
use crate::view::finder::Finder;
use crate::view::predicate::Filter;
use crate::view::{View, ViewContext, ViewType};
use crate::vocab;

/// Which kind of things a group keeps apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DisjointKind {
    Classes,
    ObjectProperties,
    DataProperties,
    Individuals,
}

impl DisjointKind {
    pub const ALL: [DisjointKind; 4] = [
        DisjointKind::Classes,
        DisjointKind::ObjectProperties,
        DisjointKind::DataProperties,
        DisjointKind::Individuals,
    ];

    /// The `rdf:type` of a group of this kind.
    pub fn type_iri(self) -> &'static str {
        match self {
            DisjointKind::Classes => vocab::OWL_ALL_DISJOINT_CLASSES,
            DisjointKind::ObjectProperties | DisjointKind::DataProperties => vocab::OWL_ALL_DISJOINT_PROPERTIES,
            DisjointKind::Individuals => vocab::OWL_ALL_DIFFERENT,
        }
    }

    /// The view every member must support.
    pub fn element_view(self) -> ViewType {
        match self {
            DisjointKind::Classes => ViewType::Entity(EntityKind::Class),
            DisjointKind::ObjectProperties => ViewType::ObjectPropertyExpression,
            DisjointKind::DataProperties => ViewType::Entity(EntityKind::DataProperty),
            DisjointKind::Individuals => ViewType::Individual,
        }
    }

    /// Member-list predicates, preferred first.
    fn list_predicates(self) -> &'static [&'static str] {
        match self {
            DisjointKind::Individuals => &[vocab::OWL_MEMBERS, vocab::OWL_DISTINCT_MEMBERS],
            _ => &[vocab::OWL_MEMBERS],
        }
    }
}

impl std::fmt::Display for DisjointKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DisjointKind::Classes => "DisjointClasses",
            DisjointKind::ObjectProperties => "DisjointObjectProperties",
            DisjointKind::DataProperties => "DisjointDataProperties",
            DisjointKind::Individuals => "DifferentIndividuals",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Factories
// ---------------------------------------------------------------------------

pub(crate) fn factories() -> Vec<Arc<dyn ViewFactory>> {
    DisjointKind::ALL
        .into_iter()
        .map(|kind| Arc::new(factory(kind)) as Arc<dyn ViewFactory>)
        .collect()
}

fn factory(kind: DisjointKind) -> CommonFactory {
    CommonFactory::new(
        ViewType::Disjoint(kind),
        Finder::by_type(kind.type_iri()),
        Filter::has_type(kind.type_iri()).and(Filter::new(move |n, ctx| is_group(n, kind, ctx))),
        Maker::new(move |n, ctx| {
            Ok(View::Disjoint(DisjointGroup {
                node: n.clone(),
                kind,
                ctx,
            }))
        }),
    )
}

fn is_group(node: &Node, kind: DisjointKind, ctx: ViewContext<'_>) -> bool {
    let Ok((_, head)) = resolve_list(node, kind, ctx) else {
        return false;
    };
    match kind {
        DisjointKind::ObjectProperties | DisjointKind::DataProperties => {
            let first = ctx.graph.objects(&head, vocab::RDF_FIRST);
            first
                .first()
                .is_some_and(|f| ctx.can_view(f, kind.element_view()))
        }
        _ => true,
    }
}

/// Pick the member list of a group.
///
/// Among every well-formed list under the kind's predicates the longest wins;
/// on equal length the earlier predicate wins. With no list at all the group
/// is malformed.
fn resolve_list(node: &Node, kind: DisjointKind, ctx: ViewContext<'_>) -> OntResult<(Iri, Node)> {
    let mut best: Option<(Iri, Node, usize)> = None;
    let mut broken: Option<OntError> = None;
    for predicate in kind.list_predicates() {
        for head in ctx.graph.objects(node, predicate) {
            match TypedList::new(ctx, head.clone(), kind.element_view()).size() {
                Ok(len) => {
                    if best.as_ref().is_none_or(|(_, _, l)| len > *l) {
                        best = Some((Iri::new(*predicate), head, len));
                    }
                }
                Err(e) => broken = Some(e),
            }
        }
    }
    match (best, broken) {
        (Some((predicate, head, _)), _) => Ok((predicate, head)),
        (None, Some(e)) => Err(e),
        (None, None) => Err(DisjointError::NoMembers {
            node: node.to_string(),
        }
        .into()),
    }
}

// ---------------------------------------------------------------------------
// Group view
// ---------------------------------------------------------------------------

/// A disjointness group node.
#[derive(Debug, Clone)]
pub struct DisjointGroup<'a> {
    node: Node,
    kind: DisjointKind,
    ctx: ViewContext<'a>,
}

impl<'a> DisjointGroup<'a> {
    /// Assert a new group over `members`.
    ///
    /// Needs at least two members, each viewable as the kind's element view.
    /// Nothing is written unless every check passes.
    pub fn create(ctx: ViewContext<'a>, kind: DisjointKind, members: &[Node]) -> OntResult<Self> {
        if members.len() < 2 {
            return Err(DisjointError::TooFewMembers { count: members.len() }.into());
        }
        let node = ctx.graph.create_blank()?;
        TypedList::create_anchored(ctx, &node, vocab::OWL_MEMBERS, kind.element_view(), members)?;
        ctx.graph.add(Triple::new(node.clone(), vocab::RDF_TYPE, Node::iri(kind.type_iri())));
        tracing::debug!(group = %node, %kind, members = members.len(), "created disjointness group");
        Ok(Self { node, kind, ctx })
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn kind(&self) -> DisjointKind {
        self.kind
    }

    /// `_:g rdf:type <group type>`.
    pub fn main_statement(&self) -> Statement {
        Statement::root(Triple::new(
            self.node.clone(),
            vocab::RDF_TYPE,
            Node::iri(self.kind.type_iri()),
        ))
    }

    /// The member list.
    ///
    /// For individual groups carrying both `owl:members` and
    /// `owl:distinctMembers`, the longer list is used, and `owl:members` on a
    /// tie.
    pub fn get_list(&self) -> OntResult<TypedList<'a>> {
        let (predicate, head) = resolve_list(&self.node, self.kind, self.ctx)?;
        let anchor = Triple::new(self.node.clone(), predicate, head);
        Ok(TypedList::anchored(self.ctx, anchor, self.kind.element_view()))
    }

    /// The members as views, in list order.
    pub fn members(&self) -> OntResult<Vec<View<'a>>> {
        self.get_list()?.members().collect()
    }

    /// Delete the group: its type triple, every member list, and the
    /// annotations on both.
    pub fn remove(self) -> OntResult<()> {
        let mut lists = Vec::new();
        for predicate in self.kind.list_predicates() {
            for list in TypedList::find_anchored(self.ctx, &self.node, predicate, self.kind.element_view()) {
                list.cells()?;
                lists.push(list);
            }
        }
        for list in lists {
            list.delete()?;
        }
        let main = self.main_statement();
        Annotations::new(self.ctx).clear(main.triple());
        for t in self.ctx.graph.find_local(Some(&self.node), None, None) {
            self.ctx.graph.remove(&t);
        }
        tracing::debug!(group = %self.node, kind = %self.kind, "removed disjointness group");
        Ok(())
    }
}
