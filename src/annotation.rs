//! Reified annotations.
//!
//! Metadata on a triple `(s p o)` lives on an anonymous node
//!
//! ```text
//! _:a rdf:type              owl:Axiom      (owl:Annotation when s is itself an annotation node)
//! _:a owl:annotatedSource   s
//! _:a owl:annotatedProperty p
//! _:a owl:annotatedTarget   o
//! _:a rdfs:comment          "..."          (zero or more annotation triples)
//! ```
//!
//! Every annotation triple `(_:a q v)` may in turn be the base of a nested
//! annotation node, which makes the metadata on one base a tree. The tree has
//! three invariants:
//!
//! - one base has at most one reifying node created by this module; loaded
//!   data may carry more and all of them are read
//! - a node with no annotation triples is garbage and is removed together
//!   with its reification triples
//! - deleting an annotation triple that is itself annotated is refused, and
//!   the refusal happens before any triple is touched
//!
//! Parent and root lookups are store re-queries; nothing here caches links
//! between nodes.

use std::collections::{HashSet, VecDeque};

use crate::error::{AnnotationError, ArgumentError, OntResult};
use crate::graph::Triple;
use crate::node::{Iri, Node};
use crate::statement::{Statement, StatementKind};
use crate::view::factory::{CommonFactory, Maker, ViewFactory};
use crate::view::finder::Finder;
use crate::view::predicate::Filter;
use crate::view::{View, ViewContext, ViewType};
use crate::vocab;

/// Predicates that make up the reification itself, never annotation triples.
const REIFICATION_PREDICATES: &[&str] = &[
    vocab::RDF_TYPE,
    vocab::OWL_ANNOTATED_SOURCE,
    vocab::OWL_ANNOTATED_PROPERTY,
    vocab::OWL_ANNOTATED_TARGET,
];

pub(crate) fn factory() -> std::sync::Arc<dyn ViewFactory> {
    std::sync::Arc::new(CommonFactory::new(
        ViewType::Annotation,
        Finder::by_types(&[vocab::OWL_AXIOM, vocab::OWL_ANNOTATION]),
        Filter::accumulate([
            Filter::is_blank(),
            Filter::has_type(vocab::OWL_AXIOM).or(Filter::has_type(vocab::OWL_ANNOTATION)),
            Filter::has_predicate(vocab::OWL_ANNOTATED_SOURCE),
            Filter::has_predicate(vocab::OWL_ANNOTATED_PROPERTY),
            Filter::has_predicate(vocab::OWL_ANNOTATED_TARGET),
        ]),
        Maker::new(|n, ctx| {
            Ok(View::Annotation(Annotation {
                node: n.clone(),
                ctx,
            }))
        }),
    ))
}

/// Annotation triples of `node`: everything but the reification triples.
fn annotation_triples(node: &Node, ctx: ViewContext<'_>) -> Vec<Triple> {
    ctx.graph
        .find(Some(node), None, None)
        .into_iter()
        .filter(|t| !REIFICATION_PREDICATES.contains(&t.predicate.as_str()))
        .collect()
}

fn carrier(triple: Triple) -> Statement {
    Statement::new(triple, StatementKind::AnnotationCarrier)
}

// ---------------------------------------------------------------------------
// Annotation service
// ---------------------------------------------------------------------------

/// Add, delete, clear and query the annotations of any triple.
#[derive(Debug, Clone, Copy)]
pub struct Annotations<'a> {
    ctx: ViewContext<'a>,
}

impl<'a> Annotations<'a> {
    pub fn new(ctx: ViewContext<'a>) -> Self {
        Self { ctx }
    }

    /// Every annotation node reifying `base`, in node order.
    pub fn nodes(&self, base: &Triple) -> Vec<Node> {
        let mut nodes: Vec<Node> = self
            .ctx
            .graph
            .subjects(vocab::OWL_ANNOTATED_SOURCE, &base.subject)
            .into_iter()
            .filter(|n| {
                self.ctx.graph.has(
                    n,
                    vocab::OWL_ANNOTATED_PROPERTY,
                    &Node::Iri(base.predicate.clone()),
                ) && self.ctx.graph.has(n, vocab::OWL_ANNOTATED_TARGET, &base.object)
                    && self.ctx.can_view(n, ViewType::Annotation)
            })
            .collect();
        nodes.sort();
        nodes.dedup();
        nodes
    }

    /// Whether `base` carries at least one annotation triple.
    pub fn has(&self, base: &Triple) -> bool {
        self.nodes(base)
            .iter()
            .any(|n| !annotation_triples(n, self.ctx).is_empty())
    }

    /// The annotation triples directly on `base`, across all of its
    /// reifying nodes.
    pub fn list(&self, base: &Triple) -> Vec<Statement> {
        self.nodes(base)
            .iter()
            .flat_map(|n| annotation_triples(n, self.ctx))
            .map(carrier)
            .collect()
    }

    /// Every annotation triple in the tree under `base`, breadth first.
    pub fn descendants(&self, base: &Triple) -> Vec<Statement> {
        let mut out = Vec::new();
        let mut seen: HashSet<Node> = HashSet::new();
        let mut queue: VecDeque<Triple> = VecDeque::from([base.clone()]);
        while let Some(current) = queue.pop_front() {
            for node in self.nodes(&current) {
                if !seen.insert(node.clone()) {
                    continue;
                }
                for t in annotation_triples(&node, self.ctx) {
                    queue.push_back(t.clone());
                    out.push(carrier(t));
                }
            }
        }
        out
    }

    /// Annotate `base` with `(property value)`.
    ///
    /// Reuses the existing reifying node of `base` when there is one.
    /// Returns the new annotation triple, which can itself be annotated.
    pub fn add(&self, base: &Triple, property: impl Into<Iri>, value: impl Into<Node>) -> OntResult<Statement> {
        if !self.ctx.graph.contains(base) {
            return Err(ArgumentError::NotFound {
                what: "annotated statement".into(),
                value: base.to_string(),
            }
            .into());
        }
        let property = property.into();
        let value = value.into();
        if REIFICATION_PREDICATES.contains(&property.as_str()) {
            return Err(ArgumentError::Invalid {
                what: "annotation property".into(),
                message: format!("{property} is reserved for reification"),
            }
            .into());
        }
        let node = match self.nodes(base).into_iter().next() {
            Some(node) => node,
            None => self.reify(base)?,
        };
        let triple = Triple::new(node, property, value);
        self.ctx.graph.add(triple.clone());
        tracing::trace!(base = %base, annotation = %triple, "added annotation");
        Ok(carrier(triple))
    }

    /// Create an empty reifying node for `base`.
    fn reify(&self, base: &Triple) -> OntResult<Node> {
        let node = self.ctx.graph.create_blank()?;
        let ty = if self.ctx.can_view(&base.subject, ViewType::Annotation) {
            vocab::OWL_ANNOTATION
        } else {
            vocab::OWL_AXIOM
        };
        let graph = self.ctx.graph;
        graph.add(Triple::new(node.clone(), vocab::RDF_TYPE, Node::iri(ty)));
        graph.add(Triple::new(node.clone(), vocab::OWL_ANNOTATED_SOURCE, base.subject.clone()));
        graph.add(Triple::new(
            node.clone(),
            vocab::OWL_ANNOTATED_PROPERTY,
            Node::Iri(base.predicate.clone()),
        ));
        graph.add(Triple::new(node.clone(), vocab::OWL_ANNOTATED_TARGET, base.object.clone()));
        Ok(node)
    }

    /// Remove the annotation `(property value)` from `base`.
    ///
    /// Absent annotations are a no-op. An annotation that is itself annotated
    /// is refused with an illegal-state error and nothing is removed. A
    /// reifying node left without annotation triples is removed.
    pub fn delete(&self, base: &Triple, property: impl Into<Iri>, value: impl Into<Node>) -> OntResult<()> {
        let property = property.into();
        let value = value.into();
        let found = self.nodes(base).into_iter().find_map(|n| {
            let t = Triple::new(n, property.clone(), value.clone());
            self.ctx.graph.contains_local(&t).then_some(t)
        });
        let Some(triple) = found else {
            return Ok(());
        };
        if !self.nodes(&triple).is_empty() {
            return Err(AnnotationError::AnnotatedAnnotation {
                predicate: property.to_string(),
                value: value.to_string(),
            }
            .into());
        }
        self.ctx.graph.remove(&triple);
        tracing::trace!(base = %base, annotation = %triple, "deleted annotation");
        if annotation_triples(&triple.subject, self.ctx).is_empty() {
            self.remove_node(&triple.subject);
        }
        Ok(())
    }

    /// Remove every annotation on `base`, at any depth.
    ///
    /// Returns the number of annotation triples removed.
    pub fn clear(&self, base: &Triple) -> usize {
        let mut seen = HashSet::new();
        let removed: usize = self
            .nodes(base)
            .iter()
            .map(|n| self.clear_node(n, &mut seen))
            .sum();
        if removed > 0 {
            tracing::debug!(base = %base, removed, "cleared annotations");
        }
        removed
    }

    /// Remove `node`, its subtree, and its reification triples.
    fn clear_node(&self, node: &Node, seen: &mut HashSet<Node>) -> usize {
        if !seen.insert(node.clone()) {
            return 0;
        }
        let mut removed = 0;
        for t in annotation_triples(node, self.ctx) {
            for child in self.nodes(&t) {
                removed += self.clear_node(&child, seen);
            }
            if self.ctx.graph.remove(&t) {
                removed += 1;
            }
        }
        self.remove_node(node);
        removed
    }

    /// Drop every local triple whose subject is `node`.
    fn remove_node(&self, node: &Node) {
        for t in self.ctx.graph.find_local(Some(node), None, None) {
            self.ctx.graph.remove(&t);
        }
    }

    /// Point every reification of `old` at `new` instead.
    ///
    /// Used when a structural rewrite replaces one triple by another (a list
    /// head moving, for instance) so that its annotations follow it.
    pub fn rebase(&self, old: &Triple, new: &Triple) {
        if old == new {
            return;
        }
        let graph = self.ctx.graph;
        for node in self.nodes(old) {
            let pairs = [
                (vocab::OWL_ANNOTATED_SOURCE, &old.subject, &new.subject),
                (vocab::OWL_ANNOTATED_TARGET, &old.object, &new.object),
            ];
            for (predicate, from, to) in pairs {
                graph.remove(&Triple::new(node.clone(), predicate, from.clone()));
                graph.add(Triple::new(node.clone(), predicate, to.clone()));
            }
            graph.remove(&Triple::new(
                node.clone(),
                vocab::OWL_ANNOTATED_PROPERTY,
                Node::Iri(old.predicate.clone()),
            ));
            graph.add(Triple::new(
                node.clone(),
                vocab::OWL_ANNOTATED_PROPERTY,
                Node::Iri(new.predicate.clone()),
            ));
        }
    }
}

// ---------------------------------------------------------------------------
// Annotation view
// ---------------------------------------------------------------------------

/// One reifying node.
#[derive(Debug, Clone)]
pub struct Annotation<'a> {
    node: Node,
    ctx: ViewContext<'a>,
}

impl<'a> Annotation<'a> {
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// The reified triple.
    pub fn base(&self) -> OntResult<Triple> {
        let graph = self.ctx.graph;
        let one = |predicate: &str| -> OntResult<Node> {
            let objects = graph.objects(&self.node, predicate);
            match objects.as_slice() {
                [single] => Ok(single.clone()),
                _ => Err(AnnotationError::InconsistentReification {
                    node: self.node.to_string(),
                    message: format!("expected one {}, found {}", vocab::short(predicate), objects.len()),
                }
                .into()),
            }
        };
        let subject = one(vocab::OWL_ANNOTATED_SOURCE)?;
        let property = one(vocab::OWL_ANNOTATED_PROPERTY)?;
        let target = one(vocab::OWL_ANNOTATED_TARGET)?;
        let Node::Iri(predicate) = property else {
            return Err(AnnotationError::InconsistentReification {
                node: self.node.to_string(),
                message: format!("annotated property {property} is not named"),
            }
            .into());
        };
        Ok(Triple {
            subject,
            predicate,
            object: target,
        })
    }

    /// The annotation triples on this node.
    pub fn properties(&self) -> Vec<Statement> {
        annotation_triples(&self.node, self.ctx)
            .into_iter()
            .map(carrier)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        annotation_triples(&self.node, self.ctx).is_empty()
    }

    /// Annotation nodes reifying one of this node's annotation triples.
    pub fn children(&self) -> Vec<Annotation<'a>> {
        let service = Annotations::new(self.ctx);
        annotation_triples(&self.node, self.ctx)
            .iter()
            .flat_map(|t| service.nodes(t))
            .map(|node| Annotation { node, ctx: self.ctx })
            .collect()
    }

    /// The annotation node whose annotation triple this node reifies.
    pub fn parent(&self) -> Option<Annotation<'a>> {
        let sources = self.ctx.graph.objects(&self.node, vocab::OWL_ANNOTATED_SOURCE);
        sources
            .into_iter()
            .filter(|s| *s != self.node)
            .find(|s| self.ctx.can_view(s, ViewType::Annotation))
            .map(|node| Annotation { node, ctx: self.ctx })
    }

    /// The outermost ancestor (this node if it has no parent).
    pub fn root(&self) -> Annotation<'a> {
        let mut current = self.clone();
        let mut seen = HashSet::from([current.node.clone()]);
        while let Some(parent) = current.parent() {
            if !seen.insert(parent.node.clone()) {
                tracing::warn!(node = %self.node, "annotation ancestry loops back on itself");
                break;
            }
            current = parent;
        }
        current
    }
}
