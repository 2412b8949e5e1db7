//! Statements: triples tagged with their role in the graph.

use crate::graph::Triple;
use crate::node::{Iri, Node};
use crate::view::{ViewContext, ViewType};

/// What a triple is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatementKind {
    /// A top-level, independently meaningful triple.
    Root,
    /// Scaffolding under an anonymous node (list cells, restrictions, groups).
    Structural,
    /// A triple whose subject is a reified annotation node.
    AnnotationCarrier,
}

/// A triple plus its [`StatementKind`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Statement {
    triple: Triple,
    kind: StatementKind,
}

impl Statement {
    pub fn new(triple: Triple, kind: StatementKind) -> Self {
        Self { triple, kind }
    }

    pub fn root(triple: Triple) -> Self {
        Self::new(triple, StatementKind::Root)
    }

    /// Tag `triple` by looking at its subject.
    pub fn classify(triple: Triple, ctx: ViewContext<'_>) -> Self {
        let kind = match &triple.subject {
            Node::Iri(_) => StatementKind::Root,
            s if ctx.can_view(s, ViewType::Annotation) => StatementKind::AnnotationCarrier,
            s if ctx.can_view(s, ViewType::AnonymousIndividual) => StatementKind::Root,
            _ => StatementKind::Structural,
        };
        Self::new(triple, kind)
    }

    pub fn triple(&self) -> &Triple {
        &self.triple
    }

    pub fn into_triple(self) -> Triple {
        self.triple
    }

    pub fn subject(&self) -> &Node {
        &self.triple.subject
    }

    pub fn predicate(&self) -> &Iri {
        &self.triple.predicate
    }

    pub fn object(&self) -> &Node {
        &self.triple.object
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn is_root(&self) -> bool {
        self.kind == StatementKind::Root
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.triple)
    }
}
