//! Rich diagnostic error types for the owl-views engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text. Every variant also maps onto one of the
//! three engine-wide [`ErrorKind`]s: a view mismatch, an illegal structural
//! state, or an illegal argument. None of them is transient; callers never retry.

use miette::Diagnostic;
use thiserror::Error;

/// Engine-wide classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A view was materialized for a node that does not satisfy it.
    ViewMismatch,
    /// A structural invariant of the graph would be (or already is) violated.
    IllegalState,
    /// A required value is absent or does not refer to anything in the graph.
    IllegalArgument,
}

/// Top-level error type for the owl-views engine.
#[derive(Debug, Error, Diagnostic)]
pub enum OntError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    View(#[from] ViewError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Annotation(#[from] AnnotationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    List(#[from] ListError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Disjoint(#[from] DisjointError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Argument(#[from] ArgumentError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),
}

impl OntError {
    /// The engine-wide kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            OntError::View(ViewError::Mismatch { .. }) => ErrorKind::ViewMismatch,
            OntError::View(ViewError::Unregistered { .. })
            | OntError::View(ViewError::NotConstructible { .. }) => ErrorKind::IllegalArgument,
            OntError::Annotation(_) => ErrorKind::IllegalState,
            OntError::List(ListError::IndexOutOfRange { .. }) => ErrorKind::IllegalArgument,
            OntError::List(ListError::ElementMismatch { .. }) => ErrorKind::ViewMismatch,
            OntError::List(_) => ErrorKind::IllegalState,
            OntError::Disjoint(_) => ErrorKind::IllegalState,
            OntError::Argument(_) | OntError::Config(_) => ErrorKind::IllegalArgument,
            OntError::Graph(_) => ErrorKind::IllegalState,
        }
    }
}

// ---------------------------------------------------------------------------
// View errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ViewError {
    #[error("node {node} cannot be viewed as {view}")]
    #[diagnostic(
        code(owl::view::mismatch),
        help(
            "The node does not satisfy the defining shape of this view. \
             Test it first with `ViewContext::can_view`, or use `try_view` \
             to get an `Option` instead of an error."
        )
    )]
    Mismatch { node: String, view: String },

    #[error("no view factory registered for {view}")]
    #[diagnostic(
        code(owl::view::unregistered),
        help(
            "The personality in use has no factory for this view type. \
             Register one with `PersonalityBuilder::register` or start from \
             `Personality::standard`."
        )
    )]
    Unregistered { view: String },

    #[error("view {view} cannot be created, only located")]
    #[diagnostic(
        code(owl::view::not_constructible),
        help(
            "Some views (unions, anonymous individuals, groups, annotations) have no \
             minimal triple shape to assert. Create one of the concrete member \
             views instead."
        )
    )]
    NotConstructible { view: String },
}

// ---------------------------------------------------------------------------
// Annotation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum AnnotationError {
    #[error("cannot delete an annotated annotation ({predicate} {value}), clear its children first")]
    #[diagnostic(
        code(owl::annotation::annotated),
        help(
            "The annotation triple is itself the base of nested annotations. \
             Call `Annotations::clear` on it before deleting it."
        )
    )]
    AnnotatedAnnotation { predicate: String, value: String },

    #[error("inconsistent reification on {node}: {message}")]
    #[diagnostic(
        code(owl::annotation::inconsistent),
        help(
            "An annotation node must record exactly one source, property and \
             target. The graph was modified outside the annotation model."
        )
    )]
    InconsistentReification { node: String, message: String },
}

// ---------------------------------------------------------------------------
// List errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ListError {
    #[error("broken list at {node}: {message}")]
    #[diagnostic(
        code(owl::list::broken),
        help(
            "Every list cell needs exactly one rdf:first and one rdf:rest, \
             and the chain must end in rdf:nil without revisiting a cell."
        )
    )]
    Broken { node: String, message: String },

    #[error("list element {node} is not a {view}")]
    #[diagnostic(
        code(owl::list::element_mismatch),
        help("Typed lists never skip elements; fix or remove the offending member.")
    )]
    ElementMismatch { node: String, view: String },

    #[error("list index {index} out of range for length {len}")]
    #[diagnostic(code(owl::list::out_of_range))]
    IndexOutOfRange { index: usize, len: usize },
}

// ---------------------------------------------------------------------------
// Disjointness group errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum DisjointError {
    #[error("disjointness group {node} has no member list")]
    #[diagnostic(
        code(owl::disjoint::no_members),
        help("A group needs an owl:members (or, for individuals, owl:distinctMembers) list.")
    )]
    NoMembers { node: String },

    #[error("disjointness group needs at least two members, got {count}")]
    #[diagnostic(code(owl::disjoint::too_few))]
    TooFewMembers { count: usize },
}

// ---------------------------------------------------------------------------
// Argument errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ArgumentError {
    #[error("{what} not found: {value}")]
    #[diagnostic(
        code(owl::argument::not_found),
        help("The value does not refer to anything attached to this view.")
    )]
    NotFound { what: String, value: String },

    #[error("invalid {what}: {message}")]
    #[diagnostic(code(owl::argument::invalid))]
    Invalid { what: String, message: String },
}

// ---------------------------------------------------------------------------
// Graph errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("anonymous node id space exhausted")]
    #[diagnostic(
        code(owl::graph::blank_ids_exhausted),
        help("All 2^64 - 1 anonymous node ids of this process have been issued.")
    )]
    BlankIdsExhausted,
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    #[diagnostic(
        code(owl::config::io),
        help("Check that the configuration file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {message}")]
    #[diagnostic(
        code(owl::config::parse),
        help(
            "The configuration must be TOML with at least a `profile` key \
             (\"strict\", \"medium\" or \"lax\")."
        )
    )]
    Parse { message: String },
}

/// Convenience alias for functions returning owl-views results.
pub type OntResult<T> = std::result::Result<T, OntError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_error_converts_to_ont_error() {
        let err = ViewError::Mismatch {
            node: "<urn:x>".into(),
            view: "Class".into(),
        };
        let ont: OntError = err.into();
        assert!(matches!(ont, OntError::View(ViewError::Mismatch { .. })));
        assert_eq!(ont.kind(), ErrorKind::ViewMismatch);
    }

    #[test]
    fn annotation_errors_are_illegal_state() {
        let ont: OntError = AnnotationError::AnnotatedAnnotation {
            predicate: "rdfs:comment".into(),
            value: "\"x\"".into(),
        }
        .into();
        assert_eq!(ont.kind(), ErrorKind::IllegalState);
        assert!(format!("{ont}").contains("clear its children first"));
    }

    #[test]
    fn argument_errors_are_illegal_argument() {
        let ont: OntError = ArgumentError::NotFound {
            what: "property chain".into(),
            value: "_:b3".into(),
        }
        .into();
        assert_eq!(ont.kind(), ErrorKind::IllegalArgument);
    }

    #[test]
    fn list_error_kinds() {
        let oob: OntError = ListError::IndexOutOfRange { index: 4, len: 2 }.into();
        assert_eq!(oob.kind(), ErrorKind::IllegalArgument);
        let broken: OntError = ListError::Broken {
            node: "_:b1".into(),
            message: "cycle".into(),
        }
        .into();
        assert_eq!(broken.kind(), ErrorKind::IllegalState);
    }

    #[test]
    fn exhausted_blank_ids_are_illegal_state() {
        let ont: OntError = GraphError::BlankIdsExhausted.into();
        assert_eq!(ont.kind(), ErrorKind::IllegalState);
    }
}
