// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # owl-views
//!
//! Typed views over an in-memory OWL/RDF triple graph. The triples are the
//! only state; classes, properties, individuals, disjointness groups and
//! annotated statements are projections recomputed from them on demand.
//!
//! ## Architecture
//!
//! - **Store** (`graph`, `node`): DashMap-indexed triples with imports
//! - **Projection engine** (`view`): predicates, finders, factories and the
//!   per-profile registry ([`view::personality::Personality`])
//! - **Entities** (`entity`, `individual`): named entities with configurable
//!   punning, anonymous individuals, inverse properties
//! - **Collections** (`list`, `disjoint`): typed RDF lists and n-ary
//!   disjointness groups
//! - **Annotations** (`annotation`): reified, nestable metadata on any triple
//! - **Reference index** (`root`, `search`): root-statement discovery and
//!   per-kind entity/axiom search
//!
//! ## Library usage
//!
//! ```no_run
//! use owl_views::config::ModelConfig;
//! use owl_views::model::OntModel;
//! use owl_views::node::Literal;
//! use owl_views::vocab;
//!
//! let model = OntModel::new(ModelConfig::default());
//! let animal = model.create_class("urn:ex:Animal").unwrap();
//! let decl = animal.main_statement().unwrap();
//! model
//!     .annotations()
//!     .add(decl.triple(), vocab::RDFS_COMMENT, Literal::lang("living thing", "en"))
//!     .unwrap();
//! assert_eq!(animal.annotations().len(), 1);
//! ```

pub mod annotation;
pub mod config;
pub mod disjoint;
pub mod entity;
pub mod error;
pub mod graph;
pub mod individual;
pub mod list;
pub mod model;
pub mod node;
pub mod root;
pub mod search;
pub mod statement;
pub mod view;
pub mod vocab;
