//! Model facade: one store, one personality, one configuration.
//!
//! The `OntModel` owns everything a caller needs to work with typed views and
//! hands out [`ViewContext`]-bound helpers for the subsystems.

use std::path::Path;
use std::sync::Arc;

use crate::annotation::Annotations;
use crate::config::ModelConfig;
use crate::disjoint::{DisjointGroup, DisjointKind};
use crate::entity::{Class, Entity, EntityKind, NamedIndividual, ObjectProperty};
use crate::error::OntResult;
use crate::graph::index::MemGraph;
use crate::graph::{Triple, TripleStore};
use crate::list::TypedList;
use crate::node::Node;
use crate::root::RootIndex;
use crate::search::Searcher;
use crate::statement::Statement;
use crate::view::factory::mismatch;
use crate::view::personality::{Personalities, Personality};
use crate::view::{View, ViewContext, ViewType};

/// A graph interpreted through a personality.
pub struct OntModel {
    graph: Arc<MemGraph>,
    personality: Arc<Personality>,
    config: ModelConfig,
}

impl OntModel {
    /// An empty model for `config`.
    pub fn new(config: ModelConfig) -> Self {
        Self::with_graph(Arc::new(MemGraph::new()), config)
    }

    /// A model over an existing store.
    ///
    /// Stock configurations share the process-wide personality for their
    /// profile; anything customized gets its own.
    pub fn with_graph(graph: Arc<MemGraph>, config: ModelConfig) -> Self {
        let personality = if config.extra_exclusions.is_empty() && config.builtins_override_declarations.is_none() {
            Personalities::builtin().get(config.profile)
        } else {
            Arc::new(Personality::standard(&config))
        };
        Self::with_personality(graph, personality, config)
    }

    /// A model using a caller-built personality.
    pub fn with_personality(graph: Arc<MemGraph>, personality: Arc<Personality>, config: ModelConfig) -> Self {
        tracing::info!(
            profile = %personality.profile(),
            triples = graph.len(),
            split_annotations = config.split_annotations,
            "opened ontology model"
        );
        Self {
            graph,
            personality,
            config,
        }
    }

    /// An empty model configured from a TOML file.
    pub fn from_config_file(path: &Path) -> OntResult<Self> {
        Ok(Self::new(ModelConfig::load(path)?))
    }

    pub fn graph(&self) -> &MemGraph {
        &self.graph
    }

    pub fn personality(&self) -> &Personality {
        &self.personality
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn ctx(&self) -> ViewContext<'_> {
        ViewContext::new(self.graph.as_ref(), self.personality.as_ref())
    }

    pub fn is_independent(&self) -> bool {
        self.graph.is_independent()
    }

    /// Make `other`'s triples visible through this model.
    pub fn add_import(&self, other: &OntModel) {
        self.graph.add_import(other.graph.clone());
        tracing::debug!(imports = self.graph.imports().len(), "added import");
    }

    pub fn remove_import(&self, other: &OntModel) {
        let other: Arc<dyn TripleStore> = other.graph.clone();
        self.graph.remove_import(&other);
    }

    // -----------------------------------------------------------------------
    // Entities
    // -----------------------------------------------------------------------

    /// Declare `iri` as `kind` (if it is not one already) and return the view.
    pub fn create_entity(&self, iri: &str, kind: EntityKind) -> OntResult<Entity<'_>> {
        let node = Node::iri(iri);
        self.ctx()
            .create(&node, kind.view_type())?
            .into_entity()
            .ok_or_else(|| mismatch(&node, kind.view_type()))
    }

    pub fn create_class(&self, iri: &str) -> OntResult<Class<'_>> {
        let entity = self.create_entity(iri, EntityKind::Class)?;
        let node = entity.node();
        entity
            .into_class()
            .ok_or_else(|| mismatch(&node, EntityKind::Class.view_type()))
    }

    pub fn create_object_property(&self, iri: &str) -> OntResult<ObjectProperty<'_>> {
        let entity = self.create_entity(iri, EntityKind::ObjectProperty)?;
        let node = entity.node();
        entity
            .into_object_property()
            .ok_or_else(|| mismatch(&node, EntityKind::ObjectProperty.view_type()))
    }

    pub fn create_individual(&self, iri: &str) -> OntResult<NamedIndividual<'_>> {
        let entity = self.create_entity(iri, EntityKind::NamedIndividual)?;
        let node = entity.node();
        entity
            .into_named_individual()
            .ok_or_else(|| mismatch(&node, EntityKind::NamedIndividual.view_type()))
    }

    /// `iri` viewed as `kind`, if it currently is one.
    pub fn entity(&self, iri: &str, kind: EntityKind) -> Option<Entity<'_>> {
        self.ctx()
            .try_view(&Node::iri(iri), kind.view_type())
            .and_then(View::into_entity)
    }

    /// Every entity of `kind` (see [`Searcher::entities`]).
    pub fn entities(&self, kind: EntityKind) -> Vec<Entity<'_>> {
        self.searcher(kind).entities()
    }

    /// Reference index for `kind`, honoring the configured splitting.
    pub fn searcher(&self, kind: EntityKind) -> Searcher<'_> {
        Searcher::new(self.ctx(), kind).split_annotations(self.config.split_annotations)
    }

    // -----------------------------------------------------------------------
    // Structures
    // -----------------------------------------------------------------------

    pub fn create_disjoint(&self, kind: DisjointKind, members: &[Node]) -> OntResult<DisjointGroup<'_>> {
        DisjointGroup::create(self.ctx(), kind, members)
    }

    pub fn disjoint_groups(&self, kind: DisjointKind) -> Vec<DisjointGroup<'_>> {
        self.ctx()
            .views(ViewType::Disjoint(kind))
            .into_iter()
            .filter_map(View::into_disjoint)
            .collect()
    }

    pub fn create_list(&self, element: ViewType, members: &[Node]) -> OntResult<TypedList<'_>> {
        TypedList::create(self.ctx(), element, members)
    }

    pub fn list(&self, head: Node, element: ViewType) -> TypedList<'_> {
        TypedList::new(self.ctx(), head, element)
    }

    pub fn annotations(&self) -> Annotations<'_> {
        Annotations::new(self.ctx())
    }

    pub fn roots(&self) -> RootIndex<'_> {
        RootIndex::new(self.ctx())
    }

    /// Root statements `node` takes part in.
    pub fn root_statements(&self, node: &Node) -> Vec<Statement> {
        self.roots().roots_of(node)
    }

    /// Root statements of one triple.
    pub fn root_statements_of(&self, triple: &Triple) -> Vec<Statement> {
        self.roots().roots_of_triple(triple)
    }
}

impl Default for OntModel {
    fn default() -> Self {
        Self::new(ModelConfig::default())
    }
}

impl std::fmt::Debug for OntModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OntModel")
            .field("triples", &self.graph.len())
            .field("profile", &self.personality.profile())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PunningProfile;
    use crate::node::Literal;
    use crate::vocab;

    #[test]
    fn stock_configs_share_personality() {
        let a = OntModel::new(ModelConfig::with_profile(PunningProfile::Medium));
        let b = OntModel::new(ModelConfig::with_profile(PunningProfile::Medium));
        assert!(std::ptr::eq(a.personality(), b.personality()));

        let custom = ModelConfig {
            extra_exclusions: vec![[EntityKind::Class, EntityKind::NamedIndividual]],
            ..ModelConfig::default()
        };
        let c = OntModel::new(custom);
        assert!(!std::ptr::eq(a.personality(), c.personality()));
        assert!(c.personality().rules().excludes(EntityKind::Class, EntityKind::NamedIndividual));
    }

    #[test]
    fn create_and_lookup_entities() {
        let model = OntModel::default();
        let class = model.create_class("urn:C").unwrap();
        class.create_individual("urn:i").unwrap();
        model.create_object_property("urn:p").unwrap();

        assert!(model.entity("urn:C", EntityKind::Class).is_some());
        assert!(model.entity("urn:C", EntityKind::Datatype).is_none());
        assert_eq!(model.entities(EntityKind::NamedIndividual).len(), 1);
        assert_eq!(model.entities(EntityKind::ObjectProperty).len(), 1);
        // creating again is idempotent
        let before = model.graph().len();
        model.create_class("urn:C").unwrap();
        assert_eq!(model.graph().len(), before);
    }

    #[test]
    fn strict_profile_refuses_excluded_pun() {
        let model = OntModel::default();
        model.create_entity("urn:x", EntityKind::Class).unwrap();
        let before = model.graph().len();
        assert!(model.create_entity("urn:x", EntityKind::Datatype).is_err());
        assert_eq!(model.graph().len(), before);
    }

    #[test]
    fn imports_are_seen_but_not_owned() {
        let base = OntModel::default();
        let other = OntModel::default();
        other.create_class("urn:Imported").unwrap();
        base.create_class("urn:Local").unwrap();
        assert!(base.is_independent());

        base.add_import(&other);
        assert!(!base.is_independent());
        assert!(base.entity("urn:Imported", EntityKind::Class).is_some());
        assert_eq!(base.entities(EntityKind::Class).len(), 2);
        assert_eq!(base.graph().len(), 1);

        base.remove_import(&other);
        assert!(base.is_independent());
        assert_eq!(base.entities(EntityKind::Class).len(), 1);
    }

    #[test]
    fn root_statements_through_model() {
        let model = OntModel::default();
        let class = model.create_class("urn:C").unwrap();
        let label = class.add_label("Cee", Some("en"));
        let decl = class.main_statement().unwrap();
        model
            .annotations()
            .add(decl.triple(), vocab::RDFS_COMMENT, Literal::plain("about C"))
            .unwrap();

        let roots = model.root_statements(&Node::Literal(Literal::plain("about C")));
        assert_eq!(roots, vec![decl]);
        assert_eq!(model.root_statements_of(label.triple()), vec![label]);
    }

    #[test]
    fn config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.toml");
        std::fs::write(&path, "profile = \"lax\"\nsplit_annotations = true\n").unwrap();

        let model = OntModel::from_config_file(&path).unwrap();
        assert_eq!(model.personality().profile(), PunningProfile::Lax);
        assert!(model.config().split_annotations);

        let missing = OntModel::from_config_file(&dir.path().join("absent.toml"));
        assert!(missing.is_err());
    }
}
