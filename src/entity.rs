//! Named entities and the punning resolver.
//!
//! Six entity kinds share one shape: a named node carrying a declaration
//! triple `(iri rdf:type <declaration type>)`, or belonging to the kind's
//! builtin vocabulary. Which kinds may share one name is decided by the active
//! [`PunningRules`]; a node declared with an excluded sibling kind fails the
//! test, whichever declaration came first.
//!
//! Named individuals need no declaration: membership of any class view is
//! enough.

use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::annotation::Annotations;
use crate::config::PunningRules;
use crate::error::{ArgumentError, OntResult};
use crate::graph::Triple;
use crate::individual::InverseProperty;
use crate::list::TypedList;
use crate::node::{Iri, Literal, Node};
use crate::statement::Statement;
use crate::view::factory::{mismatch, CommonFactory, Initializer, Maker, ViewFactory};
use crate::view::finder::Finder;
use crate::view::predicate::Filter;
use crate::view::{View, ViewContext, ViewType};
use crate::vocab;

// ---------------------------------------------------------------------------
// Entity kinds
// ---------------------------------------------------------------------------

/// The six kinds of named entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Class,
    Datatype,
    ObjectProperty,
    DataProperty,
    AnnotationProperty,
    NamedIndividual,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Class,
        EntityKind::Datatype,
        EntityKind::ObjectProperty,
        EntityKind::DataProperty,
        EntityKind::AnnotationProperty,
        EntityKind::NamedIndividual,
    ];

    /// Object of the canonical declaration triple.
    pub fn declaration_type(self) -> &'static str {
        match self {
            EntityKind::Class => vocab::OWL_CLASS,
            EntityKind::Datatype => vocab::RDFS_DATATYPE,
            EntityKind::ObjectProperty => vocab::OWL_OBJECT_PROPERTY,
            EntityKind::DataProperty => vocab::OWL_DATATYPE_PROPERTY,
            EntityKind::AnnotationProperty => vocab::OWL_ANNOTATION_PROPERTY,
            EntityKind::NamedIndividual => vocab::OWL_NAMED_INDIVIDUAL,
        }
    }

    /// Names viewable as this kind without a declaration.
    pub fn builtins(self) -> &'static [&'static str] {
        match self {
            EntityKind::Class => vocab::BUILTIN_CLASSES,
            EntityKind::Datatype => vocab::BUILTIN_DATATYPES,
            EntityKind::ObjectProperty => vocab::BUILTIN_OBJECT_PROPERTIES,
            EntityKind::DataProperty => vocab::BUILTIN_DATA_PROPERTIES,
            EntityKind::AnnotationProperty => vocab::BUILTIN_ANNOTATION_PROPERTIES,
            EntityKind::NamedIndividual => &[],
        }
    }

    pub fn is_builtin(self, iri: &str) -> bool {
        self.builtins().contains(&iri)
    }

    /// The kind whose declaration type is `iri`, if any.
    pub fn from_declaration_type(iri: &str) -> Option<EntityKind> {
        EntityKind::ALL.into_iter().find(|k| k.declaration_type() == iri)
    }

    pub fn is_property(self) -> bool {
        matches!(
            self,
            EntityKind::ObjectProperty | EntityKind::DataProperty | EntityKind::AnnotationProperty
        )
    }

    pub fn view_type(self) -> ViewType {
        ViewType::Entity(self)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::Class => "Class",
            EntityKind::Datatype => "Datatype",
            EntityKind::ObjectProperty => "ObjectProperty",
            EntityKind::DataProperty => "DataProperty",
            EntityKind::AnnotationProperty => "AnnotationProperty",
            EntityKind::NamedIndividual => "NamedIndividual",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Factories
// ---------------------------------------------------------------------------

/// One factory per entity kind, under `rules`.
pub(crate) fn factories(rules: &PunningRules) -> Vec<Arc<dyn ViewFactory>> {
    EntityKind::ALL
        .into_iter()
        .map(|kind| Arc::new(factory(kind, rules)) as Arc<dyn ViewFactory>)
        .collect()
}

/// The standard factory for `kind` under `rules`.
pub fn factory(kind: EntityKind, rules: &PunningRules) -> CommonFactory {
    let excluded = rules.excluded_for(kind);
    let (finder, filter) = match kind {
        EntityKind::NamedIndividual => (typed_iris(), individual_filter(excluded)),
        _ => (
            Finder::by_type(kind.declaration_type()).chain(builtins_in_use(kind)),
            entity_filter(kind, excluded, rules.builtins_override()),
        ),
    };
    CommonFactory::new(
        kind.view_type(),
        finder,
        filter,
        Maker::new(move |n, ctx| Entity::from_node(n, kind, ctx).map(View::Entity)),
    )
    .with_initializer(Initializer::new(move |n, _| {
        vec![Triple::new(n.clone(), vocab::RDF_TYPE, Node::iri(kind.declaration_type()))]
    }))
}

/// Whether `iri`, typed with `types`, is declared as (or is a builtin of) any
/// of `kinds`.
fn declared_as_any(iri: &str, types: &[Node], kinds: &[EntityKind]) -> bool {
    kinds
        .iter()
        .any(|k| k.is_builtin(iri) || types.iter().any(|t| t.is(k.declaration_type())))
}

/// Test for every kind except named individuals.
fn entity_filter(kind: EntityKind, excluded: Vec<EntityKind>, builtins_override: bool) -> Filter {
    Filter::new(move |node, ctx| {
        let Some(iri) = node.as_iri() else {
            return false;
        };
        let builtin = kind.is_builtin(iri.as_str());
        if builtin && builtins_override {
            return true;
        }
        let types = ctx.graph.types(node);
        if declared_as_any(iri.as_str(), &types, &excluded) {
            return false;
        }
        builtin || types.iter().any(|t| t.is(kind.declaration_type()))
    })
}

/// Test for named individuals: no conflicting declaration, and either the
/// explicit marker or membership of some class.
///
/// Builtin classes count in the membership pass, so `x rdf:type owl:Thing`
/// makes `x` an individual. Reserved structural types never do.
fn individual_filter(excluded: Vec<EntityKind>) -> Filter {
    Filter::new(move |node, ctx| {
        let Some(iri) = node.as_iri() else {
            return false;
        };
        let types = ctx.graph.types(node);
        if declared_as_any(iri.as_str(), &types, &excluded) {
            return false;
        }
        if types.iter().any(|t| t.is(vocab::OWL_NAMED_INDIVIDUAL)) {
            return true;
        }
        types.iter().any(|t| is_class_like(t, ctx))
    })
}

/// A type object that names a class: a class view, or an anonymous class
/// expression.
pub(crate) fn is_class_like(ty: &Node, ctx: ViewContext<'_>) -> bool {
    match ty {
        Node::Iri(iri) if vocab::is_reserved_type(iri.as_str()) => false,
        Node::Iri(_) => ctx.can_view(ty, ViewType::Entity(EntityKind::Class)),
        Node::Blank(_) => {
            ctx.graph.has_type(ty, vocab::OWL_CLASS) || ctx.graph.has_type(ty, vocab::OWL_RESTRICTION)
        }
        Node::Literal(_) => false,
    }
}

/// Named subjects of any `rdf:type` triple.
fn typed_iris() -> Finder {
    Finder::new(|ctx| {
        let triples = ctx.graph.find(None, Some(&Iri::new(vocab::RDF_TYPE)), None);
        Box::new(triples.into_iter().map(|t| t.subject).filter(Node::is_iri))
    })
}

/// Builtins of `kind` that occur anywhere in the store.
fn builtins_in_use(kind: EntityKind) -> Finder {
    Finder::new(move |ctx| {
        let used: Vec<Node> = kind
            .builtins()
            .iter()
            .filter(|iri| mentioned(iri, ctx))
            .map(|iri| Node::iri(*iri))
            .collect();
        Box::new(used.into_iter())
    })
}

fn mentioned(iri: &str, ctx: ViewContext<'_>) -> bool {
    let node = Node::iri(iri);
    !ctx.graph.find(Some(&node), None, None).is_empty()
        || !ctx.graph.find(None, Some(&Iri::new(iri)), None).is_empty()
        || !ctx.graph.find(None, None, Some(&node)).is_empty()
}

// ---------------------------------------------------------------------------
// Entity view
// ---------------------------------------------------------------------------

/// A named node viewed as one entity kind.
#[derive(Debug, Clone)]
pub struct Entity<'a> {
    iri: Iri,
    kind: EntityKind,
    ctx: ViewContext<'a>,
}

impl<'a> Entity<'a> {
    /// Wrap `node`. Only checks that the node is named; callers go through
    /// [`ViewContext::view`] for the full test.
    pub fn from_node(node: &Node, kind: EntityKind, ctx: ViewContext<'a>) -> OntResult<Self> {
        match node {
            Node::Iri(iri) => Ok(Self {
                iri: iri.clone(),
                kind,
                ctx,
            }),
            _ => Err(mismatch(node, kind.view_type())),
        }
    }

    pub fn iri(&self) -> &Iri {
        &self.iri
    }

    pub fn node(&self) -> Node {
        Node::Iri(self.iri.clone())
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn ctx(&self) -> ViewContext<'a> {
        self.ctx
    }

    pub fn is_builtin(&self) -> bool {
        self.kind.is_builtin(self.iri.as_str())
    }

    /// The declaration triple, if asserted. Builtins usually have none.
    pub fn main_statement(&self) -> Option<Statement> {
        let triple = Triple::new(
            self.node(),
            vocab::RDF_TYPE,
            Node::iri(self.kind.declaration_type()),
        );
        self.ctx.graph.contains(&triple).then(|| Statement::root(triple))
    }

    /// Assert `(self property value)`.
    pub fn add_annotation(&self, property: &str, value: impl Into<Node>) -> Statement {
        let triple = Triple::new(self.node(), property, value.into());
        self.ctx.graph.add(triple.clone());
        Statement::root(triple)
    }

    pub fn add_label(&self, text: &str, lang: Option<&str>) -> Statement {
        self.add_annotation(vocab::RDFS_LABEL, Literal::new(text, lang, None))
    }

    pub fn add_comment(&self, text: &str, lang: Option<&str>) -> Statement {
        self.add_annotation(vocab::RDFS_COMMENT, Literal::new(text, lang, None))
    }

    /// Objects of `(self property ?)`.
    pub fn annotation_values(&self, property: &str) -> Vec<Node> {
        self.ctx.graph.objects(&self.node(), property)
    }

    /// Annotations reified on the declaration triple.
    pub fn annotations(&self) -> Vec<Statement> {
        self.main_statement()
            .map(|s| Annotations::new(self.ctx).list(s.triple()))
            .unwrap_or_default()
    }

    /// Every other view kind this name currently supports.
    pub fn puns(&self) -> Vec<EntityKind> {
        EntityKind::ALL
            .into_iter()
            .filter(|k| *k != self.kind && self.ctx.can_view(&self.node(), k.view_type()))
            .collect()
    }

    pub fn into_class(self) -> Option<Class<'a>> {
        (self.kind == EntityKind::Class).then_some(Class(self))
    }

    pub fn into_object_property(self) -> Option<ObjectProperty<'a>> {
        (self.kind == EntityKind::ObjectProperty).then_some(ObjectProperty(self))
    }

    pub fn into_named_individual(self) -> Option<NamedIndividual<'a>> {
        (self.kind == EntityKind::NamedIndividual).then_some(NamedIndividual(self))
    }

    fn view_objects(&self, predicate: &str, view: ViewType) -> Vec<Entity<'a>> {
        self.ctx
            .graph
            .objects(&self.node(), predicate)
            .into_iter()
            .filter_map(|n| self.ctx.try_view(&n, view))
            .filter_map(View::into_entity)
            .collect()
    }

    fn assert(&self, predicate: &str, object: Node) -> Statement {
        let triple = Triple::new(self.node(), predicate, object);
        self.ctx.graph.add(triple.clone());
        Statement::root(triple)
    }
}

impl PartialEq for Entity<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.iri == other.iri && self.kind == other.kind
    }
}

impl Eq for Entity<'_> {}

impl std::fmt::Display for Entity<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.kind, self.iri)
    }
}

// ---------------------------------------------------------------------------
// Class
// ---------------------------------------------------------------------------

/// A named class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class<'a>(Entity<'a>);

impl<'a> Deref for Class<'a> {
    type Target = Entity<'a>;

    fn deref(&self) -> &Entity<'a> {
        &self.0
    }
}

impl<'a> Class<'a> {
    /// `self rdfs:subClassOf sup`.
    pub fn add_super_class(&self, sup: &Class<'_>) -> Statement {
        self.assert(vocab::RDFS_SUB_CLASS_OF, sup.node())
    }

    /// Named superclasses. Anonymous class expressions are skipped.
    pub fn super_classes(&self) -> Vec<Class<'a>> {
        self.view_objects(vocab::RDFS_SUB_CLASS_OF, ViewType::Entity(EntityKind::Class))
            .into_iter()
            .map(Class)
            .collect()
    }

    pub fn sub_classes(&self) -> Vec<Class<'a>> {
        self.ctx
            .graph
            .subjects(vocab::RDFS_SUB_CLASS_OF, &self.node())
            .into_iter()
            .filter_map(|n| self.ctx.try_view(&n, ViewType::Entity(EntityKind::Class)))
            .filter_map(|v| v.into_entity().and_then(Entity::into_class))
            .collect()
    }

    /// Assert `iri rdf:type self` and view the result as a named individual.
    pub fn create_individual(&self, iri: &str) -> OntResult<NamedIndividual<'a>> {
        let node = Node::iri(iri);
        let assertion = Triple::new(node.clone(), vocab::RDF_TYPE, self.node());
        let added = self.ctx.graph.add(assertion.clone());
        match self.ctx.view(&node, ViewType::Entity(EntityKind::NamedIndividual)) {
            Ok(view) => Ok(NamedIndividual(Entity::from_node(
                &view.node(),
                EntityKind::NamedIndividual,
                self.ctx,
            )?)),
            Err(e) => {
                if added {
                    self.ctx.graph.remove(&assertion);
                }
                Err(e)
            }
        }
    }

    /// Subjects typed with this class (named and anonymous).
    pub fn instances(&self) -> Vec<Node> {
        self.ctx.graph.subjects(vocab::RDF_TYPE, &self.node())
    }
}

// ---------------------------------------------------------------------------
// Object property
// ---------------------------------------------------------------------------

/// A named object property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectProperty<'a>(Entity<'a>);

impl<'a> Deref for ObjectProperty<'a> {
    type Target = Entity<'a>;

    fn deref(&self) -> &Entity<'a> {
        &self.0
    }
}

impl<'a> ObjectProperty<'a> {
    pub fn add_domain(&self, class: &Class<'_>) -> Statement {
        self.assert(vocab::RDFS_DOMAIN, class.node())
    }

    pub fn add_range(&self, class: &Class<'_>) -> Statement {
        self.assert(vocab::RDFS_RANGE, class.node())
    }

    pub fn domains(&self) -> Vec<Node> {
        self.ctx.graph.objects(&self.node(), vocab::RDFS_DOMAIN)
    }

    pub fn ranges(&self) -> Vec<Node> {
        self.ctx.graph.objects(&self.node(), vocab::RDFS_RANGE)
    }

    pub fn add_super_property(&self, sup: &ObjectProperty<'_>) -> Statement {
        self.assert(vocab::RDFS_SUB_PROPERTY_OF, sup.node())
    }

    /// The anonymous inverse expression `_:x owl:inverseOf self`, created
    /// if none exists yet.
    pub fn create_inverse(&self) -> OntResult<InverseProperty<'a>> {
        if let Some(existing) = self.inverse() {
            return Ok(existing);
        }
        let blank = self.ctx.graph.create_blank()?;
        self.ctx
            .graph
            .add(Triple::new(blank.clone(), vocab::OWL_INVERSE_OF, self.node()));
        self.ctx
            .view(&blank, ViewType::InverseProperty)?
            .into_inverse_property()
            .ok_or_else(|| mismatch(&blank, ViewType::InverseProperty))
    }

    /// An existing anonymous inverse expression, if any.
    pub fn inverse(&self) -> Option<InverseProperty<'a>> {
        self.ctx
            .graph
            .subjects(vocab::OWL_INVERSE_OF, &self.node())
            .into_iter()
            .filter(Node::is_blank)
            .find_map(|n| self.ctx.try_view(&n, ViewType::InverseProperty))
            .and_then(View::into_inverse_property)
    }

    /// Add `self owl:propertyChainAxiom (p1 .. pn)`.
    ///
    /// Every member must be an object property expression, and a chain has at
    /// least two links.
    pub fn add_property_chain(&self, chain: &[Node]) -> OntResult<TypedList<'a>> {
        if chain.len() < 2 {
            return Err(ArgumentError::Invalid {
                what: "property chain".into(),
                message: format!("needs at least two properties, got {}", chain.len()),
            }
            .into());
        }
        TypedList::create_anchored(
            self.ctx,
            &self.node(),
            vocab::OWL_PROPERTY_CHAIN_AXIOM,
            ViewType::ObjectPropertyExpression,
            chain,
        )
    }

    /// Every chain axiom on this property.
    pub fn property_chains(&self) -> Vec<TypedList<'a>> {
        TypedList::find_anchored(
            self.ctx,
            &self.node(),
            vocab::OWL_PROPERTY_CHAIN_AXIOM,
            ViewType::ObjectPropertyExpression,
        )
    }

    /// Remove a chain axiom together with its list cells and annotations.
    ///
    /// Fails with an illegal-argument error if `chain` is not one of this
    /// property's chains.
    pub fn remove_property_chain(&self, chain: &TypedList<'_>) -> OntResult<()> {
        let anchor = Triple::new(self.node(), vocab::OWL_PROPERTY_CHAIN_AXIOM, chain.head().clone());
        if !self.ctx.graph.contains_local(&anchor) {
            return Err(ArgumentError::NotFound {
                what: "property chain".into(),
                value: chain.head().to_string(),
            }
            .into());
        }
        let list = TypedList::anchored(self.ctx, anchor, ViewType::ObjectPropertyExpression);
        list.delete()?;
        tracing::debug!(property = %self.iri(), "removed property chain");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Named individual
// ---------------------------------------------------------------------------

/// A named individual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedIndividual<'a>(Entity<'a>);

impl<'a> Deref for NamedIndividual<'a> {
    type Target = Entity<'a>;

    fn deref(&self) -> &Entity<'a> {
        &self.0
    }
}

impl<'a> NamedIndividual<'a> {
    /// Class assertion `self rdf:type class`.
    pub fn add_type(&self, class: &Class<'_>) -> Statement {
        self.assert(vocab::RDF_TYPE, class.node())
    }

    /// Asserted named classes.
    pub fn classes(&self) -> Vec<Class<'a>> {
        self.view_objects(vocab::RDF_TYPE, ViewType::Entity(EntityKind::Class))
            .into_iter()
            .map(Class)
            .collect()
    }

    /// Property assertion `self property value`. The property must be an
    /// object, data or annotation property.
    pub fn add_assertion(&self, property: &Entity<'_>, value: impl Into<Node>) -> OntResult<Statement> {
        if !property.kind().is_property() {
            return Err(ArgumentError::Invalid {
                what: "assertion property".into(),
                message: format!("{property} is not a property"),
            }
            .into());
        }
        Ok(self.assert(property.iri().as_str(), value.into()))
    }
}
