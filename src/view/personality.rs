//! View registry.
//!
//! A [`Personality`] maps every [`ViewType`] to exactly one factory. It is
//! built once per configuration and never mutated afterwards; overrides go
//! through [`Personality::to_builder`], which yields a new registry.
//!
//! [`Personalities`] is the arena of the three standard registries, one per
//! [`PunningProfile`], shared by every model that uses a stock configuration.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::config::{ModelConfig, PunningProfile, PunningRules};
use crate::{annotation, disjoint, entity, individual};

use super::factory::{UnionFactory, ViewFactory};
use super::ViewType;

/// Immutable view-type → factory table.
#[derive(Clone)]
pub struct Personality {
    profile: PunningProfile,
    rules: PunningRules,
    factories: HashMap<ViewType, Arc<dyn ViewFactory>>,
}

impl Personality {
    /// The standard registry for `config`: every entity kind, anonymous
    /// individuals, inverse properties, disjointness groups, annotations, and
    /// the unions over them.
    pub fn standard(config: &ModelConfig) -> Self {
        let rules = config.punning_rules();
        let mut builder = Self::builder(config.profile, rules.clone());
        for factory in standard_factories(&rules) {
            builder = builder.register(factory);
        }
        builder.build()
    }

    /// An empty builder.
    pub fn builder(profile: PunningProfile, rules: PunningRules) -> PersonalityBuilder {
        PersonalityBuilder {
            profile,
            rules,
            factories: HashMap::new(),
        }
    }

    /// A builder seeded with this registry's concrete factories.
    ///
    /// Union factories are dropped and rebuilt by
    /// [`PersonalityBuilder::build`], so overriding a member type is reflected
    /// in its unions.
    pub fn to_builder(&self) -> PersonalityBuilder {
        PersonalityBuilder {
            profile: self.profile,
            rules: self.rules.clone(),
            factories: self
                .factories
                .iter()
                .filter(|(ty, _)| !ty.is_union())
                .map(|(ty, f)| (*ty, f.clone()))
                .collect(),
        }
    }

    pub fn factory(&self, view: ViewType) -> Option<&dyn ViewFactory> {
        self.factories.get(&view).map(|f| f.as_ref())
    }

    pub fn supports(&self, view: ViewType) -> bool {
        self.factories.contains_key(&view)
    }

    /// Registered view types, in `ViewType` order.
    pub fn view_types(&self) -> Vec<ViewType> {
        let mut types: Vec<ViewType> = self.factories.keys().copied().collect();
        types.sort();
        types
    }

    pub fn profile(&self) -> PunningProfile {
        self.profile
    }

    pub fn rules(&self) -> &PunningRules {
        &self.rules
    }
}

impl std::fmt::Debug for Personality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Personality")
            .field("profile", &self.profile)
            .field("views", &self.view_types())
            .finish()
    }
}

/// Collects factories, then freezes them into a [`Personality`].
pub struct PersonalityBuilder {
    profile: PunningProfile,
    rules: PunningRules,
    factories: HashMap<ViewType, Arc<dyn ViewFactory>>,
}

impl PersonalityBuilder {
    /// Register `factory` under its view type, replacing any previous one.
    pub fn register(mut self, factory: Arc<dyn ViewFactory>) -> Self {
        let view = factory.view_type();
        if self.factories.insert(view, factory).is_some() {
            tracing::debug!(view = %view, "view factory overridden");
        }
        self
    }

    /// Freeze the table. Every union type without an explicit factory gets a
    /// [`UnionFactory`] over whichever of its members are registered.
    pub fn build(mut self) -> Personality {
        for union in ViewType::all().into_iter().filter(|t| t.is_union()) {
            if self.factories.contains_key(&union) {
                continue;
            }
            let delegates: Vec<Arc<dyn ViewFactory>> = union
                .members()
                .into_iter()
                .filter_map(|member| self.factories.get(&member).cloned())
                .collect();
            if !delegates.is_empty() {
                self.factories
                    .insert(union, Arc::new(UnionFactory::new(union, delegates)));
            }
        }
        tracing::debug!(
            profile = %self.profile,
            views = self.factories.len(),
            "built personality"
        );
        Personality {
            profile: self.profile,
            rules: self.rules,
            factories: self.factories,
        }
    }
}

/// Every standard factory for `rules`.
fn standard_factories(rules: &PunningRules) -> Vec<Arc<dyn ViewFactory>> {
    let mut all = entity::factories(rules);
    all.extend(individual::factories());
    all.extend(disjoint::factories());
    all.push(annotation::factory());
    all
}

// ---------------------------------------------------------------------------
// Profile arena
// ---------------------------------------------------------------------------

/// One standard [`Personality`] per punning profile.
pub struct Personalities {
    by_profile: [Arc<Personality>; 3],
}

impl Personalities {
    /// Build all three standard registries.
    pub fn new() -> Self {
        Self {
            by_profile: PunningProfile::ALL
                .map(|p| Arc::new(Personality::standard(&ModelConfig::with_profile(p)))),
        }
    }

    /// The process-wide arena, built on first use.
    pub fn builtin() -> &'static Personalities {
        static BUILTIN: OnceLock<Personalities> = OnceLock::new();
        BUILTIN.get_or_init(Personalities::new)
    }

    pub fn get(&self, profile: PunningProfile) -> Arc<Personality> {
        self.by_profile[profile as usize].clone()
    }
}

impl Default for Personalities {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use crate::graph::index::MemGraph;
    use crate::graph::TripleStore;
    use crate::graph::Triple;
    use crate::node::Node;
    use crate::view::factory::{CommonFactory, Maker};
    use crate::view::finder::Finder;
    use crate::view::predicate::Filter;
    use crate::view::{View, ViewContext};
    use crate::vocab;

    #[test]
    fn standard_registers_every_view_type() {
        let personality = Personality::standard(&ModelConfig::default());
        for view in ViewType::all() {
            assert!(personality.supports(view), "missing factory for {view}");
        }
        assert_eq!(personality.profile(), PunningProfile::Strict);
    }

    #[test]
    fn arena_is_shared() {
        let a = Personalities::builtin().get(PunningProfile::Medium);
        let b = Personalities::builtin().get(PunningProfile::Medium);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.profile(), PunningProfile::Medium);
    }

    #[test]
    fn override_rebuilds_unions() {
        let base = Personality::standard(&ModelConfig::default());
        // classes are only what is typed rdfs:Class
        let custom = CommonFactory::new(
            ViewType::Entity(EntityKind::Class),
            Finder::by_type(vocab::RDFS_CLASS),
            Filter::is_iri().and(Filter::has_type(vocab::RDFS_CLASS)),
            Maker::new(|n, ctx| crate::entity::Entity::from_node(n, EntityKind::Class, ctx).map(View::Entity)),
        );
        let overridden = base.to_builder().register(Arc::new(custom)).build();

        let graph = MemGraph::new();
        graph.add(Triple::new(Node::iri("urn:c"), vocab::RDF_TYPE, Node::iri(vocab::RDFS_CLASS)));

        let stock = ViewContext::new(&graph, &base);
        let ctx = ViewContext::new(&graph, &overridden);
        let c = Node::iri("urn:c");
        assert!(!stock.can_view(&c, ViewType::Entity(EntityKind::Class)));
        assert!(ctx.can_view(&c, ViewType::Entity(EntityKind::Class)));
        assert!(ctx.can_view(&c, ViewType::AnyEntity));
        // the base registry is untouched
        assert!(!stock.can_view(&c, ViewType::AnyEntity));
    }

    #[test]
    fn unregistered_view_is_an_error() {
        let empty = Personality::builder(PunningProfile::Lax, PunningRules::for_profile(PunningProfile::Lax)).build();
        let graph = MemGraph::new();
        let ctx = ViewContext::new(&graph, &empty);
        let c = Node::iri("urn:c");
        assert!(!ctx.can_view(&c, ViewType::Annotation));
        assert!(ctx.view(&c, ViewType::Annotation).is_err());
        assert!(ctx.locate(ViewType::AnyEntity).is_empty());
    }
}
