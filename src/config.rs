//! Model configuration: punning profile and reference-index options.
//!
//! A [`ModelConfig`] is plain data, deserializable from TOML:
//!
//! ```toml
//! profile = "medium"
//! split_annotations = true
//! extra_exclusions = [["class", "named_individual"]]
//! ```
//!
//! The profile selects which pairs of entity kinds may not share a name
//! (punning exclusions). Everything else in the engine is profile-agnostic.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entity::EntityKind;
use crate::error::ConfigError;

/// Which punning-exclusion rules are active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PunningProfile {
    /// Class/Datatype and all property kinds are mutually exclusive.
    #[default]
    Strict,
    /// Class/Datatype and ObjectProperty/DataProperty are exclusive.
    Medium,
    /// Any name may carry any combination of entity declarations.
    Lax,
}

impl PunningProfile {
    pub const ALL: [PunningProfile; 3] = [
        PunningProfile::Strict,
        PunningProfile::Medium,
        PunningProfile::Lax,
    ];

    /// Mutually exclusive entity kinds under this profile.
    pub fn exclusions(self) -> &'static [(EntityKind, EntityKind)] {
        use EntityKind::*;
        match self {
            PunningProfile::Strict => &[
                (Class, Datatype),
                (ObjectProperty, DataProperty),
                (ObjectProperty, AnnotationProperty),
                (DataProperty, AnnotationProperty),
            ],
            PunningProfile::Medium => &[(Class, Datatype), (ObjectProperty, DataProperty)],
            PunningProfile::Lax => &[],
        }
    }

    /// Whether a builtin name stays viewable as its builtin kind even when it
    /// also carries an explicit, excluded declaration.
    pub fn builtins_override_declarations(self) -> bool {
        !matches!(self, PunningProfile::Strict)
    }
}

impl std::fmt::Display for PunningProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Medium => write!(f, "medium"),
            Self::Lax => write!(f, "lax"),
        }
    }
}

/// Configuration consumed by an [`OntModel`](crate::model::OntModel).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Punning profile.
    pub profile: PunningProfile,
    /// Exclusions added on top of the profile's own.
    pub extra_exclusions: Vec<[EntityKind; 2]>,
    /// Split a statement carrying several reifications into one axiom per
    /// reification when building the reference index.
    pub split_annotations: bool,
    /// Overrides the profile's builtin precedence rule when set.
    pub builtins_override_declarations: Option<bool>,
}

impl ModelConfig {
    /// Default configuration for `profile`.
    pub fn with_profile(profile: PunningProfile) -> Self {
        Self {
            profile,
            ..Default::default()
        }
    }

    /// Enable or disable annotation splitting.
    pub fn split_annotations(mut self, split: bool) -> Self {
        self.split_annotations = split;
        self
    }

    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Load a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), profile = %config.profile, "loaded model config");
        Ok(config)
    }

    /// The effective punning rules.
    pub fn punning_rules(&self) -> PunningRules {
        let mut rules = PunningRules::for_profile(self.profile);
        for [a, b] in &self.extra_exclusions {
            rules.exclude(*a, *b);
        }
        if let Some(flag) = self.builtins_override_declarations {
            rules.builtins_override = flag;
        }
        rules
    }
}

/// Resolved exclusion pairs plus the builtin precedence flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PunningRules {
    pairs: BTreeSet<(EntityKind, EntityKind)>,
    builtins_override: bool,
}

impl PunningRules {
    pub fn for_profile(profile: PunningProfile) -> Self {
        let mut rules = Self {
            pairs: BTreeSet::new(),
            builtins_override: profile.builtins_override_declarations(),
        };
        for (a, b) in profile.exclusions() {
            rules.exclude(*a, *b);
        }
        rules
    }

    /// Declare `a` and `b` mutually exclusive.
    pub fn exclude(&mut self, a: EntityKind, b: EntityKind) {
        if a != b {
            self.pairs.insert((a.min(b), a.max(b)));
        }
    }

    pub fn excludes(&self, a: EntityKind, b: EntityKind) -> bool {
        self.pairs.contains(&(a.min(b), a.max(b)))
    }

    /// Every kind that may not share a name with `kind`.
    pub fn excluded_for(&self, kind: EntityKind) -> Vec<EntityKind> {
        EntityKind::ALL
            .into_iter()
            .filter(|other| self.excludes(kind, *other))
            .collect()
    }

    pub fn builtins_override(&self) -> bool {
        self.builtins_override
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_profile_excludes_all_property_pairs() {
        let rules = PunningRules::for_profile(PunningProfile::Strict);
        assert!(rules.excludes(EntityKind::Class, EntityKind::Datatype));
        assert!(rules.excludes(EntityKind::Datatype, EntityKind::Class));
        assert!(rules.excludes(EntityKind::AnnotationProperty, EntityKind::ObjectProperty));
        assert!(!rules.excludes(EntityKind::Class, EntityKind::NamedIndividual));
        assert!(!rules.builtins_override());
    }

    #[test]
    fn medium_allows_annotation_property_punning() {
        let rules = PunningRules::for_profile(PunningProfile::Medium);
        assert!(rules.excludes(EntityKind::ObjectProperty, EntityKind::DataProperty));
        assert!(!rules.excludes(EntityKind::ObjectProperty, EntityKind::AnnotationProperty));
        assert_eq!(
            rules.excluded_for(EntityKind::ObjectProperty),
            vec![EntityKind::DataProperty]
        );
    }

    #[test]
    fn lax_excludes_nothing() {
        let rules = PunningRules::for_profile(PunningProfile::Lax);
        for a in EntityKind::ALL {
            assert!(rules.excluded_for(a).is_empty());
        }
    }

    #[test]
    fn parse_toml() {
        let config = ModelConfig::from_toml_str(
            r#"
            profile = "lax"
            split_annotations = true
            extra_exclusions = [["class", "named_individual"]]
            builtins_override_declarations = false
            "#,
        )
        .unwrap();
        assert_eq!(config.profile, PunningProfile::Lax);
        assert!(config.split_annotations);
        let rules = config.punning_rules();
        assert!(rules.excludes(EntityKind::NamedIndividual, EntityKind::Class));
        assert!(!rules.builtins_override());
    }

    #[test]
    fn empty_toml_is_default() {
        let config = ModelConfig::from_toml_str("").unwrap();
        assert_eq!(config, ModelConfig::default());
        assert_eq!(config.profile, PunningProfile::Strict);
    }

    #[test]
    fn unknown_profile_is_a_parse_error() {
        let err = ModelConfig::from_toml_str("profile = \"loose\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("model.toml");
        std::fs::write(&path, "profile = \"medium\"\n").unwrap();
        let config = ModelConfig::load(&path).unwrap();
        assert_eq!(config.profile, PunningProfile::Medium);

        let missing = ModelConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }
}
