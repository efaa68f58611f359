//! Species definitions consumed when fish are created or grow.
//!
//! The catalog is plain data. Adapters decide where it comes from (an embedded
//! default, a JSON file on disk); the world only reads it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Immutable set of species keyed by name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesCatalog {
    species: BTreeMap<String, SpeciesDefinition>,
}

impl SpeciesCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the catalog extended with the provided species.
    #[must_use]
    pub fn with_species(mut self, name: impl Into<String>, definition: SpeciesDefinition) -> Self {
        self.insert(name, definition);
        self
    }

    /// Inserts or replaces a species definition.
    pub fn insert(&mut self, name: impl Into<String>, definition: SpeciesDefinition) {
        let _ = self.species.insert(name.into(), definition);
    }

    /// Looks up a species by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SpeciesDefinition> {
        self.species.get(name)
    }

    /// Species names in deterministic (lexicographic) order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.species.keys().map(String::as_str)
    }

    /// Number of species in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.species.len()
    }

    /// Reports whether the catalog defines no species.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}

/// Appearance data shared by every fish of one species.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesDefinition {
    /// Skin glyphs indexed by age, authored facing right.
    pub stages: Vec<String>,
    /// Palette used when no variant applies.
    #[serde(default)]
    pub pigment: Vec<u8>,
    /// Colour variants keyed by name.
    #[serde(default)]
    pub variants: BTreeMap<String, VariantDefinition>,
    /// Named individuals that override the species defaults.
    #[serde(default)]
    pub specials: BTreeMap<String, SpecialDefinition>,
}

impl SpeciesDefinition {
    /// Creates a definition from its skin stages and default palette.
    #[must_use]
    pub fn new<S>(stages: impl IntoIterator<Item = S>, pigment: Vec<u8>) -> Self
    where
        S: Into<String>,
    {
        Self {
            stages: stages.into_iter().map(Into::into).collect(),
            pigment,
            variants: BTreeMap::new(),
            specials: BTreeMap::new(),
        }
    }

    /// Returns the definition extended with a colour variant.
    #[must_use]
    pub fn with_variant(mut self, name: impl Into<String>, variant: VariantDefinition) -> Self {
        let _ = self.variants.insert(name.into(), variant);
        self
    }

    /// Returns the definition extended with a named special.
    #[must_use]
    pub fn with_special(mut self, name: impl Into<String>, special: SpecialDefinition) -> Self {
        let _ = self.specials.insert(name.into(), special);
        self
    }
}

/// Colour variant of a species.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantDefinition {
    /// Relative spawn weight used when no variant is requested.
    #[serde(default)]
    pub chance: u32,
    /// Palette the fish's pigment is sampled from.
    #[serde(default)]
    pub pigment: Vec<u8>,
}

impl VariantDefinition {
    /// Creates a variant with the provided spawn weight and palette.
    #[must_use]
    pub fn new(chance: u32, pigment: Vec<u8>) -> Self {
        Self { chance, pigment }
    }
}

/// Overrides applied to a named individual.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialDefinition {
    /// Replacement skin stages.
    #[serde(default)]
    pub stages: Option<Vec<String>>,
    /// Replacement palette.
    #[serde(default)]
    pub pigment: Option<Vec<u8>>,
}
