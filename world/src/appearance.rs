//! Resolution of catalog data into a fish's skin and pigment.

use fishtank_core::{ConfigurationError, FishRequest, Heading, SpeciesCatalog, SpeciesDefinition};
use rand::{
    distributions::{Distribution, WeightedIndex},
    seq::SliceRandom,
    Rng,
};

/// Glyph pairs that swap when a skin is mirrored.
const MIRRORED_PAIRS: [(char, char); 7] = [
    ('<', '>'),
    ('[', ']'),
    ('{', '}'),
    ('(', ')'),
    ('/', '\\'),
    ('d', 'b'),
    ('q', 'p'),
];

/// Everything a fish needs from the catalog, resolved once at creation.
#[derive(Clone, Debug)]
pub(crate) struct Appearance {
    pub(crate) species: String,
    pub(crate) variant: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) stages: Vec<String>,
    pub(crate) pigment: Vec<u8>,
    pub(crate) age: usize,
}

impl Appearance {
    /// Width of the skin at the resolved age.
    pub(crate) fn width(&self) -> usize {
        self.stages
            .get(self.age)
            .map_or(0, |stage| stage.chars().count())
    }
}

/// Looks the request up in the catalog.
///
/// Unknown species, variants or special names and ages without a skin stage
/// are rejected. A missing variant is drawn by spawn weight; pigment is
/// sampled from the winning palette once per glyph column.
pub(crate) fn resolve<R: Rng>(
    catalog: &SpeciesCatalog,
    request: &FishRequest,
    rng: &mut R,
) -> Result<Appearance, ConfigurationError> {
    let species = request.species.clone();
    let definition = catalog
        .get(&species)
        .ok_or_else(|| ConfigurationError::UnknownSpecies {
            species: species.clone(),
        })?;

    let special = match &request.name {
        Some(name) => Some(definition.specials.get(name).ok_or_else(|| {
            ConfigurationError::UnknownSpecial {
                species: species.clone(),
                name: name.clone(),
            }
        })?),
        None => None,
    };

    let variant = match &request.variant {
        Some(variant) => {
            if !definition.variants.contains_key(variant) {
                return Err(ConfigurationError::UnknownVariant {
                    species,
                    variant: variant.clone(),
                });
            }
            Some(variant.clone())
        }
        None => pick_variant(definition, rng),
    };

    let stages = special
        .and_then(|special| special.stages.clone())
        .unwrap_or_else(|| definition.stages.clone());
    if stages.is_empty() {
        return Err(ConfigurationError::MissingStages { species });
    }
    if request.age >= stages.len() {
        return Err(ConfigurationError::AgeOutOfRange {
            species,
            age: request.age,
            stages: stages.len(),
        });
    }

    let variant_palette = variant
        .as_ref()
        .and_then(|name| definition.variants.get(name))
        .map(|variant| variant.pigment.as_slice())
        .filter(|palette| !palette.is_empty());
    let palette = special
        .and_then(|special| special.pigment.as_deref())
        .or(variant_palette)
        .unwrap_or(definition.pigment.as_slice());

    let widest = stages
        .iter()
        .map(|stage| stage.chars().count())
        .max()
        .unwrap_or(0);
    let pigment = (0..widest)
        .filter_map(|_| palette.choose(rng).copied())
        .collect();

    Ok(Appearance {
        species,
        variant,
        name: request.name.clone(),
        stages,
        pigment,
        age: request.age,
    })
}

fn pick_variant<R: Rng>(definition: &SpeciesDefinition, rng: &mut R) -> Option<String> {
    let weights: Vec<u32> = definition
        .variants
        .values()
        .map(|variant| variant.chance)
        .collect();
    let distribution = WeightedIndex::new(&weights).ok()?;
    definition
        .variants
        .keys()
        .nth(distribution.sample(rng))
        .cloned()
}

/// Returns the skin and pigment as they should be drawn for `heading`.
///
/// Skins are authored facing right. Facing left mirrors the glyphs and
/// reverses the pigment so every colour stays on its glyph.
pub(crate) fn dress(skin: &str, pigment: &[u8], heading: Heading) -> (String, Vec<u8>) {
    let width = skin.chars().count();
    let colours = pigment.iter().copied().take(width);
    match heading {
        Heading::Right => (skin.to_owned(), colours.collect()),
        Heading::Left => (mirror_skin(skin), colours.rev().collect()),
    }
}

fn mirror_skin(skin: &str) -> String {
    skin.chars().rev().map(mirror_glyph).collect()
}

fn mirror_glyph(glyph: char) -> char {
    MIRRORED_PAIRS
        .iter()
        .find_map(|&(open, close)| {
            if glyph == open {
                Some(close)
            } else if glyph == close {
                Some(open)
            } else {
                None
            }
        })
        .unwrap_or(glyph)
}
