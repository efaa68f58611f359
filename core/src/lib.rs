#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the fishtank engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative arena, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the arena executes those commands via its
//! `apply` entry point, and then reports [`Event`] values describing what
//! happened. Entities inside the arena talk to each other through [`Notice`]
//! values relayed by the arena itself.

mod catalog;
mod geometry;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use catalog::{SpeciesCatalog, SpeciesDefinition, SpecialDefinition, VariantDefinition};
pub use geometry::{Boundary, Containment, Heading, Position, Step};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to the fish tank. <><";

/// Default capture radius within which a fish notices newly spawned food.
pub const DEFAULT_CAPTURE_RADIUS: f64 = 20.0;
/// Default probability that an idle fish locks onto the nearest food.
pub const DEFAULT_FOLLOW_CHANCE: f64 = 1.0 / 3.0;
/// Default probability that a bite advances the fish to its next stage.
pub const DEFAULT_AGE_UP_CHANCE: f64 = 0.1;
/// Default probability that losing a food target triggers an immediate re-plan.
pub const DEFAULT_REPLAN_ON_LOSS_CHANCE: f64 = 0.5;
/// Default probability that an idle segment flips heading on alternate steps.
pub const DEFAULT_IDLE_TURN_CHANCE: f64 = 0.5;
/// Default distance between a fish's mouth and food that still counts as a bite.
pub const DEFAULT_FEEDING_DISTANCE: f64 = 2.0;
/// Default number of updates between food drift steps.
pub const DEFAULT_FOOD_DRIFT_CADENCE: u32 = 3;
/// Default number of seconds stopped food lingers before dissolving.
pub const DEFAULT_FOOD_IDLE_SECONDS: u32 = 10;

/// Commands that express all permissible arena mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation by exactly one tick.
    Tick,
    /// Requests a new fish.
    AddFish {
        /// Appearance and placement of the requested fish.
        request: FishRequest,
    },
    /// Drops a food particle into the arena.
    AddFood {
        /// Requested position; a random in-bounds position is chosen when absent
        /// or when the requested one is not contained.
        position: Option<Position>,
        /// Number of bites the particle survives.
        health: u32,
    },
    /// Culls a fish from the arena.
    RemoveFish {
        /// Identifier of the fish to remove.
        fish: FishId,
    },
    /// Suspends or resumes ticking.
    SetPaused {
        /// Whether ticks should be ignored.
        paused: bool,
    },
    /// Asks the driving loop to stop after the current command batch.
    Shutdown,
}

/// Parameters describing a fish creation request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FishRequest {
    /// Species name as listed in the catalog.
    pub species: String,
    /// Colour variant; chosen by spawn weight when absent.
    pub variant: Option<String>,
    /// Name of a special individual whose overrides apply.
    pub name: Option<String>,
    /// Index into the species' skin stages.
    pub age: usize,
    /// Requested anchor position; resampled when absent or not contained.
    pub position: Option<Position>,
}

impl FishRequest {
    /// Creates a request for a newborn fish of the provided species.
    #[must_use]
    pub fn new(species: impl Into<String>) -> Self {
        Self {
            species: species.into(),
            variant: None,
            name: None,
            age: 0,
            position: None,
        }
    }

    /// Selects an explicit colour variant.
    #[must_use]
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    /// Names the fish, applying any matching special overrides.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the starting age.
    #[must_use]
    pub fn with_age(mut self, age: usize) -> Self {
        self.age = age;
        self
    }

    /// Requests a starting anchor position.
    #[must_use]
    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }
}

/// Events reported by the arena after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation advanced by one tick.
    TimeAdvanced {
        /// Index of the tick that just completed, starting at one.
        tick: u64,
    },
    /// Announces that the pause flag changed.
    PauseChanged {
        /// Whether ticks are now ignored.
        paused: bool,
    },
    /// Confirms that a fish joined the arena.
    FishAdded {
        /// Identifier assigned to the fish.
        fish: FishId,
        /// Anchor position after placement.
        position: Position,
    },
    /// Reports that a fish creation request was rejected.
    FishRejected {
        /// Species named by the rejected request.
        species: String,
        /// Specific reason the request failed.
        reason: ConfigurationError,
    },
    /// Confirms that a fish was culled.
    FishRemoved {
        /// Identifier of the removed fish.
        fish: FishId,
    },
    /// Announces that a fish advanced to its next skin stage.
    FishGrew {
        /// Identifier of the fish that grew.
        fish: FishId,
        /// Stage index after growing.
        age: usize,
    },
    /// Announces that a fish started chasing a food particle.
    FollowStarted {
        /// Identifier of the chasing fish.
        fish: FishId,
        /// Identifier of the chased food.
        food: FoodId,
    },
    /// Confirms that food entered the arena.
    FoodSpawned {
        /// Identifier assigned to the food.
        food: FoodId,
        /// Position after placement.
        position: Position,
        /// Starting health.
        health: u32,
    },
    /// Reports a single bite.
    FoodEaten {
        /// Identifier of the bitten food.
        food: FoodId,
        /// Identifier of the feeding fish.
        fish: FishId,
        /// Health remaining after the bite.
        remaining: u32,
    },
    /// Confirms that food left the arena.
    FoodDestroyed {
        /// Identifier of the destroyed food.
        food: FoodId,
        /// Why the food was destroyed.
        cause: DestroyCause,
    },
    /// Reports that a fish arrived at the shared wander target.
    TargetReached {
        /// Identifier of the arriving fish.
        fish: FishId,
    },
    /// Acknowledges a shutdown request.
    ShutdownRequested,
}

/// Reasons food leaves the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DestroyCause {
    /// Health reached zero.
    Eaten,
    /// The particle stopped moving and sat idle past its time limit.
    Stale,
    /// Removed by an explicit notice from outside the tick loop.
    Culled,
}

/// Messages relayed between entities by the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Notice {
    /// A food particle left the arena; fish chasing it must let go.
    FoodDestroyed {
        /// Identifier of the destroyed food.
        food: FoodId,
    },
    /// A fish consumed the shared wander target.
    TargetReached {
        /// Identifier of the arriving fish.
        fish: FishId,
    },
    /// A food particle was spawned and may be chased.
    FoodAvailable {
        /// Identifier of the new food.
        food: FoodId,
    },
}

/// Unique identifier assigned to a fish.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FishId(u32);

impl FishId {
    /// Creates a new fish identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a food particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FoodId(u32);

impl FoodId {
    /// Creates a new food identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Reasons a fish creation request may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum ConfigurationError {
    /// The catalog has no species with this name.
    #[error("unknown species `{species}`")]
    UnknownSpecies {
        /// Requested species.
        species: String,
    },
    /// The species has no variant with this name.
    #[error("species `{species}` has no variant `{variant}`")]
    UnknownVariant {
        /// Requested species.
        species: String,
        /// Requested variant.
        variant: String,
    },
    /// The species has no special with this name.
    #[error("species `{species}` has no special named `{name}`")]
    UnknownSpecial {
        /// Requested species.
        species: String,
        /// Requested special name.
        name: String,
    },
    /// The requested age has no matching skin stage.
    #[error("species `{species}` has {stages} stages, age {age} is out of range")]
    AgeOutOfRange {
        /// Requested species.
        species: String,
        /// Requested age.
        age: usize,
        /// Number of stages available.
        stages: usize,
    },
    /// The resolved appearance has no skin stages at all.
    #[error("species `{species}` defines no skin stages")]
    MissingStages {
        /// Requested species.
        species: String,
    },
    /// The skin is too wide to fit anywhere inside the arena.
    #[error("a skin {width} cells wide does not fit inside the arena")]
    FootprintTooWide {
        /// Width of the resolved skin.
        width: usize,
    },
}

/// Geometry faults raised while configuring the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum GeometryError {
    /// The boundary admits no interior position.
    #[error("boundary {boundary} has no interior")]
    DegenerateBoundary {
        /// Offending boundary.
        boundary: Boundary,
    },
    /// Idle timeouts cannot be derived from a zero frame rate.
    #[error("frame rate must be positive")]
    ZeroFrameRate,
}

/// Named behaviour constants; every field may be overridden per arena.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Radius within which a fish adopts newly spawned food.
    pub capture_radius: f64,
    /// Probability that a fish choosing a new goal chases the nearest food.
    pub follow_chance: f64,
    /// Probability that a bite advances the fish to its next stage.
    pub age_up_chance: f64,
    /// Probability that losing a food target triggers an immediate re-plan.
    pub replan_on_loss_chance: f64,
    /// Probability that an idle segment flips heading on alternate steps.
    pub idle_turn_chance: f64,
    /// Maximum mouth-to-food distance that still counts as a bite.
    pub feeding_distance: f64,
    /// Fewest repeats of the current position in an idle segment.
    pub idle_repeats_min: u32,
    /// Most repeats of the current position in an idle segment.
    pub idle_repeats_max: u32,
    /// Number of food updates between drift steps.
    pub food_drift_cadence: u32,
    /// Seconds stopped food lingers before dissolving.
    pub food_idle_seconds: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            capture_radius: DEFAULT_CAPTURE_RADIUS,
            follow_chance: DEFAULT_FOLLOW_CHANCE,
            age_up_chance: DEFAULT_AGE_UP_CHANCE,
            replan_on_loss_chance: DEFAULT_REPLAN_ON_LOSS_CHANCE,
            idle_turn_chance: DEFAULT_IDLE_TURN_CHANCE,
            feeding_distance: DEFAULT_FEEDING_DISTANCE,
            idle_repeats_min: 2,
            idle_repeats_max: 5,
            food_drift_cadence: DEFAULT_FOOD_DRIFT_CADENCE,
            food_idle_seconds: DEFAULT_FOOD_IDLE_SECONDS,
        }
    }
}

/// Immutable representation of a single fish used for queries.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FishSnapshot {
    /// Unique identifier assigned to the fish.
    pub id: FishId,
    /// Species name.
    pub species: String,
    /// Resolved colour variant, if any.
    pub variant: Option<String>,
    /// Special name, if any.
    pub name: Option<String>,
    /// Current skin stage index.
    pub age: usize,
    /// Anchor position (left edge of the skin).
    pub position: Position,
    /// Current facing.
    pub heading: Heading,
    /// Skin glyphs as they should be drawn for the current heading.
    pub skin: String,
    /// One colour index per glyph of `skin`, aligned left to right.
    pub pigment: Vec<u8>,
    /// Span occupied by the skin.
    pub footprint: Boundary,
    /// Food currently chased, if any.
    pub follow: Option<FoodId>,
    /// Wander target the fish is travelling toward, if any.
    pub wander_goal: Option<Position>,
    /// Number of queued path steps.
    pub queued_steps: usize,
}

/// Immutable representation of a single food particle used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FoodSnapshot {
    /// Unique identifier assigned to the food.
    pub id: FoodId,
    /// Current position.
    pub position: Position,
    /// Bites remaining.
    pub health: u32,
    /// Whether the particle has stopped drifting.
    pub stopped: bool,
    /// Ticks spent stopped.
    pub idle_frames: u32,
}

/// Read-only snapshot describing all fish in the arena.
#[derive(Clone, Debug, Default)]
pub struct FishView {
    snapshots: Vec<FishSnapshot>,
}

impl FishView {
    /// Creates a new fish view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<FishSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured fish snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &FishSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured fish.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no fish were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<FishSnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot describing all food in the arena.
#[derive(Clone, Debug, Default)]
pub struct FoodView {
    snapshots: Vec<FoodSnapshot>,
}

impl FoodView {
    /// Creates a new food view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<FoodSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured food snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &FoodSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured food particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no food was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<FoodSnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Boundary, ConfigurationError, FishRequest, FoodId, Position, SpeciesCatalog,
        SpeciesDefinition, Tuning, VariantDefinition,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn boundary_round_trips_through_bincode() {
        assert_round_trip(&Boundary::new(Position::new(1, 1), Position::new(40, 20)));
    }

    #[test]
    fn fish_request_round_trips_through_bincode() {
        let request = FishRequest::new("Molly")
            .with_variant("golden_panda")
            .with_age(1)
            .at(Position::new(4, 4));
        assert_round_trip(&request);
    }

    #[test]
    fn food_id_round_trips_through_bincode() {
        assert_round_trip(&FoodId::new(7));
    }

    #[test]
    fn tuning_fills_missing_fields_with_defaults() {
        let tuning: Tuning =
            serde_json::from_str(r#"{ "follow_chance": 1.0 }"#).expect("parse tuning");
        assert!((tuning.follow_chance - 1.0).abs() < f64::EPSILON);
        assert!((tuning.capture_radius - 20.0).abs() < f64::EPSILON);
        assert_eq!(tuning.food_drift_cadence, 3);
        assert_eq!(tuning.food_idle_seconds, 10);
    }

    #[test]
    fn catalog_deserializes_from_species_map() {
        let json = r#"{
            "Molly": {
                "stages": [">->", "><'>"],
                "variants": { "golden_panda": { "chance": 15, "pigment": [214, 220] } }
            }
        }"#;
        let catalog: SpeciesCatalog = serde_json::from_str(json).expect("parse catalog");
        let expected = SpeciesCatalog::new().with_species(
            "Molly",
            SpeciesDefinition::new([">->", "><'>"], Vec::new())
                .with_variant("golden_panda", VariantDefinition::new(15, vec![214, 220])),
        );
        assert_eq!(catalog, expected);
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["Molly"]);
    }

    #[test]
    fn configuration_errors_describe_the_request() {
        let error = ConfigurationError::UnknownVariant {
            species: "Molly".to_owned(),
            variant: "plaid".to_owned(),
        };
        assert_eq!(error.to_string(), "species `Molly` has no variant `plaid`");
    }
}
