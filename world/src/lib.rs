#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative arena state for the fish tank.
//!
//! The [`Arena`] owns every fish and food particle. Adapters mutate it only
//! through [`apply`] and observe it only through [`query`]. Entities never
//! reference the arena directly; during an update they borrow its habitat and
//! report back through [`Notice`] handling and the outgoing event buffer.

mod appearance;
mod fish;
mod food;
mod habitat;

use fishtank_core::{
    Boundary, Command, ConfigurationError, DestroyCause, Event, FishId, FishRequest, FoodId,
    GeometryError, Notice, Position, SpeciesCatalog, Tuning, WELCOME_BANNER,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::{fish::Fish, food::Food, habitat::Habitat};

const DEFAULT_FPS: u32 = 25;
const DEFAULT_SEED: u64 = 0x5eed_f157_7a4c_0b1d;

/// Parameters fixed for the lifetime of an arena.
#[derive(Clone, Debug, PartialEq)]
pub struct ArenaConfig {
    boundary: Boundary,
    fps: u32,
    seed: u64,
    tuning: Tuning,
}

impl ArenaConfig {
    /// Creates a configuration for the provided boundary with default pacing.
    #[must_use]
    pub fn new(boundary: Boundary) -> Self {
        Self {
            boundary,
            fps: DEFAULT_FPS,
            seed: DEFAULT_SEED,
            tuning: Tuning::default(),
        }
    }

    /// Overrides the frame rate used to derive idle timeouts.
    #[must_use]
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    /// Overrides the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Overrides the behaviour constants.
    #[must_use]
    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Boundary every entity must stay inside.
    #[must_use]
    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// Frames per second the arena is driven at.
    #[must_use]
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Seed for the arena's random source.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Behaviour constants.
    #[must_use]
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }
}

/// Represents the authoritative fish tank.
#[derive(Debug)]
pub struct Arena {
    banner: &'static str,
    catalog: SpeciesCatalog,
    habitat: Habitat,
    fish: Vec<Fish>,
    next_fish: u32,
    next_food: u32,
    tick_index: u64,
    paused: bool,
    running: bool,
}

impl Arena {
    /// Creates an empty arena.
    ///
    /// Fails when the boundary has no interior or the frame rate is zero.
    pub fn new(config: ArenaConfig, catalog: SpeciesCatalog) -> Result<Self, GeometryError> {
        let ArenaConfig {
            boundary,
            fps,
            seed,
            tuning,
        } = config;

        if boundary.is_degenerate() {
            return Err(GeometryError::DegenerateBoundary { boundary });
        }
        if fps == 0 {
            return Err(GeometryError::ZeroFrameRate);
        }

        info!(%boundary, fps, seed, species = catalog.len(), "arena created");
        Ok(Self {
            banner: WELCOME_BANNER,
            catalog,
            habitat: Habitat::new(boundary, ChaCha8Rng::seed_from_u64(seed), tuning, fps),
            fish: Vec::new(),
            next_fish: 0,
            next_food: 0,
            tick_index: 0,
            paused: false,
            running: true,
        })
    }

    /// Creates a fish from the catalog and places it inside the boundary.
    ///
    /// A requested position whose footprint is not contained is replaced by a
    /// uniformly sampled one.
    pub fn add_fish(
        &mut self,
        request: FishRequest,
        out_events: &mut Vec<Event>,
    ) -> Result<FishId, ConfigurationError> {
        let appearance = appearance::resolve(&self.catalog, &request, self.habitat.rng())?;
        let width = appearance.width();
        let span =
            i32::try_from(width).map_err(|_| ConfigurationError::FootprintTooWide { width })?;

        let requested = request
            .position
            .filter(|position| self.habitat.fits(*position, span));
        let position = match requested {
            Some(position) => position,
            None => self
                .habitat
                .sample_position(span)
                .ok_or(ConfigurationError::FootprintTooWide { width })?,
        };

        let id = FishId::new(self.next_fish);
        self.next_fish = self.next_fish.saturating_add(1);
        self.fish.push(Fish::new(id, appearance, position));
        debug!(fish = id.get(), species = %request.species, %position, "fish added");
        out_events.push(Event::FishAdded { fish: id, position });
        Ok(id)
    }

    /// Drops a food particle and offers it to every fish.
    ///
    /// Missing or uncontained positions are replaced by a sampled one.
    pub fn add_food(
        &mut self,
        position: Option<Position>,
        health: u32,
        out_events: &mut Vec<Event>,
    ) -> FoodId {
        let requested = position.filter(|position| self.habitat.bounds().contains(*position));
        let position = match requested {
            Some(position) => position,
            None => {
                let fallback = self.habitat.bounds().start().offset(1, 1);
                self.habitat.sample_position(0).unwrap_or(fallback)
            }
        };

        let id = FoodId::new(self.next_food);
        self.next_food = self.next_food.saturating_add(1);
        self.habitat.insert_food(Food::new(id, position, health));
        debug!(food = id.get(), %position, health, "food spawned");
        out_events.push(Event::FoodSpawned {
            food: id,
            position,
            health,
        });
        self.offer_food(id, out_events);
        id
    }

    /// Culls a fish. Unknown identifiers are ignored.
    pub fn remove_fish(&mut self, fish: FishId, out_events: &mut Vec<Event>) {
        let Some(index) = self.fish.iter().position(|candidate| candidate.id() == fish) else {
            return;
        };
        let _ = self.fish.remove(index);
        debug!(fish = fish.get(), "fish removed");
        out_events.push(Event::FishRemoved { fish });
    }

    /// Suspends or resumes ticking.
    pub fn set_paused(&mut self, paused: bool, out_events: &mut Vec<Event>) {
        if self.paused == paused {
            return;
        }
        self.paused = paused;
        out_events.push(Event::PauseChanged { paused });
    }

    /// Flags the arena as no longer running.
    pub fn shutdown(&mut self, out_events: &mut Vec<Event>) {
        if !self.running {
            return;
        }
        self.running = false;
        info!(tick = self.tick_index, "shutdown requested");
        out_events.push(Event::ShutdownRequested);
    }

    /// Shared wander target, sampled lazily for a shape `footprint_width`
    /// cells wide.
    pub fn wander_target(&mut self, footprint_width: i32) -> Position {
        self.habitat.wander_target(footprint_width)
    }

    /// Delivers a notice to the entities it concerns.
    pub fn notify(&mut self, notice: Notice, out_events: &mut Vec<Event>) {
        debug!(?notice, "notice delivered");
        match notice {
            Notice::FoodDestroyed { food } => {
                let _ = self.destroy_food(food, DestroyCause::Culled, out_events);
            }
            Notice::TargetReached { fish } => self.habitat.target_reached(fish, out_events),
            Notice::FoodAvailable { food } => self.offer_food(food, out_events),
        }
    }

    /// Runs one simulation step: food first, then fish in creation order.
    ///
    /// Food bitten down to zero is destroyed right after the fish that took
    /// the last bite, before the next fish moves. A fish never moves onto a
    /// fish that updated before it; it waits a tick instead.
    pub fn tick(&mut self, out_events: &mut Vec<Event>) {
        if self.paused {
            return;
        }
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });

        for (food, cause) in self.habitat.update_food() {
            let _ = self.destroy_food(food, cause, out_events);
        }

        for index in 0..self.fish.len() {
            let (ahead, rest) = self.fish.split_at_mut(index);
            if let Some(fish) = rest.first_mut() {
                fish.update(ahead, &mut self.habitat, out_events);
            }
            self.reap_depleted_food(out_events);
        }
    }

    fn offer_food(&mut self, food: FoodId, out_events: &mut Vec<Event>) {
        let Some(position) = self.habitat.food(food).map(Food::position) else {
            return;
        };
        for fish in &mut self.fish {
            fish.food_available(food, position, &self.habitat, out_events);
        }
    }

    fn reap_depleted_food(&mut self, out_events: &mut Vec<Event>) {
        for food in self.habitat.depleted_food() {
            let _ = self.destroy_food(food, DestroyCause::Eaten, out_events);
        }
    }

    /// Removes the food and tells every fish. Returns `false` when the food
    /// was already gone.
    fn destroy_food(
        &mut self,
        food: FoodId,
        cause: DestroyCause,
        out_events: &mut Vec<Event>,
    ) -> bool {
        if !self.habitat.remove_food(food) {
            return false;
        }
        debug!(food = food.get(), ?cause, "food destroyed");
        out_events.push(Event::FoodDestroyed { food, cause });
        for fish in &mut self.fish {
            fish.food_destroyed(food, &mut self.habitat, out_events);
        }
        true
    }
}

/// Applies the provided command to the arena, mutating state deterministically.
pub fn apply(arena: &mut Arena, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => arena.tick(out_events),
        Command::AddFish { request } => {
            let species = request.species.clone();
            if let Err(reason) = arena.add_fish(request, out_events) {
                warn!(%species, %reason, "fish request rejected");
                out_events.push(Event::FishRejected { species, reason });
            }
        }
        Command::AddFood { position, health } => {
            let _ = arena.add_food(position, health, out_events);
        }
        Command::RemoveFish { fish } => arena.remove_fish(fish, out_events),
        Command::SetPaused { paused } => arena.set_paused(paused, out_events),
        Command::Shutdown => arena.shutdown(out_events),
    }
}

/// Query functions that provide read-only access to the arena state.
pub mod query {
    use super::{Arena, Fish};
    use fishtank_core::{
        Boundary, FishId, FishSnapshot, FishView, FoodId, FoodSnapshot, FoodView, Position,
        SpeciesCatalog,
    };

    /// Retrieves the welcome banner that adapters may display.
    #[must_use]
    pub fn welcome_banner(arena: &Arena) -> &'static str {
        arena.banner
    }

    /// Boundary every entity stays inside.
    #[must_use]
    pub fn boundary(arena: &Arena) -> Boundary {
        *arena.habitat.bounds()
    }

    /// Frames per second the arena was configured with.
    #[must_use]
    pub fn fps(arena: &Arena) -> u32 {
        arena.habitat.fps()
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(arena: &Arena) -> u64 {
        arena.tick_index
    }

    /// Reports whether ticks are currently ignored.
    #[must_use]
    pub fn is_paused(arena: &Arena) -> bool {
        arena.paused
    }

    /// Reports whether the arena has not been asked to shut down.
    #[must_use]
    pub fn is_running(arena: &Arena) -> bool {
        arena.running
    }

    /// Currently cached wander target, if one has been sampled.
    #[must_use]
    pub fn wander_target(arena: &Arena) -> Option<Position> {
        arena.habitat.cached_wander_target()
    }

    /// Species the arena can create fish from.
    #[must_use]
    pub fn catalog(arena: &Arena) -> &SpeciesCatalog {
        &arena.catalog
    }

    /// Captures a read-only view of every fish.
    #[must_use]
    pub fn fish_view(arena: &Arena) -> FishView {
        FishView::from_snapshots(arena.fish.iter().map(|fish| fish.snapshot()).collect())
    }

    /// Captures a read-only view of every food particle.
    #[must_use]
    pub fn food_view(arena: &Arena) -> FoodView {
        FoodView::from_snapshots(arena.habitat.iter_food().map(|food| food.snapshot()).collect())
    }

    /// Looks up a single fish.
    #[must_use]
    pub fn fish(arena: &Arena, id: FishId) -> Option<FishSnapshot> {
        arena
            .fish
            .iter()
            .find(|fish| fish.id() == id)
            .map(|fish| fish.snapshot())
    }

    /// Looks up a single food particle.
    #[must_use]
    pub fn food(arena: &Arena, id: FoodId) -> Option<FoodSnapshot> {
        arena.habitat.food(id).map(|food| food.snapshot())
    }

    /// First fish, in update order, whose footprint covers the position.
    #[must_use]
    pub fn fish_at(arena: &Arena, position: Position) -> Option<FishId> {
        arena
            .fish
            .iter()
            .find(|fish| fish.covers(position))
            .map(Fish::id)
    }
}
