//! Arena state that fish may consult or touch while they update.
//!
//! Fish never hold a pointer back to the arena. Instead the arena lends them
//! this habitat for the duration of an update: the boundary, the live food,
//! the shared wander target and the random source.

use fishtank_core::{Boundary, DestroyCause, Event, FishId, FoodId, Position, Tuning};
use fishtank_system_pathing::PathPlanner;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::food::{Food, FoodStatus};

#[derive(Debug)]
pub(crate) struct Habitat {
    bounds: Boundary,
    food: Vec<Food>,
    wander_target: Option<Position>,
    rng: ChaCha8Rng,
    tuning: Tuning,
    fps: u32,
}

impl Habitat {
    pub(crate) fn new(bounds: Boundary, rng: ChaCha8Rng, tuning: Tuning, fps: u32) -> Self {
        Self {
            bounds,
            food: Vec::new(),
            wander_target: None,
            rng,
            tuning,
            fps,
        }
    }

    pub(crate) fn bounds(&self) -> &Boundary {
        &self.bounds
    }

    pub(crate) fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub(crate) fn fps(&self) -> u32 {
        self.fps
    }

    pub(crate) fn planner(&self) -> PathPlanner {
        PathPlanner::new(self.bounds)
    }

    pub(crate) fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Rolls a probability, clamping out-of-range tuning values.
    pub(crate) fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability.clamp(0.0, 1.0))
    }

    /// Reports whether a shape anchored at `anchor` fits strictly inside.
    pub(crate) fn fits(&self, anchor: Position, footprint_width: i32) -> bool {
        self.bounds.contains(anchor) && self.bounds.contains(anchor.offset(footprint_width, 0))
    }

    /// Draws anchors until one fits a shape `footprint_width` cells wide.
    ///
    /// Candidates come from the interior inset by the width on the trailing
    /// edge, so the first draw always fits. Returns `None` when the shape is
    /// wider than the interior.
    pub(crate) fn sample_position(&mut self, footprint_width: i32) -> Option<Position> {
        let columns = self.bounds.interior_columns(footprint_width)?;
        let rows = self.bounds.interior_rows()?;
        loop {
            let candidate = Position::new(
                self.rng.gen_range(columns.clone()),
                self.rng.gen_range(rows.clone()),
            );
            if self.fits(candidate, footprint_width) {
                return Some(candidate);
            }
        }
    }

    /// Shared destination for fish with nothing better to do.
    ///
    /// The target is cached until someone reports reaching it, so every fish
    /// asking in between swims toward the same spot.
    pub(crate) fn wander_target(&mut self, footprint_width: i32) -> Position {
        if let Some(target) = self.wander_target {
            return target;
        }
        let fallback = self.bounds.start().offset(1, 1);
        let target = self
            .sample_position(footprint_width)
            .or_else(|| self.sample_position(0))
            .unwrap_or(fallback);
        debug!(%target, "sampled new wander target");
        self.wander_target = Some(target);
        target
    }

    pub(crate) fn cached_wander_target(&self) -> Option<Position> {
        self.wander_target
    }

    pub(crate) fn target_reached(&mut self, fish: FishId, out: &mut Vec<Event>) {
        self.wander_target = None;
        out.push(Event::TargetReached { fish });
    }

    pub(crate) fn food(&self, id: FoodId) -> Option<&Food> {
        self.food.iter().find(|food| food.id() == id)
    }

    pub(crate) fn food_mut(&mut self, id: FoodId) -> Option<&mut Food> {
        self.food.iter_mut().find(|food| food.id() == id)
    }

    pub(crate) fn iter_food(&self) -> impl Iterator<Item = &Food> {
        self.food.iter()
    }

    pub(crate) fn insert_food(&mut self, food: Food) {
        self.food.push(food);
    }

    pub(crate) fn remove_food(&mut self, id: FoodId) -> bool {
        let Some(index) = self.food.iter().position(|food| food.id() == id) else {
            return false;
        };
        let _ = self.food.remove(index);
        true
    }

    /// Nearest food that still has bites left.
    pub(crate) fn nearest_food(&self, from: Position) -> Option<(FoodId, Position)> {
        self.food
            .iter()
            .filter(|food| food.health() > 0)
            .map(|food| (food.id(), food.position()))
            .min_by(|(_, a), (_, b)| from.distance_to(*a).total_cmp(&from.distance_to(*b)))
    }

    /// Food whose health was bitten down to zero.
    pub(crate) fn depleted_food(&self) -> Vec<FoodId> {
        self.food
            .iter()
            .filter(|food| food.health() == 0)
            .map(Food::id)
            .collect()
    }

    /// Updates every particle and reports the ones that expired.
    pub(crate) fn update_food(&mut self) -> Vec<(FoodId, DestroyCause)> {
        let Self {
            bounds,
            food,
            rng,
            tuning,
            fps,
            ..
        } = self;

        let mut expired = Vec::new();
        for particle in food.iter_mut() {
            if let FoodStatus::Expired(cause) = particle.update(bounds, rng, tuning, *fps) {
                expired.push((particle.id(), cause));
            }
        }
        expired
    }
}
