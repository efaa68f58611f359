//! Food particles sinking through the tank.

use fishtank_core::{Boundary, Containment, DestroyCause, FoodId, FoodSnapshot, Position, Tuning};
use rand::Rng;

/// Result of a single food update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FoodStatus {
    Alive,
    Expired(DestroyCause),
}

#[derive(Clone, Debug)]
pub(crate) struct Food {
    id: FoodId,
    position: Position,
    health: u32,
    idle_frames: u32,
    stopped: bool,
    cadence: u32,
}

impl Food {
    pub(crate) fn new(id: FoodId, position: Position, health: u32) -> Self {
        Self {
            id,
            position,
            health,
            idle_frames: 0,
            stopped: false,
            cadence: 0,
        }
    }

    pub(crate) fn id(&self) -> FoodId {
        self.id
    }

    pub(crate) fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn health(&self) -> u32 {
        self.health
    }

    /// Removes one bite and returns the health left.
    pub(crate) fn take_bite(&mut self) -> u32 {
        self.health = self.health.saturating_sub(1);
        self.health
    }

    /// Advances the particle by one tick.
    ///
    /// Idle time only accrues once the particle has stopped; it drifts on every
    /// `food_drift_cadence`-th update until then.
    pub(crate) fn update<R: Rng>(
        &mut self,
        bounds: &Boundary,
        rng: &mut R,
        tuning: &Tuning,
        fps: u32,
    ) -> FoodStatus {
        if self.health == 0 {
            return FoodStatus::Expired(DestroyCause::Eaten);
        }

        if self.stopped {
            self.idle_frames = self.idle_frames.saturating_add(1);
            let limit = fps.saturating_mul(tuning.food_idle_seconds);
            if self.idle_frames > limit {
                return FoodStatus::Expired(DestroyCause::Stale);
            }
            return FoodStatus::Alive;
        }

        self.cadence += 1;
        if self.cadence < tuning.food_drift_cadence.max(1) {
            return FoodStatus::Alive;
        }
        self.cadence = 0;
        self.drift(bounds, rng);
        FoodStatus::Alive
    }

    fn drift<R: Rng>(&mut self, bounds: &Boundary, rng: &mut R) {
        let candidate = self.position.offset(rng.gen_range(-1..=1), 1);
        let landing = match bounds.classify(candidate) {
            Containment::Inside => Some(candidate),
            // walls deflect the particle straight down
            Containment::OutsideX => {
                let sinking = self.position.offset(0, 1);
                bounds.contains(sinking).then_some(sinking)
            }
            Containment::OutsideY | Containment::OutsideXY => None,
        };

        match landing {
            Some(position) => self.position = position,
            None => self.stopped = true,
        }
    }

    pub(crate) fn snapshot(&self) -> FoodSnapshot {
        FoodSnapshot {
            id: self.id,
            position: self.position,
            health: self.health,
            stopped: self.stopped,
            idle_frames: self.idle_frames,
        }
    }
}
