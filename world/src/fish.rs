//! Fish state machine: wandering, idling, following and eating.

use std::collections::VecDeque;

use fishtank_core::{Boundary, Event, FishId, FishSnapshot, FoodId, Heading, Position, Step};
use rand::Rng;
use tracing::debug;

use crate::{
    appearance::{self, Appearance},
    habitat::Habitat,
};

#[derive(Clone, Debug)]
pub(crate) struct Fish {
    id: FishId,
    appearance: Appearance,
    position: Position,
    heading: Heading,
    footprint: Boundary,
    path: VecDeque<Step>,
    follow: Option<FoodId>,
    wander_goal: Option<Position>,
}

impl Fish {
    pub(crate) fn new(id: FishId, appearance: Appearance, position: Position) -> Self {
        let width = glyph_width(appearance.width());
        Self {
            id,
            appearance,
            position,
            heading: Heading::default(),
            footprint: Boundary::new(position, position.offset(width, 0)),
            path: VecDeque::new(),
            follow: None,
            wander_goal: None,
        }
    }

    pub(crate) fn id(&self) -> FishId {
        self.id
    }

    fn width(&self) -> i32 {
        glyph_width(self.appearance.width())
    }

    /// Reports whether `position` lies on the footprint, both ends included.
    pub(crate) fn covers(&self, position: Position) -> bool {
        let (start, end) = (self.footprint.start(), self.footprint.end());
        position.y() == start.y() && (start.x()..=end.x()).contains(&position.x())
    }

    /// Advances the fish by one tick.
    ///
    /// An exhausted path triggers a fresh goal and a second attempt, so every
    /// tick either moves, idles, turns, waits or eats. `ahead` holds the fish
    /// that updated earlier this tick; the fish waits rather than move onto
    /// one of them.
    pub(crate) fn update(
        &mut self,
        ahead: &[Fish],
        habitat: &mut Habitat,
        out: &mut Vec<Event>,
    ) {
        if self.advance(ahead, habitat, out) {
            return;
        }
        self.choose_goal(habitat, out);
        let _ = self.advance(ahead, habitat, out);
    }

    fn advance(&mut self, ahead: &[Fish], habitat: &mut Habitat, out: &mut Vec<Event>) -> bool {
        if let Some(food) = self.follow {
            let target = habitat
                .food(food)
                .filter(|particle| particle.health() > 0)
                .map(|particle| particle.position());
            match target {
                None => {
                    self.follow = None;
                    self.path.clear();
                }
                Some(target) => {
                    if self.within_reach(target, habitat.tuning().feeding_distance) {
                        self.feed(food, target, habitat, out);
                        return true;
                    }
                    let facing = Heading::between(self.position, target);
                    let anchor = self.approach(target, facing, habitat.bounds());
                    self.path = habitat
                        .planner()
                        .plan(self.position, anchor, self.width())
                        .into();
                    // the head of a fresh route is where the fish already is
                    let _ = self.path.pop_front();
                    if self.path.is_empty() {
                        self.heading = facing;
                        return true;
                    }
                }
            }
        }

        let Some(step) = self.path.front().copied() else {
            return false;
        };
        if step.position != self.position
            && ahead.iter().any(|other| other.covers(step.position))
        {
            return true;
        }
        let _ = self.path.pop_front();
        self.take_step(step);
        true
    }

    /// Anchor from which the mouth meets `food` while facing it, kept inside
    /// the columns the skin fits in.
    fn approach(&self, food: Position, facing: Heading, bounds: &Boundary) -> Position {
        let width = self.width();
        let x = match facing {
            Heading::Right => food.x() - (width - 1),
            Heading::Left => food.x(),
        };
        let x = bounds
            .interior_columns(width)
            .map_or(x, |columns| x.clamp(*columns.start(), *columns.end()));
        Position::new(x, food.y())
    }

    fn within_reach(&self, target: Position, feeding_distance: f64) -> bool {
        let mouth = match self.heading {
            Heading::Right => self.position.offset(self.width() - 1, 0),
            Heading::Left => self.position,
        };
        mouth.y() == target.y() && mouth.distance_to(target) <= feeding_distance
    }

    fn feed(&mut self, food: FoodId, target: Position, habitat: &mut Habitat, out: &mut Vec<Event>) {
        let Some(particle) = habitat.food_mut(food) else {
            return;
        };
        let remaining = particle.take_bite();
        out.push(Event::FoodEaten {
            food,
            fish: self.id,
            remaining,
        });

        let age_up_chance = habitat.tuning().age_up_chance;
        if habitat.chance(age_up_chance) {
            self.grow(target, habitat, out);
        }
    }

    fn grow(&mut self, target: Position, habitat: &Habitat, out: &mut Vec<Event>) {
        let next = self.appearance.age + 1;
        let Some(stage) = self.appearance.stages.get(next) else {
            return;
        };
        let grown = glyph_width(stage.chars().count());
        if !habitat.fits(self.position, grown) {
            return;
        }

        self.appearance.age = next;
        self.path.clear();
        self.heading = Heading::between(self.position, target);
        self.sync_footprint();
        debug!(fish = self.id.get(), age = next, "fish grew");
        out.push(Event::FishGrew {
            fish: self.id,
            age: next,
        });
    }

    fn take_step(&mut self, step: Step) {
        self.position = step.position;
        self.heading = step.heading;
        self.sync_footprint();
    }

    fn sync_footprint(&mut self) {
        let width = self.width();
        self.footprint
            .reshape(self.position, self.position.offset(width, 0));
    }

    /// Picks what to do once the queued path runs dry.
    fn choose_goal(&mut self, habitat: &mut Habitat, out: &mut Vec<Event>) {
        if self.wander_goal.take().is_some() {
            habitat.target_reached(self.id, out);
        }
        self.follow = None;
        self.path.clear();

        if let Some((food, _)) = habitat.nearest_food(self.position) {
            let follow_chance = habitat.tuning().follow_chance;
            if habitat.chance(follow_chance) {
                self.start_following(food, out);
                return;
            }
        }

        self.queue_idle(habitat);
        let width = self.width();
        let goal = habitat.wander_target(width);
        self.wander_goal = Some(goal);
        self.path
            .extend(habitat.planner().plan(self.position, goal, width));
    }

    fn queue_idle(&mut self, habitat: &mut Habitat) {
        let tuning = habitat.tuning();
        let fewest = tuning.idle_repeats_min;
        let most = tuning.idle_repeats_max.max(fewest);
        let turn_chance = tuning.idle_turn_chance;

        let repeats = habitat.rng().gen_range(fewest..=most);
        let turning = habitat.chance(turn_chance);
        let mut heading = self.heading;
        for index in 0..repeats {
            if turning && index % 2 == 1 {
                heading = heading.flipped();
            }
            self.path.push_back(Step::new(self.position, heading));
        }
    }

    fn start_following(&mut self, food: FoodId, out: &mut Vec<Event>) {
        self.follow = Some(food);
        self.path.clear();
        self.wander_goal = None;
        out.push(Event::FollowStarted {
            fish: self.id,
            food,
        });
    }

    /// Lets go of destroyed food, sometimes picking a new goal on the spot.
    pub(crate) fn food_destroyed(
        &mut self,
        food: FoodId,
        habitat: &mut Habitat,
        out: &mut Vec<Event>,
    ) {
        if self.follow != Some(food) {
            return;
        }
        self.follow = None;

        let replan_chance = habitat.tuning().replan_on_loss_chance;
        if habitat.chance(replan_chance) {
            self.path.clear();
            self.choose_goal(habitat, out);
        }
    }

    /// Offers freshly spawned food; nearby fish switch to it when it is closer
    /// than whatever they were chasing.
    pub(crate) fn food_available(
        &mut self,
        food: FoodId,
        position: Position,
        habitat: &Habitat,
        out: &mut Vec<Event>,
    ) {
        let distance = self.position.distance_to(position);
        if distance > habitat.tuning().capture_radius {
            return;
        }

        let current = self
            .follow
            .and_then(|current| habitat.food(current))
            .map(|particle| self.position.distance_to(particle.position()));
        let nearer = current.map_or(true, |current| distance < current);
        if nearer {
            self.start_following(food, out);
        }
    }

    pub(crate) fn snapshot(&self) -> FishSnapshot {
        let stage = self
            .appearance
            .stages
            .get(self.appearance.age)
            .map_or("", String::as_str);
        let (skin, pigment) = appearance::dress(stage, &self.appearance.pigment, self.heading);
        FishSnapshot {
            id: self.id,
            species: self.appearance.species.clone(),
            variant: self.appearance.variant.clone(),
            name: self.appearance.name.clone(),
            age: self.appearance.age,
            position: self.position,
            heading: self.heading,
            skin,
            pigment,
            footprint: self.footprint,
            follow: self.follow,
            wander_goal: self.wander_goal,
            queued_steps: self.path.len(),
        }
    }
}

fn glyph_width(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::Food;
    use fishtank_core::Tuning;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn habitat_with(tuning: Tuning) -> Habitat {
        let bounds = Boundary::new(Position::new(1, 1), Position::new(40, 20));
        Habitat::new(bounds, ChaCha8Rng::seed_from_u64(3), tuning, 25)
    }

    fn guppy(id: u32, position: Position) -> Fish {
        let appearance = Appearance {
            species: "Guppy".to_owned(),
            variant: None,
            name: None,
            stages: vec!["><>".to_owned()],
            pigment: vec![1, 2, 3],
            age: 0,
        };
        Fish::new(FishId::new(id), appearance, position)
    }

    fn chase(fish: &mut Fish, habitat: &mut Habitat, food: Position) -> FoodId {
        let id = FoodId::new(0);
        habitat.insert_food(Food::new(id, food, 3));
        fish.start_following(id, &mut Vec::new());
        id
    }

    #[test]
    fn food_against_the_right_wall_is_reached_mouth_first() {
        let tuning = Tuning {
            age_up_chance: 0.0,
            ..Tuning::default()
        };
        let mut habitat = habitat_with(tuning);
        let mut fish = guppy(0, Position::new(30, 10));
        let food = chase(&mut fish, &mut habitat, Position::new(38, 19));

        let mut events = Vec::new();
        for _ in 0..12 {
            fish.update(&[], &mut habitat, &mut events);
        }

        assert!(events
            .iter()
            .any(|event| matches!(event, Event::FoodEaten { food: eaten, .. } if *eaten == food)));
        assert_eq!(fish.position, Position::new(36, 19));
        assert_eq!(fish.heading, Heading::Right);
        assert_eq!(fish.follow, Some(food));
    }

    #[test]
    fn fish_turns_in_place_when_already_level_with_food() {
        let tuning = Tuning {
            age_up_chance: 0.0,
            feeding_distance: 0.5,
            ..Tuning::default()
        };
        let mut habitat = habitat_with(tuning);
        let mut fish = guppy(0, Position::new(6, 5));
        fish.heading = Heading::Left;
        let food = chase(&mut fish, &mut habitat, Position::new(8, 5));

        let mut events = Vec::new();
        fish.update(&[], &mut habitat, &mut events);
        assert_eq!(fish.position, Position::new(6, 5));
        assert_eq!(fish.heading, Heading::Right);
        assert!(events.is_empty());

        fish.update(&[], &mut habitat, &mut events);
        assert_eq!(
            events,
            vec![Event::FoodEaten {
                food,
                fish: fish.id,
                remaining: 2,
            }]
        );
    }

    #[test]
    fn steps_onto_earlier_fish_wait_a_tick() {
        let mut habitat = habitat_with(Tuning::default());
        let blocker = guppy(0, Position::new(5, 5));
        let mut mover = guppy(1, Position::new(3, 5));
        mover.path.extend([
            Step::new(Position::new(4, 5), Heading::Right),
            Step::new(Position::new(5, 5), Heading::Right),
        ]);

        let mut events = Vec::new();
        mover.update(std::slice::from_ref(&blocker), &mut habitat, &mut events);
        assert_eq!(mover.position, Position::new(4, 5));

        mover.update(std::slice::from_ref(&blocker), &mut habitat, &mut events);
        assert_eq!(mover.position, Position::new(4, 5));
        assert_eq!(mover.path.len(), 1);

        mover.update(&[], &mut habitat, &mut events);
        assert_eq!(mover.position, Position::new(5, 5));
        assert!(events.is_empty());
    }

    #[test]
    fn turning_on_the_spot_is_never_blocked() {
        let mut habitat = habitat_with(Tuning::default());
        let mut mover = guppy(1, Position::new(5, 5));
        let overlapping = guppy(0, Position::new(3, 5));
        mover
            .path
            .push_back(Step::new(Position::new(5, 5), Heading::Left));

        mover.update(std::slice::from_ref(&overlapping), &mut habitat, &mut Vec::new());
        assert_eq!(mover.heading, Heading::Left);
        assert!(mover.path.is_empty());
    }
}
