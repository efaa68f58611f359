use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use fishtank_core::{
    Boundary, Command, Event, FishRequest, FishSnapshot, FoodSnapshot, Position, SpeciesCatalog,
    SpeciesDefinition, VariantDefinition,
};
use fishtank_world::{self as world, query, Arena, ArenaConfig};

#[test]
fn deterministic_replay_produces_identical_runs() {
    let first = replay(7, scripted_commands());
    let second = replay(7, scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(first.events.len() > 400);
}

#[test]
fn different_seeds_produce_different_runs() {
    let first = replay(7, scripted_commands());
    let second = replay(8, scripted_commands());

    assert_ne!(first.fingerprint(), second.fingerprint());
}

fn catalog() -> SpeciesCatalog {
    SpeciesCatalog::new()
        .with_species(
            "Molly",
            SpeciesDefinition::new([">->", "><'>", ">-<'>"], vec![1, 2])
                .with_variant("golden_panda", VariantDefinition::new(15, vec![214, 220]))
                .with_variant("dalmatian", VariantDefinition::new(5, vec![15, 0])),
        )
        .with_species("Tetra", SpeciesDefinition::new(["><>", "><)>"], vec![33, 81]))
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = vec![
        Command::AddFish {
            request: FishRequest::new("Molly"),
        },
        Command::AddFish {
            request: FishRequest::new("Molly").with_age(1),
        },
        Command::AddFish {
            request: FishRequest::new("Tetra").at(Position::new(10, 10)),
        },
        Command::AddFish {
            request: FishRequest::new("Tetra").with_variant("neon"),
        },
    ];

    for round in 0..8 {
        commands.push(Command::AddFood {
            position: (round % 2 == 0).then(|| Position::new(5 + round * 4, 3)),
            health: 3,
        });
        commands.extend(std::iter::repeat(Command::Tick).take(60));
    }

    commands.push(Command::SetPaused { paused: true });
    commands.extend(std::iter::repeat(Command::Tick).take(5));
    commands.push(Command::SetPaused { paused: false });
    commands.extend(std::iter::repeat(Command::Tick).take(30));
    commands
}

fn replay(seed: u64, commands: Vec<Command>) -> ReplayOutcome {
    let boundary = Boundary::new(Position::new(0, 0), Position::new(48, 16));
    let config = ArenaConfig::new(boundary).with_seed(seed).with_fps(10);
    let mut arena = Arena::new(config, catalog()).expect("valid arena");
    let mut events = Vec::new();

    for command in commands {
        let mut generated = Vec::new();
        world::apply(&mut arena, command, &mut generated);
        events.extend(generated.iter().map(|event| format!("{event:?}")));
        assert!(!generated
            .iter()
            .any(|event| matches!(event, Event::ShutdownRequested)));
    }

    ReplayOutcome {
        fish: query::fish_view(&arena).into_vec(),
        food: query::food_view(&arena).into_vec(),
        tick: query::tick_index(&arena),
        events,
    }
}

#[derive(Debug, PartialEq, Eq)]
struct ReplayOutcome {
    fish: Vec<FishSnapshot>,
    food: Vec<FoodSnapshot>,
    tick: u64,
    events: Vec<String>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.fish.hash(&mut hasher);
        self.food.hash(&mut hasher);
        self.tick.hash(&mut hasher);
        self.events.hash(&mut hasher);
        hasher.finish()
    }
}

#[test]
fn unknown_variant_is_reported_in_the_event_log() {
    let outcome = replay(1, scripted_commands());
    assert_eq!(outcome.tick, 510);
    assert!(outcome
        .events
        .iter()
        .any(|event| event.contains("UnknownVariant")));
    assert_eq!(outcome.fish.len(), 3);
}
