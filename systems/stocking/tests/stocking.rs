use fishtank_core::{
    Boundary, Command, Event, FishRequest, Position, SpeciesCatalog, SpeciesDefinition,
};
use fishtank_system_stocking::{Config, Stocking};
use fishtank_world::{self as world, query, Arena, ArenaConfig};

fn catalog() -> SpeciesCatalog {
    SpeciesCatalog::new()
        .with_species("Molly", SpeciesDefinition::new([">->", "><'>", ">-<'>"], vec![1]))
        .with_species("Tetra", SpeciesDefinition::new(["><>"], vec![2]))
        .with_species("Angelfish", SpeciesDefinition::new(["<|)", "<||)"], vec![3]))
}

fn stock(seed: u64) -> Vec<Command> {
    let mut stocking = Stocking::new(Config::new(20, seed));
    let mut commands = Vec::new();
    stocking.stock(&catalog(), &mut commands);
    commands
}

#[test]
fn requests_are_valid_for_the_catalog() {
    let catalog = catalog();
    let commands = stock(0x1234_5678);
    assert_eq!(commands.len(), 20);

    for command in &commands {
        let Command::AddFish { request } = command else {
            panic!("unexpected command emitted: {command:?}");
        };
        let definition = catalog.get(&request.species).expect("known species");
        assert!(request.age < definition.stages.len());
        assert_eq!(request.variant, None);
        assert_eq!(request.position, None);
    }
}

#[test]
fn same_seed_yields_same_population() {
    assert_eq!(stock(42), stock(42));
}

#[test]
fn draws_cover_several_species() {
    let species: std::collections::BTreeSet<String> = stock(7)
        .into_iter()
        .filter_map(|command| match command {
            Command::AddFish {
                request: FishRequest { species, .. },
            } => Some(species),
            _ => None,
        })
        .collect();
    assert!(species.len() > 1, "only drew {species:?}");
}

#[test]
fn arena_accepts_the_whole_population() {
    let boundary = Boundary::new(Position::new(0, 0), Position::new(60, 20));
    let mut arena = Arena::new(ArenaConfig::new(boundary), catalog()).expect("valid arena");
    let mut events = Vec::new();

    for command in stock(3) {
        world::apply(&mut arena, command, &mut events);
    }

    let added = events
        .iter()
        .filter(|event| matches!(event, Event::FishAdded { .. }))
        .count();
    assert_eq!(added, 20);
    assert_eq!(query::fish_view(&arena).len(), 20);
}
