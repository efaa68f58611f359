use fishtank_core::{Boundary, Heading, Position};
use fishtank_system_pathing::PathPlanner;

fn arena() -> Boundary {
    Boundary::new(Position::new(1, 1), Position::new(40, 20))
}

fn sample_points() -> Vec<Position> {
    let mut points = Vec::new();
    for x in [2, 5, 11, 17, 23, 30, 35] {
        for y in [2, 6, 10, 14, 19] {
            points.push(Position::new(x, y));
        }
    }
    points
}

#[test]
fn unobstructed_paths_close_in_on_the_destination() {
    let planner = PathPlanner::new(arena());

    for &start in &sample_points() {
        for &end in &sample_points() {
            let path = planner.plan(start, end, 3);
            assert_eq!(path.first().map(|step| step.position), Some(start));
            assert_eq!(
                path.last().map(|step| step.position),
                Some(end),
                "path from {start} to {end} was clipped"
            );

            for pair in path.windows(2) {
                let before = pair[0].position.distance_to(end);
                let after = pair[1].position.distance_to(end);
                assert!(
                    after < before,
                    "step {} -> {} did not approach {end}",
                    pair[0].position,
                    pair[1].position
                );
            }
        }
    }
}

#[test]
fn every_step_moves_at_most_one_cell_per_axis() {
    let planner = PathPlanner::new(arena());
    let path = planner.plan(Position::new(3, 18), Position::new(34, 2), 1);

    for pair in path.windows(2) {
        let delta = pair[1].position - pair[0].position;
        assert!(delta.x().abs() <= 1 && delta.y().abs() <= 1);
        assert_ne!(delta, Position::new(0, 0));
    }
}

#[test]
fn heading_is_fixed_for_the_whole_route() {
    let planner = PathPlanner::new(arena());
    let rightward = planner.plan(Position::new(3, 10), Position::new(20, 4), 2);
    let leftward = planner.plan(Position::new(20, 4), Position::new(3, 10), 2);

    assert!(rightward.iter().all(|step| step.heading == Heading::Right));
    assert!(leftward.iter().all(|step| step.heading == Heading::Left));
}

#[test]
fn clipped_paths_are_the_longest_valid_prefix() {
    let bounds = arena();
    let planner = PathPlanner::new(bounds);
    let width = 4;
    let path = planner.plan(Position::new(20, 10), Position::new(45, 14), width);

    assert!(!path.is_empty());
    for step in &path {
        assert!(planner.admits(step.position, width));
    }

    let full = PathPlanner::new(Boundary::new(Position::new(-100, -100), Position::new(100, 100)))
        .plan(Position::new(20, 10), Position::new(45, 14), width);
    assert_eq!(&full[..path.len()], path.as_slice());
    assert!(!planner.admits(full[path.len()].position, width));
}
