#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic line planner that turns two positions into queued steps.
//!
//! Paths are rasterised with integer error accumulation along the dominant
//! axis, so every step makes one unit of forward progress and the secondary
//! axis catches up whenever its accumulated error crosses the threshold.

use fishtank_core::{Boundary, Containment, Heading, Position, Step};

/// Decides which boundary classifications still admit a step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ClipPolicy {
    /// Both footprint corners must lie strictly inside.
    #[default]
    Strict,
    /// Rows may leave the boundary; only a horizontal escape truncates.
    TolerateVertical,
}

impl ClipPolicy {
    fn tolerates(self, containment: Containment) -> bool {
        match self {
            Self::Strict => containment.is_inside(),
            Self::TolerateVertical => !containment.escapes_x(),
        }
    }
}

/// Pure planner clipping rasterised lines to a boundary.
#[derive(Clone, Copy, Debug)]
pub struct PathPlanner {
    bounds: Boundary,
    policy: ClipPolicy,
}

impl PathPlanner {
    /// Creates a strict planner for the provided boundary.
    #[must_use]
    pub const fn new(bounds: Boundary) -> Self {
        Self {
            bounds,
            policy: ClipPolicy::Strict,
        }
    }

    /// Returns the planner using a different clip policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: ClipPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Boundary the planner clips against.
    #[must_use]
    pub const fn bounds(&self) -> &Boundary {
        &self.bounds
    }

    /// Plans a straight route from `start` to `end` for a shape
    /// `footprint_width` cells wide.
    ///
    /// The first step is `start` itself and, when nothing is clipped, the last
    /// step is `end`. Every step shares the heading implied by the horizontal
    /// direction of travel. The route stops at the first step whose leading or
    /// trailing corner the policy rejects, so the result is the longest valid
    /// prefix and may be empty.
    #[must_use]
    pub fn plan(&self, start: Position, end: Position, footprint_width: i32) -> Vec<Step> {
        let heading = Heading::between(start, end);
        let delta = end - start;
        let (step_x, step_y) = (delta.x().signum(), delta.y().signum());
        let (span_x, span_y) = (delta.x().abs(), delta.y().abs());
        let x_dominant = span_x >= span_y;
        let (major, minor) = if x_dominant {
            (span_x, span_y)
        } else {
            (span_y, span_x)
        };

        let capacity = usize::try_from(major).unwrap_or(0).saturating_add(1);
        let mut path = Vec::with_capacity(capacity);
        let mut cursor = start;
        let mut error = 2 * minor - major;

        for progress in 0..=major {
            if !self.admits(cursor, footprint_width) {
                break;
            }
            path.push(Step::new(cursor, heading));
            if progress == major {
                break;
            }

            if error > 0 {
                cursor = if x_dominant {
                    cursor.offset(0, step_y)
                } else {
                    cursor.offset(step_x, 0)
                };
                error -= 2 * major;
            }
            error += 2 * minor;
            cursor = if x_dominant {
                cursor.offset(step_x, 0)
            } else {
                cursor.offset(0, step_y)
            };
        }

        path
    }

    /// Reports whether a shape anchored at `position` passes the clip policy.
    #[must_use]
    pub fn admits(&self, position: Position, footprint_width: i32) -> bool {
        let leading = self.bounds.classify(position);
        let trailing = self.bounds.classify(position.offset(footprint_width, 0));
        self.policy.tolerates(leading) && self.policy.tolerates(trailing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planner() -> PathPlanner {
        PathPlanner::new(Boundary::new(Position::new(1, 1), Position::new(40, 20)))
    }

    fn positions(path: &[Step]) -> Vec<Position> {
        path.iter().map(|step| step.position).collect()
    }

    #[test]
    fn identical_endpoints_yield_single_step() {
        let origin = Position::new(5, 5);
        let path = planner().plan(origin, origin, 3);
        assert_eq!(positions(&path), vec![origin]);
        assert_eq!(path[0].heading, Heading::Left);
    }

    #[test]
    fn horizontal_route_walks_every_column() {
        let path = planner().plan(Position::new(5, 5), Position::new(9, 5), 3);
        assert_eq!(
            positions(&path),
            (5..=9).map(|x| Position::new(x, 5)).collect::<Vec<_>>()
        );
        assert!(path.iter().all(|step| step.heading == Heading::Right));
    }

    #[test]
    fn diagonal_route_steps_both_axes() {
        let path = planner().plan(Position::new(10, 10), Position::new(7, 7), 1);
        assert_eq!(
            positions(&path),
            vec![
                Position::new(10, 10),
                Position::new(9, 9),
                Position::new(8, 8),
                Position::new(7, 7),
            ]
        );
        assert!(path.iter().all(|step| step.heading == Heading::Left));
    }

    #[test]
    fn shallow_route_spreads_secondary_steps() {
        let path = planner().plan(Position::new(2, 2), Position::new(8, 4), 1);
        assert_eq!(path.len(), 7);
        let rows: Vec<i32> = path.iter().map(|step| step.position.y()).collect();
        assert_eq!(rows.first(), Some(&2));
        assert_eq!(rows.last(), Some(&4));
        assert!(rows.windows(2).all(|pair| pair[1] - pair[0] <= 1));
    }

    #[test]
    fn trailing_corner_truncates_route() {
        let path = planner().plan(Position::new(30, 5), Position::new(38, 5), 3);
        assert_eq!(positions(&path).last(), Some(&Position::new(36, 5)));
    }

    #[test]
    fn invalid_start_yields_empty_route() {
        let path = planner().plan(Position::new(1, 5), Position::new(10, 5), 1);
        assert!(path.is_empty());
    }

    #[test]
    fn vertical_tolerance_only_truncates_on_column_escape() {
        let tolerant = planner().with_policy(ClipPolicy::TolerateVertical);
        let sinking = tolerant.plan(Position::new(5, 18), Position::new(5, 23), 1);
        assert_eq!(sinking.len(), 6);

        let strict = planner().plan(Position::new(5, 18), Position::new(5, 23), 1);
        assert_eq!(strict.len(), 2);

        let drifting = tolerant.plan(Position::new(36, 22), Position::new(41, 22), 1);
        assert_eq!(positions(&drifting).last(), Some(&Position::new(38, 22)));
    }
}
