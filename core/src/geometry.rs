//! Integer geometry shared by every simulation component.

use std::{
    cmp::Ordering,
    fmt,
    ops::{Add, RangeInclusive, Sub},
};

use serde::{Deserialize, Serialize};

/// Integer point inside the simulation plane.
///
/// Columns grow to the right and rows grow downward, matching terminal cell
/// addressing. Positions order by column first so sorting a set of positions
/// sweeps the arena from left to right; rows only break ties.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    /// Creates a new position from column and row coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row coordinate.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns a copy displaced by the provided deltas.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance to another position.
    ///
    /// Only used for comparisons; positions themselves never hold fractional
    /// state.
    #[must_use]
    pub fn distance_to(self, other: Position) -> f64 {
        let dx = f64::from(other.x - self.x);
        let dy = f64::from(other.y - self.y);
        (dx * dx + dy * dy).sqrt()
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.x.cmp(&other.x).then(self.y.cmp(&other.y))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Outcome of testing a position against a [`Boundary`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Containment {
    /// The position lies strictly inside on both axes.
    Inside,
    /// Only the column lies on or beyond the border.
    OutsideX,
    /// Only the row lies on or beyond the border.
    OutsideY,
    /// Both coordinates lie on or beyond the border.
    OutsideXY,
}

impl Containment {
    /// Reports whether the classification is [`Containment::Inside`].
    #[must_use]
    pub const fn is_inside(self) -> bool {
        matches!(self, Self::Inside)
    }

    /// Reports whether the column escaped the boundary.
    #[must_use]
    pub const fn escapes_x(self) -> bool {
        matches!(self, Self::OutsideX | Self::OutsideXY)
    }

    /// Reports whether the row escaped the boundary.
    #[must_use]
    pub const fn escapes_y(self) -> bool {
        matches!(self, Self::OutsideY | Self::OutsideXY)
    }
}

/// Axis-aligned open rectangle spanned by two corner positions.
///
/// Border coordinates are excluded: a boundary from `(1, 1)` to `(40, 20)`
/// admits columns `2..=39` and rows `2..=19`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Boundary {
    start: Position,
    end: Position,
}

impl Boundary {
    /// Creates a boundary from two corners given in any order.
    #[must_use]
    pub fn new(a: Position, b: Position) -> Self {
        let (start, end) = normalize(a, b);
        Self { start, end }
    }

    /// Upper-left corner.
    #[must_use]
    pub const fn start(&self) -> Position {
        self.start
    }

    /// Lower-right corner.
    #[must_use]
    pub const fn end(&self) -> Position {
        self.end
    }

    /// Horizontal distance between the two corners.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.end.x - self.start.x
    }

    /// Vertical distance between the two corners.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.end.y - self.start.y
    }

    /// Moves both corners in place.
    pub fn reshape(&mut self, a: Position, b: Position) {
        let (start, end) = normalize(a, b);
        self.start = start;
        self.end = end;
    }

    /// Classifies the position against each axis independently.
    #[must_use]
    pub fn classify(&self, position: Position) -> Containment {
        let outside_x = !(self.start.x < position.x && position.x < self.end.x);
        let outside_y = !(self.start.y < position.y && position.y < self.end.y);
        match (outside_x, outside_y) {
            (false, false) => Containment::Inside,
            (true, false) => Containment::OutsideX,
            (false, true) => Containment::OutsideY,
            (true, true) => Containment::OutsideXY,
        }
    }

    /// Reports whether the position lies strictly inside.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.classify(position).is_inside()
    }

    /// Reports whether both corners of `other` lie strictly inside.
    #[must_use]
    pub fn contains_boundary(&self, other: &Boundary) -> bool {
        self.contains(other.start) && self.contains(other.end)
    }

    /// Columns a shape `trailing_inset` cells wide may be anchored at so its
    /// right edge still lies inside.
    ///
    /// Returns `None` when no such column exists.
    #[must_use]
    pub fn interior_columns(&self, trailing_inset: i32) -> Option<RangeInclusive<i32>> {
        let low = self.start.x + 1;
        let high = self.end.x - 1 - trailing_inset.max(0);
        (low <= high).then_some(low..=high)
    }

    /// Rows strictly inside the boundary, or `None` when it has no interior.
    #[must_use]
    pub fn interior_rows(&self) -> Option<RangeInclusive<i32>> {
        let low = self.start.y + 1;
        let high = self.end.y - 1;
        (low <= high).then_some(low..=high)
    }

    /// Reports whether no position can be contained at all.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.interior_columns(0).is_none() || self.interior_rows().is_none()
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

fn normalize(a: Position, b: Position) -> (Position, Position) {
    (
        Position::new(a.x.min(b.x), a.y.min(b.y)),
        Position::new(a.x.max(b.x), a.y.max(b.y)),
    )
}

/// Horizontal facing of a fish.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    /// Facing toward decreasing columns; the skin is drawn mirrored.
    Left,
    /// Facing toward increasing columns; the skin is drawn as authored.
    #[default]
    Right,
}

impl Heading {
    /// Heading that travels from `from` toward `to`.
    ///
    /// Vertical-only travel faces left.
    #[must_use]
    pub const fn between(from: Position, to: Position) -> Self {
        if to.x > from.x {
            Self::Right
        } else {
            Self::Left
        }
    }

    /// Opposite heading.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Single queued move: where to stand and which way to face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Step {
    /// Anchor position after the step.
    pub position: Position,
    /// Facing after the step.
    pub heading: Heading,
}

impl Step {
    /// Creates a new step.
    #[must_use]
    pub const fn new(position: Position, heading: Heading) -> Self {
        Self { position, heading }
    }
}
