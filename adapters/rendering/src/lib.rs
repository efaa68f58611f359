#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for fishtank adapters.
//!
//! Adapters turn arena snapshots into a [`Scene`], compose it into a
//! character [`Frame`] and hand it to a [`RenderingBackend`]. Nothing here
//! touches a terminal; backends decide how cells reach the screen.

use anyhow::Result as AnyResult;
use fishtank_core::{Boundary, FishId, FishView, FoodId, FoodView, Position};
use std::time::Duration;

/// Symbol used to draw a food particle.
pub const FOOD_GLYPH: char = '*';
/// Colour index used for food particles.
pub const FOOD_COLOUR: u8 = 180;
/// Colour index used for the tank border.
pub const BORDER_COLOUR: u8 = 244;

/// Fish drawn at its anchor position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpritePresentation {
    /// Identifier of the fish.
    pub id: FishId,
    /// Leftmost cell of the skin.
    pub position: Position,
    /// Glyphs already mirrored for the current heading.
    pub glyphs: String,
    /// One colour index per glyph; missing entries fall back to the default colour.
    pub pigment: Vec<u8>,
}

impl SpritePresentation {
    /// Creates a new sprite.
    #[must_use]
    pub fn new(id: FishId, position: Position, glyphs: String, pigment: Vec<u8>) -> Self {
        Self {
            id,
            position,
            glyphs,
            pigment,
        }
    }
}

/// Food particle drawn as a single glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FoodPresentation {
    /// Identifier of the particle.
    pub id: FoodId,
    /// Cell occupied by the particle.
    pub position: Position,
}

impl FoodPresentation {
    /// Creates a new food presentation.
    #[must_use]
    pub const fn new(id: FoodId, position: Position) -> Self {
        Self { id, position }
    }
}

/// Scene description combining the tank outline and its inhabitants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    /// Outline of the tank; entities live strictly inside it.
    pub tank: Boundary,
    /// Fish sprites in id order.
    pub fish: Vec<SpritePresentation>,
    /// Food particles in id order.
    pub food: Vec<FoodPresentation>,
    /// Whether the simulation is paused.
    pub paused: bool,
}

impl Scene {
    /// Creates an empty scene for the provided tank.
    #[must_use]
    pub fn new(tank: Boundary) -> Self {
        Self {
            tank,
            fish: Vec::new(),
            food: Vec::new(),
            paused: false,
        }
    }

    /// Replaces the inhabitants with the contents of fresh arena views.
    pub fn refresh(&mut self, fish: &FishView, food: &FoodView, paused: bool) {
        self.fish = fish
            .iter()
            .map(|snapshot| {
                SpritePresentation::new(
                    snapshot.id,
                    snapshot.position,
                    snapshot.skin.clone(),
                    snapshot.pigment.clone(),
                )
            })
            .collect();
        self.food = food
            .iter()
            .map(|snapshot| FoodPresentation::new(snapshot.id, snapshot.position))
            .collect();
        self.paused = paused;
    }

    /// Short status text shown in the top border, if any.
    #[must_use]
    pub fn caption(&self) -> Option<&'static str> {
        self.paused.then_some(" paused ")
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presentation {
    /// Title announced by the backend when it starts.
    pub title: String,
    /// Target time between frames.
    pub frame_interval: Duration,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(title: T, frame_interval: Duration, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            frame_interval,
            scene,
        }
    }
}

/// Decision returned by the per-frame update closure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameControl {
    /// Draw the updated scene and keep going.
    Continue,
    /// Stop without drawing another frame.
    Exit,
}

/// Rendering backend capable of presenting fishtank scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until the update closure asks it to exit.
    ///
    /// The provided `update_scene` closure receives the frame interval and may
    /// mutate the scene before it is drawn, letting adapters advance the
    /// simulation in lock step with presentation.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, &mut Scene) -> FrameControl;
}

/// Single character cell of a composed frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Character drawn in the cell.
    pub symbol: char,
    /// Colour index, or `None` for the terminal default.
    pub colour: Option<u8>,
}

impl Cell {
    const BLANK: Self = Self {
        symbol: ' ',
        colour: None,
    };

    /// Creates a new cell.
    #[must_use]
    pub const fn new(symbol: char, colour: Option<u8>) -> Self {
        Self { symbol, colour }
    }
}

/// Plain-text rendition of a scene, border included.
///
/// The frame spans the tank's corners inclusively, so the border occupies
/// exactly the cells the open boundary excludes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    origin: Position,
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Frame {
    /// Composes the scene: border first, then food, then fish on top.
    #[must_use]
    pub fn compose(scene: &Scene) -> Self {
        let origin = scene.tank.start();
        let width = usize::try_from(scene.tank.width() + 1).unwrap_or(0);
        let height = usize::try_from(scene.tank.height() + 1).unwrap_or(0);
        let mut frame = Self {
            origin,
            width,
            height,
            cells: vec![Cell::BLANK; width * height],
        };

        frame.draw_border(scene.caption());
        for food in &scene.food {
            frame.put(food.position, Cell::new(FOOD_GLYPH, Some(FOOD_COLOUR)));
        }
        for sprite in &scene.fish {
            for (offset, symbol) in (0_i32..).zip(sprite.glyphs.chars()) {
                let colour = usize::try_from(offset)
                    .ok()
                    .and_then(|index| sprite.pigment.get(index))
                    .copied();
                frame.put(sprite.position.offset(offset, 0), Cell::new(symbol, colour));
            }
        }
        frame
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Cell at the provided arena position, if it lies within the frame.
    #[must_use]
    pub fn cell(&self, position: Position) -> Option<&Cell> {
        self.index(position).and_then(|index| self.cells.get(index))
    }

    /// Rows of cells from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Frame as uncoloured text, one line per row.
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        self.rows()
            .map(|row| row.iter().map(|cell| cell.symbol).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn draw_border(&mut self, caption: Option<&str>) {
        let border = Some(BORDER_COLOUR);
        let (right, bottom) = (self.width.saturating_sub(1), self.height.saturating_sub(1));
        for row in 0..self.height {
            for column in 0..self.width {
                let on_column_edge = column == 0 || column == right;
                let on_row_edge = row == 0 || row == bottom;
                let symbol = match (on_column_edge, on_row_edge) {
                    (true, true) => '+',
                    (false, true) => '-',
                    (true, false) => '|',
                    (false, false) => continue,
                };
                self.cells[row * self.width + column] = Cell::new(symbol, border);
            }
        }

        let Some(caption) = caption else {
            return;
        };
        let room = self.width.saturating_sub(4);
        for (column, symbol) in (2..).zip(caption.chars().take(room)) {
            self.cells[column] = Cell::new(symbol, border);
        }
    }

    fn put(&mut self, position: Position, cell: Cell) {
        if let Some(index) = self.index(position) {
            self.cells[index] = cell;
        }
    }

    fn index(&self, position: Position) -> Option<usize> {
        let column = usize::try_from(position.x() - self.origin.x()).ok()?;
        let row = usize::try_from(position.y() - self.origin.y()).ok()?;
        (column < self.width && row < self.height).then_some(row * self.width + column)
    }
}
