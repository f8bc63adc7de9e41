#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Rewind adapters.

use anyhow::Result as AnyResult;
use rewind_core::{Coordinate, EntityType};
use rewind_world::query::{Occupant, TileFacts};
use thiserror::Error;

/// Glyph drawn for the player.
pub const PLAYER_GLYPH: char = '@';
/// Glyph drawn for a living dire wolf.
pub const DIRE_WOLF_GLYPH: char = 'w';
/// Glyph drawn for a cell holding corpses.
pub const CORPSE_GLYPH: char = '%';
/// Glyph drawn for a wall.
pub const WALL_GLYPH: char = '#';
/// Glyph drawn for bare ground.
pub const GROUND_GLYPH: char = '.';
/// Glyph drawn for an empty cell.
pub const EMPTY_GLYPH: char = ' ';

/// Maps the facts of a cell to the glyph that represents it.
///
/// Living occupants hide corpses, and corpses hide walls and ground.
#[must_use]
pub fn glyph_for(facts: &TileFacts) -> char {
    match facts.occupant {
        Some(Occupant::Entity(EntityType::Player)) => PLAYER_GLYPH,
        Some(Occupant::Entity(EntityType::DireWolf)) => DIRE_WOLF_GLYPH,
        _ if !facts.corpses.is_empty() => CORPSE_GLYPH,
        Some(Occupant::Wall) => WALL_GLYPH,
        None if facts.ground => GROUND_GLYPH,
        None => EMPTY_GLYPH,
    }
}

/// Glyph of the static terrain only, as remembered from an earlier sighting.
#[must_use]
pub fn terrain_glyph_for(facts: &TileFacts) -> char {
    match facts.occupant {
        Some(Occupant::Wall) => WALL_GLYPH,
        _ if facts.ground => GROUND_GLYPH,
        _ => EMPTY_GLYPH,
    }
}

/// How much of a cell the player can currently perceive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellVisibility {
    /// In the current field of view.
    Visible,
    /// Seen earlier but out of view now.
    Remembered,
    /// Never seen.
    Hidden,
}

/// Single cell of a rendered frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameCell {
    /// Glyph for the full cell contents.
    pub glyph: char,
    /// Glyph for the terrain alone.
    pub terrain: char,
    /// Perception state of the cell.
    pub visibility: CellVisibility,
}

/// Rectangular grid of glyphs ready for presentation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    rows: Vec<Vec<FrameCell>>,
}

impl Frame {
    /// Builds a frame from the tile facts of a floor, classifying each cell
    /// with `classify`.
    pub fn new<F>(floor: &[Vec<TileFacts>], classify: F) -> Result<Self, RenderingError>
    where
        F: Fn(Coordinate) -> CellVisibility,
    {
        let expected = floor.first().map_or(0, Vec::len);
        if let Some((row, facts)) = floor
            .iter()
            .enumerate()
            .find(|(_, facts)| facts.len() != expected)
        {
            return Err(RenderingError::RaggedFloor {
                row,
                expected,
                actual: facts.len(),
            });
        }

        let rows = floor
            .iter()
            .map(|row| {
                row.iter()
                    .map(|facts| FrameCell {
                        glyph: glyph_for(facts),
                        terrain: terrain_glyph_for(facts),
                        visibility: classify(facts.coordinate),
                    })
                    .collect()
            })
            .collect();

        Ok(Self { rows })
    }

    /// Renders every glyph regardless of visibility.
    #[must_use]
    pub fn to_plain_string(&self) -> String {
        self.render(|cell| cell.glyph)
    }

    /// Renders visible cells in full, remembered cells as terrain and hides
    /// everything else.
    #[must_use]
    pub fn to_masked_string(&self) -> String {
        self.render(|cell| match cell.visibility {
            CellVisibility::Visible => cell.glyph,
            CellVisibility::Remembered => cell.terrain,
            CellVisibility::Hidden => EMPTY_GLYPH,
        })
    }

    fn render<F>(&self, glyph: F) -> String
    where
        F: Fn(&FrameCell) -> char,
    {
        self.rows
            .iter()
            .map(|row| row.iter().map(&glyph).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Input captured by adapters for a single turn.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Key name entered by the player.
    pub key: String,
}

/// Scene description combining the floor, player statistics and the log.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scene {
    /// Rendered floor.
    pub frame: Frame,
    /// Player statistics, one per line.
    pub stats: String,
    /// Most recent log lines, oldest first.
    pub messages: Vec<String>,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(frame: Frame, stats: String, messages: Vec<String>) -> Self {
        Self {
            frame,
            stats,
            messages,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presentation {
    /// Title shown above the first frame.
    pub title: String,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Rewind scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until input is exhausted or the player quits.
    ///
    /// The provided `update_scene` closure receives each captured input and
    /// mutates the scene before it is presented again. An error returned by the
    /// closure stops the backend and is propagated to the caller.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum RenderingError {
    /// Every floor row must have the same number of cells.
    #[error("floor row {row} has {actual} cells, expected {expected}")]
    RaggedFloor {
        /// Index of the offending row.
        row: usize,
        /// Cell count of the first row.
        expected: usize,
        /// Cell count of the offending row.
        actual: usize,
    },
}
