#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Ray-cast field of view computed from the player's position.
//!
//! A cell is visible when at least one of eight points sampled half a cell
//! away from its center has an unobstructed ray to the player. Sampling
//! around the center keeps walls that meet only at a corner from leaking
//! visibility through the diagonal gap between them.

use std::collections::HashSet;

use glam::Vec2;
use rewind_core::{intern, Coordinate};
use rewind_world::{query, State};

const SAMPLE_OFFSETS: [Vec2; 8] = [
    Vec2::new(-0.5, 0.0),
    Vec2::new(0.5, 0.0),
    Vec2::new(0.0, -0.5),
    Vec2::new(0.0, 0.5),
    Vec2::new(-0.5, -0.5),
    Vec2::new(0.5, -0.5),
    Vec2::new(-0.5, 0.5),
    Vec2::new(0.5, 0.5),
];

/// Computes the set of coordinates visible from the player.
///
/// The result depends only on the walls and the player position, so it must
/// be recomputed after every turn.
#[must_use]
pub fn visible_tiles(coordinates: &[Vec<Coordinate>], state: &State) -> HashSet<Coordinate> {
    let player = to_point(query::player_position(state));
    coordinates
        .iter()
        .flatten()
        .copied()
        .filter(|coordinate| is_visible(state, *coordinate, player))
        .collect()
}

fn is_visible(state: &State, coordinate: Coordinate, player: Vec2) -> bool {
    let center = to_point(coordinate);
    SAMPLE_OFFSETS
        .iter()
        .any(|offset| ray_reaches(state, center + *offset, player))
}

/// Walks from `origin` toward `player` in unit steps, failing as soon as a
/// step rounds onto a wall. The final step snaps onto the player.
fn ray_reaches(state: &State, origin: Vec2, player: Vec2) -> bool {
    let direction = (player - origin).normalize_or_zero();
    let max_steps = origin.distance(player).ceil() as usize + 1;
    let mut position = origin;

    for _ in 0..max_steps {
        let arrived = position.distance(player) <= 1.0;
        position = if arrived { player } else { position + direction };

        if query::is_wall(state, to_coordinate(position)) {
            return false;
        }
        if arrived {
            return true;
        }
    }

    false
}

fn to_point(coordinate: Coordinate) -> Vec2 {
    Vec2::new(coordinate.column() as f32, coordinate.row() as f32)
}

fn to_coordinate(point: Vec2) -> Coordinate {
    intern(point.y.round() as i32, point.x.round() as i32)
}

/// Tracks the currently visible cells and every cell seen so far.
#[derive(Clone, Debug, Default)]
pub struct Visibility {
    visible: HashSet<Coordinate>,
    seen: HashSet<Coordinate>,
}

impl Visibility {
    /// Creates an empty visibility memory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes the visible set for the current state and remembers it.
    pub fn refresh(&mut self, coordinates: &[Vec<Coordinate>], state: &State) {
        self.visible = visible_tiles(coordinates, state);
        self.seen.extend(self.visible.iter().copied());
    }

    /// Cells visible after the latest refresh.
    #[must_use]
    pub fn visible(&self) -> &HashSet<Coordinate> {
        &self.visible
    }

    /// Every cell that has been visible at some refresh.
    #[must_use]
    pub fn seen(&self) -> &HashSet<Coordinate> {
        &self.seen
    }

    /// Reports whether the cell is currently visible.
    #[must_use]
    pub fn is_visible(&self, coordinate: Coordinate) -> bool {
        self.visible.contains(&coordinate)
    }

    /// Reports whether the cell has ever been visible.
    #[must_use]
    pub fn was_seen(&self, coordinate: Coordinate) -> bool {
        self.seen.contains(&coordinate)
    }
}
